//! Static phrase dictionaries used by the query interpreter.
//!
//! Every dictionary is a [`Lexicon`]: an ordered list of phrase groups, each
//! tagged with the value it stands for. Matching is the same for all of them:
//! a phrase containing a space matches as a raw substring, a single word only
//! matches at word boundaries (so "pg" does not fire inside "upgrade").

use crate::models::MediaKind;

/// Synonymous phrases that all map to one value
#[derive(Debug)]
pub struct PhraseGroup<T: 'static> {
    pub phrases: &'static [&'static str],
    pub value: T,
}

impl<T: 'static> PhraseGroup<T> {
    /// True if any phrase of the group occurs in `text`
    pub fn matches(&self, text: &str) -> bool {
        self.phrases.iter().any(|phrase| matches_phrase(text, phrase))
    }
}

/// Ordered list of tagged phrase groups
#[derive(Debug)]
pub struct Lexicon<T: 'static> {
    groups: &'static [PhraseGroup<T>],
}

impl<T: 'static> Lexicon<T> {
    pub const fn new(groups: &'static [PhraseGroup<T>]) -> Self {
        Self { groups }
    }

    /// Value of the first group with a matching phrase
    pub fn first_match(&self, text: &str) -> Option<&'static T> {
        self.groups
            .iter()
            .find(|group| group.matches(text))
            .map(|group| &group.value)
    }

    /// Values of every matching group, in dictionary order
    pub fn all_matches<'a>(&self, text: &'a str) -> impl Iterator<Item = &'static T> + 'a {
        let groups: &'static [PhraseGroup<T>] = self.groups;
        groups
            .iter()
            .filter(move |group| group.matches(text))
            .map(|group| &group.value)
    }

    /// True if `candidate` is exactly one of the dictionary's phrases
    pub fn contains_phrase(&self, candidate: &str) -> bool {
        self.groups
            .iter()
            .any(|group| group.phrases.contains(&candidate))
    }
}

/// Matches `phrase` in already lower-cased `text`
pub fn matches_phrase(text: &str, phrase: &str) -> bool {
    if phrase.contains(' ') {
        return text.contains(phrase);
    }

    text.match_indices(phrase).any(|(start, matched)| {
        let before = text[..start].chars().next_back();
        let after = text[start + matched.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A value that differs between films and series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByKind<T> {
    pub movie: T,
    pub tv: T,
}

impl<T: Copy> ByKind<T> {
    pub const fn new(movie: T, tv: T) -> Self {
        Self { movie, tv }
    }

    pub fn get(&self, kind: MediaKind) -> T {
        match kind {
            MediaKind::Movie => self.movie,
            MediaKind::Tv => self.tv,
        }
    }
}

/// Catalog genre ids; `None` where a kind has no equivalent genre
pub type GenreTarget = ByKind<Option<u32>>;

const fn genre(movie: u32, tv: u32) -> GenreTarget {
    ByKind::new(Some(movie), Some(tv))
}

const fn movie_genre(movie: u32) -> GenreTarget {
    ByKind::new(Some(movie), None)
}

const fn tv_genre(tv: u32) -> GenreTarget {
    ByKind::new(None, Some(tv))
}

/// Inclusive year span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearSpan {
    pub gte: i32,
    pub lte: i32,
}

/// Runtime bounds in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeBounds {
    pub gte: Option<u32>,
    pub lte: Option<u32>,
}

const fn at_most(minutes: u32) -> RuntimeBounds {
    RuntimeBounds {
        gte: None,
        lte: Some(minutes),
    }
}

const fn at_least(minutes: u32) -> RuntimeBounds {
    RuntimeBounds {
        gte: Some(minutes),
        lte: None,
    }
}

/// Vote threshold applied when only a qualitative rating phrase is present
pub const QUALITATIVE_VOTE_THRESHOLD: f64 = 7.0;

static GENRE_GROUPS: &[PhraseGroup<GenreTarget>] = &[
    PhraseGroup { phrases: &["romantic", "romance", "love story", "rom-com", "romcom"], value: genre(10749, 10749) },
    PhraseGroup { phrases: &["comedy", "comedies", "funny", "hilarious", "rom-com", "romcom"], value: genre(35, 35) },
    PhraseGroup { phrases: &["sci-fi", "scifi", "science fiction"], value: genre(878, 10765) },
    PhraseGroup { phrases: &["horror", "scary"], value: genre(27, 27) },
    PhraseGroup { phrases: &["thriller", "thrillers", "suspense", "suspenseful"], value: genre(53, 53) },
    PhraseGroup { phrases: &["action"], value: genre(28, 10759) },
    PhraseGroup { phrases: &["drama", "dramas"], value: genre(18, 18) },
    PhraseGroup { phrases: &["animation", "animated", "cartoon", "cartoons", "anime"], value: genre(16, 16) },
    PhraseGroup { phrases: &["documentary", "documentaries", "docuseries"], value: genre(99, 99) },
    PhraseGroup { phrases: &["family", "family-friendly"], value: genre(10751, 10751) },
    PhraseGroup { phrases: &["adventure", "adventures"], value: genre(12, 10759) },
    PhraseGroup { phrases: &["fantasy"], value: genre(14, 10765) },
    PhraseGroup { phrases: &["mystery", "mysteries", "whodunit"], value: genre(9648, 9648) },
    PhraseGroup { phrases: &["crime", "gangster", "mafia"], value: genre(80, 80) },
    PhraseGroup { phrases: &["war"], value: genre(10752, 10768) },
    PhraseGroup { phrases: &["western", "westerns", "cowboy"], value: genre(37, 37) },
    // Period synonyms share the history id (drama for series)
    PhraseGroup { phrases: &["historical", "history"], value: genre(36, 18) },
    PhraseGroup { phrases: &["period piece", "period drama", "costume drama"], value: genre(36, 18) },
    PhraseGroup { phrases: &["musical", "musicals"], value: movie_genre(10402) },
    PhraseGroup { phrases: &["reality show", "reality tv", "reality"], value: tv_genre(10764) },
    PhraseGroup { phrases: &["soap opera", "soap"], value: tv_genre(10766) },
    PhraseGroup { phrases: &["talk show"], value: tv_genre(10767) },
];

static KEYWORD_GROUPS: &[PhraseGroup<&str>] = &[
    PhraseGroup { phrases: &["time travel", "time-travel"], value: "time travel" },
    PhraseGroup { phrases: &["heist", "heists"], value: "heist" },
    PhraseGroup { phrases: &["zombie", "zombies"], value: "zombie" },
    PhraseGroup { phrases: &["vampire", "vampires"], value: "vampire" },
    PhraseGroup { phrases: &["christmas", "xmas"], value: "christmas" },
    PhraseGroup { phrases: &["halloween"], value: "halloween" },
    PhraseGroup { phrases: &["holiday"], value: "holiday" },
    PhraseGroup { phrases: &["true story", "real events"], value: "based on true story" },
    PhraseGroup { phrases: &["dystopia", "dystopian"], value: "dystopia" },
    PhraseGroup { phrases: &["post-apocalyptic", "apocalypse", "apocalyptic"], value: "post-apocalyptic future" },
    PhraseGroup { phrases: &["coming of age", "coming-of-age"], value: "coming of age" },
    PhraseGroup { phrases: &["road trip"], value: "road trip" },
    PhraseGroup { phrases: &["feel good", "feel-good", "heartwarming", "uplifting"], value: "feel-good" },
    PhraseGroup { phrases: &["underdog"], value: "underdog" },
    PhraseGroup { phrases: &["revenge", "vengeance"], value: "revenge" },
    PhraseGroup { phrases: &["serial killer"], value: "serial killer" },
    PhraseGroup { phrases: &["superhero", "superheroes"], value: "superhero" },
    PhraseGroup { phrases: &["outer space", "space"], value: "space" },
    PhraseGroup { phrases: &["alien", "aliens"], value: "alien" },
    PhraseGroup { phrases: &["robot", "robots"], value: "robot" },
    PhraseGroup { phrases: &["artificial intelligence"], value: "artificial intelligence" },
    PhraseGroup { phrases: &["high school"], value: "high school" },
    PhraseGroup { phrases: &["survival"], value: "survival" },
    PhraseGroup { phrases: &["twist ending", "plot twist"], value: "twist ending" },
    PhraseGroup { phrases: &["cyberpunk"], value: "cyberpunk" },
    PhraseGroup { phrases: &["found footage"], value: "found footage" },
    PhraseGroup { phrases: &["dark comedy", "black comedy"], value: "dark comedy" },
    PhraseGroup { phrases: &["spy", "spies", "espionage"], value: "spy" },
    PhraseGroup { phrases: &["martial arts", "kung fu"], value: "martial arts" },
    PhraseGroup { phrases: &["slasher"], value: "slasher" },
    PhraseGroup { phrases: &["dinosaur", "dinosaurs"], value: "dinosaur" },
    PhraseGroup { phrases: &["ghost", "ghosts", "haunted"], value: "ghost" },
    PhraseGroup { phrases: &["pirate", "pirates"], value: "pirate" },
    PhraseGroup { phrases: &["biopic", "biography"], value: "biography" },
    PhraseGroup { phrases: &["based on a book", "based on a novel", "book adaptation"], value: "based on novel or book" },
];

static RUNTIME_GROUPS: &[PhraseGroup<ByKind<RuntimeBounds>>] = &[
    PhraseGroup { phrases: &["under an hour", "less than an hour"], value: ByKind::new(at_most(60), at_most(60)) },
    PhraseGroup { phrases: &["under two hours", "under 2 hours", "less than two hours"], value: ByKind::new(at_most(120), at_most(120)) },
    PhraseGroup { phrases: &["short", "quick watch", "bite-sized"], value: ByKind::new(at_most(90), at_most(30)) },
    PhraseGroup { phrases: &["long", "epic", "lengthy"], value: ByKind::new(at_least(150), at_least(60)) },
];

static CERTIFICATION_GROUPS: &[PhraseGroup<ByKind<&str>>] = &[
    PhraseGroup { phrases: &["nc-17", "nc17"], value: ByKind::new("NC-17", "TV-MA") },
    PhraseGroup { phrases: &["r-rated", "rated-r", "tv-ma", "mature audiences"], value: ByKind::new("R", "TV-MA") },
    PhraseGroup { phrases: &["pg-13", "pg13", "tv-14"], value: ByKind::new("PG-13", "TV-14") },
    PhraseGroup { phrases: &["pg", "tv-pg"], value: ByKind::new("PG", "TV-PG") },
    PhraseGroup { phrases: &["g-rated", "rated-g", "tv-g"], value: ByKind::new("G", "TV-G") },
    PhraseGroup { phrases: &["for kids", "for children", "kid-friendly", "kid friendly", "tv-y"], value: ByKind::new("G", "TV-Y") },
];

static LANGUAGE_GROUPS: &[PhraseGroup<&str>] = &[
    PhraseGroup { phrases: &["anime", "japanese"], value: "ja" },
    PhraseGroup { phrases: &["k-drama", "kdrama", "korean"], value: "ko" },
    PhraseGroup { phrases: &["bollywood", "hindi"], value: "hi" },
    PhraseGroup { phrases: &["cantonese", "hong kong"], value: "cn" },
    PhraseGroup { phrases: &["mandarin", "chinese"], value: "zh" },
    PhraseGroup { phrases: &["french"], value: "fr" },
    PhraseGroup { phrases: &["spanish"], value: "es" },
    PhraseGroup { phrases: &["italian"], value: "it" },
    PhraseGroup { phrases: &["german"], value: "de" },
    PhraseGroup { phrases: &["swedish"], value: "sv" },
    PhraseGroup { phrases: &["danish"], value: "da" },
    PhraseGroup { phrases: &["norwegian"], value: "no" },
    PhraseGroup { phrases: &["turkish"], value: "tr" },
    PhraseGroup { phrases: &["portuguese", "brazilian"], value: "pt" },
    PhraseGroup { phrases: &["russian"], value: "ru" },
    PhraseGroup { phrases: &["thai"], value: "th" },
];

static DECADE_GROUPS: &[PhraseGroup<YearSpan>] = &[
    PhraseGroup { phrases: &["90s", "nineties", "1990s"], value: YearSpan { gte: 1990, lte: 1999 } },
    PhraseGroup { phrases: &["80s", "eighties", "1980s"], value: YearSpan { gte: 1980, lte: 1989 } },
    PhraseGroup { phrases: &["70s", "seventies", "1970s"], value: YearSpan { gte: 1970, lte: 1979 } },
    PhraseGroup { phrases: &["60s", "sixties", "1960s"], value: YearSpan { gte: 1960, lte: 1969 } },
    PhraseGroup { phrases: &["50s", "fifties", "1950s"], value: YearSpan { gte: 1950, lte: 1959 } },
    PhraseGroup { phrases: &["2000s", "naughties", "noughties"], value: YearSpan { gte: 2000, lte: 2009 } },
    PhraseGroup { phrases: &["2010s", "tens"], value: YearSpan { gte: 2010, lte: 2019 } },
    PhraseGroup { phrases: &["2020s", "twenties"], value: YearSpan { gte: 2020, lte: 2029 } },
];

static RATING_GROUPS: &[PhraseGroup<f64>] = &[PhraseGroup {
    phrases: &[
        "good rating",
        "high rated",
        "well rated",
        "high rating",
        "highly rated",
        "top rated",
        "well reviewed",
        "critically acclaimed",
    ],
    value: QUALITATIVE_VOTE_THRESHOLD,
}];

pub static GENRES: Lexicon<GenreTarget> = Lexicon::new(GENRE_GROUPS);
pub static KEYWORDS: Lexicon<&str> = Lexicon::new(KEYWORD_GROUPS);
pub static RUNTIMES: Lexicon<ByKind<RuntimeBounds>> = Lexicon::new(RUNTIME_GROUPS);
pub static CERTIFICATIONS: Lexicon<ByKind<&str>> = Lexicon::new(CERTIFICATION_GROUPS);
pub static LANGUAGES: Lexicon<&str> = Lexicon::new(LANGUAGE_GROUPS);
pub static DECADES: Lexicon<YearSpan> = Lexicon::new(DECADE_GROUPS);
pub static RATING_PHRASES: Lexicon<f64> = Lexicon::new(RATING_GROUPS);

/// Phrase to send to the keyword lookup for a term.
///
/// Bare seasonal words resolve to overly broad keywords; the film-specific
/// phrasing finds the keyword the catalog actually tags titles with.
pub fn keyword_lookup_phrase(term: &str) -> &str {
    match term {
        "christmas" => "christmas movie",
        "halloween" => "halloween movie",
        "holiday" => "holiday movie",
        other => other,
    }
}
