//! Free-text description → [`FilterSet`].
//!
//! Pure and deterministic: the same text and media kind always produce the
//! same filters. Matching runs on the trimmed, lower-cased input.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{filters::DEFAULT_CERTIFICATION_COUNTRY, FilterSet, MediaKind};
use crate::services::lexicon::{
    CERTIFICATIONS, DECADES, GENRES, KEYWORDS, LANGUAGES, RATING_PHRASES, RUNTIMES,
};

static BARE_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(19[5-9]\d|20[0-2]\d)\b").expect("bare year regex should compile")
});
static RELEASED_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\breleased\s+(?:in|before)\s+(\d{4})\b")
        .expect("released year regex should compile")
});
static FROM_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:from|after|since)\s+(\d{4})\b").expect("from year regex should compile")
});
static BEFORE_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bbefore\s+(\d{4})\b").expect("before year regex should compile")
});

static NUMERIC_RATING_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\brated\s+(\d{1,2}(?:\.\d+)?)\b",
        r"\b(\d{1,2}(?:\.\d+)?)\s*stars?\b",
        r"\b(\d{1,2}(?:\.\d+)?)\+",
        r"\b(?:minimum|min)\s+(?:rating\s+(?:of\s+)?)?(\d{1,2}(?:\.\d+)?)\b(\s*(?:hours?|hrs?|minutes?|mins?)\b)?",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("rating regex should compile"))
    .collect()
});

// A name starts with a letter and runs until " from", " in", " and", a comma,
// a period or the end of the text.
static CAST_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:with|starring|featuring|actor|actress)\s+(\p{L}[\p{L}'\- ]*?)(?:\s+(?:from|in|and)\b|\s*[,.]|\s*$)",
    )
    .expect("cast regex should compile")
});
static CREW_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:directed by|director)\s+(\p{L}[\p{L}'\- ]*?)(?:\s+(?:from|in|and)\b|\s*[,.]|\s*$)",
    )
    .expect("crew regex should compile")
});
static TRAILING_BY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bby\s+(\p{L}[\p{L}'\- ]*)$").expect("trailing by regex should compile")
});

/// Leading words that mark a noun phrase rather than a person
const NON_NAME_LEADS: &[&str] = &["a", "an", "the", "some", "my", "no"];

/// Which year bound(s) a rule writes
#[derive(Debug, Clone, Copy)]
enum YearTarget {
    Both,
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overwrite {
    /// Skip when any targeted bound already holds a value
    IfUnset,
    Always,
}

struct YearRule {
    pattern: &'static Lazy<Regex>,
    target: YearTarget,
    /// Added to the captured year before writing
    offset: i32,
    overwrite: Overwrite,
}

/// Applied in order after the decade check; later rules see earlier writes.
static YEAR_RULES: &[YearRule] = &[
    YearRule {
        pattern: &BARE_YEAR,
        target: YearTarget::Both,
        offset: 0,
        overwrite: Overwrite::IfUnset,
    },
    YearRule {
        pattern: &RELEASED_YEAR,
        target: YearTarget::Both,
        offset: 0,
        overwrite: Overwrite::IfUnset,
    },
    YearRule {
        pattern: &FROM_YEAR,
        target: YearTarget::Lower,
        offset: 0,
        overwrite: Overwrite::IfUnset,
    },
    YearRule {
        pattern: &BEFORE_YEAR,
        target: YearTarget::Upper,
        offset: -1,
        overwrite: Overwrite::Always,
    },
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct YearBounds {
    gte: Option<i32>,
    lte: Option<i32>,
}

impl YearRule {
    fn apply(&self, text: &str, bounds: &mut YearBounds) {
        let Some(year) = self
            .pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<i32>().ok())
        else {
            return;
        };

        let already_set = match self.target {
            YearTarget::Both => bounds.gte.is_some() || bounds.lte.is_some(),
            YearTarget::Lower => bounds.gte.is_some(),
            YearTarget::Upper => bounds.lte.is_some(),
        };
        if already_set && self.overwrite == Overwrite::IfUnset {
            return;
        }

        let year = year + self.offset;
        match self.target {
            YearTarget::Both => {
                bounds.gte = Some(year);
                bounds.lte = Some(year);
            }
            YearTarget::Lower => bounds.gte = Some(year),
            YearTarget::Upper => bounds.lte = Some(year),
        }
    }
}

/// Interprets a free-text description for the given media kind
pub fn interpret(text: &str, kind: MediaKind) -> FilterSet {
    let q = text.trim().to_lowercase();
    if q.is_empty() {
        return FilterSet::default();
    }

    let years = extract_years(&q);
    let runtime = RUNTIMES.first_match(&q).map(|bounds| bounds.get(kind));

    FilterSet {
        genre_ids: extract_genres(&q, kind),
        keyword_terms: KEYWORDS
            .all_matches(&q)
            .map(|term| term.to_string())
            .collect(),
        year_gte: years.gte,
        year_lte: years.lte,
        vote_gte: extract_vote(&q),
        runtime_gte: runtime.and_then(|bounds| bounds.gte),
        runtime_lte: runtime.and_then(|bounds| bounds.lte),
        certification: CERTIFICATIONS
            .first_match(&q)
            .map(|codes| codes.get(kind).to_string()),
        certification_country: DEFAULT_CERTIFICATION_COUNTRY.to_string(),
        original_language: LANGUAGES.first_match(&q).map(|code| code.to_string()),
        cast_name: extract_cast(&q),
        crew_name: extract_crew(&q),
    }
}

fn extract_genres(q: &str, kind: MediaKind) -> Vec<u32> {
    let mut ids = Vec::new();
    for id in GENRES.all_matches(q).filter_map(|target| target.get(kind)) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

fn extract_years(q: &str) -> YearBounds {
    // A decade settles both bounds and nothing else about years is read
    if let Some(span) = DECADES.first_match(q) {
        return YearBounds {
            gte: Some(span.gte),
            lte: Some(span.lte),
        };
    }

    let mut bounds = YearBounds::default();
    for rule in YEAR_RULES {
        rule.apply(q, &mut bounds);
    }
    bounds
}

fn extract_vote(q: &str) -> Option<f64> {
    NUMERIC_RATING_PATTERNS
        .iter()
        .find_map(|pattern| {
            pattern.captures_iter(q).find_map(|caps| {
                // A trailing time unit means a runtime, not a score
                if caps.get(2).is_some() {
                    return None;
                }
                caps.get(1)
                    .and_then(|m| m.as_str().parse::<f64>().ok())
                    .filter(|vote| (0.0..=10.0).contains(vote))
            })
        })
        .or_else(|| RATING_PHRASES.first_match(q).copied())
}

fn extract_cast(q: &str) -> Option<String> {
    first_name(&CAST_PATTERN, q)
}

fn extract_crew(q: &str) -> Option<String> {
    first_name(&CREW_PATTERN, q).or_else(|| first_name(&TRAILING_BY_PATTERN, q))
}

fn first_name(pattern: &Regex, q: &str) -> Option<String> {
    pattern.captures_iter(q).find_map(|caps| {
        let name = caps.get(1)?.as_str().trim();
        is_plausible_name(name).then(|| name.to_string())
    })
}

fn is_plausible_name(name: &str) -> bool {
    match name.split_whitespace().next() {
        Some(lead) if NON_NAME_LEADS.contains(&lead) => false,
        Some(_) => !KEYWORDS.contains_phrase(name) && !GENRES.contains_phrase(name),
        None => false,
    }
}
