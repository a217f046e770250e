pub mod discovery;
pub mod interpreter;
pub mod lexicon;
pub mod providers;
pub mod resolver;
pub mod search;

pub use discovery::DiscoveryOrchestrator;
pub use interpreter::interpret;
pub use resolver::FilterResolver;
pub use search::{SearchOutcome, SearchRequest, SearchService};
