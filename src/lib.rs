pub mod api;
pub mod config;
pub mod error;
pub mod formatter;
pub mod highlighter;
pub mod mode;
pub mod report;
pub mod scanner;
pub mod vocabulary;

// Re-export the main public API
pub use api::{format_string, get_matching_paths, highlight_string, run};
pub use config::load_config;
pub use error::SqlprettyError;
pub use formatter::{format, SqlFormatter};
pub use highlighter::{highlight, SqlHighlighter};
pub use mode::Mode;
pub use vocabulary::Vocabulary;
