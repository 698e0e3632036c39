// Mapping engine: survey export rows -> form field values
//
// Pure logic with no I/O. Column resolution runs once per export, then every
// submitted row goes through the record mapper on its own.

pub mod models;
pub mod pipeline;
pub mod record;
pub mod resolver;
pub mod splitter;

// Re-export commonly used types
pub use models::{FieldValues, HeaderSet, MappingRules, Record};
pub use pipeline::{MappingPipeline, Prepared};
pub use resolver::{find_column, resolve_with_report};
pub use splitter::NameEmailSplitter;
