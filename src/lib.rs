// todolist - In-memory task list with sorting, filtering and JSON import/export

pub mod config;
pub mod error;
pub mod filter;
pub mod snapshot;
pub mod store;
pub mod task;

// Re-export main types for convenience
pub use config::Config;
pub use error::{ParseError, TextError};
pub use filter::SortCriterion;
pub use store::TaskList;
pub use task::{MAX_TEXT_CHARS, Status, Task, TaskId, validate_text};
