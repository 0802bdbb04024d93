pub mod history;
pub mod query_string;

// Re-export the essential types
pub use history::{History, Location, MemoryHistory};
pub use query_string::{MountOutcome, QueryStringSync};
