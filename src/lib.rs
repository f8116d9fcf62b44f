pub mod aggregate;
pub mod config;
pub mod error;
pub mod export;
pub mod extractor;
pub mod fetch;
pub mod parser;
pub mod record;
pub mod report;
pub mod session;

pub use extractor::Extractor;
pub use record::{ProductRecord, ResultSet};
pub use session::{Session, Snapshot, View};
