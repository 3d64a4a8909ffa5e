//! Publishing generated output to a pages branch

pub mod publisher;
pub mod sync;

pub use publisher::{PagesPublisher, PublishError, PublishOutcome, PublishRequest};
pub use sync::{sync_dir, SyncStats};
