pub mod error;
pub mod fingerprint;
pub mod inventory;
pub mod models;
pub mod notifications;
pub mod orchestrator;

pub use error::ImportError;
pub use models::{Credentials, ImportHandle, Session, UploadCandidate};
pub use notifications::NotificationSink;
pub use orchestrator::Orchestrator;
