use std::path::PathBuf;

/// A file selected for upload, with its SleepHQ content hash.
///
/// Built once by the inventory scan and read-only from then on.
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    /// File name as shown to SleepHQ (base name only).
    pub name: String,
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Lowercase hex MD5 in SleepHQ's content-hash encoding.
    pub content_hash: String,
}

/// API credentials and device selection, fixed for the lifetime of a run.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub team_id: String,
    /// Exact machine serial number, or "any" for the first machine found.
    pub device_serial: String,
}

/// Remote identity built up across the auth and resolution stages.
///
/// Each field is written exactly once; the orchestrator is the sole owner.
#[derive(Debug, Default)]
pub struct Session {
    pub token: String,
    pub team_id: String,
    pub machine_id: String,
}

/// The import record as last reported by SleepHQ.
#[derive(Debug, Clone)]
pub struct ImportHandle {
    /// Assigned by the service at reservation time, never changes.
    pub import_id: String,
    pub status: String,
    pub failed_reason: String,
}
