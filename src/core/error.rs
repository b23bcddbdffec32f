use crate::api::ApiError;

/// Terminal failure classification for an import run.
///
/// Nothing here is retried automatically. Each variant is reported once
/// through the notification sink with enough context for the operator to
/// retry by hand, then the process exits non-zero.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// A remote call failed at the transport or HTTP level.
    #[error("{0}")]
    RemoteCallFailure(#[from] ApiError),

    /// No machine under the team matched the configured serial selector.
    /// The operator must correct the selector; nothing remote was changed.
    #[error(
        "no machine matches serial '{selector}'\nFound:\n{found}\nUpdate the device_serial setting and try again"
    )]
    NoMatchingDevice { selector: String, found: String },

    /// The data directory held no files to import.
    #[error("no files found at path {path} to import; check the data_dir setting")]
    EmptyInventory { path: String },

    /// An upload failed mid-loop. Files uploaded before it remain attached
    /// to the remote import record; resuming is a manual operation.
    #[error("failed to upload file {name}: {source}")]
    PartialUploadFailure { name: String, source: ApiError },

    /// The process trigger failed after all files uploaded. The import id is
    /// included so the operator can retry the trigger call later.
    #[error(
        "failed to start processing for import {import_id}: {source}. You can retry the process_files request for this import id later"
    )]
    ProcessingTriggerFailure { import_id: String, source: ApiError },

    /// Polling stopped without observing a "complete" status.
    #[error(
        "import {import_id} did not complete; last status '{status}', failure reason '{failed_reason}': {source}"
    )]
    IncompleteImport {
        import_id: String,
        status: String,
        failed_reason: String,
        source: ApiError,
    },
}
