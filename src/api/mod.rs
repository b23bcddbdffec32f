//! SleepHQ API access.
//!
//! One HTTP request per operation, uniform error contract, no internal
//! retries. Retry and sequencing policy live entirely in the orchestrator.

mod client;
mod types;

pub use client::{DEFAULT_BASE_URL, SleepHqClient};
pub use types::{ImportStatus, Machine, Team};

use async_trait::async_trait;

use crate::core::error::ImportError;
use crate::core::models::UploadCandidate;

/// Serial selector sentinel meaning "first machine on the account".
pub const ANY_SERIAL: &str = "any";

/// A remote call that failed at the transport or HTTP level, tagged with
/// the operation that issued it.
#[derive(Debug, thiserror::Error)]
#[error("{operation} failed: {detail}")]
pub struct ApiError {
    pub operation: &'static str,
    pub detail: String,
}

impl ApiError {
    pub fn new(operation: &'static str, detail: impl Into<String>) -> Self {
        Self {
            operation,
            detail: detail.into(),
        }
    }
}

/// The remote operations the import pipeline depends on.
///
/// `SleepHqClient` is the production implementation; tests script this trait
/// directly.
#[async_trait]
pub trait ImportApi: Send + Sync {
    /// Password-grant token exchange with `read write` scope.
    async fn authenticate(&self, client_id: &str, client_secret: &str)
    -> Result<String, ApiError>;

    /// Teams visible to the credentials. Used during first-run setup only.
    async fn list_teams(&self, token: &str) -> Result<Vec<Team>, ApiError>;

    /// Machines registered under a team.
    async fn list_machines(&self, team_id: &str, token: &str) -> Result<Vec<Machine>, ApiError>;

    /// Create a fresh import record and return its opaque id.
    async fn reserve_import(&self, team_id: &str, token: &str) -> Result<String, ApiError>;

    /// Multipart upload of one candidate into the import record.
    async fn upload_file(
        &self,
        import_id: &str,
        token: &str,
        candidate: &UploadCandidate,
    ) -> Result<(), ApiError>;

    /// Ask the service to start processing the uploaded set.
    async fn trigger_processing(&self, import_id: &str, token: &str) -> Result<(), ApiError>;

    /// Single status read; polling cadence is the caller's business.
    async fn poll_import(&self, import_id: &str, token: &str) -> Result<ImportStatus, ApiError>;
}

/// Pick the machine matching `selector` from a team's machine list.
///
/// The sentinel "any" (case-insensitive) selects the first machine; anything
/// else must equal a machine's serial number exactly. No match is a
/// configuration error the operator has to fix, so the failure text lists
/// what was found.
pub fn resolve_machine<'a>(
    machines: &'a [Machine],
    selector: &str,
) -> Result<&'a Machine, ImportError> {
    for machine in machines {
        if selector.eq_ignore_ascii_case(ANY_SERIAL) || machine.serial_number == selector {
            return Ok(machine);
        }
    }

    let found = machines
        .iter()
        .map(|m| format!("  {}, {}, Serial Number: {}", m.brand, m.model, m.serial_number))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ImportError::NoMatchingDevice {
        selector: selector.to_string(),
        found,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machines() -> Vec<Machine> {
        vec![
            Machine {
                id: "M1".into(),
                brand: "Lowenstein".into(),
                model: "Prisma 20A".into(),
                serial_number: "SN123".into(),
            },
            Machine {
                id: "M2".into(),
                brand: "ResMed".into(),
                model: "AirSense 10".into(),
                serial_number: "SN456".into(),
            },
        ]
    }

    #[test]
    fn any_selector_returns_first_machine() {
        let list = machines();
        assert_eq!(resolve_machine(&list, "any").unwrap().id, "M1");
        assert_eq!(resolve_machine(&list, "ANY").unwrap().id, "M1");
    }

    #[test]
    fn exact_serial_returns_matching_machine() {
        let list = machines();
        assert_eq!(resolve_machine(&list, "SN456").unwrap().id, "M2");
    }

    #[test]
    fn unknown_serial_is_a_config_error() {
        let list = machines();
        let err = resolve_machine(&list, "SN999").unwrap_err();
        match err {
            ImportError::NoMatchingDevice { selector, found } => {
                assert_eq!(selector, "SN999");
                assert!(found.contains("SN123"));
                assert!(found.contains("SN456"));
            }
            other => panic!("expected NoMatchingDevice, got {other:?}"),
        }
    }

    #[test]
    fn empty_machine_list_never_matches() {
        let err = resolve_machine(&[], "any").unwrap_err();
        assert!(matches!(err, ImportError::NoMatchingDevice { .. }));
    }
}
