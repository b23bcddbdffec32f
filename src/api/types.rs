//! Wire types for the SleepHQ JSON:API responses.

use serde::Deserialize;

/// A team visible to the configured credentials.
#[derive(Debug, Clone)]
pub struct Team {
    pub id: String,
    pub name: String,
}

/// A therapy machine registered under a team.
#[derive(Debug, Clone)]
pub struct Machine {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub serial_number: String,
}

/// Last reported state of an import record.
#[derive(Debug, Clone)]
pub struct ImportStatus {
    pub status: String,
    pub failed_reason: String,
}

impl ImportStatus {
    pub fn is_complete(&self) -> bool {
        self.status == "complete"
    }
}

// JSON:API envelopes, flattened into the domain types above at the client
// boundary.

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ListResponse<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SingleResponse<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub(super) struct TeamResource {
    pub id: String,
    pub attributes: TeamAttributes,
}

#[derive(Debug, Deserialize)]
pub(super) struct TeamAttributes {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct MachineResource {
    pub id: String,
    pub attributes: MachineAttributes,
}

#[derive(Debug, Deserialize)]
pub(super) struct MachineAttributes {
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial_number: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ImportResource {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ImportStatusResource {
    pub attributes: ImportStatusAttributes,
}

#[derive(Debug, Deserialize)]
pub(super) struct ImportStatusAttributes {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub failed_reason: Option<String>,
}

impl From<TeamResource> for Team {
    fn from(r: TeamResource) -> Self {
        Self {
            id: r.id,
            name: r.attributes.name,
        }
    }
}

impl From<MachineResource> for Machine {
    fn from(r: MachineResource) -> Self {
        Self {
            id: r.id,
            brand: r.attributes.brand,
            model: r.attributes.model,
            serial_number: r.attributes.serial_number,
        }
    }
}

impl From<ImportStatusResource> for ImportStatus {
    fn from(r: ImportStatusResource) -> Self {
        Self {
            status: r.attributes.status,
            failed_reason: r.attributes.failed_reason.unwrap_or_default(),
        }
    }
}
