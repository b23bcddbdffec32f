//! The import pipeline.
//!
//! Stages run strictly in order: inventory, authenticate, resolve machine,
//! reserve import, upload, trigger processing, poll. The first stage failure
//! aborts the run; nothing is retried automatically, and a partial upload is
//! left as-is on the remote side for manual follow-up with the reserved
//! import id.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::time::sleep;
use tracing::debug;

use crate::api::{ImportApi, resolve_machine};
use super::error::ImportError;
use super::inventory;
use super::models::{Credentials, ImportHandle, Session, UploadCandidate};
use super::notifications::NotificationSink;

/// Pause after each successful upload, as a courtesy to remote rate limits.
const UPLOAD_GAP: Duration = Duration::from_millis(1500);
/// Pause between triggering processing and the first status poll.
const SETTLE_DELAY: Duration = Duration::from_secs(10);
/// Status poll cadence. The loop itself is unbounded: polling continues
/// until the service reports "complete" or a poll fails.
const POLL_INTERVAL: Duration = Duration::from_secs(15);

pub struct Orchestrator<C: ImportApi> {
    client: C,
    sink: Arc<dyn NotificationSink>,
    credentials: Credentials,
    data_dir: PathBuf,
}

impl<C: ImportApi> Orchestrator<C> {
    pub fn new(
        client: C,
        sink: Arc<dyn NotificationSink>,
        credentials: Credentials,
        data_dir: PathBuf,
    ) -> Self {
        Self {
            client,
            sink,
            credentials,
            data_dir,
        }
    }

    /// Drive the pipeline to a terminal state, emitting exactly one success
    /// or one failure notification.
    pub async fn run(&self) -> Result<()> {
        debug!(data_dir = %self.data_dir.display(), "Starting import run");
        match self.run_pipeline().await {
            Ok(()) => {
                self.sink
                    .success("Data import into SleepHQ was successful")
                    .await;
                Ok(())
            }
            Err(err) => {
                self.sink.failure(&format!("{err:#}")).await;
                Err(err)
            }
        }
    }

    async fn run_pipeline(&self) -> Result<()> {
        let candidates = self.gather_inventory().await?;
        let mut session = self.authenticate().await?;
        self.resolve_machine(&mut session).await?;
        let mut handle = self.reserve_import(&session).await?;
        self.upload_all(&handle, &session, &candidates).await?;
        self.trigger_processing(&handle, &session).await?;
        self.poll_until_complete(&mut handle, &session).await?;
        Ok(())
    }

    async fn gather_inventory(&self) -> Result<Vec<UploadCandidate>> {
        self.sink
            .informational("Step 1: Gather files for upload and compute content hashes")
            .await;
        let candidates = inventory::collect(&self.data_dir)?;
        if candidates.is_empty() {
            return Err(ImportError::EmptyInventory {
                path: self.data_dir.display().to_string(),
            }
            .into());
        }
        for candidate in &candidates {
            self.sink
                .informational(&format!(
                    "  Processed: {} hash: {}",
                    candidate.path.display(),
                    candidate.content_hash
                ))
                .await;
        }
        Ok(candidates)
    }

    async fn authenticate(&self) -> Result<Session> {
        self.sink.informational("Step 2: Obtain access token").await;
        let token = self
            .client
            .authenticate(&self.credentials.client_id, &self.credentials.client_secret)
            .await
            .map_err(ImportError::from)?;
        self.sink.informational("  Authorization successful").await;
        Ok(Session {
            token,
            team_id: self.credentials.team_id.clone(),
            ..Default::default()
        })
    }

    async fn resolve_machine(&self, session: &mut Session) -> Result<()> {
        self.sink.informational("Step 3: Resolve machine id").await;
        let machines = self
            .client
            .list_machines(&session.team_id, &session.token)
            .await
            .map_err(ImportError::from)?;
        let machine = resolve_machine(&machines, &self.credentials.device_serial)?;
        session.machine_id = machine.id.clone();
        self.sink
            .informational(&format!(
                "  Found machine id {} ({}, {}, Serial Number: {})",
                machine.id, machine.brand, machine.model, machine.serial_number
            ))
            .await;
        Ok(())
    }

    async fn reserve_import(&self, session: &Session) -> Result<ImportHandle> {
        self.sink.informational("Step 4: Reserve an import id").await;
        let import_id = self
            .client
            .reserve_import(&session.team_id, &session.token)
            .await
            .map_err(ImportError::from)?;
        self.sink
            .informational(&format!("  Import id reserved successfully: {import_id}"))
            .await;
        Ok(ImportHandle {
            import_id,
            status: String::new(),
            failed_reason: String::new(),
        })
    }

    /// Upload sequentially in inventory order. The first failure aborts the
    /// loop; files already uploaded stay attached to the import record.
    async fn upload_all(
        &self,
        handle: &ImportHandle,
        session: &Session,
        candidates: &[UploadCandidate],
    ) -> Result<()> {
        self.sink.informational("Step 5: Upload files").await;
        for candidate in candidates {
            self.client
                .upload_file(&handle.import_id, &session.token, candidate)
                .await
                .map_err(|source| ImportError::PartialUploadFailure {
                    name: candidate.name.clone(),
                    source,
                })?;
            self.sink
                .informational(&format!("  File {} has been imported", candidate.name))
                .await;
            sleep(UPLOAD_GAP).await;
        }
        Ok(())
    }

    async fn trigger_processing(&self, handle: &ImportHandle, session: &Session) -> Result<()> {
        self.sink.informational("Step 6: Process files").await;
        self.client
            .trigger_processing(&handle.import_id, &session.token)
            .await
            .map_err(|source| ImportError::ProcessingTriggerFailure {
                import_id: handle.import_id.clone(),
                source,
            })?;
        self.sink
            .informational(&format!(
                "  Files are now being processed for import id {}",
                handle.import_id
            ))
            .await;
        Ok(())
    }

    /// Poll until the service reports "complete". The loop has no timeout
    /// or iteration cap; the only exits are completion or a failed poll
    /// call, which is reported with the last status the service gave us.
    async fn poll_until_complete(
        &self,
        handle: &mut ImportHandle,
        session: &Session,
    ) -> Result<()> {
        self.sink
            .informational("Step 7: Check processing status")
            .await;
        sleep(SETTLE_DELAY).await;
        loop {
            sleep(POLL_INTERVAL).await;
            let status = match self
                .client
                .poll_import(&handle.import_id, &session.token)
                .await
            {
                Ok(status) => status,
                Err(source) => {
                    return Err(ImportError::IncompleteImport {
                        import_id: handle.import_id.clone(),
                        status: handle.status.clone(),
                        failed_reason: handle.failed_reason.clone(),
                        source,
                    }
                    .into());
                }
            };
            handle.status = status.status.clone();
            handle.failed_reason = status.failed_reason.clone();
            self.sink
                .informational(&format!(
                    "  Import status: {}; failure reason: {}",
                    handle.status, handle.failed_reason
                ))
                .await;
            if status.is_complete() {
                debug!(import_id = %handle.import_id, "Import complete");
                return Ok(());
            }
        }
    }
}
