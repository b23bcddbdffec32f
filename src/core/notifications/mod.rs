mod ntfy;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::NtfyConfig;
pub use ntfy::NtfyChannel;

/// Where the pipeline reports progress and its terminal outcome.
///
/// The orchestrator calls this at every stage boundary; how messages reach
/// the operator (console, log, push) is this side's business.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Progress message; console and log only.
    async fn informational(&self, text: &str);
    /// Terminal success; also pushed when a push channel is configured.
    async fn success(&self, text: &str);
    /// Terminal failure; also pushed when a push channel is configured.
    async fn failure(&self, text: &str);
}

/// Default sink: everything goes to the console and the tracing log, and
/// terminal outcomes additionally go out over ntfy when configured.
pub struct Notifier {
    push: Option<NtfyChannel>,
}

impl Notifier {
    pub fn new(push: Option<NtfyChannel>) -> Self {
        Self { push }
    }
}

#[async_trait]
impl NotificationSink for Notifier {
    async fn informational(&self, text: &str) {
        info!("{text}");
        println!("{text}");
    }

    async fn success(&self, text: &str) {
        info!("{text}");
        println!("{text}");
        if let Some(push) = &self.push {
            // Delivery failures are logged, never propagated
            if let Err(e) = push.send_success(text).await {
                error!(error = %e, "Failed to deliver success notification");
            }
        }
    }

    async fn failure(&self, text: &str) {
        error!("{text}");
        eprintln!("{text}");
        if let Some(push) = &self.push {
            if let Err(e) = push.send_failure(text).await {
                error!(error = %e, "Failed to deliver failure notification");
            }
        }
    }
}

/// Build the push channel from config, if notifications are enabled.
pub fn create_channel(config: &NtfyConfig) -> Option<NtfyChannel> {
    if !config.enabled || config.topic.is_empty() {
        return None;
    }
    Some(NtfyChannel::new(config.topic.clone(), config.token.clone()))
}

/// Factory for the sink the rest of the application shares.
pub fn create_notifier(config: &NtfyConfig) -> Arc<dyn NotificationSink> {
    Arc::new(Notifier::new(create_channel(config)))
}
