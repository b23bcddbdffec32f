use std::sync::Arc;

use crate::config::AppConfig;
use crate::core::NotificationSink;
use crate::core::notifications::create_notifier;

/// Shared application context: config plus the notification sink, passed
/// explicitly into whatever needs them (no global notifier).
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub notifier: Arc<dyn NotificationSink>,
}

impl AppContext {
    pub fn new(config: AppConfig) -> Self {
        let notifier = create_notifier(&config.ntfy);
        Self {
            config: Arc::new(config),
            notifier,
        }
    }
}
