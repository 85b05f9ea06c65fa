//! User notices written to the log

use healthsync_host_api::{Notice, Notifier};
use tracing::info;

/// Notifier that writes notices to the log
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::SyncDeferred { day } => {
                info!(day = %day, "No connection. Today's symptoms are saved and will sync later.")
            }
        }
    }
}
