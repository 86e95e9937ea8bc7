use std::sync::Arc;

use pcm_tail_core::{RetentionError, RetentionResult, SessionDelegate, SessionState};

/// SessionDelegate that reports session events through the `log` facade.
pub struct LogDelegate;

impl LogDelegate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

impl SessionDelegate for LogDelegate {
    fn on_state_changed(&self, state: &SessionState) {
        match state {
            SessionState::Idle => {}
            SessionState::Allocating { capacity } => log::debug!("allocating {} bytes", capacity),
            SessionState::Ingesting { .. } => log::debug!("ingesting"),
            SessionState::Writing { payload_bytes } => log::debug!("writing {} payload bytes", payload_bytes),
            SessionState::Completed(_) => log::debug!("completed"),
            SessionState::Failed(e) => log::debug!("failed: {}", e),
        }
    }

    fn on_source_error(&self, error: &RetentionError) {
        log::warn!("input ended early: {}", error);
    }

    fn on_finished(&self, result: &RetentionResult) {
        if result.cancelled {
            log::warn!("capture was interrupted; the window may be incomplete");
        }
        log::info!("sha256 {}", result.checksum);
    }
}
