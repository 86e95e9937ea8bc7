use crate::models::error::RetentionError;
use crate::models::retention_result::RetentionResult;
use crate::models::state::SessionState;

/// Event delegate for retention session notifications.
///
/// All methods are called synchronously from the thread running the
/// session. Keep them cheap: ingestion waits on them.
pub trait SessionDelegate: Send + Sync {
    /// Called when the session state changes.
    fn on_state_changed(&self, state: &SessionState);

    /// Called when a mid-stream read fails. Ingestion stops and the session
    /// continues with the bytes already captured.
    fn on_source_error(&self, error: &RetentionError);

    /// Called once the output has been fully written.
    fn on_finished(&self, result: &RetentionResult);
}
