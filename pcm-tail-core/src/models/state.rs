use super::error::RetentionError;
use super::retention_result::RetentionResult;

/// Retention session state machine.
///
/// State transitions:
/// ```text
/// idle → allocating → ingesting → writing → completed
///            ↓            ↓           ↓
///          failed       failed      failed
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Allocating { capacity: usize },
    Ingesting { bytes_ingested: u64 },
    Writing { payload_bytes: usize },
    Completed(RetentionResult),
    Failed(RetentionError),
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Failed(_))
    }
}
