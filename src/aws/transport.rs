//! Transport abstraction shared by the CLI and structured-client backends

use crate::aws::request::{OperationOutput, OperationRequest};
use crate::core::error::Result;
use std::time::Duration;

/// Something that can run AWS operations
///
/// Provider failures must come back as `PolgenError::Aws` with the same
/// code/detail whichever implementation ran the call.
pub trait Transport {
    fn name(&self) -> &'static str;

    fn execute(&self, request: &OperationRequest) -> Result<OperationOutput>;

    /// Default region of the active AWS profile
    fn region(&self) -> Result<String>;

    /// Provider-native blocking wait, if this transport has one
    fn stack_waiter(&self) -> Option<&dyn StackWaiter> {
        None
    }
}

/// Blocks until a stack reaches the terminal status of `phase`
pub trait StackWaiter {
    fn wait(&self, stack: &str, phase: StackPhase, timeout: Duration) -> Result<()>;
}

/// What a stack is waiting to finish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackPhase {
    Create,
    Update,
}

impl StackPhase {
    pub fn target_status(self) -> &'static str {
        match self {
            Self::Create => "CREATE_COMPLETE",
            Self::Update => "UPDATE_COMPLETE",
        }
    }

    /// Intermediate statuses that mean "keep waiting"
    pub fn pending_statuses(self) -> &'static [&'static str] {
        match self {
            Self::Create => &["CREATE_IN_PROGRESS"],
            Self::Update => &["UPDATE_IN_PROGRESS", "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS"],
        }
    }

    pub fn is_pending(self, status: &str) -> bool {
        self.pending_statuses().contains(&status)
    }
}
