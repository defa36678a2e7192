use thiserror::Error;

use super::task::TaskId;

/// Errors returned by [`TaskList`](super::task_list::TaskList) operations.
///
/// A failed call never mutates the list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// Input failed a content check, e.g. a blank title on add.
    #[error("invalid task: {0}")]
    Validation(&'static str),

    /// The referenced task is not in the list.
    #[error("task {0} not found")]
    NotFound(TaskId),
}
