pub mod error;
pub mod task;
pub mod task_list;

pub use error::TaskError;
pub use task::{Task, TaskId};
pub use task_list::TaskList;
