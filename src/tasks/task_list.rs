use tracing::debug;

use super::error::TaskError;
use super::task::{Task, TaskId};

/// Ordered collection of tasks for the current session.
///
/// Insertion order is display order. The list owns its tasks; callers refer
/// to them by [`TaskId`].
#[derive(Debug, Default)]
pub struct TaskList {
    items: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new incomplete task with the trimmed `title`.
    pub fn add(&mut self, title: &str) -> Result<&Task, TaskError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskError::Validation("title must not be blank"));
        }
        let id = TaskId::next();
        debug!(%id, title, "task added");
        self.items.push(Task::new(id, title.to_string()));
        Ok(&self.items[self.items.len() - 1])
    }

    /// Replaces the title verbatim. Unlike [`add`](Self::add) no trimming or
    /// blank check is applied.
    pub fn edit(&mut self, id: TaskId, new_title: impl Into<String>) -> Result<(), TaskError> {
        let task = self.get_mut(id)?;
        task.title = new_title.into();
        debug!(%id, title = %task.title, "task edited");
        Ok(())
    }

    /// Flips the completion flag and returns its new value.
    pub fn toggle_complete(&mut self, id: TaskId) -> Result<bool, TaskError> {
        let task = self.get_mut(id)?;
        task.completed = !task.completed;
        debug!(%id, completed = task.completed, "task toggled");
        Ok(task.completed)
    }

    /// The first task in order whose completion flag is set.
    ///
    /// Reorder controls act on this task; later flagged tasks are never
    /// addressed by them.
    pub fn find_selected(&self) -> Option<&Task> {
        self.items.iter().find(|task| task.completed)
    }

    pub fn move_up(&mut self, id: TaskId) -> Result<(), TaskError> {
        let index = self.index_of(id)?;
        if index > 0 {
            self.items.swap(index, index - 1);
            debug!(%id, from = index, to = index - 1, "task moved up");
        }
        Ok(())
    }

    pub fn move_down(&mut self, id: TaskId) -> Result<(), TaskError> {
        let index = self.index_of(id)?;
        if index + 1 < self.items.len() {
            self.items.swap(index, index + 1);
            debug!(%id, from = index, to = index + 1, "task moved down");
        }
        Ok(())
    }

    /// Removes the task and hands it back to the caller.
    pub fn remove(&mut self, id: TaskId) -> Result<Task, TaskError> {
        let index = self.index_of(id)?;
        let task = self.items.remove(index);
        debug!(%id, index, "task removed");
        Ok(task)
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.items.iter().find(|task| task.id() == id)
    }

    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.items.iter().position(|task| task.id() == id)
    }

    pub fn items(&self) -> &[Task] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn index_of(&self, id: TaskId) -> Result<usize, TaskError> {
        self.position(id).ok_or(TaskError::NotFound(id))
    }

    fn get_mut(&mut self, id: TaskId) -> Result<&mut Task, TaskError> {
        self.items
            .iter_mut()
            .find(|task| task.id() == id)
            .ok_or(TaskError::NotFound(id))
    }
}
