// Task list store: the ordered collection and every operation on it

use crate::error::ParseError;
use crate::filter::{SortCriterion, matches_text};
use crate::snapshot;
use crate::task::{Status, Task, TaskId};
use tracing::{debug, info, warn};

/// Ordered, in-memory collection of tasks
///
/// All mutation goes through the methods below. Each mutating method returns
/// the updated list. `sort` and `filter` are destructive: the previous order
/// or the filtered-out tasks are gone until a snapshot is imported again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from snapshot text
    pub fn from_snapshot(text: &str) -> Result<Self, ParseError> {
        let mut list = Self::new();
        list.import_snapshot(text)?;
        Ok(list)
    }

    /// Tasks in list order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Look up a task by id
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Append a new pending task
    ///
    /// The caller is responsible for validating `text` first
    /// (see [`crate::task::validate_text`]).
    pub fn create(&mut self, text: impl Into<String>) -> &[Task] {
        let mut task = Task::new(text);
        // Ids stay unique even against imported ones
        while self.get(task.id()).is_some() {
            task = Task::new(task.text().to_string());
        }

        debug!(id = %task.id(), "create: appending task");
        self.tasks.push(task);
        &self.tasks
    }

    /// Set the status of one task; unknown ids are ignored
    pub fn update_status(&mut self, id: &TaskId, status: Status) -> &[Task] {
        match self.tasks.iter_mut().find(|task| task.id() == id) {
            Some(task) => {
                debug!(%id, %status, "update_status: updating task");
                task.set_status(status);
            }
            None => debug!(%id, "update_status: no such task, ignoring"),
        }
        &self.tasks
    }

    /// Remove one task; unknown ids are ignored
    pub fn remove(&mut self, id: &TaskId) -> &[Task] {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id() != id);
        debug!(%id, removed = before - self.tasks.len(), "remove: done");
        &self.tasks
    }

    /// Reorder the list ascending by `criterion`
    pub fn sort(&mut self, criterion: SortCriterion) -> &[Task] {
        self.tasks.sort_by(|a, b| criterion.compare(a, b));
        debug!(%criterion, count = self.tasks.len(), "sort: done");
        &self.tasks
    }

    /// Keep only tasks whose text contains `needle`, ignoring case
    pub fn filter(&mut self, needle: &str) -> &[Task] {
        let before = self.tasks.len();
        self.tasks.retain(|task| matches_text(task.text(), needle));
        debug!(needle, kept = self.tasks.len(), dropped = before - self.tasks.len(), "filter: done");
        &self.tasks
    }

    // ========================================================================
    // Import / export
    // ========================================================================

    /// Serialize the whole list, in order
    pub fn export_snapshot(&self) -> serde_json::Result<String> {
        let text = snapshot::encode(&self.tasks)?;
        info!(count = self.tasks.len(), "Exported snapshot");
        Ok(text)
    }

    /// Replace the whole list with the tasks in `text`
    ///
    /// On error the current list is left exactly as it was.
    pub fn import_snapshot(&mut self, text: &str) -> Result<&[Task], ParseError> {
        let tasks = match snapshot::decode(text) {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(error = %e, "Rejected snapshot, keeping current list");
                return Err(e);
            }
        };

        info!(previous = self.tasks.len(), count = tasks.len(), "Imported snapshot");
        self.tasks = tasks;
        Ok(&self.tasks)
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
