//! In-memory session task list

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single task for the current work session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
}

/// Ordered collection of session tasks.
///
/// Tasks keep insertion order; ids are unique, titles are not. All
/// operations on missing ids or empty titles reduce to no-ops.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task with the trimmed title. Whitespace-only titles are
    /// silently ignored.
    pub fn add(&mut self, title: &str) -> Option<Task> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let task = Task {
            id: Uuid::new_v4(),
            title: title.to_string(),
            completed: false,
        };
        self.tasks.push(task.clone());
        Some(task)
    }

    /// Append one task per non-empty title, preserving input order
    pub fn add_many<I, S>(&mut self, titles: I) -> Vec<Task>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        titles
            .into_iter()
            .filter_map(|title| self.add(title.as_ref()))
            .collect()
    }

    /// Flip the completed flag on the matching task
    pub fn toggle(&mut self, id: Uuid) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = !task.completed;
                true
            }
            None => false,
        }
    }

    /// Delete the matching task, leaving the rest in order
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_trims_and_rejects_empty_titles() {
        let mut store = TaskStore::new();
        assert!(store.add("   ").is_none());
        assert!(store.add("").is_none());
        let task = store.add("  Write outline  ").unwrap();
        assert_eq!(task.title, "Write outline");
        assert!(!task.completed);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_many_preserves_order_and_skips_blanks() {
        let mut store = TaskStore::new();
        let added = store.add_many(["Outline key points", "", "Write script"]);
        assert_eq!(added.len(), 2);
        let titles: Vec<_> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Outline key points", "Write script"]);
        assert!(store.tasks().iter().all(|t| !t.completed));
    }

    #[test]
    fn toggle_flips_only_the_matching_task() {
        let mut store = TaskStore::new();
        let a = store.add("a").unwrap();
        let b = store.add("b").unwrap();
        assert!(store.toggle(a.id));
        assert!(store.tasks()[0].completed);
        assert!(!store.tasks()[1].completed);
        assert!(store.toggle(a.id));
        assert!(!store.tasks()[0].completed);
        assert!(!store.toggle(Uuid::new_v4()));
        let _ = b;
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut store = TaskStore::new();
        let _a = store.add("first").unwrap();
        let b = store.add("second").unwrap();
        let _c = store.add("third").unwrap();
        assert!(store.remove(b.id));
        let titles: Vec<_> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "third"]);
        assert!(!store.remove(b.id));
    }

    #[test]
    fn duplicate_titles_are_allowed() {
        let mut store = TaskStore::new();
        let a = store.add("same").unwrap();
        let b = store.add("same").unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.len(), 2);
    }
}
