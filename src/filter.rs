// Ordering and text matching used by sort and filter

use crate::task::Task;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort key for `TaskList::sort`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortCriterion {
    /// Locale-aware ascending order on task text
    #[default]
    Text,
    /// Ascending order on the status label
    Status,
}

impl SortCriterion {
    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortCriterion::Text => collate(a.text(), b.text()),
            SortCriterion::Status => collate(a.status().as_str(), b.status().as_str()),
        }
    }
}

impl std::fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortCriterion::Text => write!(f, "text"),
            SortCriterion::Status => write!(f, "status"),
        }
    }
}

/// Compare two strings the way a human reading a list expects
///
/// Letters compare case-insensitively first ("apple" before "Banana"), then
/// lowercase sorts before uppercase to break ties between strings that
/// differ only in case. Strings equal under both rules compare equal.
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded = a.chars().flat_map(char::to_lowercase).cmp(b.chars().flat_map(char::to_lowercase));
    if folded != Ordering::Equal {
        return folded;
    }

    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca == cb {
            continue;
        }
        match (ca.is_lowercase(), cb.is_lowercase()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => return ca.cmp(&cb),
        }
    }

    a.chars().count().cmp(&b.chars().count())
}

/// Case-insensitive substring match; an empty needle matches everything
pub fn matches_text(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collate_ignores_case_first() {
        assert_eq!(collate("apple", "Banana"), Ordering::Less);
        assert_eq!(collate("Banana", "apple"), Ordering::Greater);
        assert_eq!(collate("Buy milk", "Write report"), Ordering::Less);
    }

    #[test]
    fn test_collate_case_tiebreak() {
        assert_eq!(collate("a", "A"), Ordering::Less);
        assert_eq!(collate("A", "a"), Ordering::Greater);
        assert_eq!(collate("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_collate_prefix_sorts_first() {
        assert_eq!(collate("task", "task 2"), Ordering::Less);
        assert_eq!(collate("", "a"), Ordering::Less);
    }

    #[test]
    fn test_status_labels_order() {
        assert_eq!(collate("Completed", "Pending"), Ordering::Less);
    }

    #[test]
    fn test_matches_text() {
        assert!(matches_text("My task", "task"));
        assert!(matches_text("My Task", "TASK"));
        assert!(!matches_text("Other", "task"));
        assert!(matches_text("Other", ""));
        assert!(matches_text("Купить ХЛЕБ", "хлеб"));
    }

    #[test]
    fn test_sort_criterion_display() {
        assert_eq!(SortCriterion::Text.to_string(), "text");
        assert_eq!(SortCriterion::Status.to_string(), "status");
        assert_eq!(SortCriterion::default(), SortCriterion::Text);
    }
}
