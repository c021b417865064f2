//! Batch deletion of selected branches

use serde::Serialize;

use crate::branch::display_name;
use crate::error::GiraError;
use crate::repository::BranchStore;

/// What a successful commit removed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionReport {
    /// Deleted references, in listing order
    pub deleted: Vec<String>,
}

/// Remove `references` from the store, in order
///
/// `references` is the output of [`crate::selector::selected_references`].
/// Stops at the first failed removal and returns
/// [`GiraError::BranchRemoval`] naming that branch and listing the
/// references removed before it. Those stay removed; references after the
/// failure are not attempted.
///
/// Must not be called when the selection was aborted.
pub fn commit(store: &dyn BranchStore, references: &[String]) -> Result<DeletionReport, GiraError> {
    let mut report = DeletionReport::default();

    for reference in references {
        if let Err(e) = store.remove_reference(reference) {
            let reason = match e {
                GiraError::BranchRemoval { reason, .. } => reason,
                other => other.to_string(),
            };
            return Err(GiraError::BranchRemoval {
                branch: reference.clone(),
                reason,
                deleted: report.deleted,
            });
        }

        tracing::info!("deleted branch {}", display_name(reference));
        report.deleted.push(reference.clone());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct MemoryStore {
        references: RefCell<Vec<String>>,
        attempts: RefCell<Vec<String>>,
        fail_on: Option<String>,
    }

    impl MemoryStore {
        fn new(references: &[&str]) -> Self {
            Self {
                references: RefCell::new(references.iter().map(|r| r.to_string()).collect()),
                attempts: RefCell::new(Vec::new()),
                fail_on: None,
            }
        }

        fn failing_on(mut self, reference: &str) -> Self {
            self.fail_on = Some(reference.to_string());
            self
        }
    }

    impl BranchStore for MemoryStore {
        fn list_local_branch_references(&self) -> Result<Vec<String>, GiraError> {
            Ok(self.references.borrow().clone())
        }

        fn remove_reference(&self, reference_name: &str) -> Result<(), GiraError> {
            self.attempts.borrow_mut().push(reference_name.to_string());
            if self.fail_on.as_deref() == Some(reference_name) {
                return Err(GiraError::Git("reference is locked".to_string()));
            }
            self.references.borrow_mut().retain(|r| r != reference_name);
            Ok(())
        }

        fn head_reference(&self) -> Result<Option<String>, GiraError> {
            Ok(None)
        }
    }

    fn references(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| format!("refs/heads/{}", n)).collect()
    }

    #[test]
    fn test_deletes_exactly_the_selected_set() {
        let store = MemoryStore::new(&["refs/heads/A", "refs/heads/B", "refs/heads/C"]);
        let report = commit(&store, &references(&["A", "C"])).unwrap();

        assert_eq!(report.deleted, vec!["refs/heads/A", "refs/heads/C"]);
        assert_eq!(*store.references.borrow(), vec!["refs/heads/B"]);
        assert!(!store.attempts.borrow().contains(&"refs/heads/B".to_string()));
    }

    #[test]
    fn test_stops_at_first_failure() {
        let store = MemoryStore::new(&["refs/heads/A", "refs/heads/B", "refs/heads/C"])
            .failing_on("refs/heads/B");
        let err = commit(&store, &references(&["A", "B", "C"])).unwrap_err();

        match err {
            GiraError::BranchRemoval {
                branch,
                reason,
                deleted,
            } => {
                assert_eq!(branch, "refs/heads/B");
                assert!(reason.contains("locked"));
                assert_eq!(deleted, vec!["refs/heads/A"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        // A stays deleted, C was never attempted
        assert_eq!(*store.references.borrow(), vec!["refs/heads/B", "refs/heads/C"]);
        assert_eq!(*store.attempts.borrow(), vec!["refs/heads/A", "refs/heads/B"]);
    }

    #[test]
    fn test_nothing_selected_touches_nothing() {
        let store = MemoryStore::new(&["refs/heads/A"]);
        let report = commit(&store, &[]).unwrap();
        assert!(report.deleted.is_empty());
        assert!(store.attempts.borrow().is_empty());
    }
}
