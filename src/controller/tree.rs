//! Root lookup and per-tick process-tree snapshots.

use sysinfo::Pid;
use tracing::debug;

use crate::collectors::{ProbeError, ProcessCollector};
use crate::model::{ProcessEntry, ProcessSet};

/// Find the first running process whose name matches `name`, ignoring case.
pub fn locate<C: ProcessCollector + ?Sized>(collector: &mut C, name: &str) -> Option<ProcessEntry> {
    collector
        .list_processes()
        .into_iter()
        .find(|entry| entry.matches_name(name))
}

/// `root` plus all of its current descendants.
///
/// Returns an empty set when the root itself is gone, which includes its
/// pid now belonging to a later process. If the root is alive but its
/// children cannot be listed, the set holds the root alone.
pub fn snapshot<C: ProcessCollector + ?Sized>(collector: &mut C, process: &ProcessEntry) -> ProcessSet {
    let root: Pid = process.pid;
    match collector.children_of(process, true) {
        Ok(descendants) => ProcessSet::new(root, descendants),
        Err(ProbeError::ProcessGone(_)) => {
            debug!(%root, "root process is gone");
            ProcessSet::closed()
        }
        Err(err @ ProbeError::AccessDenied(_)) => {
            debug!(%root, error = %err, "cannot list descendants, sampling root only");
            ProcessSet::new(root, Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use sysinfo::Pid;

    use super::{locate, snapshot};
    use crate::collectors::scripted::ScriptedCollector;

    fn browser_tree() -> ScriptedCollector {
        ScriptedCollector::new()
            .with_process(5, "explorer.exe", None)
            .with_process(100, "Chrome.exe", Some(5))
            .with_process(101, "chrome.exe", Some(100))
            .with_process(102, "chrome.exe", Some(100))
            .with_process(200, "chrome.exe", Some(101))
    }

    #[test]
    fn locate_returns_first_case_insensitive_match() {
        let mut c = browser_tree();
        let found = locate(&mut c, "CHROME.EXE").unwrap();
        assert_eq!(found.pid, Pid::from_u32(100));
        assert_eq!(found.name, "Chrome.exe");
    }

    #[test]
    fn locate_requires_exact_name() {
        let mut c = browser_tree();
        assert!(locate(&mut c, "chrome").is_none());
        assert!(locate(&mut c, "firefox.exe").is_none());
    }

    #[test]
    fn snapshot_includes_root_and_all_descendants() {
        let mut c = browser_tree();
        let root = c.entry(100).unwrap();
        let set = snapshot(&mut c, &root);
        let pids: Vec<u32> = set.iter().map(|p| p.as_u32()).collect();
        assert_eq!(pids, vec![100, 101, 102, 200]);
    }

    #[test]
    fn snapshot_of_leaf_is_root_only() {
        let mut c = browser_tree();
        let leaf = c.entry(200).unwrap();
        let set = snapshot(&mut c, &leaf);
        assert_eq!(set.len(), 1);
        assert_eq!(set.root(), Some(Pid::from_u32(200)));
    }

    #[test]
    fn snapshot_excludes_vanished_descendant() {
        let mut c = browser_tree().vanish_at_call(101, 2);
        let root = c.entry(100).unwrap();
        assert_eq!(snapshot(&mut c, &root).len(), 4);
        // 101 exits, taking its only child out of reach of the tree walk.
        let pids: Vec<u32> = snapshot(&mut c, &root).iter().map(|p| p.as_u32()).collect();
        assert_eq!(pids, vec![100, 102]);
    }

    #[test]
    fn snapshot_of_vanished_root_is_empty() {
        let mut c = browser_tree().vanish_at_call(100, 1);
        let root = c.entry(100).unwrap();
        assert!(snapshot(&mut c, &root).is_empty());
    }

    #[test]
    fn snapshot_after_pid_reuse_is_empty() {
        let mut c = browser_tree().reuse_at_call(100, 2, "notepad.exe");
        let root = locate(&mut c, "chrome.exe").unwrap();
        assert_eq!(root.pid, Pid::from_u32(100));
        assert_eq!(snapshot(&mut c, &root).len(), 4);
        assert!(snapshot(&mut c, &root).is_empty());
    }

    #[test]
    fn new_children_appear_in_later_snapshots() {
        let mut c = ScriptedCollector::new().with_process(1, "root", None);
        let root = c.entry(1).unwrap();
        assert_eq!(snapshot(&mut c, &root).len(), 1);
        let mut c = c.with_process(2, "worker", Some(1));
        assert_eq!(snapshot(&mut c, &root).len(), 2);
    }
}
