use std::collections::{HashMap, HashSet, VecDeque};

use sysinfo::Pid;

use crate::model::ProcessEntry;

pub mod scripted;
pub mod system;

/// Why a single process could not be queried.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("process {0} no longer exists")]
    ProcessGone(Pid),

    #[error("access denied to process {0}")]
    AccessDenied(Pid),
}

/// OS process-table access used by the tracker and sampler.
/// Implementations (SystemCollector, ScriptedCollector) handle the details.
pub trait ProcessCollector {
    /// All running processes, refreshed at call time. Thread entries are
    /// never included.
    fn list_processes(&mut self) -> Vec<ProcessEntry>;

    /// Children of `process`, or all descendants when `recursive` is set.
    /// Fails with `ProcessGone` when that process instance no longer exists,
    /// including when its pid now belongs to a newer process.
    fn children_of(&mut self, process: &ProcessEntry, recursive: bool) -> Result<Vec<Pid>, ProbeError>;

    /// Cumulative bytes read by `pid` over its lifetime.
    fn cumulative_read_bytes(&mut self, pid: Pid) -> Result<u64, ProbeError>;
}

/// Walk `(pid, parent)` links downward from `root`, breadth-first.
///
/// Each pid is visited at most once, so a parent cycle left behind by pid
/// reuse cannot loop forever. Siblings come out in ascending pid order.
pub(crate) fn walk_children<I>(links: I, root: Pid, recursive: bool) -> Vec<Pid>
where
    I: IntoIterator<Item = (Pid, Option<Pid>)>,
{
    let mut by_parent: HashMap<Pid, Vec<Pid>> = HashMap::new();
    for (pid, parent) in links {
        if let Some(parent) = parent {
            if parent != pid {
                by_parent.entry(parent).or_default().push(pid);
            }
        }
    }
    for kids in by_parent.values_mut() {
        kids.sort_unstable();
    }

    let mut seen: HashSet<Pid> = HashSet::from([root]);
    let mut queue: VecDeque<Pid> = VecDeque::from([root]);
    let mut found = Vec::new();

    while let Some(current) = queue.pop_front() {
        let Some(kids) = by_parent.get(&current) else { continue };
        for &kid in kids {
            if seen.insert(kid) {
                found.push(kid);
                if recursive {
                    queue.push_back(kid);
                }
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use sysinfo::Pid;

    use super::walk_children;

    fn pid(n: usize) -> Pid {
        Pid::from(n)
    }

    fn tree() -> Vec<(Pid, Option<Pid>)> {
        vec![
            (pid(1), None),
            (pid(10), Some(pid(1))),
            (pid(12), Some(pid(10))),
            (pid(11), Some(pid(10))),
            (pid(20), Some(pid(12))),
            (pid(30), Some(pid(1))),
        ]
    }

    #[test]
    fn direct_children_only() {
        assert_eq!(walk_children(tree(), pid(10), false), vec![pid(11), pid(12)]);
    }

    #[test]
    fn recursive_walk_is_breadth_first() {
        assert_eq!(
            walk_children(tree(), pid(10), true),
            vec![pid(11), pid(12), pid(20)]
        );
    }

    #[test]
    fn leaf_has_no_children() {
        assert!(walk_children(tree(), pid(20), true).is_empty());
    }

    #[test]
    fn parent_cycle_terminates() {
        let links = vec![(pid(2), Some(pid(3))), (pid(3), Some(pid(2)))];
        assert_eq!(walk_children(links, pid(2), true), vec![pid(3)]);
    }
}
