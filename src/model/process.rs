use sysinfo::Pid;

/// A running process as reported by a collector's process listing.
///
/// `pid` and `start_time` together identify one process instance; a pid
/// handed to a new process after this one exits carries a different start
/// time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: Pid,
    pub name: String,
    /// Seconds since the Unix epoch at which the process started.
    pub start_time: u64,
}

impl ProcessEntry {
    pub fn new(pid: Pid, name: impl Into<String>, start_time: u64) -> Self {
        Self { pid, name: name.into(), start_time }
    }

    /// Whether `pid` started at `start_time` is this process, not a later
    /// one that was handed the same pid.
    pub fn is_same_process(&self, pid: Pid, start_time: u64) -> bool {
        self.pid == pid && self.start_time == start_time
    }

    /// Exact, case-insensitive match against a display name.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// The root process plus every descendant alive at snapshot time.
///
/// Rebuilt from scratch on every tick. An empty set means the root itself
/// was gone when the snapshot was taken; a root with no children is a set
/// of length one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessSet {
    pids: Vec<Pid>,
}

impl ProcessSet {
    pub fn new(root: Pid, descendants: Vec<Pid>) -> Self {
        let mut pids = Vec::with_capacity(descendants.len() + 1);
        pids.push(root);
        pids.extend(descendants.into_iter().filter(|pid| *pid != root));
        Self { pids }
    }

    /// The set reported when the root process has exited.
    pub fn closed() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<Pid> {
        self.pids.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.pids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Pid> + '_ {
        self.pids.iter().copied()
    }
}
