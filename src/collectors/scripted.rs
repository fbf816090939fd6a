//! In-memory collector with scripted process trees and read counters.
//!
//! Drives the monitor deterministically without touching the OS process
//! table. Each process carries a queue of read results consumed one per
//! `cumulative_read_bytes` call; once the queue drains the last result
//! repeats. Processes can be scheduled to vanish, or to have their pid
//! handed to an unrelated process, at a given `children_of` call, which is
//! how the driver loop counts ticks.

use std::collections::{BTreeMap, VecDeque};

use sysinfo::Pid;

use super::{walk_children, ProbeError, ProcessCollector};
use crate::model::ProcessEntry;

struct ScriptedProcess {
    name: String,
    parent: Option<Pid>,
    reads: VecDeque<Result<u64, ProbeError>>,
    last_read: Result<u64, ProbeError>,
    start_time: u64,
    /// 1-based `children_of` call from which the process is gone.
    vanishes_at: Option<usize>,
    /// 1-based `children_of` call from which the pid belongs to a new
    /// process with the given name.
    reused_at: Option<(usize, String)>,
}

/// Added to a reused pid's start time so the new owner never matches.
const REUSE_START_OFFSET: u64 = 1_000_000;

#[derive(Default)]
pub struct ScriptedCollector {
    processes: BTreeMap<Pid, ScriptedProcess>,
    children_calls: usize,
    read_calls: usize,
}

impl ScriptedCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a process. `parent` links it into a tree.
    pub fn with_process(mut self, pid: u32, name: &str, parent: Option<u32>) -> Self {
        self.processes.insert(
            Pid::from_u32(pid),
            ScriptedProcess {
                name: name.to_string(),
                parent: parent.map(Pid::from_u32),
                reads: VecDeque::new(),
                last_read: Ok(0),
                start_time: u64::from(pid),
                vanishes_at: None,
                reused_at: None,
            },
        );
        self
    }

    /// Queue successive cumulative read totals for `pid`.
    pub fn with_read_totals(mut self, pid: u32, totals: impl IntoIterator<Item = u64>) -> Self {
        if let Some(process) = self.processes.get_mut(&Pid::from_u32(pid)) {
            process.reads.extend(totals.into_iter().map(Ok));
        }
        self
    }

    /// Queue a single read result, which may be a failure.
    pub fn with_read(mut self, pid: u32, read: Result<u64, ProbeError>) -> Self {
        if let Some(process) = self.processes.get_mut(&Pid::from_u32(pid)) {
            process.reads.push_back(read);
        }
        self
    }

    /// Make `pid` disappear starting with the `call`-th `children_of` call.
    pub fn vanish_at_call(mut self, pid: u32, call: usize) -> Self {
        if let Some(process) = self.processes.get_mut(&Pid::from_u32(pid)) {
            process.vanishes_at = Some(call);
        }
        self
    }

    /// Hand `pid` to a new process called `name` starting with the
    /// `call`-th `children_of` call. The new owner inherits the scripted
    /// parent links and read queue.
    pub fn reuse_at_call(mut self, pid: u32, call: usize, name: &str) -> Self {
        if let Some(process) = self.processes.get_mut(&Pid::from_u32(pid)) {
            process.reused_at = Some((call, name.to_string()));
        }
        self
    }

    /// The process currently holding `pid`, as a listing would report it.
    pub fn entry(&self, pid: u32) -> Option<ProcessEntry> {
        let pid = Pid::from_u32(pid);
        self.processes
            .get(&pid)
            .filter(|_| self.is_alive(pid))
            .map(|p| self.identity(pid, p))
    }

    /// Number of `children_of` calls so far.
    pub fn children_calls(&self) -> usize {
        self.children_calls
    }

    /// Number of `cumulative_read_bytes` calls so far.
    pub fn read_calls(&self) -> usize {
        self.read_calls
    }

    fn identity(&self, pid: Pid, process: &ScriptedProcess) -> ProcessEntry {
        match &process.reused_at {
            Some((at, name)) if self.children_calls >= *at => {
                ProcessEntry::new(pid, name.clone(), process.start_time + REUSE_START_OFFSET)
            }
            _ => ProcessEntry::new(pid, process.name.clone(), process.start_time),
        }
    }

    fn is_alive(&self, pid: Pid) -> bool {
        self.processes
            .get(&pid)
            .is_some_and(|p| p.vanishes_at.is_none_or(|at| self.children_calls < at))
    }
}

impl ProcessCollector for ScriptedCollector {
    fn list_processes(&mut self) -> Vec<ProcessEntry> {
        self.processes
            .iter()
            .filter(|(pid, _)| self.is_alive(**pid))
            .map(|(pid, p)| self.identity(*pid, p))
            .collect()
    }

    fn children_of(&mut self, process: &ProcessEntry, recursive: bool) -> Result<Vec<Pid>, ProbeError> {
        self.children_calls += 1;
        let pid = process.pid;
        let current = self
            .processes
            .get(&pid)
            .filter(|_| self.is_alive(pid))
            .map(|p| self.identity(pid, p));
        match current {
            Some(now) if process.is_same_process(now.pid, now.start_time) => {}
            _ => return Err(ProbeError::ProcessGone(pid)),
        }
        let links: Vec<(Pid, Option<Pid>)> = self
            .processes
            .iter()
            .filter(|(p, _)| self.is_alive(**p))
            .map(|(p, process)| (*p, process.parent))
            .collect();
        Ok(walk_children(links, pid, recursive))
    }

    fn cumulative_read_bytes(&mut self, pid: Pid) -> Result<u64, ProbeError> {
        self.read_calls += 1;
        if !self.is_alive(pid) {
            return Err(ProbeError::ProcessGone(pid));
        }
        let Some(process) = self.processes.get_mut(&pid) else {
            return Err(ProbeError::ProcessGone(pid));
        };
        if let Some(next) = process.reads.pop_front() {
            process.last_read = next;
        }
        process.last_read
    }
}
