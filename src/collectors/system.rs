//! Process-table access backed by `sysinfo`.

use sysinfo::{Pid, Process, ProcessRefreshKind, ProcessesToUpdate, System};

use super::{walk_children, ProbeError, ProcessCollector};
use crate::model::ProcessEntry;

/// Live OS collector. Each listing or tree walk refreshes the whole process
/// table (disk usage only); read counters are served from that refresh.
pub struct SystemCollector {
    sys: System,
}

impl SystemCollector {
    pub fn new() -> Self {
        let mut collector = Self { sys: System::new() };
        collector.refresh();
        collector
    }

    fn refresh(&mut self) {
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_disk_usage(),
        );
    }

    /// Live processes, skipping the per-thread entries Linux exposes.
    fn processes(&self) -> impl Iterator<Item = &Process> {
        self.sys
            .processes()
            .values()
            .filter(|p| p.thread_kind().is_none())
    }
}

impl Default for SystemCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessCollector for SystemCollector {
    fn list_processes(&mut self) -> Vec<ProcessEntry> {
        self.refresh();
        let mut entries: Vec<ProcessEntry> = self
            .processes()
            .map(|p| {
                ProcessEntry::new(p.pid(), p.name().to_string_lossy().into_owned(), p.start_time())
            })
            .collect();
        // The table is a hash map; order by pid so the oldest match wins.
        entries.sort_by_key(|e| e.pid);
        entries
    }

    fn children_of(&mut self, process: &ProcessEntry, recursive: bool) -> Result<Vec<Pid>, ProbeError> {
        self.refresh();
        let pid = process.pid;
        match self.sys.process(pid) {
            Some(p) if process.is_same_process(pid, p.start_time()) => {}
            _ => return Err(ProbeError::ProcessGone(pid)),
        }
        let links: Vec<(Pid, Option<Pid>)> =
            self.processes().map(|p| (p.pid(), p.parent())).collect();
        Ok(walk_children(links, pid, recursive))
    }

    fn cumulative_read_bytes(&mut self, pid: Pid) -> Result<u64, ProbeError> {
        // sysinfo reports an unreadable counter as zero, so AccessDenied
        // never surfaces from this collector.
        self.sys
            .process(pid)
            .map(|p| p.disk_usage().total_read_bytes)
            .ok_or(ProbeError::ProcessGone(pid))
    }
}
