//! The process table, mapping each PID to its process
//!
//! PIDs are handed out sequentially starting at 1 and never reused.

use alloc::collections::BTreeMap;

use super::{Pid, Process};

/// All processes known to the kernel, live or awaiting reaping.
#[derive(Debug)]
pub struct ProcessTable {
    procs: BTreeMap<Pid, Process>,
    next_pid: u32,
}

impl ProcessTable {
    pub const fn new() -> Self {
        Self {
            procs: BTreeMap::new(),
            next_pid: 1,
        }
    }

    /// Reserve the next PID.
    ///
    /// Only call once the process is certain to be inserted, so failed
    /// spawns do not burn PIDs.
    pub fn allocate_pid(&mut self) -> Pid {
        let pid = Pid::new(self.next_pid);
        self.next_pid += 1;
        pid
    }

    /// Add a fully constructed process.
    pub fn insert(&mut self, process: Process) {
        self.procs.insert(process.pid(), process);
    }

    pub fn get(&self, pid: Pid) -> Option<&Process> {
        self.procs.get(&pid)
    }

    pub fn get_mut(&mut self, pid: Pid) -> Option<&mut Process> {
        self.procs.get_mut(&pid)
    }

    /// Look up a process that has not exited.
    pub fn get_live_mut(&mut self, pid: Pid) -> Option<&mut Process> {
        self.procs.get_mut(&pid).filter(|p| p.is_live())
    }

    /// Remove a process record entirely.
    pub fn remove(&mut self, pid: Pid) -> Option<Process> {
        self.procs.remove(&pid)
    }

    /// Number of records, including unreaped ones.
    pub fn len(&self) -> usize {
        self.procs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procs.is_empty()
    }

    /// Whether `parent` has any child record at all.
    pub fn has_children(&self, parent: Pid) -> bool {
        self.procs.values().any(|p| p.ppid() == parent)
    }

    /// The lowest-numbered exited child of `parent`.
    pub fn exited_child(&self, parent: Pid) -> Option<&Process> {
        self.procs
            .values()
            .find(|p| p.ppid() == parent && !p.is_live())
    }
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ExitReason;
    use crate::testing::image;

    fn spawn(table: &mut ProcessTable, parent: Pid) -> Pid {
        let pid = table.allocate_pid();
        table.insert(Process::new(pid, parent, image(0x1000_0000)));
        pid
    }

    #[test]
    fn pids_are_sequential_from_one() {
        let mut table = ProcessTable::new();
        assert_eq!(spawn(&mut table, Pid::NONE), Pid::new(1));
        assert_eq!(spawn(&mut table, Pid::new(1)), Pid::new(2));
        table.remove(Pid::new(2));
        assert_eq!(spawn(&mut table, Pid::new(1)), Pid::new(3));
    }

    #[test]
    fn exited_child_picks_lowest_pid() {
        let mut table = ProcessTable::new();
        let root = spawn(&mut table, Pid::NONE);
        let a = spawn(&mut table, root);
        let b = spawn(&mut table, root);
        assert!(table.exited_child(root).is_none());

        table.get_mut(b).unwrap().terminate(2, ExitReason::Normal);
        table.get_mut(a).unwrap().terminate(1, ExitReason::Normal);
        assert_eq!(table.exited_child(root).map(|p| p.pid()), Some(a));
    }

    #[test]
    fn live_lookup_skips_exited() {
        let mut table = ProcessTable::new();
        let root = spawn(&mut table, Pid::NONE);
        table.get_mut(root).unwrap().terminate(0, ExitReason::Killed);
        assert!(table.get_live_mut(root).is_none());
        assert!(table.get(root).is_some());
    }
}
