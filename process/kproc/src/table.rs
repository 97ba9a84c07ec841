// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

use alloc::{collections::BTreeMap, sync::Arc, vec::Vec};

use kfile::FdTable;
use ksync::Mutex;

use crate::{AddrSpace, Pid, Process};

struct Entry {
    proc: Arc<Process>,
    parent: Pid,
}

struct TableState {
    entries: BTreeMap<Pid, Entry>,
    next_pid: Pid,
    boot: Pid,
}

impl TableState {
    fn alloc_pid(&mut self) -> Pid {
        // Monotonic; pids are not reused. Skip 0 and, after a wrap, any pid
        // that is somehow still live.
        loop {
            let pid = self.next_pid;
            self.next_pid = self.next_pid.wrapping_add(1);
            if pid != 0 && !self.entries.contains_key(&pid) {
                return pid;
            }
        }
    }
}

/// The system-wide pid-to-process map.
///
/// Its lock also guards the parent links, so the parentage check in `waitpid`
/// and the reparenting done at exit can never observe each other half-way.
pub struct ProcessTable {
    state: Mutex<TableState>,
}

impl ProcessTable {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(TableState {
                entries: BTreeMap::new(),
                next_pid: 1,
                boot: 0,
            }),
        }
    }

    /// Registers the boot process. It is its own parent and is the
    /// reparenting target for orphans.
    pub fn init_boot(&self, addrspace: Arc<dyn AddrSpace>) -> Arc<Process> {
        let mut state = self.state.lock();
        let pid = state.alloc_pid();
        let proc = Process::new(pid, addrspace, FdTable::new());
        state.boot = pid;
        state.entries.insert(
            pid,
            Entry {
                proc: proc.clone(),
                parent: pid,
            },
        );
        info!("boot process registered, pid {pid}");
        proc
    }

    /// Registers a forked child of `parent` built from an already-cloned
    /// address space and descriptor table, and returns it with its new pid.
    pub fn register_forked(
        &self,
        parent: &Process,
        addrspace: Arc<dyn AddrSpace>,
        fd_table: FdTable,
    ) -> Arc<Process> {
        let mut state = self.state.lock();
        let pid = state.alloc_pid();
        let proc = Process::new(pid, addrspace, fd_table);
        state.entries.insert(
            pid,
            Entry {
                proc: proc.clone(),
                parent: parent.pid(),
            },
        );
        debug!("process {} forked child {pid}", parent.pid());
        proc
    }

    pub fn lookup(&self, pid: Pid) -> Option<Arc<Process>> {
        self.state.lock().entries.get(&pid).map(|e| e.proc.clone())
    }

    /// The parent of `pid`, if `pid` is registered.
    pub fn parent_of(&self, pid: Pid) -> Option<Pid> {
        self.state.lock().entries.get(&pid).map(|e| e.parent)
    }

    pub fn boot_pid(&self) -> Pid {
        self.state.lock().boot
    }

    /// Removes `pid` from the table. Used both when a zombie is collected by
    /// `waitpid` and when an aborted fork unwinds a freshly registered child.
    pub fn remove(&self, pid: Pid) -> Option<Arc<Process>> {
        self.state.lock().entries.remove(&pid).map(|e| e.proc)
    }

    /// Hands the children of an exiting process over.
    ///
    /// Running children are reparented to the boot process; zombie children
    /// that nobody will ever wait for are dropped from the table.
    pub fn reparent_children(&self, of: Pid) {
        let mut state = self.state.lock();
        let boot = state.boot;
        let mut unwaited: Vec<Pid> = Vec::new();
        for (pid, entry) in state.entries.iter_mut() {
            if entry.parent != of || *pid == of {
                continue;
            }
            if entry.proc.is_zombie() {
                debug!("dropping unwaited zombie {pid}");
                unwaited.push(*pid);
            } else {
                debug!("reparenting {pid} to boot process {boot}");
                entry.parent = boot;
            }
        }
        for pid in unwaited {
            state.entries.remove(&pid);
        }
    }

    /// Number of registered processes. Diagnostics only.
    pub fn process_count(&self) -> usize {
        self.state.lock().entries.len()
    }
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}
