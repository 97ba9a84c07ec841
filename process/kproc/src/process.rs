// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

use alloc::sync::Arc;

use kfile::FdTable;
use ksync::{Mutex, WaitCell};

use crate::{AddrSpace, Pid};

enum LifeState {
    Running,
    Zombie { status: i32 },
}

/// One process: pid, descriptor table, address space, lifecycle state.
///
/// The parent/child links are deliberately not stored here; they live in the
/// [`ProcessTable`](crate::ProcessTable), under its lock.
pub struct Process {
    pid: Pid,
    fd_table: FdTable,
    addrspace: Arc<dyn AddrSpace>,
    state: Mutex<LifeState>,
    exit_wait: WaitCell,
}

impl Process {
    pub(crate) fn new(pid: Pid, addrspace: Arc<dyn AddrSpace>, fd_table: FdTable) -> Arc<Self> {
        Arc::new(Self {
            pid,
            fd_table,
            addrspace,
            state: Mutex::new(LifeState::Running),
            exit_wait: WaitCell::new(),
        })
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn fd_table(&self) -> &FdTable {
        &self.fd_table
    }

    pub fn addrspace(&self) -> &Arc<dyn AddrSpace> {
        &self.addrspace
    }

    /// The recorded status word, once the process has exited.
    pub fn zombie_status(&self) -> Option<i32> {
        match *self.state.lock() {
            LifeState::Running => None,
            LifeState::Zombie { status } => Some(status),
        }
    }

    pub fn is_zombie(&self) -> bool {
        self.zombie_status().is_some()
    }

    /// Moves the process to the zombie state and wakes every waiter.
    ///
    /// `status` is the already-encoded status word, not the raw exit code.
    pub fn terminate(&self, status: i32) {
        debug!("process {} terminated, status {status:#x}", self.pid);
        *self.state.lock() = LifeState::Zombie { status };
        self.exit_wait.notify_all();
    }

    /// Blocks until the process has exited, returning its status word.
    pub fn wait_for_exit(&self) -> i32 {
        self.exit_wait.wait_until(|| self.zombie_status())
    }
}
