// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

use alloc::sync::Arc;

use kfile::FdTable;
use kproc::{Process, ProcessTable};
use kvnode::Filesystem;

use crate::{sched::Scheduler, uspace::UserMem};

/// Everything a syscall may touch, bundled per call.
///
/// On a real entry path this is assembled from the current task and the
/// kernel singletons; tests assemble it from in-memory fakes.
pub struct SyscallContext<'a> {
    /// The calling process.
    pub proc: Arc<Process>,
    /// The system-wide process table.
    pub table: &'a ProcessTable,
    /// Path resolution.
    pub fs: &'a dyn Filesystem,
    /// Access to the caller's user memory.
    pub mem: &'a dyn UserMem,
    /// Target for forked children.
    pub sched: &'a dyn Scheduler,
}

impl SyscallContext<'_> {
    /// The caller's descriptor table.
    pub fn fd_table(&self) -> &FdTable {
        self.proc.fd_table()
    }
}
