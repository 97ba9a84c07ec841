// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

use alloc::sync::Arc;

use kerrno::KResult;
use kproc::Process;

/// Hands a freshly forked process to the scheduler.
pub trait Scheduler: Send + Sync {
    /// Snapshots the caller's saved user context and arranges for `child` to
    /// start running, returning 0 from the fork call.
    ///
    /// On failure the caller unwinds the child's registration; the pid is
    /// never leaked.
    fn spawn_forked(&self, child: &Arc<Process>) -> KResult<()>;
}
