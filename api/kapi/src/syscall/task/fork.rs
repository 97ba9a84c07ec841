// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

use kerrno::KResult;

use crate::SyscallContext;

/// Creates a child process: a copy of the caller's address space and an
/// aliasing copy of its descriptor table.
///
/// Returns the child's pid to the caller; the scheduler arranges for the
/// child to return 0. If the scheduler refuses the child, the registration
/// is unwound and the pid is never visible to anyone.
pub fn sys_fork(ctx: &SyscallContext) -> KResult<isize> {
    debug!("sys_fork <= pid: {}", ctx.proc.pid());
    let addrspace = ctx.proc.addrspace().fork()?;
    let fd_table = ctx.fd_table().fork_table();
    let child = ctx.table.register_forked(&ctx.proc, addrspace, fd_table);
    if let Err(e) = ctx.sched.spawn_forked(&child) {
        warn!("fork of {} aborted by scheduler: {e:?}", ctx.proc.pid());
        ctx.table.remove(child.pid());
        child.fd_table().close_all();
        return Err(e);
    }
    Ok(child.pid() as isize)
}
