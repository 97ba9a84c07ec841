// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

use kerrno::KResult;
use kproc::wait_status;

use crate::SyscallContext;

/// The exit protocol, shared by voluntary exit and involuntary termination.
///
/// Order matters: descriptors are released first (the last alias of each
/// object closes its vnode), the children are handed over, and only then is
/// the zombie state published, waking any waiter. `status` is the encoded
/// status word.
pub fn do_exit(ctx: &SyscallContext, status: i32) {
    info!("process {} exit, status {status:#x}", ctx.proc.pid());
    ctx.fd_table().close_all();
    ctx.table.reparent_children(ctx.proc.pid());
    ctx.proc.terminate(status);
}

/// Terminates the calling process.
///
/// Returns nominally; the dispatcher never resumes a context whose process
/// has become a zombie.
pub fn sys_exit(ctx: &SyscallContext, exit_code: i32) -> KResult<isize> {
    do_exit(ctx, wait_status(exit_code));
    Ok(0)
}
