// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

use kerrno::{KError, KResult};
use kproc::Pid;

use crate::{SyscallContext, uspace::UserAddr};

/// Waits for a specific child to exit and collects its status.
///
/// Only the direct parent may wait, and only for one pid at a time; there
/// are no wait-any groups and no timeouts. The zombie's table entry is
/// removed by the collecting call, so a second waiter racing on the same
/// pid finds the process gone.
pub fn sys_waitpid(
    ctx: &SyscallContext,
    pid: i32,
    status: UserAddr,
    options: u32,
) -> KResult<isize> {
    debug!("sys_waitpid <= pid: {pid}, status: {status:#x}, options: {options}");
    if options != 0 {
        return Err(KError::InvalidInput);
    }
    let pid = Pid::try_from(pid).map_err(|_| KError::InvalidInput)?;
    if pid == 0 {
        return Err(KError::InvalidInput);
    }

    let child = ctx.table.lookup(pid).ok_or(KError::NoSuchProcess)?;
    let caller = ctx.proc.pid();
    // The self case also lands here: a process is never its own child.
    if pid == caller || ctx.table.parent_of(pid) != Some(caller) {
        return Err(KError::NoChildProcess);
    }

    let word = child.wait_for_exit();
    // Exactly one collector wins the removal.
    if ctx.table.remove(pid).is_none() {
        return Err(KError::NoSuchProcess);
    }
    if status != 0 {
        ctx.mem.copy_out(status, &word.to_ne_bytes())?;
    }
    Ok(pid as isize)
}
