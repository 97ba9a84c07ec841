// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

//! Descriptor management syscalls: open, close, dup2.

use kerrno::{KError, KResult};
use kfile::{OpenFile, OpenFlags};

use super::fd_index;
use crate::{
    SyscallContext,
    uspace::{PATH_MAX, UserAddr},
};

/// Opens the file named by the user path and returns the lowest free
/// descriptor.
///
/// Contradictory flags are rejected before the path is even copied in, and
/// the path is copied in before a slot is claimed, so a failing call leaves
/// no trace in the table.
pub fn sys_open(ctx: &SyscallContext, path: UserAddr, flags: u32) -> KResult<isize> {
    let flags = OpenFlags::from_bits(flags).ok_or(KError::InvalidInput)?;
    flags.check_access()?;
    let path = ctx.mem.copy_in_str(path, PATH_MAX)?;
    debug!("sys_open <= path: {path:?}, flags: {flags:?}");

    let table = ctx.fd_table();
    let fd = table.allocate()?;
    let vnode = match ctx.fs.open(&path, flags.contains(OpenFlags::CREAT)) {
        Ok(vnode) => vnode,
        Err(e) => {
            table.cancel_reservation(fd);
            return Err(e);
        }
    };
    let offset = if flags.contains(OpenFlags::APPEND) {
        match vnode.metadata() {
            Ok(meta) => meta.size,
            Err(e) => {
                table.cancel_reservation(fd);
                vnode.close();
                return Err(e);
            }
        }
    } else {
        0
    };
    table.bind(fd, OpenFile::new(vnode, flags, offset))?;
    Ok(fd as isize)
}

/// Closes a descriptor. The underlying object is released; the vnode is
/// closed only when the last aliasing descriptor goes away.
pub fn sys_close(ctx: &SyscallContext, fd: i32) -> KResult<isize> {
    debug!("sys_close <= fd: {fd}");
    ctx.fd_table().release(fd_index(fd)?)?;
    Ok(0)
}

/// Makes `new` an alias of `old`, closing whatever `new` referred to.
pub fn sys_dup2(ctx: &SyscallContext, old: i32, new: i32) -> KResult<isize> {
    debug!("sys_dup2 <= old: {old}, new: {new}");
    let new = ctx.fd_table().duplicate(fd_index(old)?, fd_index(new)?)?;
    Ok(new as isize)
}
