// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

//! I/O syscalls on open descriptors: read, write, lseek.

use alloc::vec;

use kerrno::{KError, KResult};
use kfile::SeekFrom;

use super::fd_index;
use crate::{SyscallContext, uspace::UserAddr};

/// Upper bound on one bounce-buffer transfer. `len` is caller-controlled;
/// anything beyond this comes back as a short transfer, never as an
/// allocation of the raw request.
pub const MAX_RW_CHUNK: usize = 0x10000;

/// Reads up to `len` bytes at the descriptor's current offset into the user
/// buffer. A short read is success; the offset advances by the amount read.
pub fn sys_read(ctx: &SyscallContext, fd: i32, buf: UserAddr, len: usize) -> KResult<isize> {
    debug!("sys_read <= fd: {fd}, buf: {buf:#x}, len: {len}");
    let file = ctx.fd_table().get(fd_index(fd)?)?;
    let mut bounce = vec![0u8; len.min(MAX_RW_CHUNK)];
    let n = file.read(&mut bounce)?;
    ctx.mem.copy_out(buf, &bounce[..n])?;
    Ok(n as isize)
}

/// Writes up to `len` bytes from the user buffer at the descriptor's current
/// offset.
pub fn sys_write(ctx: &SyscallContext, fd: i32, buf: UserAddr, len: usize) -> KResult<isize> {
    debug!("sys_write <= fd: {fd}, buf: {buf:#x}, len: {len}");
    let file = ctx.fd_table().get(fd_index(fd)?)?;
    let mut bounce = vec![0u8; len.min(MAX_RW_CHUNK)];
    ctx.mem.copy_in(buf, &mut bounce)?;
    let n = file.write(&bounce)?;
    Ok(n as isize)
}

/// Repositions the descriptor's offset. whence: 0=start, 1=current, 2=end.
pub fn sys_lseek(ctx: &SyscallContext, fd: i32, offset: i64, whence: i32) -> KResult<isize> {
    debug!("sys_lseek <= fd: {fd}, offset: {offset}, whence: {whence}");
    let pos = match whence {
        0 => SeekFrom::Start(u64::try_from(offset).map_err(|_| KError::InvalidInput)?),
        1 => SeekFrom::Current(offset),
        2 => SeekFrom::End(offset),
        _ => return Err(KError::InvalidInput),
    };
    let off = ctx.fd_table().get(fd_index(fd)?)?.seek(pos)?;
    Ok(off as isize)
}
