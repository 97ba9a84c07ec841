// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

use kerrno::KResult;

use crate::SyscallContext;

pub fn sys_getpid(ctx: &SyscallContext) -> KResult<isize> {
    Ok(ctx.proc.pid() as isize)
}
