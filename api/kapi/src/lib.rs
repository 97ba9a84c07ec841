// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

//! The syscall layer.
//!
//! Free `sys_*` functions implement the file and process-lifecycle calls on
//! top of `kfile` and `kproc`. Each takes a [`SyscallContext`] naming the
//! calling process and the collaborators the call may touch (filesystem,
//! user memory, scheduler, process table), so the layer stays independent of
//! any particular VFS, MMU or scheduler.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[macro_use]
extern crate log;

mod ctx;
pub mod sched;
pub mod syscall;
pub mod uspace;

pub use ctx::SyscallContext;
