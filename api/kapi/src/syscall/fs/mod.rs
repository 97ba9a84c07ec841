// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

//! File syscalls.
//!
//! Descriptor management (open, close, dup2) and I/O on open descriptors
//! (read, write, lseek).

mod fd_ops;
mod io;

pub use self::{fd_ops::*, io::*};

use kerrno::{KError, KResult};

/// Converts a raw descriptor argument into a table index.
fn fd_index(fd: i32) -> KResult<usize> {
    usize::try_from(fd).map_err(|_| KError::BadFileDescriptor)
}
