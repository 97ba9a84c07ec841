// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

//! Open-file objects and per-process descriptor tables.
//!
//! [`OpenFile`] is the shared, reference-counted record of one open-file
//! instance; [`FdTable`] maps small descriptor numbers to open files. The
//! syscall layer in `kapi` orchestrates the two.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[macro_use]
extern crate log;

mod fd_table;
mod file;
mod flags;

pub use fd_table::{FD_TABLE_SIZE, FdTable};
pub use file::{OpenFile, SeekFrom};
pub use flags::OpenFlags;
