// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

//! Synchronization primitives.
//!
//! Re-exports the spinlocks the rest of the kernel uses and provides
//! [`WaitCell`], the wait/notify rendezvous used by the process lifecycle
//! protocol (exit/waitpid).

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub use spin::{Mutex, MutexGuard, RwLock};

pub mod future;

mod wait_cell;
pub use wait_cell::WaitCell;
