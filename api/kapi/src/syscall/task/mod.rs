// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

//! Process lifecycle syscalls.
//!
//! Creation (fork), termination (exit), collection (waitpid) and identity
//! (getpid).

mod ctl;
mod exit;
mod fork;
mod wait;

pub use self::{ctl::*, exit::*, fork::*, wait::*};
