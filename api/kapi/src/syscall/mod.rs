// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

//! Syscall implementations, grouped the way the dispatch table groups them.

pub mod fs;
pub mod task;
