// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

//! User-memory access.
//!
//! Syscalls never touch caller pointers directly; every transfer goes
//! through [`UserMem`], so the address-translation and fault-handling
//! machinery stays behind one trait. [`DirectMem`] is the identity
//! implementation for kernel-space callers and tests.

use alloc::string::String;
use alloc::vec::Vec;

use kerrno::{KError, KResult};

/// A raw address in the caller's address space.
pub type UserAddr = usize;

/// Longest path, in bytes, accepted by `sys_open` (NUL excluded).
pub const PATH_MAX: usize = 1024;

pub trait UserMem: Send + Sync {
    /// Copies `dst.len()` bytes from user memory at `src` into `dst`.
    fn copy_in(&self, src: UserAddr, dst: &mut [u8]) -> KResult<()>;

    /// Copies `src` into user memory at `dst`.
    fn copy_out(&self, dst: UserAddr, src: &[u8]) -> KResult<()>;

    /// Copies a NUL-terminated string of at most `max` bytes from `src`.
    ///
    /// A string that does not terminate within `max` bytes is rejected with
    /// `NameTooLong`; non-UTF-8 contents with `InvalidData`.
    fn copy_in_str(&self, src: UserAddr, max: usize) -> KResult<String> {
        let mut bytes = Vec::new();
        for i in 0..=max {
            let mut byte = [0u8];
            self.copy_in(src + i, &mut byte)?;
            if byte[0] == 0 {
                return String::from_utf8(bytes).map_err(|_| KError::InvalidData);
            }
            if i == max {
                break;
            }
            bytes.push(byte[0]);
        }
        Err(KError::NameTooLong)
    }
}

/// Identity mapping: user addresses are kernel addresses.
///
/// Only sound while the addresses handed to the syscalls genuinely point at
/// live kernel memory of sufficient length, which is the contract for
/// kernel-space callers.
pub struct DirectMem;

impl UserMem for DirectMem {
    fn copy_in(&self, src: UserAddr, dst: &mut [u8]) -> KResult<()> {
        if dst.is_empty() {
            return Ok(());
        }
        if src == 0 {
            return Err(KError::BadAddress);
        }
        unsafe {
            core::ptr::copy_nonoverlapping(src as *const u8, dst.as_mut_ptr(), dst.len());
        }
        Ok(())
    }

    fn copy_out(&self, dst: UserAddr, src: &[u8]) -> KResult<()> {
        if src.is_empty() {
            return Ok(());
        }
        if dst == 0 {
            return Err(KError::BadAddress);
        }
        unsafe {
            core::ptr::copy_nonoverlapping(src.as_ptr(), dst as *mut u8, src.len());
        }
        Ok(())
    }
}
