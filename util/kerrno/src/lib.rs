// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

//! Kernel error codes.
//!
//! [`KError`] is the single error type used across the kernel. Each variant
//! maps to a POSIX errno value via [`KError::code`], which is what the
//! syscall dispatcher hands back to user space.

#![cfg_attr(not(test), no_std)]

use core::fmt;

/// Kernel-wide error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KError {
    /// An entity already exists (EEXIST).
    AlreadyExists,
    /// Bad address in user memory (EFAULT).
    BadAddress,
    /// Bad file descriptor (EBADF).
    BadFileDescriptor,
    /// Data is not valid for the operation (EINVAL carrier for decode errors).
    InvalidData,
    /// Invalid argument (EINVAL).
    InvalidInput,
    /// I/O error (EIO).
    Io,
    /// The path names a directory where a file was required (EISDIR).
    IsADirectory,
    /// Path or name exceeds the allowed length (ENAMETOOLONG).
    NameTooLong,
    /// The caller has no matching child process (ECHILD).
    NoChildProcess,
    /// Out of memory (ENOMEM).
    NoMemory,
    /// No such process (ESRCH).
    NoSuchProcess,
    /// A directory component of the path is not a directory (ENOTDIR).
    NotADirectory,
    /// Entity not found (ENOENT).
    NotFound,
    /// The object does not support seeking (ESPIPE).
    NotSeekable,
    /// Operation not permitted for the descriptor's access mode (EACCES).
    PermissionDenied,
    /// Resource is busy (EBUSY).
    ResourceBusy,
    /// The file table is full (ENFILE).
    TooManyOpenFiles,
    /// Operation not supported (ENOSYS).
    Unsupported,
    /// Operation would block (EAGAIN).
    WouldBlock,
}

/// Result type used across the kernel.
pub type KResult<T = ()> = Result<T, KError>;

impl KError {
    /// Returns the POSIX errno value for this error.
    pub const fn code(self) -> i32 {
        use KError::*;
        match self {
            NoSuchProcess => 3,
            Io => 5,
            BadFileDescriptor => 9,
            NoChildProcess => 10,
            WouldBlock => 11,
            NoMemory => 12,
            PermissionDenied => 13,
            BadAddress => 14,
            ResourceBusy => 16,
            AlreadyExists => 17,
            NotADirectory => 20,
            IsADirectory => 21,
            InvalidData | InvalidInput => 22,
            TooManyOpenFiles => 23,
            NotSeekable => 29,
            NameTooLong => 36,
            NotFound => 2,
            Unsupported => 38,
        }
    }

    /// Returns a short description of this error.
    pub const fn as_str(self) -> &'static str {
        use KError::*;
        match self {
            AlreadyExists => "Entity already exists",
            BadAddress => "Bad address",
            BadFileDescriptor => "Bad file descriptor",
            InvalidData => "Invalid data",
            InvalidInput => "Invalid argument",
            Io => "I/O error",
            IsADirectory => "Is a directory",
            NameTooLong => "Name too long",
            NoChildProcess => "No child process",
            NoMemory => "Out of memory",
            NoSuchProcess => "No such process",
            NotADirectory => "Not a directory",
            NotFound => "Entity not found",
            NotSeekable => "Illegal seek",
            PermissionDenied => "Permission denied",
            ResourceBusy => "Resource busy",
            TooManyOpenFiles => "Too many open files",
            Unsupported => "Operation not supported",
            WouldBlock => "Operation would block",
        }
    }
}

impl fmt::Display for KError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
