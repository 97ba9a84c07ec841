// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 Opal Kernel Developers

use kerrno::{KError, KResult};

bitflags::bitflags! {
    /// Open flags.
    ///
    /// The three access modes are distinct bits so that contradictory
    /// combinations are representable and can be rejected with `EINVAL`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: u32 {
        /// Open for reading only.
        const RDONLY = 0x01;
        /// Open for writing only.
        const WRONLY = 0x02;
        /// Open for reading and writing.
        const RDWR = 0x04;
        /// Create the file if it does not exist.
        const CREAT = 0x10;
        /// Start with the offset at end of file.
        const APPEND = 0x20;
    }
}

impl OpenFlags {
    const ACCESS_MODES: Self = Self::RDONLY.union(Self::WRONLY).union(Self::RDWR);

    /// Validates that exactly one access mode is requested.
    pub fn check_access(self) -> KResult<()> {
        let access = self & Self::ACCESS_MODES;
        if access.bits().count_ones() != 1 {
            return Err(KError::InvalidInput);
        }
        Ok(())
    }

    /// Whether the descriptor may be read.
    pub fn readable(self) -> bool {
        self.intersects(Self::RDONLY | Self::RDWR)
    }

    /// Whether the descriptor may be written.
    pub fn writable(self) -> bool {
        self.intersects(Self::WRONLY | Self::RDWR)
    }
}
