//! Page Mapping Flags and Errors
//!
//! The page-table implementation lives behind [`super::AddressSpace`]; this
//! module only fixes the vocabulary both sides use.
//!
//! # Security Properties
//! - Flags are strictly typed to prevent invalid combinations
//! - User heap pages are never executable

use core::fmt;

use bitflags::bitflags;

bitflags! {
    /// Permissions requested for a mapping.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PageFlags: u32 {
        /// Page can be read.
        const READ = 1 << 0;
        /// Page can be written.
        const WRITE = 1 << 1;
        /// Page can be executed.
        const EXECUTE = 1 << 2;
        /// Page is accessible from EL0.
        const USER = 1 << 3;

        /// User data: readable/writable by user, not executable.
        const USER_DATA = Self::READ.bits() | Self::WRITE.bits() | Self::USER.bits();
    }
}

/// Error type for page mapping operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingError {
    /// The virtual address is already mapped.
    AlreadyMapped,
    /// The virtual address is not mapped.
    NotMapped,
    /// No physical frames available.
    OutOfMemory,
    /// The address is not properly aligned.
    MisalignedAddress,
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyMapped => write!(f, "virtual address already mapped"),
            Self::NotMapped => write!(f, "virtual address not mapped"),
            Self::OutOfMemory => write!(f, "out of physical memory"),
            Self::MisalignedAddress => write!(f, "address not properly aligned"),
        }
    }
}
