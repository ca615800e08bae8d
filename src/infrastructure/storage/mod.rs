// SPDX-License-Identifier: MPL-2.0
//! Session storage adapters.

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;
