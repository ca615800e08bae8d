// SPDX-License-Identifier: MPL-2.0
//! Application layer - Ports between the comparison logic and the outside world.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - The `app` layer wires infrastructure into ports at startup

pub mod port;
