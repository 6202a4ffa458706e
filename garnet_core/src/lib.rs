//! # Garnet Core
//!
//! Foundational pieces shared by the Garnet runtime crates:
//!
//! - **Arenas**: typed, index-addressed storage for long-lived metadata
//! - **Interning**: selector and variable names compared by identity
//! - **Error Handling**: the error kinds raised by the object model

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod arena;
pub mod error;
pub mod intern;

pub use arena::{Arena, Id};
pub use error::{GarnetError, GarnetResult};
pub use intern::{InternedString, StringInterner, intern};

/// Garnet runtime version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
