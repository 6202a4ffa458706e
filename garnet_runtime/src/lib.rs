//! Class and module object model for the Garnet runtime.
//!
//! This crate provides:
//! - Class, module, singleton class and include proxy nodes in one arena
//! - Module inclusion with duplicate and cycle detection
//! - Lazily materialized singleton classes and their cloning
//! - Ancestor, included-module and method-name introspection
//! - A method-cache invalidation hook, statistics and configuration

#![deny(unsafe_code)]

pub mod cache;
pub mod config;
pub mod object;
pub mod stats;

// Re-export commonly used items
pub use cache::{CountingInvalidator, MethodCacheInvalidator, NoopInvalidator};
pub use config::{ConfigError, ObjectModelConfig};
pub use object::{
    Ancestors, ClassId, ClassKind, ClassNode, MethodBody, MethodFilter, MethodSlot, ObjectId,
    ObjectSpace, SharedObjectSpace, Value, Visibility,
};
pub use stats::{ObjectModelStats, StatsSnapshot};
