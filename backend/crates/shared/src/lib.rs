//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the smallest shared vocabulary:
//! - Common error types and result aliases
//! - Typed ID wrappers
//!
//! Only things with a consistent meaning across every domain live here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
