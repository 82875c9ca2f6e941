//! KITAE Core - Shared types library.
//!
//! This crate provides common types used across all KITAE storefront
//! components:
//! - `storefront` - Client library driving cart, checkout, and payment flows
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money amounts, and
//!   statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
