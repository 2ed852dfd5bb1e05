//! Fotoceramica Core - Shared domain types.
//!
//! This crate provides the common types used by the site service:
//! validated emails, minor-unit prices, and ISO country codes.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
