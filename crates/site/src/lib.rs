//! Fotoceramica site library.
//!
//! Provides the site functionality as a library so it can be tested and
//! reused by the binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod cms;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
