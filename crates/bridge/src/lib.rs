//! Checkout bridge library.
//!
//! This crate provides the bridge functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod mapping;
pub mod middleware;
pub mod routes;
pub mod shopify;
pub mod state;
