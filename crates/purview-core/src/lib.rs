//! # purview-core
//!
//! Core crate for purview-automation. Contains the catalog API and token
//! provider traits, configuration schemas, typed request/response bodies
//! for every REST endpoint, and the unified error system.
//!
//! This crate has **no** internal dependencies on other workspace crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
