//! Core traits defined in `purview-core` and implemented by other crates.

pub mod catalog;
pub mod token;

pub use catalog::CatalogApi;
pub use token::TokenProvider;
