//! # purview-client
//!
//! HTTP implementation of [`purview_core::traits::CatalogApi`] built on
//! `reqwest`, plus the bearer credential providers the service layer
//! consumes through [`purview_core::traits::TokenProvider`].

pub mod credentials;
pub mod http;

pub use credentials::{
    AzureCliCredential, ClientSecretCredential, StaticTokenProvider, credential_from_config,
};
pub use http::HttpCatalogClient;
