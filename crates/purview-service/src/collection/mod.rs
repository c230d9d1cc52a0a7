//! Collection reads, hierarchy creation, checked deletion, and export.

pub mod export;
pub mod service;

pub use export::RecreateStatement;
pub use service::{
    CollectionService, CollectionSettings, DeletedCollection, PathOutcome, RecursiveDeleteReport,
};
