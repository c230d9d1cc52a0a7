//! # purview-service
//!
//! The reconciliation layer between user requests and the catalog's REST
//! API. Every top-level operation reads a fresh [`DirectorySnapshot`],
//! computes what should exist with pure functions (name validation,
//! resolution, hierarchy reconciliation), and then issues the minimal set
//! of writes through [`purview_core::traits::CatalogApi`].
//!
//! Services follow constructor injection: the catalog client and the id
//! generator are provided at construction time via `Arc` references.

pub mod asset;
pub mod collection;
pub mod datasource;
pub mod directory;
pub mod naming;
pub mod reconciler;
pub mod resolver;
pub mod subtree;

pub use asset::{AssetPurger, PurgeReport, PurgeStatus};
pub use collection::{
    CollectionService, CollectionSettings, DeletedCollection, PathOutcome, RecreateStatement,
    RecursiveDeleteReport,
};
pub use datasource::{DataSourceService, RegisterDataSource};
pub use directory::{CollectionEntry, DirectorySnapshot};
pub use naming::{NameGenerator, NameValidator};
pub use reconciler::{HierarchyReconciler, PlannedSegment, SegmentAction, split_path};
pub use resolver::{describe, resolve};
pub use subtree::SubtreeCollector;
