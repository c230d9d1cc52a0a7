//! Turns a slash-delimited path of names into a chain of collection ids.
//!
//! Reconciliation is pure: it reads a [`DirectorySnapshot`] and produces a
//! plan, one [`PlannedSegment`] per path segment. Executing the plan is the
//! collection service's job.

use std::cell::RefCell;
use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use purview_core::error::AppError;

use crate::directory::DirectorySnapshot;
use crate::naming::NameValidator;

/// What executing a segment requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentAction {
    /// The id already sits under the intended parent.
    Reuse,
    /// The id must be written.
    Create,
}

/// The id chosen for one path segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedSegment {
    /// Collection id to use.
    pub id: String,
    /// The segment as the user wrote it, used as the friendly name.
    pub friendly_name: String,
    /// Id of the collection this one nests under.
    pub parent_id: String,
    /// Whether a write is needed.
    pub action: SegmentAction,
}

/// Splits a user path on `/` and trims each segment.
///
/// Empty segments (`"a//b"`, a trailing slash, a blank path) are rejected.
pub fn split_path(path: &str) -> Result<Vec<String>, AppError> {
    let segments: Vec<String> = path.split('/').map(|s| s.trim().to_string()).collect();
    if segments.iter().any(String::is_empty) {
        return Err(AppError::validation(format!(
            "Collection path '{path}' contains an empty segment"
        )));
    }
    Ok(segments)
}

/// Chooses ids for path segments against one snapshot.
#[derive(Debug)]
pub struct HierarchyReconciler<'a> {
    snapshot: &'a DirectorySnapshot,
    validator: NameValidator<'a>,
}

impl<'a> HierarchyReconciler<'a> {
    /// Creates a reconciler over `snapshot`.
    pub fn new(snapshot: &'a DirectorySnapshot, validator: NameValidator<'a>) -> Self {
        Self {
            snapshot,
            validator,
        }
    }

    /// Plans ids for `segments`, the first nested under `start_id`.
    ///
    /// Each segment's parent is the id chosen for the previous segment.
    /// Ids minted for earlier segments count as taken for later ones.
    pub fn reconcile(
        &self,
        start_id: &str,
        segments: &[String],
    ) -> Result<Vec<PlannedSegment>, AppError> {
        let minted = RefCell::new(HashSet::<String>::new());
        let mut plan = Vec::with_capacity(segments.len());
        let mut parent = start_id.to_string();

        for segment in segments {
            let taken = |id: &str| self.snapshot.contains(id) || minted.borrow().contains(id);
            let id = self.choose_id(segment, &parent, taken)?;

            let action = match self.snapshot.get(&id) {
                Some(entry) if entry.is_child_of(&parent) => SegmentAction::Reuse,
                _ => SegmentAction::Create,
            };
            if action == SegmentAction::Create {
                minted.borrow_mut().insert(id.clone());
            }
            debug!(segment = %segment, id = %id, parent = %parent, ?action, "Planned segment");

            plan.push(PlannedSegment {
                id: id.clone(),
                friendly_name: segment.clone(),
                parent_id: parent,
                action,
            });
            parent = id;
        }

        Ok(plan)
    }

    fn choose_id(
        &self,
        segment: &str,
        parent: &str,
        taken: impl Fn(&str) -> bool + Copy,
    ) -> Result<String, AppError> {
        if let Some(entry) = self.snapshot.get(segment)
            && entry.is_child_of(parent)
        {
            return Ok(segment.to_string());
        }

        let matches = self.snapshot.friendly_matches(segment);
        match matches.as_slice() {
            [] => {}
            [(id, entry)] => {
                if entry.is_child_of(parent) {
                    return Ok(id.to_string());
                }
                return self.validator.mint(taken);
            }
            many => {
                if let Some((id, _)) = many.iter().find(|(_, entry)| entry.is_child_of(parent)) {
                    return Ok(id.to_string());
                }
                if many.iter().any(|(id, _)| *id == segment) {
                    return self.validator.mint(taken);
                }
            }
        }

        self.validator.verify_name(segment, taken)
    }
}
