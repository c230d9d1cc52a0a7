//! Maps a user-supplied name to exactly one collection id.
//!
//! A name may be an id or a friendly name. Friendly names are not unique,
//! so resolution can fail with a disambiguation error that lists every
//! candidate for the caller to choose from.

use purview_core::error::{AppError, NameCandidate};

use crate::directory::DirectorySnapshot;

/// Resolves `name` against `snapshot`.
///
/// * no id and no friendly match: not found
/// * no id and one friendly match: that match
/// * an id with at most one friendly match: the id itself
/// * anything else is ambiguous. With `force_actual` the literal id wins
///   when it is one of the friendly matches; otherwise an
///   [`AppError::ambiguous`] error lists every friendly match.
pub fn resolve(
    name: &str,
    snapshot: &DirectorySnapshot,
    force_actual: bool,
) -> Result<String, AppError> {
    let matches = snapshot.friendly_matches(name);
    let is_id = snapshot.contains(name);

    match (is_id, matches.len()) {
        (false, 0) => Err(AppError::not_found(format!(
            "Collection '{name}' does not exist, or it exists but you cannot see it. \
             Ask for the Collection Admin role on it if it should be visible"
        ))),
        (false, 1) => Ok(matches[0].0.to_string()),
        (true, 0 | 1) => Ok(name.to_string()),
        _ => {
            if force_actual && matches.iter().any(|(id, _)| *id == name) {
                return Ok(name.to_string());
            }
            Err(AppError::ambiguous(name, candidates(name, snapshot)))
        }
    }
}

/// Like [`resolve`], but renders the outcome as text instead of failing.
pub fn describe(name: &str, snapshot: &DirectorySnapshot) -> String {
    match resolve(name, snapshot, false) {
        Ok(id) if id == name => format!("'{name}' is a collection id"),
        Ok(id) => format!("'{name}' is the friendly name of collection '{id}'"),
        Err(err) => err.message,
    }
}

/// Every collection whose friendly name is `name`.
fn candidates(name: &str, snapshot: &DirectorySnapshot) -> Vec<NameCandidate> {
    snapshot
        .friendly_matches(name)
        .into_iter()
        .filter_map(|(id, _)| snapshot.candidate(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::tests::snapshot;
    use purview_core::error::ErrorKind;

    fn directory() -> DirectorySnapshot {
        snapshot(&[
            ("contoso", "contoso", None),
            ("abc123", "Finance", Some("contoso")),
            ("sales", "Sales", Some("contoso")),
            ("xyz789", "Sales", Some("abc123")),
            ("dup", "Dup", Some("contoso")),
            ("qrs456", "dup", Some("contoso")),
            ("tuv123", "dup", Some("abc123")),
        ])
    }

    #[test]
    fn test_unknown_name_is_not_found() {
        let err = resolve("Marketing", &directory(), false).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_single_friendly_match_resolves() {
        assert_eq!(resolve("Finance", &directory(), false).unwrap(), "abc123");
    }

    #[test]
    fn test_id_resolves_to_itself() {
        assert_eq!(resolve("abc123", &directory(), false).unwrap(), "abc123");
        // Friendly names compare case-sensitively; "Sales" does not match.
        assert_eq!(resolve("sales", &directory(), false).unwrap(), "sales");
    }

    #[test]
    fn test_shared_friendly_name_is_ambiguous() {
        let err = resolve("Sales", &directory(), false).unwrap_err();
        assert_eq!(err.kind, ErrorKind::AmbiguousName);
        let ids: Vec<_> = err.candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["sales", "xyz789"]);
        assert_eq!(err.candidates[1].parent_friendly_name.as_deref(), Some("Finance"));
    }

    #[test]
    fn test_id_colliding_with_friendly_names() {
        let dir = directory();
        let err = resolve("dup", &dir, false).unwrap_err();
        assert_eq!(err.kind, ErrorKind::AmbiguousName);
        assert_eq!(err.candidates.len(), 2);

        // "dup" is labelled "Dup", so it is not one of the friendly matches.
        let err = resolve("dup", &dir, true).unwrap_err();
        assert_eq!(err.kind, ErrorKind::AmbiguousName);
        let ids: Vec<_> = err.candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["qrs456", "tuv123"]);
    }

    #[test]
    fn test_literal_id_among_duplicates() {
        let dir = snapshot(&[
            ("root", "Root", None),
            ("a", "A", Some("root")),
            ("b", "B", Some("root")),
            ("dup", "dup", Some("a")),
            ("qrs456", "dup", Some("b")),
        ]);
        let err = resolve("dup", &dir, false).unwrap_err();
        assert_eq!(err.kind, ErrorKind::AmbiguousName);
        assert_eq!(err.candidates.len(), 2);
        assert_eq!(resolve("dup", &dir, true).unwrap(), "dup");
    }

    #[test]
    fn test_force_actual_without_literal_id_still_ambiguous() {
        let err = resolve("Sales", &directory(), true).unwrap_err();
        assert_eq!(err.kind, ErrorKind::AmbiguousName);
    }

    #[test]
    fn test_not_found_mentions_collection_admin() {
        let err = resolve("Marketing", &directory(), true).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.message.contains("Collection Admin"));
    }

    #[test]
    fn test_describe_never_fails() {
        let dir = directory();
        assert!(describe("Finance", &dir).contains("abc123"));
        assert!(describe("Marketing", &dir).contains("does not exist"));
        assert!(describe("Sales", &dir).contains("xyz789"));
    }
}
