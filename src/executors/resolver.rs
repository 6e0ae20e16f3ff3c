//! Scope selector resolution.
//!
//! Every engine operation starts by turning a selector into the id of the
//! scope it runs under. Resolution happens inside the operation's own
//! transaction, so a selector built long before execution still resolves
//! against current data.

use crate::backend::StoreTransaction;
use crate::constants::PATH_SEPARATOR;
use crate::error::{StoreError, StoreResult};
use crate::models::Scope;

/// Where an operation is anchored in the scope tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeSelector {
    /// The implicit root. It exists without a backing row and can never
    /// be deleted.
    Root,
    /// A scope previously fetched from the store, addressed by id.
    Scope(Scope),
    /// A chain of names resolved from the root, one segment per level.
    Path(Vec<String>),
}

impl ScopeSelector {
    /// Split a `/`-separated path into segments. Empty segments are
    /// dropped, so `""`, `"/"`, and `"a//b"` behave as root, root, and
    /// `a/b` respectively.
    pub fn from_path(path: &str) -> Self {
        let segments: Vec<String> = path
            .split(PATH_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .map(String::from)
            .collect();
        ScopeSelector::Path(segments)
    }

    /// Build a path selector from literal segments, without separator
    /// interpretation.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScopeSelector::Path(segments.into_iter().map(Into::into).collect())
    }

    /// Human-readable form for errors and logs.
    pub fn describe(&self) -> String {
        match self {
            ScopeSelector::Root => String::from("/"),
            ScopeSelector::Scope(scope) => scope.name.clone(),
            ScopeSelector::Path(segments) if segments.is_empty() => String::from("/"),
            ScopeSelector::Path(segments) => segments.join("/"),
        }
    }
}

/// Resolve a selector to the scope id operations run under; `None` is the
/// root.
///
/// Paths are walked one segment at a time through sibling-name lookups. A
/// segment that does not exist fails the whole operation with
/// [`StoreError::MissingScope`] carrying the full requested path.
pub(crate) async fn resolve<T: StoreTransaction>(
    tx: &mut T,
    selector: &ScopeSelector,
) -> StoreResult<Option<i64>> {
    match selector {
        ScopeSelector::Root => Ok(None),
        ScopeSelector::Scope(scope) => Ok(Some(scope.id)),
        ScopeSelector::Path(segments) => {
            let mut current: Option<i64> = None;
            for segment in segments {
                match tx.find_scope_by_name(current, segment).await? {
                    Some(scope) => current = Some(scope.id),
                    None => return Err(StoreError::missing_scope(segments.join("/"))),
                }
            }
            Ok(current)
        }
    }
}
