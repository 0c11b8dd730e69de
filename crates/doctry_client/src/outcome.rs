//! Tagged outcome for try-style operations.

/// The outcome of a try-style operation.
///
/// Expected-failure cases are explicit variants rather than a bare
/// `Option`, so "the store absorbed an expected failure" is
/// distinguishable from "the value is genuinely absent" at the type
/// level. Read, delete, and replace absorb [`TryOutcome::NotFound`];
/// create absorbs [`TryOutcome::Conflict`]. No single operation can
/// produce both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryOutcome<T> {
    /// The operation succeeded with a result.
    Found(T),
    /// The target document does not exist in the store.
    NotFound,
    /// A document with the same id already exists in the store.
    Conflict,
}

impl<T> TryOutcome<T> {
    /// Returns true if the operation succeeded.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns true if the store reported the document as absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Returns true if the store reported a duplicate.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict)
    }

    /// Consumes the outcome, returning the result if found.
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            _ => None,
        }
    }

    /// Returns a reference to the result if found.
    pub fn as_found(&self) -> Option<&T> {
        match self {
            Self::Found(value) => Some(value),
            _ => None,
        }
    }

    /// Maps the found value, preserving the absorbed variants.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> TryOutcome<U> {
        match self {
            Self::Found(value) => TryOutcome::Found(f(value)),
            Self::NotFound => TryOutcome::NotFound,
            Self::Conflict => TryOutcome::Conflict,
        }
    }

    /// Collapses the outcome to the null-style shape: `Some` on success,
    /// `None` for either absorbed case.
    pub fn into_option(self) -> Option<T> {
        self.found()
    }
}
