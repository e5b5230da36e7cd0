//! Three-state attribute reads.

use serde::{Deserialize, Deserializer};

/// How an attribute appeared in the configuration.
#[derive(Debug, PartialEq, Eq)]
pub enum Attr<'a, T> {
    /// The key was not written at all.
    Absent,
    /// The key was written with an explicit null (`key: ~`).
    Null,
    Value(&'a T),
}

impl<T> Clone for Attr<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Attr<'_, T> {}

impl<'a, T> Attr<'a, T> {
    pub fn value(self) -> Option<&'a T> {
        match self {
            Attr::Value(v) => Some(v),
            Attr::Absent | Attr::Null => None,
        }
    }

    pub fn is_absent(self) -> bool {
        matches!(self, Attr::Absent)
    }
}

/// Read access over `Option<Option<T>>` attribute slots.
pub trait Presence<T> {
    fn attr(&self) -> Attr<'_, T>;

    /// Set to a non-null value.
    fn is_set(&self) -> bool {
        self.attr().value().is_some()
    }
}

impl<T> Presence<T> for Option<Option<T>> {
    fn attr(&self) -> Attr<'_, T> {
        match self {
            None => Attr::Absent,
            Some(None) => Attr::Null,
            Some(Some(v)) => Attr::Value(v),
        }
    }
}

/// Serde adapter: a key that is present always deserializes to `Some`, so an
/// explicit null becomes `Some(None)` instead of collapsing into absence.
pub(crate) fn explicit<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Shorthand for a slot holding a value.
pub fn set<T>(value: T) -> Option<Option<T>> {
    Some(Some(value))
}
