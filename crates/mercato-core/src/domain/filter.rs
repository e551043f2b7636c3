//! Optional query filters.

/// An optional filter: either unset or an exact value.
///
/// `None` and blank strings are both "unset", so callers cannot end up with
/// two different encodings for the same meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Filter<T> {
    /// No filtering on this field.
    #[default]
    Any,
    /// Only matches this exact value.
    Exact(T),
}

impl<T> Filter<T> {
    /// Returns the exact value, if any.
    #[must_use]
    pub const fn as_exact(&self) -> Option<&T> {
        match self {
            Self::Any => None,
            Self::Exact(value) => Some(value),
        }
    }

    /// Returns true if this filter accepts `value`.
    #[must_use]
    pub fn matches(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        match self {
            Self::Any => true,
            Self::Exact(expected) => expected == value,
        }
    }

    /// Maps the exact value.
    #[must_use]
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Filter<U> {
        match self {
            Self::Any => Filter::Any,
            Self::Exact(value) => Filter::Exact(f(value)),
        }
    }
}

impl Filter<String> {
    /// Builds a text filter from an optional query parameter.
    ///
    /// The value is trimmed; blank values mean "unset".
    #[must_use]
    pub fn from_optional(value: Option<String>) -> Self {
        match value {
            Some(value) if !value.trim().is_empty() => Self::Exact(value.trim().to_string()),
            _ => Self::Any,
        }
    }
}

impl<T> From<Option<T>> for Filter<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Any, Self::Exact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_and_absent_are_both_any() {
        assert_eq!(Filter::from_optional(None), Filter::Any);
        assert_eq!(Filter::from_optional(Some(String::new())), Filter::Any);
        assert_eq!(Filter::from_optional(Some("  ".to_string())), Filter::Any);
        assert_eq!(
            Filter::from_optional(Some(" rental ".to_string())),
            Filter::Exact("rental".to_string())
        );
    }

    #[test]
    fn test_matches() {
        assert!(Filter::<u8>::Any.matches(&3));
        assert!(Filter::Exact(3).matches(&3));
        assert!(!Filter::Exact(3).matches(&4));
    }
}
