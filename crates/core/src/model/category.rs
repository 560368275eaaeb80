use std::fmt;

use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CategoryError {
    #[error("category name cannot be empty")]
    EmptyName,
}

//
// ─── CATEGORY NAME ─────────────────────────────────────────────────────────────
//

/// A category identifier with case-insensitive identity.
///
/// The name is normalized once at construction: trimmed and lower-cased.
/// The normalized form is the storage key; capitalization is purely a
/// display concern (`display_name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryName {
    key: String,
}

impl CategoryName {
    /// Creates a normalized category name.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::EmptyName` if the name is empty or
    /// whitespace-only.
    pub fn new(name: impl Into<String>) -> Result<Self, CategoryError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CategoryError::EmptyName);
        }

        Ok(Self {
            key: trimmed.to_lowercase(),
        })
    }

    /// The normalized (lower-cased) storage key.
    #[must_use]
    pub fn as_key(&self) -> &str {
        &self.key
    }

    /// Display form: first character upper-cased, rest as stored.
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut chars = self.key.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_rejects_empty_input() {
        let err = CategoryName::new("   ").unwrap_err();
        assert_eq!(err, CategoryError::EmptyName);
    }

    #[test]
    fn name_normalizes_case_and_whitespace() {
        let name = CategoryName::new("  LiNuX  ").unwrap();
        assert_eq!(name.as_key(), "linux");
    }

    #[test]
    fn names_with_different_casing_are_equal() {
        let a = CategoryName::new("Linux").unwrap();
        let b = CategoryName::new("LINUX").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn display_name_capitalizes_first_letter() {
        let name = CategoryName::new("geography").unwrap();
        assert_eq!(name.display_name(), "Geography");
        assert_eq!(name.to_string(), "Geography");
    }

    #[test]
    fn names_order_by_key() {
        let mut names = vec![
            CategoryName::new("Python").unwrap(),
            CategoryName::new("chess").unwrap(),
            CategoryName::new("Linux").unwrap(),
        ];
        names.sort();
        let keys: Vec<&str> = names.iter().map(CategoryName::as_key).collect();
        assert_eq!(keys, ["chess", "linux", "python"]);
    }
}
