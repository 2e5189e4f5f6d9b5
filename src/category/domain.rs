//! Core category domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::CategoryId};

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty
    /// invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated hex color such as `#1a2b3c`, used as a display hint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryColor(String);

impl CategoryColor {
    /// Create a category color from a hex string.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::InvalidColor] if `color` is not a
    /// `#` followed by six hex digits.
    pub fn new(color: &str) -> Result<Self, Error> {
        let color = color.trim();
        let is_hex_color = color.len() == 7
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit());

        if is_hex_color {
            Ok(Self(color.to_ascii_lowercase()))
        } else {
            Err(Error::InvalidColor(color.to_string()))
        }
    }

    /// Create a category color without validation.
    ///
    /// The caller should ensure that the string is a valid hex color.
    pub fn new_unchecked(color: &str) -> Self {
        Self(color.to_string())
    }
}

impl AsRef<str> for CategoryColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A spending category (e.g., 'Groceries', 'Rent').
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The id of the category.
    pub id: CategoryId,
    /// The display name. Unique across categories.
    pub name: CategoryName,
    /// The display color.
    pub color: CategoryColor,
    /// An optional free-form description.
    pub description: Option<String>,
    /// When the category was created.
    pub created_at: OffsetDateTime,
    /// When the category was last modified, if ever.
    pub updated_at: Option<OffsetDateTime>,
}

/// Form data for category creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryFormData {
    /// The display name.
    pub name: String,
    /// The display color as a hex string.
    pub color: String,
    /// An optional free-form description.
    pub description: Option<String>,
}


#[cfg(test)]
mod category_color_tests {
    use crate::{Error, category::CategoryColor};

    #[test]
    fn new_succeeds_on_hex_color() {
        let color = CategoryColor::new("#00FF00").unwrap();

        assert_eq!(color.as_ref(), "#00ff00");
    }

    #[test]
    fn new_fails_on_missing_hash() {
        let color = CategoryColor::new("00ff00");

        assert_eq!(color, Err(Error::InvalidColor("00ff00".to_string())));
    }

    #[test]
    fn new_fails_on_non_hex_digits() {
        let color = CategoryColor::new("#00gg00");

        assert_eq!(color, Err(Error::InvalidColor("#00gg00".to_string())));
    }

    #[test]
    fn new_fails_on_wrong_length() {
        let color = CategoryColor::new("#fff");

        assert_eq!(color, Err(Error::InvalidColor("#fff".to_string())));
    }
}
