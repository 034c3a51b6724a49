//! Category model and name normalization.
//!
//! Categories are free-text labels shared across projects, galleries and
//! articles. Uniqueness is enforced on the normalized form inside the write
//! transaction, so two differently-spelled duplicates cannot race past each
//! other.

use serde::{Deserialize, Serialize};

/// A content category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

/// Request body for creating a category.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// Request body for renaming a category.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    pub name: String,
}

/// Normalize a category label for comparison: trim, lowercase, collapse
/// internal whitespace runs into single spaces.
pub fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Festival "), "festival");
        assert_eq!(normalize("Youth   Workshop"), "youth workshop");
        assert_eq!(normalize("FESTIVAL"), "festival");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_equates_spelling_variants() {
        assert_eq!(normalize("Summer  Camp"), normalize(" summer camp "));
    }
}
