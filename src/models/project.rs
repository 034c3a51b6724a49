//! Project model and request types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Planned,
    #[serde(alias = "archive")]
    Archived,
    Annual,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Planned => "planned",
            ProjectStatus::Archived => "archived",
            ProjectStatus::Annual => "annual",
        }
    }

    /// Parse a status label. Accepts the legacy "archive" spelling.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ProjectStatus::Active),
            "planned" => Some(ProjectStatus::Planned),
            "archive" | "archived" => Some(ProjectStatus::Archived),
            "annual" => Some(ProjectStatus::Annual),
            _ => None,
        }
    }
}

/// A community project shown on the public site and managed in the back-office.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub status: ProjectStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_date: Option<NaiveDate>,
    #[serde(default)]
    pub partners: Vec<String>,
    pub show_photos: bool,
    pub show_videos: bool,
    pub show_partners: bool,
    pub show_team: bool,
    /// Published photo count, derived from media files.
    pub photo_count: i64,
    /// Published video count, derived from media files.
    pub video_count: i64,
    /// Ids of associated team members, derived from the join table.
    #[serde(default)]
    pub team_member_ids: Vec<i64>,
    pub created_at: String,
    pub updated_at: String,
    /// Internal version for optimistic concurrency control
    #[serde(default)]
    pub version: i64,
}

impl Project {
    pub fn partner_count(&self) -> i64 {
        self.partners.len() as i64
    }

    pub fn team_count(&self) -> i64 {
        self.team_member_ids.len() as i64
    }
}

/// Request body for creating a new project.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub title: String,
    /// Custom slug; derived from the title when absent.
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub status: ProjectStatus,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    #[serde(default)]
    pub partners: Option<Vec<String>>,
    #[serde(default = "default_true")]
    pub show_photos: bool,
    #[serde(default = "default_true")]
    pub show_videos: bool,
    #[serde(default = "default_true")]
    pub show_partners: bool,
    #[serde(default = "default_true")]
    pub show_team: bool,
}

fn default_true() -> bool {
    true
}

/// Request body for updating an existing project.
///
/// Absent fields keep their current value; there is no way to clear an
/// optional field through this request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    #[serde(default)]
    pub partners: Option<Vec<String>>,
    #[serde(default)]
    pub show_photos: Option<bool>,
    #[serde(default)]
    pub show_videos: Option<bool>,
    #[serde(default)]
    pub show_partners: Option<bool>,
    #[serde(default)]
    pub show_team: Option<bool>,
    /// Expected version for optimistic concurrency control
    #[serde(default)]
    pub expected_version: Option<i64>,
}

/// Request body for the team reconciler.
///
/// Member ids arrive as strings because the admin form posts raw values;
/// non-numeric entries are reported back, not fatal.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileTeamRequest {
    #[serde(default)]
    pub member_ids: Vec<String>,
}

/// Result of a team reconciliation: the updated project plus any input
/// entries that could not be parsed as member ids.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileTeamResponse {
    pub project: Project,
    pub skipped: Vec<String>,
}

/// Request body for assigning a member's role on a project.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetTeamRoleRequest {
    #[serde(default)]
    pub role: Option<String>,
}

/// Maximum title length for projects and articles.
pub const MAX_TITLE_LEN: usize = 200;

/// Validate a project/article title: required, bounded length.
pub fn validate_title(title: &str) -> Result<(), AppError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::Validation(format!(
            "Title must be at most {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(())
}

/// Validate the project date invariants: start <= end, and the event date
/// (when both bounds are present) falls within [start, end].
pub fn validate_dates(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    event: Option<NaiveDate>,
) -> Result<(), AppError> {
    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return Err(AppError::Validation(
                "Start date must not be after end date".to_string(),
            ));
        }
        if let Some(ev) = event {
            if ev < s || ev > e {
                return Err(AppError::Validation(
                    "Event date must fall within the project date range".to_string(),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_status_round_trip() {
        for s in ["active", "planned", "archived", "annual"] {
            assert_eq!(ProjectStatus::from_str(s).unwrap().as_str(), s);
        }
        // Legacy spelling maps onto the canonical one
        assert_eq!(
            ProjectStatus::from_str("archive"),
            Some(ProjectStatus::Archived)
        );
        assert_eq!(ProjectStatus::from_str("bogus"), None);
    }

    #[test]
    fn test_validate_title() {
        assert!(validate_title("Snow Maiden of the Year").is_ok());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"x".repeat(MAX_TITLE_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_dates_ordering() {
        assert!(validate_dates(Some(d("2024-01-01")), Some(d("2024-06-01")), None).is_ok());
        assert!(validate_dates(Some(d("2024-06-01")), Some(d("2024-01-01")), None).is_err());
        // Single-sided ranges are fine
        assert!(validate_dates(Some(d("2024-06-01")), None, None).is_ok());
        assert!(validate_dates(None, None, Some(d("2024-06-01"))).is_ok());
    }

    #[test]
    fn test_validate_event_within_range() {
        let start = Some(d("2024-01-01"));
        let end = Some(d("2024-06-01"));
        assert!(validate_dates(start, end, Some(d("2024-03-15"))).is_ok());
        assert!(validate_dates(start, end, Some(d("2024-01-01"))).is_ok());
        assert!(validate_dates(start, end, Some(d("2024-07-01"))).is_err());
        assert!(validate_dates(start, end, Some(d("2023-12-31"))).is_err());
    }
}
