//! Project filter predicate and sort order.
//!
//! `ProjectFilter` is a request-scoped value object: every field is optional,
//! present fields are AND-combined, absent fields match everything. The
//! evaluation is pure and in-memory so it can be unit-tested in isolation;
//! the repository loads the ordered candidate set and `paging` slices the
//! filtered sequence.

use chrono::NaiveDate;

use super::category;
use super::project::{Project, ProjectStatus};

/// Which project date the range filter compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectDateField {
    #[default]
    Start,
    End,
    Event,
    Created,
}

impl ProjectDateField {
    /// Parse a field label, falling back to the default on unknown input.
    pub fn parse(s: &str) -> Self {
        match s {
            "end" => ProjectDateField::End,
            "event" => ProjectDateField::Event,
            "created" => ProjectDateField::Created,
            _ => ProjectDateField::Start,
        }
    }
}

/// Optional filter criteria for project listings.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub category: Option<String>,
    pub status: Option<ProjectStatus>,
    /// Case-insensitive substring against title and descriptions.
    pub search: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub date_field: ProjectDateField,
    /// Case-insensitive substring against location.
    pub location: Option<String>,
    pub min_photos: Option<i64>,
    pub min_videos: Option<i64>,
    pub min_partners: Option<i64>,
    pub min_team: Option<i64>,
}

impl ProjectFilter {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.status.is_none()
            && self.search.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.location.is_none()
            && self.min_photos.is_none()
            && self.min_videos.is_none()
            && self.min_partners.is_none()
            && self.min_team.is_none()
    }

    /// Decide whether a single project matches this filter.
    ///
    /// An inverted range (from > to) is applied as given and matches nothing;
    /// rejecting it up front is the caller's job.
    pub fn matches(&self, project: &Project) -> bool {
        self.matches_category(project)
            && self.matches_status(project)
            && self.matches_search(project)
            && self.matches_date_range(project)
            && self.matches_location(project)
            && self.matches_content_counts(project)
    }

    fn matches_category(&self, project: &Project) -> bool {
        match &self.category {
            None => true,
            Some(wanted) => match &project.category {
                Some(have) => category::normalize(have) == category::normalize(wanted),
                None => false,
            },
        }
    }

    fn matches_status(&self, project: &Project) -> bool {
        match self.status {
            None => true,
            Some(status) => project.status == status,
        }
    }

    fn matches_search(&self, project: &Project) -> bool {
        let Some(term) = &self.search else {
            return true;
        };
        let term = term.to_lowercase();
        if term.is_empty() {
            return true;
        }
        let haystacks = [
            Some(project.title.as_str()),
            project.short_description.as_deref(),
            project.description.as_deref(),
        ];
        haystacks
            .iter()
            .flatten()
            .any(|h| h.to_lowercase().contains(&term))
    }

    fn matches_date_range(&self, project: &Project) -> bool {
        if self.date_from.is_none() && self.date_to.is_none() {
            return true;
        }
        let date = match self.date_field {
            ProjectDateField::Start => project.start_date,
            ProjectDateField::End => project.end_date,
            ProjectDateField::Event => project.event_date,
            ProjectDateField::Created => project
                .created_at
                .get(..10)
                .and_then(|s| s.parse::<NaiveDate>().ok()),
        };
        // A bounded filter cannot match a project missing that date.
        let Some(date) = date else {
            return false;
        };
        if let Some(from) = self.date_from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if date > to {
                return false;
            }
        }
        true
    }

    fn matches_location(&self, project: &Project) -> bool {
        match &self.location {
            None => true,
            Some(wanted) => match &project.location {
                Some(have) => have.to_lowercase().contains(&wanted.to_lowercase()),
                None => false,
            },
        }
    }

    fn matches_content_counts(&self, project: &Project) -> bool {
        if let Some(min) = self.min_photos {
            if project.photo_count < min {
                return false;
            }
        }
        if let Some(min) = self.min_videos {
            if project.video_count < min {
                return false;
            }
        }
        if let Some(min) = self.min_partners {
            if project.partner_count() < min {
                return false;
            }
        }
        if let Some(min) = self.min_team {
            if project.team_count() < min {
                return false;
            }
        }
        true
    }
}

/// Sort field for project listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectSortField {
    #[default]
    CreatedAt,
    Title,
    StartDate,
}

/// Sort order applied before pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectSort {
    pub field: ProjectSortField,
    pub descending: bool,
}

impl Default for ProjectSort {
    fn default() -> Self {
        // Newest first is what the public listing shows.
        Self {
            field: ProjectSortField::CreatedAt,
            descending: true,
        }
    }
}

impl ProjectSort {
    /// Parse sort/order labels leniently: unknown values fall back to the
    /// default instead of erroring. The two parameters are independent, so
    /// an explicit order applies even when the sort field is defaulted.
    pub fn parse(sort: Option<&str>, order: Option<&str>) -> Self {
        let field = match sort {
            Some("title") => ProjectSortField::Title,
            Some("startDate") | Some("start_date") => ProjectSortField::StartDate,
            _ => ProjectSortField::CreatedAt,
        };
        let descending = match order {
            Some("asc") => false,
            Some("desc") => true,
            // Titles read naturally ascending; dates newest-first.
            _ => field != ProjectSortField::Title,
        };
        Self { field, descending }
    }

    /// Sort projects in place.
    pub fn apply(&self, projects: &mut [Project]) {
        match self.field {
            ProjectSortField::CreatedAt => {
                projects.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            }
            ProjectSortField::Title => {
                projects.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
            }
            ProjectSortField::StartDate => {
                // Projects without a start date sort last in either direction.
                let descending = self.descending;
                projects.sort_by(|a, b| match (a.start_date, b.start_date) {
                    (Some(x), Some(y)) => {
                        if descending {
                            y.cmp(&x)
                        } else {
                            x.cmp(&y)
                        }
                    }
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                });
                return;
            }
        }
        if self.descending {
            projects.reverse();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(title: &str, category: Option<&str>) -> Project {
        Project {
            id: 1,
            title: title.to_string(),
            slug: crate::models::slug::slugify(title),
            category: category.map(|c| c.to_string()),
            status: ProjectStatus::Active,
            short_description: None,
            description: None,
            location: None,
            start_date: None,
            end_date: None,
            event_date: None,
            partners: vec![],
            show_photos: true,
            show_videos: true,
            show_partners: true,
            show_team: true,
            photo_count: 0,
            video_count: 0,
            team_member_ids: vec![],
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
            updated_at: "2024-01-01T00:00:00+00:00".to_string(),
            version: 1,
        }
    }

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = ProjectFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&project("Anything", None)));
        assert!(filter.matches(&project("", Some("festival"))));
    }

    #[test]
    fn test_category_and_search_combination() {
        let p = project("Snow Maiden of the Year", Some("festival"));

        let filter = ProjectFilter {
            category: Some("festival".to_string()),
            search: Some("snow".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&p));

        let other = ProjectFilter {
            category: Some("workshop".to_string()),
            ..Default::default()
        };
        assert!(!other.matches(&p));
    }

    #[test]
    fn test_category_is_normalized_on_both_sides() {
        let p = project("Fair", Some("  Summer  Camp "));
        let filter = ProjectFilter {
            category: Some("summer camp".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&p));

        // Project without a category never matches a category filter
        let filter = ProjectFilter {
            category: Some("festival".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&project("Fair", None)));
    }

    #[test]
    fn test_status_exact_match() {
        let mut p = project("Fair", None);
        p.status = ProjectStatus::Planned;
        let filter = ProjectFilter {
            status: Some(ProjectStatus::Planned),
            ..Default::default()
        };
        assert!(filter.matches(&p));
        p.status = ProjectStatus::Archived;
        assert!(!filter.matches(&p));
    }

    #[test]
    fn test_search_covers_descriptions() {
        let mut p = project("Winter Fair", None);
        p.short_description = Some("An OUTDOOR market".to_string());
        p.description = Some("With local crafts".to_string());

        for term in ["winter", "outdoor", "CRAFTS"] {
            let filter = ProjectFilter {
                search: Some(term.to_string()),
                ..Default::default()
            };
            assert!(filter.matches(&p), "term {:?}", term);
        }

        let filter = ProjectFilter {
            search: Some("concert".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&p));
    }

    #[test]
    fn test_date_range_inclusive_bounds() {
        let mut p = project("Fair", None);
        p.start_date = Some(d("2024-03-15"));

        let filter = ProjectFilter {
            date_from: Some(d("2024-03-15")),
            date_to: Some(d("2024-03-15")),
            ..Default::default()
        };
        assert!(filter.matches(&p));

        let filter = ProjectFilter {
            date_from: Some(d("2024-03-16")),
            ..Default::default()
        };
        assert!(!filter.matches(&p));
    }

    #[test]
    fn test_date_range_configurable_field() {
        let mut p = project("Fair", None);
        p.event_date = Some(d("2024-06-01"));

        let filter = ProjectFilter {
            date_from: Some(d("2024-05-01")),
            date_to: Some(d("2024-07-01")),
            date_field: ProjectDateField::Event,
            ..Default::default()
        };
        assert!(filter.matches(&p));

        // Same bounds against the start date: the project has none, so a
        // bounded filter cannot match.
        let filter = ProjectFilter {
            date_from: Some(d("2024-05-01")),
            date_to: Some(d("2024-07-01")),
            date_field: ProjectDateField::Start,
            ..Default::default()
        };
        assert!(!filter.matches(&p));
    }

    #[test]
    fn test_inverted_date_range_matches_nothing() {
        let mut p = project("Fair", None);
        p.start_date = Some(d("2024-03-15"));
        let filter = ProjectFilter {
            date_from: Some(d("2024-06-01")),
            date_to: Some(d("2024-01-01")),
            ..Default::default()
        };
        assert!(!filter.matches(&p));
    }

    #[test]
    fn test_created_date_field() {
        let p = project("Fair", None); // created 2024-01-01
        let filter = ProjectFilter {
            date_from: Some(d("2024-01-01")),
            date_to: Some(d("2024-01-01")),
            date_field: ProjectDateField::Created,
            ..Default::default()
        };
        assert!(filter.matches(&p));
    }

    #[test]
    fn test_location_substring() {
        let mut p = project("Fair", None);
        p.location = Some("Riverside Park, Springfield".to_string());
        let filter = ProjectFilter {
            location: Some("springfield".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&p));

        let filter = ProjectFilter {
            location: Some("downtown".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&p));
    }

    #[test]
    fn test_content_count_thresholds() {
        let mut p = project("Fair", None);
        p.photo_count = 5;
        p.video_count = 1;
        p.partners = vec!["Library".to_string(), "School".to_string()];
        p.team_member_ids = vec![10, 11, 12];

        let filter = ProjectFilter {
            min_photos: Some(5),
            min_videos: Some(1),
            min_partners: Some(2),
            min_team: Some(3),
            ..Default::default()
        };
        assert!(filter.matches(&p));

        let filter = ProjectFilter {
            min_photos: Some(6),
            ..Default::default()
        };
        assert!(!filter.matches(&p));
    }

    #[test]
    fn test_combined_filters_and_semantics() {
        let mut p = project("Snow Maiden of the Year", Some("festival"));
        p.location = Some("Springfield".to_string());
        p.photo_count = 3;

        // Each sub-filter alone matches...
        let singles = [
            ProjectFilter {
                category: Some("festival".to_string()),
                ..Default::default()
            },
            ProjectFilter {
                search: Some("snow".to_string()),
                ..Default::default()
            },
            ProjectFilter {
                location: Some("spring".to_string()),
                ..Default::default()
            },
            ProjectFilter {
                min_photos: Some(3),
                ..Default::default()
            },
        ];
        for f in &singles {
            assert!(f.matches(&p));
        }

        // ...and so does their conjunction.
        let combined = ProjectFilter {
            category: Some("festival".to_string()),
            search: Some("snow".to_string()),
            location: Some("spring".to_string()),
            min_photos: Some(3),
            ..Default::default()
        };
        assert!(combined.matches(&p));

        // One failing sub-filter fails the conjunction.
        let combined = ProjectFilter {
            category: Some("festival".to_string()),
            min_photos: Some(10),
            ..Default::default()
        };
        assert!(!combined.matches(&p));
    }

    #[test]
    fn test_sort_parse_fallback() {
        assert_eq!(ProjectSort::parse(None, None), ProjectSort::default());
        assert_eq!(
            ProjectSort::parse(Some("bogus"), None),
            ProjectSort::default()
        );
        let s = ProjectSort::parse(Some("title"), None);
        assert_eq!(s.field, ProjectSortField::Title);
        assert!(!s.descending);
        let s = ProjectSort::parse(Some("startDate"), Some("asc"));
        assert_eq!(s.field, ProjectSortField::StartDate);
        assert!(!s.descending);
    }

    #[test]
    fn test_sort_order_applies_without_sort_field() {
        // An explicit order flips the defaulted field instead of being dropped
        let s = ProjectSort::parse(None, Some("asc"));
        assert_eq!(s.field, ProjectSortField::CreatedAt);
        assert!(!s.descending);

        let s = ProjectSort::parse(Some("bogus"), Some("asc"));
        assert_eq!(s.field, ProjectSortField::CreatedAt);
        assert!(!s.descending);

        let s = ProjectSort::parse(Some("title"), Some("desc"));
        assert_eq!(s.field, ProjectSortField::Title);
        assert!(s.descending);
    }

    #[test]
    fn test_sort_apply() {
        let mut a = project("Beta", None);
        a.created_at = "2024-02-01T00:00:00+00:00".to_string();
        let mut b = project("alpha", None);
        b.created_at = "2024-01-01T00:00:00+00:00".to_string();
        let mut c = project("Gamma", None);
        c.created_at = "2024-03-01T00:00:00+00:00".to_string();
        c.start_date = Some(d("2024-05-01"));

        let mut projects = vec![a, b, c];
        ProjectSort::default().apply(&mut projects);
        assert_eq!(projects[0].title, "Gamma");
        assert_eq!(projects[2].title, "alpha");

        ProjectSort {
            field: ProjectSortField::Title,
            descending: false,
        }
        .apply(&mut projects);
        assert_eq!(projects[0].title, "alpha");
        assert_eq!(projects[1].title, "Beta");

        // Missing start dates sort last regardless of direction
        ProjectSort {
            field: ProjectSortField::StartDate,
            descending: true,
        }
        .apply(&mut projects);
        assert_eq!(projects[0].title, "Gamma");
    }
}
