//! Database repository for CRUD operations.
//!
//! Uses prepared statements and transactions for data integrity. The
//! project/member association lives in a single join table; both entity
//! views are hydrated from it, so the two sides can never drift apart.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    self, Article, Category, CreateArticleRequest, CreateCategoryRequest,
    CreateGalleryItemRequest, CreateGalleryRequest, CreateMediaFileRequest, CreateMemberRequest,
    CreateProjectRequest, MediaFile, PhotoGallery, PhotoGalleryItem,
    PhotoGalleryWithItems, Project, ProjectAssignment, ProjectStatus, TeamMember,
    UpdateArticleRequest, UpdateCategoryRequest, UpdateGalleryRequest, UpdateMemberRequest,
    UpdateProjectRequest, MAX_TITLE_LEN,
};

/// Project columns plus derived published media counts.
const PROJECT_SELECT: &str = r#"
    SELECT p.id, p.title, p.slug, p.category, p.status, p.short_description,
           p.description, p.location, p.start_date, p.end_date, p.event_date,
           p.partners, p.show_photos, p.show_videos, p.show_partners, p.show_team,
           p.created_at, p.updated_at, p.version,
           (SELECT COUNT(*) FROM media_files m
             WHERE m.project_id = p.id AND m.kind = 'photo' AND m.published = 1) AS photo_count,
           (SELECT COUNT(*) FROM media_files m
             WHERE m.project_id = p.id AND m.kind = 'video' AND m.published = 1) AS video_count
      FROM projects p
"#;

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("revision_id"))
    }

    // ==================== PROJECT OPERATIONS ====================

    /// List all projects, newest first, with counts and team ids hydrated.
    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let query = format!("{PROJECT_SELECT} ORDER BY p.created_at DESC, p.id DESC");
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        let mut team: HashMap<i64, Vec<i64>> = HashMap::new();
        let join_rows =
            sqlx::query("SELECT project_id, member_id FROM project_members ORDER BY member_id")
                .fetch_all(&self.pool)
                .await?;
        for row in join_rows {
            team.entry(row.get("project_id"))
                .or_default()
                .push(row.get("member_id"));
        }

        Ok(rows
            .iter()
            .map(|row| {
                let mut project = project_from_row(row);
                project.team_member_ids = team.remove(&project.id).unwrap_or_default();
                project
            })
            .collect())
    }

    /// Get a project by ID.
    pub async fn get_project(&self, id: i64) -> Result<Option<Project>, AppError> {
        let query = format!("{PROJECT_SELECT} WHERE p.id = ?");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let mut project = project_from_row(&row);
                project.team_member_ids = self.team_member_ids(project.id).await?;
                Ok(Some(project))
            }
            None => Ok(None),
        }
    }

    /// Get a project by its public slug.
    pub async fn get_project_by_slug(&self, slug: &str) -> Result<Option<Project>, AppError> {
        let query = format!("{PROJECT_SELECT} WHERE p.slug = ?");
        let row = sqlx::query(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let mut project = project_from_row(&row);
                project.team_member_ids = self.team_member_ids(project.id).await?;
                Ok(Some(project))
            }
            None => Ok(None),
        }
    }

    async fn team_member_ids(&self, project_id: i64) -> Result<Vec<i64>, AppError> {
        let rows = sqlx::query(
            "SELECT member_id FROM project_members WHERE project_id = ? ORDER BY member_id",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(|r| r.get("member_id")).collect())
    }

    /// Create a new project. Validation runs before any mutation.
    pub async fn create_project(&self, request: &CreateProjectRequest) -> Result<Project, AppError> {
        models::validate_title(&request.title)?;
        models::validate_dates(request.start_date, request.end_date, request.event_date)?;
        let slug = resolve_slug(request.slug.as_deref(), &request.title)?;

        let now = Utc::now().to_rfc3339();
        let partners = request.partners.clone().unwrap_or_default();
        let partners_json = serde_json::to_string(&partners).unwrap_or_default();

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"INSERT INTO projects (
                title, slug, category, status, short_description, description,
                location, start_date, end_date, event_date, partners,
                show_photos, show_videos, show_partners, show_team,
                created_at, updated_at, version
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1)"#,
        )
        .bind(request.title.trim())
        .bind(&slug)
        .bind(&request.category)
        .bind(request.status.as_str())
        .bind(&request.short_description)
        .bind(&request.description)
        .bind(&request.location)
        .bind(request.start_date.map(|d| d.to_string()))
        .bind(request.end_date.map(|d| d.to_string()))
        .bind(request.event_date.map(|d| d.to_string()))
        .bind(&partners_json)
        .bind(request.show_photos as i32)
        .bind(request.show_videos as i32)
        .bind(request.show_partners as i32)
        .bind(request.show_team as i32)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, &format!("Slug '{}' is already in use", slug)))?;

        bump_revision(&mut tx, &now).await?;
        tx.commit().await?;

        let id = result.last_insert_rowid();
        self.get_project(id)
            .await?
            .ok_or_else(|| AppError::Internal("Created project not found".to_string()))
    }

    /// Update a project with optimistic concurrency control.
    pub async fn update_project(
        &self,
        id: i64,
        request: &UpdateProjectRequest,
    ) -> Result<Project, AppError> {
        let existing = self
            .get_project(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", id)))?;

        if let Some(expected) = request.expected_version {
            if existing.version != expected {
                return Err(AppError::VersionMismatch {
                    message: format!(
                        "Version mismatch: expected {}, current {}",
                        expected, existing.version
                    ),
                    current_version: existing.version,
                });
            }
        }

        let title = request.title.clone().unwrap_or(existing.title.clone());
        models::validate_title(&title)?;

        let slug = match &request.slug {
            Some(s) => {
                if !models::slug::is_valid(s) {
                    return Err(AppError::Validation(format!("Invalid slug '{}'", s)));
                }
                s.clone()
            }
            None => existing.slug.clone(),
        };

        let start_date = request.start_date.or(existing.start_date);
        let end_date = request.end_date.or(existing.end_date);
        let event_date = request.event_date.or(existing.event_date);
        models::validate_dates(start_date, end_date, event_date)?;

        let category = request.category.clone().or(existing.category.clone());
        let status = request.status.unwrap_or(existing.status);
        let short_description = request
            .short_description
            .clone()
            .or(existing.short_description.clone());
        let description = request.description.clone().or(existing.description.clone());
        let location = request.location.clone().or(existing.location.clone());
        let partners = request.partners.clone().unwrap_or(existing.partners.clone());
        let partners_json = serde_json::to_string(&partners).unwrap_or_default();
        let show_photos = request.show_photos.unwrap_or(existing.show_photos);
        let show_videos = request.show_videos.unwrap_or(existing.show_videos);
        let show_partners = request.show_partners.unwrap_or(existing.show_partners);
        let show_team = request.show_team.unwrap_or(existing.show_team);

        let now = Utc::now().to_rfc3339();
        let new_version = existing.version + 1;

        let mut tx = self.pool.begin().await?;

        // Conditional UPDATE with version check to prevent race conditions
        let result = sqlx::query(
            r#"UPDATE projects SET
                title = ?, slug = ?, category = ?, status = ?,
                short_description = ?, description = ?, location = ?,
                start_date = ?, end_date = ?, event_date = ?, partners = ?,
                show_photos = ?, show_videos = ?, show_partners = ?, show_team = ?,
                updated_at = ?, version = ?
            WHERE id = ? AND version = ?"#,
        )
        .bind(title.trim())
        .bind(&slug)
        .bind(&category)
        .bind(status.as_str())
        .bind(&short_description)
        .bind(&description)
        .bind(&location)
        .bind(start_date.map(|d| d.to_string()))
        .bind(end_date.map(|d| d.to_string()))
        .bind(event_date.map(|d| d.to_string()))
        .bind(&partners_json)
        .bind(show_photos as i32)
        .bind(show_videos as i32)
        .bind(show_partners as i32)
        .bind(show_team as i32)
        .bind(&now)
        .bind(new_version)
        .bind(id)
        .bind(existing.version)
        .execute(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, &format!("Slug '{}' is already in use", slug)))?;

        if result.rows_affected() == 0 {
            // Race condition - version changed between read and write
            let current = self.get_project(id).await?;
            return Err(AppError::VersionMismatch {
                message: "Concurrent modification detected".to_string(),
                current_version: current.map(|p| p.version).unwrap_or(0),
            });
        }

        bump_revision(&mut tx, &now).await?;
        tx.commit().await?;

        self.get_project(id)
            .await?
            .ok_or_else(|| AppError::Internal("Updated project not found".to_string()))
    }

    /// Delete a project. Join rows and media cascade.
    pub async fn delete_project(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Project {} not found", id)));
        }

        bump_revision(&mut tx, &Utc::now().to_rfc3339()).await?;
        tx.commit().await?;
        Ok(())
    }

    // ==================== TEAM RECONCILIATION ====================

    /// Make a project's team match exactly the target member set.
    ///
    /// Raw ids that do not parse as integers are collected and reported, not
    /// fatal. Parsed ids that do not resolve to an existing member abort the
    /// whole call with no partial effects. Removal and addition run in one
    /// transaction; a second call with the same target set is a no-op.
    pub async fn reconcile_team(
        &self,
        project_id: i64,
        raw_member_ids: &[String],
    ) -> Result<(Project, Vec<String>), AppError> {
        let mut target: Vec<i64> = Vec::new();
        let mut skipped: Vec<String> = Vec::new();
        for raw in raw_member_ids {
            match raw.trim().parse::<i64>() {
                Ok(id) => {
                    if !target.contains(&id) {
                        target.push(id);
                    }
                }
                Err(_) => skipped.push(raw.clone()),
            }
        }

        let mut tx = self.pool.begin().await?;

        let project_row = sqlx::query("SELECT id FROM projects WHERE id = ?")
            .bind(project_id)
            .fetch_optional(&mut *tx)
            .await?;
        if project_row.is_none() {
            return Err(AppError::NotFound(format!(
                "Project {} not found",
                project_id
            )));
        }

        // Every target id must resolve before anything is touched.
        for member_id in &target {
            let row = sqlx::query("SELECT id FROM team_members WHERE id = ?")
                .bind(member_id)
                .fetch_optional(&mut *tx)
                .await?;
            if row.is_none() {
                return Err(AppError::NotFound(format!(
                    "Team member {} not found",
                    member_id
                )));
            }
        }

        // Remove stale associations.
        let removed = if target.is_empty() {
            sqlx::query("DELETE FROM project_members WHERE project_id = ?")
                .bind(project_id)
                .execute(&mut *tx)
                .await?
                .rows_affected()
        } else {
            let placeholders = vec!["?"; target.len()].join(", ");
            let query = format!(
                "DELETE FROM project_members WHERE project_id = ? AND member_id NOT IN ({placeholders})"
            );
            let mut q = sqlx::query(&query).bind(project_id);
            for member_id in &target {
                q = q.bind(member_id);
            }
            q.execute(&mut *tx).await?.rows_affected()
        };

        // Add missing associations. Retained rows keep their role.
        let mut added = 0;
        for member_id in &target {
            let result = sqlx::query(
                "INSERT OR IGNORE INTO project_members (project_id, member_id) VALUES (?, ?)",
            )
            .bind(project_id)
            .bind(member_id)
            .execute(&mut *tx)
            .await?;
            added += result.rows_affected();
        }

        if removed > 0 || added > 0 {
            let now = Utc::now().to_rfc3339();
            sqlx::query("UPDATE projects SET updated_at = ?, version = version + 1 WHERE id = ?")
                .bind(&now)
                .bind(project_id)
                .execute(&mut *tx)
                .await?;
            bump_revision(&mut tx, &now).await?;
        }

        tx.commit().await?;

        let project = self
            .get_project(project_id)
            .await?
            .ok_or_else(|| AppError::Internal("Reconciled project not found".to_string()))?;
        Ok((project, skipped))
    }

    /// Set a member's role on a project they are already assigned to.
    pub async fn set_team_role(
        &self,
        project_id: i64,
        member_id: i64,
        role: Option<&str>,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let result =
            sqlx::query("UPDATE project_members SET role = ? WHERE project_id = ? AND member_id = ?")
                .bind(role)
                .bind(project_id)
                .bind(member_id)
                .execute(&mut *tx)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Member {} is not on the team of project {}",
                member_id, project_id
            )));
        }

        bump_revision(&mut tx, &Utc::now().to_rfc3339()).await?;
        tx.commit().await?;
        Ok(())
    }

    // ==================== MEDIA OPERATIONS ====================

    /// Attach a media file to a project.
    pub async fn attach_media(
        &self,
        project_id: i64,
        request: &CreateMediaFileRequest,
    ) -> Result<MediaFile, AppError> {
        if request.path.trim().is_empty() {
            return Err(AppError::Validation("Media path is required".to_string()));
        }
        let project = self.get_project(project_id).await?;
        if project.is_none() {
            return Err(AppError::NotFound(format!(
                "Project {} not found",
                project_id
            )));
        }

        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"INSERT INTO media_files (project_id, kind, path, caption, published, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(project_id)
        .bind(request.kind.as_str())
        .bind(&request.path)
        .bind(&request.caption)
        .bind(request.published as i32)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        bump_revision(&mut tx, &now).await?;
        tx.commit().await?;

        Ok(MediaFile {
            id: result.last_insert_rowid(),
            project_id: Some(project_id),
            kind: request.kind,
            path: request.path.clone(),
            caption: request.caption.clone(),
            published: request.published,
            created_at: now,
        })
    }

    /// Delete a media file.
    pub async fn delete_media(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM media_files WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Media file {} not found", id)));
        }

        bump_revision(&mut tx, &Utc::now().to_rfc3339()).await?;
        tx.commit().await?;
        Ok(())
    }

    // ==================== MEMBER OPERATIONS ====================

    /// List team members ordered by sort order then name.
    pub async fn list_members(&self, include_inactive: bool) -> Result<Vec<TeamMember>, AppError> {
        let query = if include_inactive {
            "SELECT id, full_name, position, bio, email, phone, active, sort_order,
                    created_at, updated_at, version
               FROM team_members ORDER BY sort_order, full_name"
        } else {
            "SELECT id, full_name, position, bio, email, phone, active, sort_order,
                    created_at, updated_at, version
               FROM team_members WHERE active = 1 ORDER BY sort_order, full_name"
        };
        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let mut assignments: HashMap<i64, Vec<ProjectAssignment>> = HashMap::new();
        let join_rows = sqlx::query(
            "SELECT project_id, member_id, role FROM project_members ORDER BY project_id",
        )
        .fetch_all(&self.pool)
        .await?;
        for row in join_rows {
            assignments
                .entry(row.get("member_id"))
                .or_default()
                .push(ProjectAssignment {
                    project_id: row.get("project_id"),
                    role: row.get("role"),
                });
        }

        Ok(rows
            .iter()
            .map(|row| {
                let mut member = member_from_row(row);
                member.assignments = assignments.remove(&member.id).unwrap_or_default();
                member
            })
            .collect())
    }

    /// Get a member by ID.
    pub async fn get_member(&self, id: i64) -> Result<Option<TeamMember>, AppError> {
        let row = sqlx::query(
            "SELECT id, full_name, position, bio, email, phone, active, sort_order,
                    created_at, updated_at, version
               FROM team_members WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let mut member = member_from_row(&row);
                let join_rows = sqlx::query(
                    "SELECT project_id, role FROM project_members WHERE member_id = ? ORDER BY project_id",
                )
                .bind(id)
                .fetch_all(&self.pool)
                .await?;
                member.assignments = join_rows
                    .iter()
                    .map(|r| ProjectAssignment {
                        project_id: r.get("project_id"),
                        role: r.get("role"),
                    })
                    .collect();
                Ok(Some(member))
            }
            None => Ok(None),
        }
    }

    /// Create a new team member.
    pub async fn create_member(&self, request: &CreateMemberRequest) -> Result<TeamMember, AppError> {
        let name = request.full_name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Full name is required".to_string()));
        }
        if name.chars().count() > 120 {
            return Err(AppError::Validation(
                "Full name must be at most 120 characters".to_string(),
            ));
        }

        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"INSERT INTO team_members (full_name, position, bio, email, phone, active,
                                         sort_order, created_at, updated_at, version)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 1)"#,
        )
        .bind(name)
        .bind(&request.position)
        .bind(&request.bio)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(request.active as i32)
        .bind(request.sort_order)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        bump_revision(&mut tx, &now).await?;
        tx.commit().await?;

        Ok(TeamMember {
            id: result.last_insert_rowid(),
            full_name: name.to_string(),
            position: request.position.clone(),
            bio: request.bio.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            active: request.active,
            sort_order: request.sort_order,
            assignments: vec![],
            created_at: now.clone(),
            updated_at: now,
            version: 1,
        })
    }

    /// Update a member with optimistic concurrency control.
    pub async fn update_member(
        &self,
        id: i64,
        request: &UpdateMemberRequest,
    ) -> Result<TeamMember, AppError> {
        let existing = self
            .get_member(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team member {} not found", id)))?;

        if let Some(expected) = request.expected_version {
            if existing.version != expected {
                return Err(AppError::VersionMismatch {
                    message: format!(
                        "Version mismatch: expected {}, current {}",
                        expected, existing.version
                    ),
                    current_version: existing.version,
                });
            }
        }

        let full_name = request.full_name.clone().unwrap_or(existing.full_name.clone());
        if full_name.trim().is_empty() {
            return Err(AppError::Validation("Full name is required".to_string()));
        }
        let position = request.position.clone().or(existing.position.clone());
        let bio = request.bio.clone().or(existing.bio.clone());
        let email = request.email.clone().or(existing.email.clone());
        let phone = request.phone.clone().or(existing.phone.clone());
        let active = request.active.unwrap_or(existing.active);
        let sort_order = request.sort_order.unwrap_or(existing.sort_order);

        let now = Utc::now().to_rfc3339();
        let new_version = existing.version + 1;

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"UPDATE team_members SET full_name = ?, position = ?, bio = ?, email = ?,
                phone = ?, active = ?, sort_order = ?, updated_at = ?, version = ?
            WHERE id = ? AND version = ?"#,
        )
        .bind(full_name.trim())
        .bind(&position)
        .bind(&bio)
        .bind(&email)
        .bind(&phone)
        .bind(active as i32)
        .bind(sort_order)
        .bind(&now)
        .bind(new_version)
        .bind(id)
        .bind(existing.version)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            let current = self.get_member(id).await?;
            return Err(AppError::VersionMismatch {
                message: "Concurrent modification detected".to_string(),
                current_version: current.map(|m| m.version).unwrap_or(0),
            });
        }

        bump_revision(&mut tx, &now).await?;
        tx.commit().await?;

        Ok(TeamMember {
            id,
            full_name: full_name.trim().to_string(),
            position,
            bio,
            email,
            phone,
            active,
            sort_order,
            assignments: existing.assignments,
            created_at: existing.created_at,
            updated_at: now,
            version: new_version,
        })
    }

    /// Delete a member. Join rows cascade.
    pub async fn delete_member(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM team_members WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Team member {} not found", id)));
        }

        bump_revision(&mut tx, &Utc::now().to_rfc3339()).await?;
        tx.commit().await?;
        Ok(())
    }

    // ==================== CATEGORY OPERATIONS ====================

    /// List all categories ordered by name.
    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let rows = sqlx::query("SELECT id, name, created_at FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(category_from_row).collect())
    }

    /// Create a category. The normalized-name uniqueness check runs inside
    /// the write transaction so duplicate spellings cannot race past it.
    pub async fn create_category(&self, request: &CreateCategoryRequest) -> Result<Category, AppError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Category name is required".to_string()));
        }
        let normalized = models::category::normalize(name);

        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query("SELECT id FROM categories WHERE normalized = ?")
            .bind(&normalized)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_some() {
            return Err(AppError::Conflict(format!(
                "Category '{}' already exists",
                name
            )));
        }

        let now = Utc::now().to_rfc3339();
        let result =
            sqlx::query("INSERT INTO categories (name, normalized, created_at) VALUES (?, ?, ?)")
                .bind(name)
                .bind(&normalized)
                .bind(&now)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    conflict_on_unique(e, &format!("Category '{}' already exists", name))
                })?;

        bump_revision(&mut tx, &now).await?;
        tx.commit().await?;

        Ok(Category {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            created_at: now,
        })
    }

    /// Rename a category.
    pub async fn update_category(
        &self,
        id: i64,
        request: &UpdateCategoryRequest,
    ) -> Result<Category, AppError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Category name is required".to_string()));
        }
        let normalized = models::category::normalize(name);

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT id, name, created_at FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        };
        let existing = category_from_row(&row);

        let duplicate = sqlx::query("SELECT id FROM categories WHERE normalized = ? AND id != ?")
            .bind(&normalized)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if duplicate.is_some() {
            return Err(AppError::Conflict(format!(
                "Category '{}' already exists",
                name
            )));
        }

        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE categories SET name = ?, normalized = ? WHERE id = ?")
            .bind(name)
            .bind(&normalized)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| conflict_on_unique(e, &format!("Category '{}' already exists", name)))?;

        bump_revision(&mut tx, &now).await?;
        tx.commit().await?;

        Ok(Category {
            id,
            name: name.to_string(),
            created_at: existing.created_at,
        })
    }

    /// Delete a category. Projects keep their label; the namespace entry goes.
    pub async fn delete_category(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }

        bump_revision(&mut tx, &Utc::now().to_rfc3339()).await?;
        tx.commit().await?;
        Ok(())
    }

    // ==================== GALLERY OPERATIONS ====================

    /// List galleries, newest first.
    pub async fn list_galleries(&self, published_only: bool) -> Result<Vec<PhotoGallery>, AppError> {
        let query = if published_only {
            "SELECT g.id, g.title, g.category, g.published, g.created_at, g.updated_at,
                    (SELECT COUNT(*) FROM gallery_items i WHERE i.gallery_id = g.id) AS item_count
               FROM galleries g WHERE g.published = 1 ORDER BY g.created_at DESC, g.id DESC"
        } else {
            "SELECT g.id, g.title, g.category, g.published, g.created_at, g.updated_at,
                    (SELECT COUNT(*) FROM gallery_items i WHERE i.gallery_id = g.id) AS item_count
               FROM galleries g ORDER BY g.created_at DESC, g.id DESC"
        };
        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(gallery_from_row).collect())
    }

    /// Get a gallery with its ordered items.
    pub async fn get_gallery(&self, id: i64) -> Result<Option<PhotoGalleryWithItems>, AppError> {
        let row = sqlx::query(
            "SELECT g.id, g.title, g.category, g.published, g.created_at, g.updated_at,
                    (SELECT COUNT(*) FROM gallery_items i WHERE i.gallery_id = g.id) AS item_count
               FROM galleries g WHERE g.id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let gallery = gallery_from_row(&row);

        let item_rows = sqlx::query(
            "SELECT id, gallery_id, media_path, caption, sort_order, created_at
               FROM gallery_items WHERE gallery_id = ? ORDER BY sort_order, id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(PhotoGalleryWithItems {
            gallery,
            items: item_rows.iter().map(gallery_item_from_row).collect(),
        }))
    }

    /// Create a gallery.
    pub async fn create_gallery(&self, request: &CreateGalleryRequest) -> Result<PhotoGallery, AppError> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }

        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "INSERT INTO galleries (title, category, published, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(title)
        .bind(&request.category)
        .bind(request.published as i32)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        bump_revision(&mut tx, &now).await?;
        tx.commit().await?;

        Ok(PhotoGallery {
            id: result.last_insert_rowid(),
            title: title.to_string(),
            category: request.category.clone(),
            published: request.published,
            item_count: 0,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Update a gallery.
    pub async fn update_gallery(
        &self,
        id: i64,
        request: &UpdateGalleryRequest,
    ) -> Result<PhotoGallery, AppError> {
        let existing = self
            .get_gallery(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Gallery {} not found", id)))?
            .gallery;

        let title = request.title.clone().unwrap_or(existing.title.clone());
        if title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        let category = request.category.clone().or(existing.category.clone());
        let published = request.published.unwrap_or(existing.published);

        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "UPDATE galleries SET title = ?, category = ?, published = ?, updated_at = ? WHERE id = ?",
        )
        .bind(title.trim())
        .bind(&category)
        .bind(published as i32)
        .bind(&now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        bump_revision(&mut tx, &now).await?;
        tx.commit().await?;

        Ok(PhotoGallery {
            id,
            title: title.trim().to_string(),
            category,
            published,
            item_count: existing.item_count,
            created_at: existing.created_at,
            updated_at: now,
        })
    }

    /// Delete a gallery. Items cascade.
    pub async fn delete_gallery(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM galleries WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Gallery {} not found", id)));
        }

        bump_revision(&mut tx, &Utc::now().to_rfc3339()).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Add an item to a gallery.
    pub async fn add_gallery_item(
        &self,
        gallery_id: i64,
        request: &CreateGalleryItemRequest,
    ) -> Result<PhotoGalleryItem, AppError> {
        if request.media_path.trim().is_empty() {
            return Err(AppError::Validation("Media path is required".to_string()));
        }
        let gallery = sqlx::query("SELECT id FROM galleries WHERE id = ?")
            .bind(gallery_id)
            .fetch_optional(&self.pool)
            .await?;
        if gallery.is_none() {
            return Err(AppError::NotFound(format!(
                "Gallery {} not found",
                gallery_id
            )));
        }

        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "INSERT INTO gallery_items (gallery_id, media_path, caption, sort_order, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(gallery_id)
        .bind(&request.media_path)
        .bind(&request.caption)
        .bind(request.sort_order)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        bump_revision(&mut tx, &now).await?;
        tx.commit().await?;

        Ok(PhotoGalleryItem {
            id: result.last_insert_rowid(),
            gallery_id,
            media_path: request.media_path.clone(),
            caption: request.caption.clone(),
            sort_order: request.sort_order,
            created_at: now,
        })
    }

    /// Delete a gallery item.
    pub async fn delete_gallery_item(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM gallery_items WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Gallery item {} not found", id)));
        }

        bump_revision(&mut tx, &Utc::now().to_rfc3339()).await?;
        tx.commit().await?;
        Ok(())
    }

    // ==================== ARTICLE OPERATIONS ====================

    /// List articles, newest first.
    pub async fn list_articles(&self, published_only: bool) -> Result<Vec<Article>, AppError> {
        let query = if published_only {
            "SELECT id, title, slug, summary, body, published, created_at, updated_at, version
               FROM articles WHERE published = 1 ORDER BY created_at DESC, id DESC"
        } else {
            "SELECT id, title, slug, summary, body, published, created_at, updated_at, version
               FROM articles ORDER BY created_at DESC, id DESC"
        };
        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(article_from_row).collect())
    }

    /// Get an article by ID.
    pub async fn get_article(&self, id: i64) -> Result<Option<Article>, AppError> {
        let row = sqlx::query(
            "SELECT id, title, slug, summary, body, published, created_at, updated_at, version
               FROM articles WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(article_from_row))
    }

    /// Get an article by its public slug.
    pub async fn get_article_by_slug(&self, slug: &str) -> Result<Option<Article>, AppError> {
        let row = sqlx::query(
            "SELECT id, title, slug, summary, body, published, created_at, updated_at, version
               FROM articles WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(article_from_row))
    }

    /// Create an article.
    pub async fn create_article(&self, request: &CreateArticleRequest) -> Result<Article, AppError> {
        models::validate_title(&request.title)?;
        let slug = resolve_slug(request.slug.as_deref(), &request.title)?;

        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"INSERT INTO articles (title, slug, summary, body, published,
                                     created_at, updated_at, version)
               VALUES (?, ?, ?, ?, ?, ?, ?, 1)"#,
        )
        .bind(request.title.trim())
        .bind(&slug)
        .bind(&request.summary)
        .bind(&request.body)
        .bind(request.published as i32)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, &format!("Slug '{}' is already in use", slug)))?;

        bump_revision(&mut tx, &now).await?;
        tx.commit().await?;

        Ok(Article {
            id: result.last_insert_rowid(),
            title: request.title.trim().to_string(),
            slug,
            summary: request.summary.clone(),
            body: request.body.clone(),
            published: request.published,
            created_at: now.clone(),
            updated_at: now,
            version: 1,
        })
    }

    /// Update an article with optimistic concurrency control.
    pub async fn update_article(
        &self,
        id: i64,
        request: &UpdateArticleRequest,
    ) -> Result<Article, AppError> {
        let existing = self
            .get_article(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Article {} not found", id)))?;

        if let Some(expected) = request.expected_version {
            if existing.version != expected {
                return Err(AppError::VersionMismatch {
                    message: format!(
                        "Version mismatch: expected {}, current {}",
                        expected, existing.version
                    ),
                    current_version: existing.version,
                });
            }
        }

        let title = request.title.clone().unwrap_or(existing.title.clone());
        models::validate_title(&title)?;
        let slug = match &request.slug {
            Some(s) => {
                if !models::slug::is_valid(s) {
                    return Err(AppError::Validation(format!("Invalid slug '{}'", s)));
                }
                s.clone()
            }
            None => existing.slug.clone(),
        };
        let summary = request.summary.clone().or(existing.summary.clone());
        let body = request.body.clone().or(existing.body.clone());
        let published = request.published.unwrap_or(existing.published);

        let now = Utc::now().to_rfc3339();
        let new_version = existing.version + 1;

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"UPDATE articles SET title = ?, slug = ?, summary = ?, body = ?,
                published = ?, updated_at = ?, version = ?
            WHERE id = ? AND version = ?"#,
        )
        .bind(title.trim())
        .bind(&slug)
        .bind(&summary)
        .bind(&body)
        .bind(published as i32)
        .bind(&now)
        .bind(new_version)
        .bind(id)
        .bind(existing.version)
        .execute(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, &format!("Slug '{}' is already in use", slug)))?;

        if result.rows_affected() == 0 {
            let current = self.get_article(id).await?;
            return Err(AppError::VersionMismatch {
                message: "Concurrent modification detected".to_string(),
                current_version: current.map(|a| a.version).unwrap_or(0),
            });
        }

        bump_revision(&mut tx, &now).await?;
        tx.commit().await?;

        Ok(Article {
            id,
            title: title.trim().to_string(),
            slug,
            summary,
            body,
            published,
            created_at: existing.created_at,
            updated_at: now,
            version: new_version,
        })
    }

    /// Delete an article.
    pub async fn delete_article(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Article {} not found", id)));
        }

        bump_revision(&mut tx, &Utc::now().to_rfc3339()).await?;
        tx.commit().await?;
        Ok(())
    }
}

/// Bump the revision counter inside the caller's write transaction, so the
/// content change and the new revision commit (or roll back) together.
async fn bump_revision(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    now: &str,
) -> Result<(), AppError> {
    sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
        .bind(now)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Use the caller's slug when given (validated), otherwise derive one from
/// the title.
fn resolve_slug(slug: Option<&str>, title: &str) -> Result<String, AppError> {
    match slug {
        Some(s) => {
            if !models::slug::is_valid(s) {
                return Err(AppError::Validation(format!("Invalid slug '{}'", s)));
            }
            Ok(s.to_string())
        }
        None => {
            let derived = models::slug::slugify(title);
            if derived.is_empty() {
                return Err(AppError::Validation(
                    "Cannot derive a slug from the title; provide one explicitly".to_string(),
                ));
            }
            if derived.chars().count() > MAX_TITLE_LEN {
                return Err(AppError::Validation("Slug is too long".to_string()));
            }
            Ok(derived)
        }
    }
}

/// Map a unique-constraint violation onto a Conflict, pass everything else on.
fn conflict_on_unique(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => err.into(),
    }
}

// Helper functions for row conversion

fn parse_date(s: Option<String>) -> Option<NaiveDate> {
    s.and_then(|s| s.parse().ok())
}

fn project_from_row(row: &sqlx::sqlite::SqliteRow) -> Project {
    let status: String = row.get("status");
    let partners_str: Option<String> = row.get("partners");
    let show_photos: i32 = row.get("show_photos");
    let show_videos: i32 = row.get("show_videos");
    let show_partners: i32 = row.get("show_partners");
    let show_team: i32 = row.get("show_team");

    Project {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        category: row.get("category"),
        status: ProjectStatus::from_str(&status).unwrap_or(ProjectStatus::Active),
        short_description: row.get("short_description"),
        description: row.get("description"),
        location: row.get("location"),
        start_date: parse_date(row.get("start_date")),
        end_date: parse_date(row.get("end_date")),
        event_date: parse_date(row.get("event_date")),
        partners: partners_str
            .map(|s| serde_json::from_str(&s).unwrap_or_default())
            .unwrap_or_default(),
        show_photos: show_photos != 0,
        show_videos: show_videos != 0,
        show_partners: show_partners != 0,
        show_team: show_team != 0,
        photo_count: row.get("photo_count"),
        video_count: row.get("video_count"),
        team_member_ids: vec![],
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        version: row.get("version"),
    }
}

fn member_from_row(row: &sqlx::sqlite::SqliteRow) -> TeamMember {
    let active: i32 = row.get("active");
    TeamMember {
        id: row.get("id"),
        full_name: row.get("full_name"),
        position: row.get("position"),
        bio: row.get("bio"),
        email: row.get("email"),
        phone: row.get("phone"),
        active: active != 0,
        sort_order: row.get("sort_order"),
        assignments: vec![],
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        version: row.get("version"),
    }
}

fn category_from_row(row: &sqlx::sqlite::SqliteRow) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    }
}

fn gallery_from_row(row: &sqlx::sqlite::SqliteRow) -> PhotoGallery {
    let published: i32 = row.get("published");
    PhotoGallery {
        id: row.get("id"),
        title: row.get("title"),
        category: row.get("category"),
        published: published != 0,
        item_count: row.get("item_count"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn gallery_item_from_row(row: &sqlx::sqlite::SqliteRow) -> PhotoGalleryItem {
    PhotoGalleryItem {
        id: row.get("id"),
        gallery_id: row.get("gallery_id"),
        media_path: row.get("media_path"),
        caption: row.get("caption"),
        sort_order: row.get("sort_order"),
        created_at: row.get("created_at"),
    }
}

fn article_from_row(row: &sqlx::sqlite::SqliteRow) -> Article {
    let published: i32 = row.get("published");
    Article {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        summary: row.get("summary"),
        body: row.get("body"),
        published: published != 0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        version: row.get("version"),
    }
}
