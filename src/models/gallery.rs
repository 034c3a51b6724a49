//! Photo gallery and media file models.
//!
//! Media rows carry paths and metadata only; physical file storage is
//! handled outside this service.

use serde::{Deserialize, Serialize};

/// A photo gallery shown on the public site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoGallery {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub published: bool,
    /// Number of items, derived at read time.
    pub item_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// A single photo within a gallery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoGalleryItem {
    pub id: i64,
    pub gallery_id: i64,
    pub media_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub sort_order: i64,
    pub created_at: String,
}

/// Gallery together with its ordered items, for the detail endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoGalleryWithItems {
    #[serde(flatten)]
    pub gallery: PhotoGallery,
    pub items: Vec<PhotoGalleryItem>,
}

/// Request body for creating a gallery.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGalleryRequest {
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub published: bool,
}

/// Request body for updating a gallery.
///
/// Absent fields keep their current value; there is no way to clear an
/// optional field through this request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGalleryRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub published: Option<bool>,
}

/// Request body for adding an item to a gallery.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGalleryItemRequest {
    pub media_path: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
}

/// Kind of media attached to a project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
    Document,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Document => "document",
        }
    }

}

/// A media file attached to a project. Published photo/video rows feed the
/// project's content counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    pub kind: MediaKind,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub published: bool,
    pub created_at: String,
}

/// Request body for attaching a media file to a project.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMediaFileRequest {
    pub kind: MediaKind,
    pub path: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default = "default_published")]
    pub published: bool,
}

fn default_published() -> bool {
    true
}
