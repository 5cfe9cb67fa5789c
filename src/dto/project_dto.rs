use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::user_dto::PublicUserDto;
use crate::model::project::{Category, Collaborator, Dimensions, Project, ProjectStatus};
use crate::model::user::User;

/// A single image received through the multipart `image` field.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

/// Text fields of the multipart create request. Comma-separated list
/// fields mirror the original form encoding.
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 5000))]
    pub description: String,

    pub category: String,

    #[validate(length(max = 100))]
    pub medium: Option<String>,

    pub year: Option<String>,

    pub status: Option<String>,

    #[validate(url)]
    pub project_url: Option<String>,

    /// Comma-separated tag list
    pub tags: Option<String>,

    /// Comma-separated tool list
    pub tools: Option<String>,
}

/// Partial update payload for PATCH. Absent fields are left untouched;
/// `createdBy` and `featured` are not updatable here.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 5000))]
    pub description: Option<String>,

    pub category: Option<Category>,

    #[validate(length(max = 100))]
    pub medium: Option<String>,

    pub dimensions: Option<Dimensions>,

    pub year: Option<i32>,

    pub status: Option<ProjectStatus>,

    pub tags: Option<Vec<String>>,

    pub tools: Option<Vec<String>>,

    #[validate(url)]
    pub project_url: Option<String>,

    pub collaborators: Option<Vec<Collaborator>>,
}

/// Raw query parameters of the list endpoint. Kept as strings so absent,
/// present and malformed values can be told apart when the filter is
/// composed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectListQuery {
    pub category: Option<String>,
    pub featured: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 12;

impl ProjectListQuery {
    /// `page` defaults to 1, `limit` to 12; junk values fall back to the
    /// defaults rather than failing the request.
    pub fn pagination(&self) -> (u32, u32) {
        let page = self
            .page
            .as_deref()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(DEFAULT_PAGE);
        let limit = self
            .limit
            .as_deref()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|l| *l >= 1)
            .unwrap_or(DEFAULT_LIMIT);
        (page, limit)
    }

    /// Only the literal string "true" opts into the featured filter; any
    /// other value means "no filter", never "featured = false".
    pub fn featured_filter(&self) -> Option<bool> {
        match self.featured.as_deref() {
            Some("true") => Some(true),
            _ => None,
        }
    }
}

pub fn total_pages(total: u64, limit: u32) -> u64 {
    let limit = limit.max(1) as u64;
    (total + limit - 1) / limit
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponseDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub thumbnail_url: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub status: ProjectStatus,
    /// Expanded public view of the owning user; None when the creator no
    /// longer resolves.
    pub created_by: Option<PublicUserDto>,
    pub tags: Vec<String>,
    pub tools: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_url: Option<String>,
    pub collaborators: Vec<Collaborator>,
    pub featured: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl ProjectResponseDto {
    pub fn from_project(project: Project, creator: Option<&User>) -> Self {
        ProjectResponseDto {
            id: project.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: project.title,
            description: project.description,
            image_url: project.image_url,
            thumbnail_url: project.thumbnail_url,
            category: project.category,
            medium: project.medium,
            dimensions: project.dimensions,
            year: project.year,
            status: project.status,
            created_by: creator.map(PublicUserDto::from),
            tags: project.tags,
            tools: project.tools,
            project_url: project.project_url,
            collaborators: project.collaborators,
            featured: project.featured,
            created_at: project.created_at.to_rfc3339(),
            updated_at: project.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectResponseDto>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeaturedResponse {
    pub id: String,
    pub featured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let query = ProjectListQuery::default();
        assert_eq!(query.pagination(), (1, 12));
    }

    #[test]
    fn test_pagination_junk_falls_back() {
        let query = ProjectListQuery {
            page: Some("zero".to_string()),
            limit: Some("-3".to_string()),
            ..Default::default()
        };
        assert_eq!(query.pagination(), (1, 12));

        let query = ProjectListQuery {
            page: Some("0".to_string()),
            limit: Some("0".to_string()),
            ..Default::default()
        };
        assert_eq!(query.pagination(), (1, 12));
    }

    #[test]
    fn test_pagination_explicit_values() {
        let query = ProjectListQuery {
            page: Some("3".to_string()),
            limit: Some("24".to_string()),
            ..Default::default()
        };
        assert_eq!(query.pagination(), (3, 24));
    }

    #[test]
    fn test_featured_only_literal_true_filters() {
        let mut query = ProjectListQuery::default();
        assert_eq!(query.featured_filter(), None);

        query.featured = Some("true".to_string());
        assert_eq!(query.featured_filter(), Some(true));

        // "false", "1", "TRUE" are all "no filter", never featured=false
        for junk in ["false", "1", "TRUE", ""] {
            query.featured = Some(junk.to_string());
            assert_eq!(query.featured_filter(), None);
        }
    }

    #[test]
    fn test_total_pages_is_ceiling_division() {
        assert_eq!(total_pages(0, 12), 0);
        assert_eq!(total_pages(1, 12), 1);
        assert_eq!(total_pages(12, 12), 1);
        assert_eq!(total_pages(13, 12), 2);
        assert_eq!(total_pages(25, 12), 3);
    }

    #[test]
    fn test_update_request_rejects_immutable_fields() {
        let err = serde_json::from_str::<UpdateProjectRequest>(r#"{"createdBy": "someone"}"#);
        assert!(err.is_err());
        let err = serde_json::from_str::<UpdateProjectRequest>(r#"{"featured": true}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_update_request_partial_parse() {
        let req: UpdateProjectRequest =
            serde_json::from_str(r#"{"title": "New title", "year": 2020}"#).unwrap();
        assert_eq!(req.title.as_deref(), Some("New title"));
        assert_eq!(req.year, Some(2020));
        assert!(req.description.is_none());
        assert!(req.status.is_none());
    }
}
