use async_trait::async_trait;
use bson::{oid::ObjectId, Document};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::dto::project_dto::{
    total_pages, CreateProjectRequest, FeaturedResponse, ProjectListQuery, ProjectListResponse,
    ProjectResponseDto, UpdateProjectRequest, UploadedImage,
};
use crate::model::project::{Category, Project, ProjectStatus};
use crate::model::user::User;
use crate::repository::project_repo::{
    parse_sort, MongoProjectRepository, ProjectFilter, ProjectRepository,
};
use crate::repository::user_repo::{UserRepository, UserRepositoryImpl};
use crate::util::error::ServiceError;
use crate::util::jwt::Claims;
use crate::util::storage::LocalStorageService;

/// The ownership-or-admin rule shared by every mutating project endpoint.
/// Evaluated only after the project is known to exist.
pub fn can_modify_project(claims: &Claims, project: &Project) -> bool {
    claims.is_admin || claims.sub == project.created_by.to_hex()
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

#[async_trait]
pub trait ProjectService: Send + Sync {
    async fn create_project(
        &self,
        claims: &Claims,
        request: CreateProjectRequest,
        image: UploadedImage,
    ) -> Result<ProjectResponseDto, ServiceError>;
    async fn get_project(&self, id: ObjectId) -> Result<ProjectResponseDto, ServiceError>;
    async fn list_projects(
        &self,
        query: ProjectListQuery,
    ) -> Result<ProjectListResponse, ServiceError>;
    async fn update_project(
        &self,
        claims: &Claims,
        id: ObjectId,
        request: UpdateProjectRequest,
    ) -> Result<ProjectResponseDto, ServiceError>;
    async fn delete_project(&self, claims: &Claims, id: ObjectId) -> Result<(), ServiceError>;
    async fn toggle_featured(&self, id: ObjectId) -> Result<FeaturedResponse, ServiceError>;
}

pub struct ProjectServiceImpl {
    pub project_repo: MongoProjectRepository,
    pub user_repo: Arc<UserRepositoryImpl>,
    pub storage: Arc<LocalStorageService>,
}

impl ProjectServiceImpl {
    pub fn new(
        project_repo: MongoProjectRepository,
        user_repo: Arc<UserRepositoryImpl>,
        storage: Arc<LocalStorageService>,
    ) -> Self {
        Self {
            project_repo,
            user_repo,
            storage,
        }
    }

    async fn with_creator(&self, project: Project) -> Result<ProjectResponseDto, ServiceError> {
        let creator = self.user_repo.find_by_id(&project.created_by).await?;
        Ok(ProjectResponseDto::from_project(project, creator.as_ref()))
    }

    /// Compose the AND filter from raw query values. Invalid enum or id
    /// values are rejected rather than silently matching nothing.
    fn build_filter(query: &ProjectListQuery) -> Result<ProjectFilter, ServiceError> {
        let category = match query.category.as_deref() {
            Some(raw) => Some(
                raw.parse::<Category>()
                    .map_err(ServiceError::InvalidInput)?,
            ),
            None => None,
        };

        // Listing defaults to published; draft/archived require an explicit
        // status value. There is no "all statuses" option.
        let status = match query.status.as_deref() {
            Some(raw) => raw
                .parse::<ProjectStatus>()
                .map_err(ServiceError::InvalidInput)?,
            None => ProjectStatus::Published,
        };

        let created_by = match query.user_id.as_deref() {
            Some(raw) => Some(
                ObjectId::parse_str(raw)
                    .map_err(|_| ServiceError::InvalidInput("Invalid userId".to_string()))?,
            ),
            None => None,
        };

        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        Ok(ProjectFilter {
            category,
            featured: query.featured_filter(),
            created_by,
            status: Some(status),
            search,
        })
    }

    /// Turn a partial update into a `$set` document, trimming and
    /// validating as the fields go in.
    fn build_update_document(request: UpdateProjectRequest) -> Result<Document, ServiceError> {
        let mut fields = Document::new();

        if let Some(title) = request.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(ServiceError::InvalidInput(
                    "Title cannot be empty".to_string(),
                ));
            }
            fields.insert("title", title);
        }
        if let Some(description) = request.description {
            let description = description.trim().to_string();
            if description.is_empty() {
                return Err(ServiceError::InvalidInput(
                    "Description cannot be empty".to_string(),
                ));
            }
            fields.insert("description", description);
        }
        if let Some(category) = request.category {
            fields.insert("category", category.as_str());
        }
        if let Some(medium) = request.medium {
            fields.insert("medium", medium.trim().to_string());
        }
        if let Some(dimensions) = request.dimensions {
            let value = bson::to_bson(&dimensions)
                .map_err(|e| ServiceError::InternalError(e.to_string()))?;
            fields.insert("dimensions", value);
        }
        if let Some(year) = request.year {
            if !Project::is_valid_year(year) {
                return Err(ServiceError::InvalidInput(format!(
                    "Year must be between 1900 and the current year, got {}",
                    year
                )));
            }
            fields.insert("year", year);
        }
        if let Some(status) = request.status {
            fields.insert("status", status.as_str());
        }
        if let Some(tags) = request.tags {
            fields.insert("tags", tags);
        }
        if let Some(tools) = request.tools {
            fields.insert("tools", tools);
        }
        if let Some(project_url) = request.project_url {
            fields.insert("projectUrl", project_url.trim().to_string());
        }
        if let Some(collaborators) = request.collaborators {
            let value = bson::to_bson(&collaborators)
                .map_err(|e| ServiceError::InternalError(e.to_string()))?;
            fields.insert("collaborators", value);
        }

        Ok(fields)
    }
}

#[async_trait]
impl ProjectService for ProjectServiceImpl {
    #[instrument(skip(self, claims, request, image), fields(user = %claims.username, title = %request.title))]
    async fn create_project(
        &self,
        claims: &Claims,
        request: CreateProjectRequest,
        image: UploadedImage,
    ) -> Result<ProjectResponseDto, ServiceError> {
        info!("Creating new project");

        // Upload constraints are checked before the document is built; a
        // rejected file never leaves a partial project behind.
        LocalStorageService::validate(&image.content_type, image.content.len())?;

        let category = request
            .category
            .parse::<Category>()
            .map_err(ServiceError::InvalidInput)?;

        let status = match request.status.as_deref() {
            Some(raw) => raw
                .parse::<ProjectStatus>()
                .map_err(ServiceError::InvalidInput)?,
            None => ProjectStatus::default(),
        };

        let year = match request.year.as_deref() {
            Some(raw) => {
                let year = raw
                    .parse::<i32>()
                    .map_err(|_| ServiceError::InvalidInput("Invalid year".to_string()))?;
                if !Project::is_valid_year(year) {
                    return Err(ServiceError::InvalidInput(format!(
                        "Year must be between 1900 and the current year, got {}",
                        year
                    )));
                }
                Some(year)
            }
            None => None,
        };

        let created_by = ObjectId::parse_str(&claims.sub)
            .map_err(|_| ServiceError::Unauthorized("Invalid user id in token".to_string()))?;

        let image_url = self
            .storage
            .save_image(&image.filename, &image.content_type, &image.content)
            .await?;

        let now = chrono::Utc::now();
        let project = Project {
            id: None,
            title: request.title.trim().to_string(),
            description: request.description.trim().to_string(),
            image_url,
            // Filled from image_url at save time; no thumbnail pipeline
            thumbnail_url: String::new(),
            category,
            medium: request.medium.map(|m| m.trim().to_string()),
            dimensions: None,
            year,
            status,
            created_by,
            tags: request.tags.as_deref().map(split_list).unwrap_or_default(),
            tools: request.tools.as_deref().map(split_list).unwrap_or_default(),
            project_url: request.project_url,
            collaborators: Vec::new(),
            featured: false,
            created_at: now,
            updated_at: now,
        };

        let created = self.project_repo.create(project).await?;
        self.with_creator(created).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_project(&self, id: ObjectId) -> Result<ProjectResponseDto, ServiceError> {
        let project = self
            .project_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Project not found".to_string()))?;
        self.with_creator(project).await
    }

    #[instrument(skip(self, query))]
    async fn list_projects(
        &self,
        query: ProjectListQuery,
    ) -> Result<ProjectListResponse, ServiceError> {
        let filter = Self::build_filter(&query)?;
        let sort = parse_sort(query.sort.as_deref());
        let (page, limit) = query.pagination();

        let projects = self.project_repo.list(&filter, sort, page, limit).await?;
        let total = self.project_repo.count(&filter).await?;

        // Batch-resolve the owning users for the page
        let mut creator_ids: Vec<ObjectId> = projects.iter().map(|p| p.created_by).collect();
        creator_ids.sort();
        creator_ids.dedup();
        let creators: HashMap<ObjectId, User> = self
            .user_repo
            .find_by_ids(&creator_ids)
            .await?
            .into_iter()
            .filter_map(|user| user.id.map(|id| (id, user)))
            .collect();

        let projects = projects
            .into_iter()
            .map(|project| {
                let creator = creators.get(&project.created_by);
                ProjectResponseDto::from_project(project, creator)
            })
            .collect();

        Ok(ProjectListResponse {
            projects,
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        })
    }

    #[instrument(skip(self, claims, request), fields(id = %id, user = %claims.username))]
    async fn update_project(
        &self,
        claims: &Claims,
        id: ObjectId,
        request: UpdateProjectRequest,
    ) -> Result<ProjectResponseDto, ServiceError> {
        // Existence before permission: missing ids read as 404 for everyone
        let existing = self
            .project_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Project not found".to_string()))?;

        if !can_modify_project(claims, &existing) {
            error!("User {} may not modify project {}", claims.sub, id);
            return Err(ServiceError::Forbidden(
                "You do not have permission to modify this project".to_string(),
            ));
        }

        let fields = Self::build_update_document(request)?;
        if fields.is_empty() {
            return self.with_creator(existing).await;
        }

        let updated = self.project_repo.update_fields(id, fields).await?;
        info!("Project updated successfully");
        self.with_creator(updated).await
    }

    #[instrument(skip(self, claims), fields(id = %id, user = %claims.username))]
    async fn delete_project(&self, claims: &Claims, id: ObjectId) -> Result<(), ServiceError> {
        let existing = self
            .project_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Project not found".to_string()))?;

        if !can_modify_project(claims, &existing) {
            error!("User {} may not delete project {}", claims.sub, id);
            return Err(ServiceError::Forbidden(
                "You do not have permission to delete this project".to_string(),
            ));
        }

        self.project_repo.delete(id).await?;
        info!("Project deleted successfully");
        Ok(())
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn toggle_featured(&self, id: ObjectId) -> Result<FeaturedResponse, ServiceError> {
        let project = self
            .project_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Project not found".to_string()))?;

        let featured = !project.featured;
        let updated = self.project_repo.set_featured(id, featured).await?;
        info!("Project featured flag toggled to {}", updated.featured);
        Ok(FeaturedResponse {
            id: id.to_hex(),
            featured: updated.featured,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn claims(sub: &str, is_admin: bool) -> Claims {
        Claims {
            sub: sub.to_string(),
            username: "tester".to_string(),
            is_admin,
            iat: 0,
            exp: i64::MAX,
            token_type: "access".to_string(),
            jti: "jti".to_string(),
        }
    }

    fn project_owned_by(owner: ObjectId) -> Project {
        let now = Utc::now();
        Project {
            id: Some(ObjectId::new()),
            title: "Sunset".to_string(),
            description: "Oil on canvas".to_string(),
            image_url: "/uploads/a.jpg".to_string(),
            thumbnail_url: "/uploads/a.jpg".to_string(),
            category: Category::Painting,
            medium: None,
            dimensions: None,
            year: None,
            status: ProjectStatus::Published,
            created_by: owner,
            tags: vec![],
            tools: vec![],
            project_url: None,
            collaborators: vec![],
            featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_owner_can_modify() {
        let owner = ObjectId::new();
        let project = project_owned_by(owner);
        assert!(can_modify_project(&claims(&owner.to_hex(), false), &project));
    }

    #[test]
    fn test_non_owner_cannot_modify() {
        let project = project_owned_by(ObjectId::new());
        let other = ObjectId::new();
        assert!(!can_modify_project(&claims(&other.to_hex(), false), &project));
    }

    #[test]
    fn test_admin_can_modify_regardless_of_ownership() {
        let project = project_owned_by(ObjectId::new());
        let other = ObjectId::new();
        assert!(can_modify_project(&claims(&other.to_hex(), true), &project));
    }

    #[test]
    fn test_split_list_trims_and_drops_empties() {
        assert_eq!(
            split_list("sunset, sea ,, beach"),
            vec!["sunset", "sea", "beach"]
        );
        assert!(split_list("").is_empty());
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn test_build_filter_defaults_status_to_published() {
        let filter = ProjectServiceImpl::build_filter(&ProjectListQuery::default()).unwrap();
        assert_eq!(filter.status, Some(ProjectStatus::Published));
        assert!(filter.category.is_none());
        assert!(filter.featured.is_none());
        assert!(filter.created_by.is_none());
        assert!(filter.search.is_none());
    }

    #[test]
    fn test_build_filter_honors_explicit_draft_status() {
        let query = ProjectListQuery {
            status: Some("draft".to_string()),
            ..Default::default()
        };
        let filter = ProjectServiceImpl::build_filter(&query).unwrap();
        assert_eq!(filter.status, Some(ProjectStatus::Draft));
    }

    #[test]
    fn test_build_filter_rejects_invalid_category() {
        let query = ProjectListQuery {
            category: Some("watercolor".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            ProjectServiceImpl::build_filter(&query),
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_build_filter_rejects_invalid_user_id() {
        let query = ProjectListQuery {
            user_id: Some("not-an-object-id".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            ProjectServiceImpl::build_filter(&query),
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_build_filter_ignores_blank_search() {
        let query = ProjectListQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        let filter = ProjectServiceImpl::build_filter(&query).unwrap();
        assert!(filter.search.is_none());
    }

    #[test]
    fn test_build_update_document_trims_and_validates() {
        let request = UpdateProjectRequest {
            title: Some("  New title  ".to_string()),
            year: Some(2020),
            ..Default::default()
        };
        let fields = ProjectServiceImpl::build_update_document(request).unwrap();
        assert_eq!(fields.get_str("title").unwrap(), "New title");
        assert_eq!(fields.get_i32("year").unwrap(), 2020);
        assert!(!fields.contains_key("description"));
    }

    #[test]
    fn test_build_update_document_rejects_blank_title() {
        let request = UpdateProjectRequest {
            title: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            ProjectServiceImpl::build_update_document(request),
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_build_update_document_rejects_out_of_range_year() {
        let request = UpdateProjectRequest {
            year: Some(1889),
            ..Default::default()
        };
        assert!(matches!(
            ProjectServiceImpl::build_update_document(request),
            Err(ServiceError::InvalidInput(_))
        ));
    }
}
