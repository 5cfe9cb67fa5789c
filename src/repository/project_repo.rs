use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use chrono::Utc;
use futures::stream::StreamExt;
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::IndexModel;
use tracing::{error, info, warn};

use crate::model::project::{Category, Project, ProjectStatus};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

/// Fields the list endpoint accepts sort overrides on.
const SORTABLE_FIELDS: [&str; 4] = ["createdAt", "updatedAt", "title", "year"];

/// AND-composed filter over the projects collection. Every field is
/// optional and contributes one exact-match clause; `search` becomes a
/// `$text` match against the composite index.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub category: Option<Category>,
    pub featured: Option<bool>,
    pub created_by: Option<ObjectId>,
    pub status: Option<ProjectStatus>,
    pub search: Option<String>,
}

impl ProjectFilter {
    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();
        if let Some(category) = self.category {
            filter.insert("category", category.as_str());
        }
        if let Some(featured) = self.featured {
            filter.insert("featured", featured);
        }
        if let Some(created_by) = self.created_by {
            filter.insert("createdBy", created_by);
        }
        if let Some(status) = self.status {
            filter.insert("status", status.as_str());
        }
        if let Some(ref search) = self.search {
            filter.insert("$text", doc! { "$search": search });
        }
        filter
    }
}

/// Parse a `sort` query value (`field` ascending, `-field` descending)
/// against the sortable-field whitelist. Anything else falls back to
/// newest-first.
pub fn parse_sort(spec: Option<&str>) -> Document {
    if let Some(spec) = spec {
        let (field, direction) = match spec.strip_prefix('-') {
            Some(field) => (field, -1),
            None => (spec, 1),
        };
        if SORTABLE_FIELDS.contains(&field) {
            return doc! { field: direction };
        }
        warn!("Ignoring unknown sort field: {}", field);
    }
    doc! { "createdAt": -1 }
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, project: Project) -> RepositoryResult<Project>;
    async fn find_by_id(&self, id: ObjectId) -> RepositoryResult<Option<Project>>;
    async fn update_fields(&self, id: ObjectId, fields: Document) -> RepositoryResult<Project>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    async fn list(
        &self,
        filter: &ProjectFilter,
        sort: Document,
        page: u32,
        limit: u32,
    ) -> RepositoryResult<Vec<Project>>;
    async fn count(&self, filter: &ProjectFilter) -> RepositoryResult<u64>;
    async fn set_featured(&self, id: ObjectId, featured: bool) -> RepositoryResult<Project>;
}

pub struct MongoProjectRepository {
    collection: mongodb::Collection<Project>,
}

impl MongoProjectRepository {
    pub async fn new(db: &mongodb::Database) -> Result<Self, mongodb::error::Error> {
        let collection = db.collection::<Project>("projects");

        // Composite text index backing the `search` filter
        collection
            .create_index(
                IndexModel::builder()
                    .keys(doc! {
                        "title": "text",
                        "description": "text",
                        "tags": "text",
                        "category": "text",
                    })
                    .build(),
                None,
            )
            .await?;

        Ok(MongoProjectRepository { collection })
    }
}

#[async_trait]
impl ProjectRepository for MongoProjectRepository {
    #[tracing::instrument(skip(self, project), fields(title = %project.title))]
    async fn create(&self, project: Project) -> RepositoryResult<Project> {
        let mut new_project = project;
        new_project.id = Some(ObjectId::new());
        let now = Utc::now();
        new_project.created_at = now;
        new_project.updated_at = now;
        new_project.ensure_thumbnail();

        match self.collection.insert_one(new_project.clone(), None).await {
            Ok(_) => {
                info!("Project created successfully");
                Ok(new_project)
            }
            Err(e) => {
                error!("Failed to create project: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn find_by_id(&self, id: ObjectId) -> RepositoryResult<Option<Project>> {
        let filter = doc! { "_id": id };
        let project = self.collection.find_one(filter, None).await.map_err(|e| {
            error!("Failed to fetch project by ID: {}", e);
            RepositoryError::database(format!("Failed to fetch project by ID: {}", e))
        })?;
        Ok(project)
    }

    #[tracing::instrument(skip(self, fields), fields(id = %id))]
    async fn update_fields(&self, id: ObjectId, fields: Document) -> RepositoryResult<Project> {
        let mut fields = fields;
        fields.insert("updatedAt", bson::DateTime::from_chrono(Utc::now()));

        let filter = doc! { "_id": id };
        let update = doc! { "$set": fields };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        match self
            .collection
            .find_one_and_update(filter, update, options)
            .await
        {
            Ok(Some(project)) => {
                info!("Project updated successfully for ID: {}", id);
                Ok(project)
            }
            Ok(None) => {
                error!("No project found to update for ID: {}", id);
                Err(RepositoryError::not_found(format!(
                    "No project found to update for ID: {}",
                    id
                )))
            }
            Err(e) => {
                error!("Failed to update project: {}", e);
                Err(RepositoryError::database(format!(
                    "Failed to update project: {}",
                    e
                )))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        let filter = doc! { "_id": id };
        match self.collection.delete_one(filter, None).await {
            Ok(delete_result) if delete_result.deleted_count > 0 => {
                info!("Project deleted successfully for ID: {}", id);
                Ok(())
            }
            Ok(_) => {
                error!("No project found to delete for ID: {}", id);
                Err(RepositoryError::not_found(format!(
                    "No project found to delete for ID: {}",
                    id
                )))
            }
            Err(e) => {
                error!("Failed to delete project: {}", e);
                Err(RepositoryError::database(format!(
                    "Failed to delete project: {}",
                    e
                )))
            }
        }
    }

    #[tracing::instrument(skip(self, filter, sort), fields(page = page, limit = limit))]
    async fn list(
        &self,
        filter: &ProjectFilter,
        sort: Document,
        page: u32,
        limit: u32,
    ) -> RepositoryResult<Vec<Project>> {
        let skip = (page.saturating_sub(1) as u64) * (limit as u64);
        let options = FindOptions::builder()
            .sort(sort)
            .skip(skip)
            .limit(limit as i64)
            .build();

        let cursor = self
            .collection
            .find(filter.to_document(), options)
            .await
            .map_err(|e| {
                error!("Failed to list projects: {}", e);
                RepositoryError::database(format!("Failed to list projects: {}", e))
            })?;

        let mut projects = Vec::new();
        let mut cursor = cursor;
        while let Some(project) = cursor.next().await {
            match project {
                Ok(p) => projects.push(p),
                Err(e) => {
                    error!("Failed to deserialize project: {}", e);
                    return Err(RepositoryError::serialization(format!(
                        "Failed to deserialize project: {}",
                        e
                    )));
                }
            }
        }
        info!("Fetched {} projects", projects.len());
        Ok(projects)
    }

    #[tracing::instrument(skip(self, filter))]
    async fn count(&self, filter: &ProjectFilter) -> RepositoryResult<u64> {
        let count = self
            .collection
            .count_documents(filter.to_document(), None)
            .await
            .map_err(|e| {
                error!("Failed to count projects: {}", e);
                RepositoryError::database(format!("Failed to count projects: {}", e))
            })?;
        Ok(count)
    }

    #[tracing::instrument(skip(self), fields(id = %id, featured = featured))]
    async fn set_featured(&self, id: ObjectId, featured: bool) -> RepositoryResult<Project> {
        self.update_fields(id, doc! { "featured": featured }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = ProjectFilter::default();
        assert!(filter.to_document().is_empty());
    }

    #[test]
    fn test_filters_compose_with_and_semantics() {
        let creator = ObjectId::new();
        let filter = ProjectFilter {
            category: Some(Category::Painting),
            featured: Some(true),
            created_by: Some(creator),
            status: Some(ProjectStatus::Published),
            search: None,
        };
        let doc = filter.to_document();
        assert_eq!(doc.get_str("category").unwrap(), "painting");
        assert!(doc.get_bool("featured").unwrap());
        assert_eq!(doc.get_object_id("createdBy").unwrap(), creator);
        assert_eq!(doc.get_str("status").unwrap(), "published");
        assert_eq!(doc.len(), 4);
    }

    #[test]
    fn test_search_becomes_text_clause() {
        let filter = ProjectFilter {
            search: Some("sunset sea".to_string()),
            status: Some(ProjectStatus::Published),
            ..Default::default()
        };
        let doc = filter.to_document();
        let text = doc.get_document("$text").unwrap();
        assert_eq!(text.get_str("$search").unwrap(), "sunset sea");
        // $text is AND-combined with the other clauses
        assert_eq!(doc.get_str("status").unwrap(), "published");
    }

    #[test]
    fn test_parse_sort_defaults_to_newest_first() {
        assert_eq!(parse_sort(None), doc! { "createdAt": -1 });
    }

    #[test]
    fn test_parse_sort_ascending_and_descending() {
        assert_eq!(parse_sort(Some("title")), doc! { "title": 1 });
        assert_eq!(parse_sort(Some("-year")), doc! { "year": -1 });
    }

    #[test]
    fn test_parse_sort_rejects_unknown_fields() {
        assert_eq!(parse_sort(Some("passwordHash")), doc! { "createdAt": -1 });
        assert_eq!(parse_sort(Some("-$where")), doc! { "createdAt": -1 });
    }
}
