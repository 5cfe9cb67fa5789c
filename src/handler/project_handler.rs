use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use bson::oid::ObjectId;
use serde_json::json;
use tracing::{debug, error, info};
use validator::Validate;

use crate::app::AppState;
use crate::dto::project_dto::{CreateProjectRequest, ProjectListQuery, UpdateProjectRequest, UploadedImage};
use crate::service::project_service::ProjectService;
use crate::util::error::HandlerError;
use crate::util::jwt::Claims;

fn parse_project_id(id: &str) -> Result<ObjectId, HandlerError> {
    ObjectId::parse_str(id).map_err(|_| HandlerError::bad_request("Invalid project id"))
}

// Handler: List Projects (public)
pub async fn list_projects_handler(
    State(state): State<AppState>,
    Query(query): Query<ProjectListQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let result = state
        .project_service
        .list_projects(query)
        .await
        .map_err(|e| HandlerError::from_service(e, !state.config.is_production()))?;
    Ok(Json(result))
}

// Handler: Get Project (public)
pub async fn get_project_handler(
    State(state): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_project_id(&id)?;
    let project = state
        .project_service
        .get_project(id)
        .await
        .map_err(|e| HandlerError::from_service(e, !state.config.is_production()))?;
    Ok(Json(project))
}

// Handler: Create Project (authenticated, multipart with one image field)
pub async fn create_project_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HandlerError> {
    info!("[create_project_handler] Handler called");
    let mut form = CreateProjectRequest::default();
    let mut image: Option<UploadedImage> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!("[create_project_handler] Error getting next field: {}", e);
        HandlerError::bad_request(format!("Failed to read multipart field: {}", e))
    })? {
        let name = field.name().unwrap_or_default().to_string();
        debug!("[create_project_handler] Processing field: {}", name);

        if name == "image" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let data = field.bytes().await.map_err(|e| {
                error!("[create_project_handler] Failed to read image field: {}", e);
                HandlerError::bad_request(format!("Failed to read image field: {}", e))
            })?;
            info!(
                "[create_project_handler] Received image: {} ({} bytes)",
                filename,
                data.len()
            );
            image = Some(UploadedImage {
                filename,
                content_type,
                content: data.to_vec(),
            });
            continue;
        }

        let value = field.text().await.map_err(|e| {
            error!("[create_project_handler] Failed to read field {}: {}", name, e);
            HandlerError::bad_request(format!("Failed to read field {}: {}", name, e))
        })?;
        match name.as_str() {
            "title" => form.title = value,
            "description" => form.description = value,
            "category" => form.category = value,
            "medium" => form.medium = Some(value),
            "year" => form.year = Some(value),
            "status" => form.status = Some(value),
            "projectUrl" => form.project_url = Some(value),
            "tags" => form.tags = Some(value),
            "tools" => form.tools = Some(value),
            _ => debug!("[create_project_handler] Ignoring unknown field: {}", name),
        }
    }

    if let Err(e) = form.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }

    let image = image.ok_or_else(|| HandlerError::bad_request("Please upload an image"))?;

    let created = state
        .project_service
        .create_project(&claims, form, image)
        .await
        .map_err(|e| HandlerError::from_service(e, !state.config.is_production()))?;

    Ok((StatusCode::CREATED, Json(created)))
}

// Handler: Update Project (authenticated; owner or admin)
pub async fn update_project_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((id,)): Path<(String,)>,
    Json(payload): Json<UpdateProjectRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_project_id(&id)?;
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let updated = state
        .project_service
        .update_project(&claims, id, payload)
        .await
        .map_err(|e| HandlerError::from_service(e, !state.config.is_production()))?;
    Ok(Json(updated))
}

// Handler: Delete Project (authenticated; owner or admin)
pub async fn delete_project_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_project_id(&id)?;
    state
        .project_service
        .delete_project(&claims, id)
        .await
        .map_err(|e| HandlerError::from_service(e, !state.config.is_production()))?;
    Ok(Json(json!({ "message": "Project deleted successfully" })))
}

// Handler: Toggle Featured (admin only)
pub async fn toggle_featured_handler(
    State(state): State<AppState>,
    Path((id,)): Path<(String,)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_project_id(&id)?;
    let result = state
        .project_service
        .toggle_featured(id)
        .await
        .map_err(|e| HandlerError::from_service(e, !state.config.is_production()))?;
    Ok(Json(result))
}
