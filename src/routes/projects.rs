use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    auth::AuthUser,
    error::AppError,
    models::project::{CreateProjectRequest, Project, UpdateProjectRequest},
    response::ApiResponse,
};

const PROJECT_COLUMNS: &str =
    "id, team_id, created_by, title, description, is_archived, created_at, updated_at";

async fn fetch_project(pool: &PgPool, project_id: i64) -> Result<Option<Project>, AppError> {
    let project = sqlx::query_as::<_, Project>(&format!(
        "SELECT {} FROM projects WHERE id = $1",
        PROJECT_COLUMNS
    ))
    .bind(project_id)
    .fetch_optional(pool)
    .await?;

    Ok(project)
}

/// Projects created by the authenticated user, newest first.
#[get("")]
pub async fn get_projects(
    pool: web::Data<PgPool>,
    user: AuthUser,
) -> Result<impl Responder, AppError> {
    let projects = sqlx::query_as::<_, Project>(&format!(
        "SELECT {} FROM projects WHERE created_by = $1 ORDER BY created_at DESC",
        PROJECT_COLUMNS
    ))
    .bind(user.id)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_data(
        projects,
        "Projects retrieved successfully",
    )))
}

#[post("")]
pub async fn create_project(
    pool: web::Data<PgPool>,
    user: AuthUser,
    project_data: web::Json<CreateProjectRequest>,
) -> Result<impl Responder, AppError> {
    project_data.validate()?;
    let project_data = project_data.into_inner();

    let project = sqlx::query_as::<_, Project>(&format!(
        "INSERT INTO projects (title, description, team_id, created_by) \
         VALUES ($1, $2, $3, $4) \
         RETURNING {}",
        PROJECT_COLUMNS
    ))
    .bind(&project_data.title)
    .bind(&project_data.description)
    .bind(project_data.team_id)
    .bind(user.id)
    .fetch_one(&**pool)
    .await?;

    log::info!("Project created: {}", project.id);

    Ok(HttpResponse::Created().json(ApiResponse::with_data(
        project,
        "Project created successfully",
    )))
}

#[get("/{id:\\d+}")]
pub async fn get_project(
    pool: web::Data<PgPool>,
    user: AuthUser,
    project_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let project = fetch_project(&pool, project_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

    if project.created_by != Some(user.id) {
        return Err(AppError::Forbidden(
            "Unauthorized to view this project".into(),
        ));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::with_data(
        project,
        "Project retrieved successfully",
    )))
}

/// Partial update; `isArchived` is how a project gets archived and
/// unarchived, there is no dedicated endpoint for it.
#[put("/{id:\\d+}")]
pub async fn update_project(
    pool: web::Data<PgPool>,
    user: AuthUser,
    project_id: web::Path<i64>,
    project_data: web::Json<UpdateProjectRequest>,
) -> Result<impl Responder, AppError> {
    project_data.validate()?;
    let project_id = project_id.into_inner();

    let existing = fetch_project(&pool, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

    if existing.created_by != Some(user.id) {
        return Err(AppError::Forbidden(
            "Unauthorized to update this project".into(),
        ));
    }

    let project_data = project_data.into_inner();

    let project = sqlx::query_as::<_, Project>(&format!(
        "UPDATE projects \
         SET title = COALESCE($1, title), \
             description = COALESCE($2, description), \
             is_archived = COALESCE($3, is_archived), \
             updated_at = NOW() \
         WHERE id = $4 \
         RETURNING {}",
        PROJECT_COLUMNS
    ))
    .bind(project_data.title)
    .bind(project_data.description)
    .bind(project_data.is_archived)
    .bind(project_id)
    .fetch_one(&**pool)
    .await?;

    log::info!("Project updated: {}", project_id);

    Ok(HttpResponse::Ok().json(ApiResponse::with_data(
        project,
        "Project updated successfully",
    )))
}

#[delete("/{id:\\d+}")]
pub async fn delete_project(
    pool: web::Data<PgPool>,
    user: AuthUser,
    project_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let project_id = project_id.into_inner();

    let existing = fetch_project(&pool, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

    if existing.created_by != Some(user.id) {
        return Err(AppError::Forbidden(
            "Unauthorized to delete this project".into(),
        ));
    }

    sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(project_id)
        .execute(&**pool)
        .await?;

    log::info!("Project deleted: {}", project_id);

    Ok(HttpResponse::Ok().json(ApiResponse::message_only("Project deleted successfully")))
}
