use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    auth::AuthUser,
    error::AppError,
    models::task::{
        parse_due_date, priority, status, CreateTaskRequest, Task, TaskListItem, TaskStats,
        TaskWithCreator, UpdateTaskRequest,
    },
    response::ApiResponse,
};

const TASK_COLUMNS: &str = "id, project_id, team_id, title, description, status, priority, \
     estimate_minutes, created_by, created_at, started_at, completed_at, due_date, updated_at, \
     metadata";

/// Tasks created by this user, newest first, with the creator's name
/// joined in. Shared by the listing and stats endpoints.
async fn fetch_tasks_for_user(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<TaskWithCreator>, AppError> {
    let tasks = sqlx::query_as::<_, TaskWithCreator>(
        "SELECT t.id, t.title, t.description, t.status, t.priority, t.due_date, \
                t.created_at, t.created_by, t.project_id, u.name AS creator_name \
         FROM tasks t \
         LEFT JOIN users u ON u.id = t.created_by \
         WHERE t.created_by = $1 \
         ORDER BY t.created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

async fn fetch_task(pool: &PgPool, task_id: i64) -> Result<Option<Task>, AppError> {
    let task =
        sqlx::query_as::<_, Task>(&format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS))
            .bind(task_id)
            .fetch_optional(pool)
            .await?;

    Ok(task)
}

/// Retrieves the authenticated user's tasks.
///
/// Rows are creator-scoped and ordered newest first. Each row carries
/// `creatorName` plus the `statusName`/`priorityName` strings the
/// dashboard renders.
///
/// ## Responses:
/// - `200 OK`: envelope with an array of tasks.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn get_tasks(
    pool: web::Data<PgPool>,
    user: AuthUser,
) -> Result<impl Responder, AppError> {
    let tasks = fetch_tasks_for_user(&pool, user.id).await?;
    let items: Vec<TaskListItem> = tasks.into_iter().map(TaskListItem::from).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::with_data(
        items,
        "Tasks retrieved successfully",
    )))
}

/// Creates a task owned by the authenticated user.
///
/// Status defaults to todo (0) and priority to normal (1). When
/// `assignedTo` is present an assignment row is written as well, with the
/// caller as assigner.
///
/// ## Responses:
/// - `201 Created`: envelope with the new task.
/// - `400 Bad Request`: validation failure or unparsable due date.
/// - `401 Unauthorized`: missing or invalid token.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    user: AuthUser,
    task_data: web::Json<CreateTaskRequest>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let task_data = task_data.into_inner();

    let due_date = match task_data.due_date.as_deref() {
        Some(raw) => Some(parse_due_date(raw)?),
        None => None,
    };

    let task = sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (title, description, status, priority, due_date, project_id, created_by) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(&task_data.title)
    .bind(&task_data.description)
    .bind(task_data.status.unwrap_or(status::TODO))
    .bind(task_data.priority.unwrap_or(priority::NORMAL))
    .bind(due_date)
    .bind(task_data.project_id)
    .bind(user.id)
    .fetch_one(&**pool)
    .await?;

    if let Some(assignee) = task_data.assigned_to {
        sqlx::query(
            "INSERT INTO task_assignments (task_id, user_id, assigned_by) VALUES ($1, $2, $3)",
        )
        .bind(task.id)
        .bind(assignee)
        .bind(user.id)
        .execute(&**pool)
        .await?;
    }

    log::info!("Task created: {}", task.id);

    Ok(HttpResponse::Created().json(ApiResponse::with_data(task, "Task created successfully")))
}

/// Recomputes the caller's task counts.
///
/// The counts are taken over the task list in memory, not as a SQL
/// aggregate. Status 2 counts as completed.
#[get("/stats")]
pub async fn get_task_stats(
    pool: web::Data<PgPool>,
    user: AuthUser,
) -> Result<impl Responder, AppError> {
    let tasks = fetch_tasks_for_user(&pool, user.id).await?;
    let stats = TaskStats::compute(&tasks);

    Ok(HttpResponse::Ok().json(ApiResponse::with_data(
        stats,
        "Task stats retrieved successfully",
    )))
}

/// Retrieves one task by id.
///
/// ## Responses:
/// - `200 OK`: envelope with the task.
/// - `403 Forbidden`: the caller is not the creator.
/// - `404 Not Found`: no such task (non-numeric ids never reach here).
#[get("/{id:\\d+}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    user: AuthUser,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let task = fetch_task(&pool, task_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    if task.created_by != Some(user.id) {
        return Err(AppError::Forbidden("Unauthorized to view this task".into()));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::with_data(
        task,
        "Task retrieved successfully",
    )))
}

/// Updates a task the caller owns. Absent fields are left as they are;
/// `updatedAt` always moves.
///
/// ## Responses:
/// - `200 OK`: envelope with the updated task.
/// - `400 Bad Request`: validation failure or unparsable due date.
/// - `403 Forbidden`: the caller is not the creator.
/// - `404 Not Found`: no such task.
#[put("/{id:\\d+}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    user: AuthUser,
    task_id: web::Path<i64>,
    task_data: web::Json<UpdateTaskRequest>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let task_id = task_id.into_inner();

    let existing = fetch_task(&pool, task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    if existing.created_by != Some(user.id) {
        return Err(AppError::Forbidden(
            "Unauthorized to update this task".into(),
        ));
    }

    let task_data = task_data.into_inner();
    let due_date = match task_data.due_date.as_deref() {
        Some(raw) => Some(parse_due_date(raw)?),
        None => None,
    };

    let task = sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks \
         SET title = COALESCE($1, title), \
             description = COALESCE($2, description), \
             status = COALESCE($3, status), \
             priority = COALESCE($4, priority), \
             due_date = COALESCE($5, due_date), \
             updated_at = NOW() \
         WHERE id = $6 \
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(task_data.title)
    .bind(task_data.description)
    .bind(task_data.status)
    .bind(task_data.priority)
    .bind(due_date)
    .bind(task_id)
    .fetch_one(&**pool)
    .await?;

    log::info!("Task updated: {}", task_id);

    Ok(HttpResponse::Ok().json(ApiResponse::with_data(task, "Task updated successfully")))
}

/// Deletes a task the caller owns. Assignment rows go first so no
/// assignment outlives its task.
///
/// ## Responses:
/// - `200 OK`: message envelope.
/// - `403 Forbidden`: the caller is not the creator.
/// - `404 Not Found`: no such task.
#[delete("/{id:\\d+}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    user: AuthUser,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();

    let existing = fetch_task(&pool, task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    if existing.created_by != Some(user.id) {
        return Err(AppError::Forbidden(
            "Unauthorized to delete this task".into(),
        ));
    }

    sqlx::query("DELETE FROM task_assignments WHERE task_id = $1")
        .bind(task_id)
        .execute(&**pool)
        .await?;

    sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(task_id)
        .execute(&**pool)
        .await?;

    log::info!("Task deleted: {}", task_id);

    Ok(HttpResponse::Ok().json(ApiResponse::message_only("Task deleted successfully")))
}
