pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;

use actix_web::web;

/// Routes mounted under the `/api` scope. `/tasks/stats` is registered
/// before the id routes, though the `{id:\d+}` pattern would not match
/// it anyway.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::login),
    )
    .service(
        web::scope("/tasks")
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            .service(tasks::get_task_stats)
            .service(tasks::get_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    )
    .service(
        web::scope("/projects")
            .service(projects::get_projects)
            .service(projects::create_project)
            .service(projects::get_project)
            .service(projects::update_project)
            .service(projects::delete_project),
    );
}
