pub mod project;
pub mod task;
pub mod user;

pub use project::{CreateProjectRequest, Project, UpdateProjectRequest};
pub use task::{
    CreateTaskRequest, Task, TaskListItem, TaskStats, TaskWithCreator, UpdateTaskRequest,
};
pub use user::User;
