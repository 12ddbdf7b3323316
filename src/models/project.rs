use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A project row.
#[derive(Debug, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub team_id: Option<i64>,
    pub created_by: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/projects`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub team_id: Option<i64>,
}

/// Body of `PUT /api/projects/{id}`. Absent fields are left untouched.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub is_archived: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_project_validation() {
        let valid = CreateProjectRequest {
            title: "Q3 launch".to_string(),
            description: Some("Everything for the launch".to_string()),
            team_id: None,
        };
        assert!(valid.validate().is_ok());

        let empty_title = CreateProjectRequest {
            title: "".to_string(),
            description: None,
            team_id: None,
        };
        assert!(empty_title.validate().is_err());

        let long_title = CreateProjectRequest {
            title: "a".repeat(201),
            description: None,
            team_id: None,
        };
        assert!(long_title.validate().is_err());
    }

    #[test]
    fn test_update_project_all_fields_optional() {
        let archive_only = UpdateProjectRequest {
            title: None,
            description: None,
            is_archived: Some(true),
        };
        assert!(archive_only.validate().is_ok());

        let long_description = UpdateProjectRequest {
            title: None,
            description: Some("d".repeat(1001)),
            is_archived: None,
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_project_serializes_camel_case() {
        let now = Utc::now();
        let project = Project {
            id: 5,
            team_id: None,
            created_by: Some(1),
            title: "Q3 launch".to_string(),
            description: None,
            is_archived: false,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["isArchived"], false);
        assert_eq!(json["createdBy"], 1);
        assert!(json.get("is_archived").is_none());
    }
}
