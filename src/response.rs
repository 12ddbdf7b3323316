use serde::Serialize;

/// The uniform success envelope every endpoint returns:
/// `{"success": true, "data": ..., "message": ...}`.
///
/// Failures never go through this type; they are rendered by
/// `AppError::error_response` as `{"success": false, "error": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn with_data(data: T, message: &str) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.to_string()),
        }
    }
}

impl ApiResponse<()> {
    pub fn message_only(message: &str) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_envelope_with_data() {
        let body = ApiResponse::with_data(vec![1, 2, 3], "Tasks retrieved successfully");
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "data": [1, 2, 3],
                "message": "Tasks retrieved successfully"
            })
        );
    }

    #[test]
    fn test_envelope_message_only_skips_data() {
        let body = ApiResponse::message_only("Task deleted successfully");
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "message": "Task deleted successfully"
            })
        );
    }
}
