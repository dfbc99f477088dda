use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::users::repo_types::{
    User, DEFAULT_ECO_ACTIONS, DEFAULT_LEVEL, DEFAULT_MISSIONS_COMPLETED, DEFAULT_POINTS,
};

/// Request body for `POST /adduser`. Presence is checked after parsing so
/// the client gets the name of the first missing field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub points: Option<i64>,
    pub level: Option<i64>,
    pub missions_completed: Option<i64>,
    pub eco_actions: Option<i64>,
}

impl CreateUserRequest {
    /// Reads the typed view of a raw body without consuming it; the raw
    /// value is what gets echoed back.
    pub fn from_body(body: &Value) -> Result<Self, ApiError> {
        Self::deserialize(body).map_err(|e| ApiError::InvalidBody(e.to_string()))
    }
}

impl TryFrom<CreateUserRequest> for User {
    type Error = ApiError;

    fn try_from(req: CreateUserRequest) -> Result<Self, Self::Error> {
        let id = req.id.ok_or(ApiError::MissingField("id"))?;
        let name = req.name.ok_or(ApiError::MissingField("name"))?;
        let email = req.email.ok_or(ApiError::MissingField("email"))?;
        let password = req.password.ok_or(ApiError::MissingField("password"))?;

        Ok(User {
            id,
            name,
            email,
            password,
            points: req.points.unwrap_or(DEFAULT_POINTS),
            level: req.level.unwrap_or(DEFAULT_LEVEL),
            missions_completed: req.missions_completed.unwrap_or(DEFAULT_MISSIONS_COMPLETED),
            eco_actions: req.eco_actions.unwrap_or(DEFAULT_ECO_ACTIONS),
        })
    }
}

/// `user` is the request body exactly as submitted.
#[derive(Debug, Serialize)]
pub struct CreatedUserResponse {
    pub message: &'static str,
    pub user: Value,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
