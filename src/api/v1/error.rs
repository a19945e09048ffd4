use crate::api::v1::handler::ApiResponse;
use crate::api::v1::validation::FieldError;
use crate::application_port::*;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use tracing::warn;
use warp::http::StatusCode;
use warp::{Rejection, reject};

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    if let Some(rejection) = err.find::<ValidationRejection>() {
        let json = warp::reply::json(&ApiResponse::<()>::err_with_details(
            ApiErrorCode::ValidationFailed,
            ApiErrorCode::ValidationFailed.to_string(),
            rejection.0.clone(),
        ));
        Ok(warp::reply::with_status(json, StatusCode::BAD_REQUEST))
    } else if let Some(err) = err.find::<ApiErrorCode>() {
        let json = warp::reply::json(&ApiResponse::<()>::err(err.clone(), err.to_string()));
        Ok(warp::reply::with_status(json, err.status()))
    } else {
        let json = warp::reply::json(&ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(ApiError {
                code: ApiErrorCode::InternalError,
                message: format!("Unhandled error: {:?}", err),
                details: None,
            }),
        });
        Ok(warp::reply::with_status(
            json,
            StatusCode::INTERNAL_SERVER_ERROR,
        ))
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Rejection carrying the per-field findings of a failed DTO validation.
#[derive(Debug)]
pub struct ValidationRejection(pub Vec<FieldError>);

impl reject::Reject for ValidationRejection {}

#[derive(Debug, Clone, Error, Serialize)]
pub enum ApiErrorCode {
    #[error("One or more fields failed validation")]
    ValidationFailed,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Username or email already taken")]
    UserExists,
    #[error("Session is not valid")]
    SessionInvalid,
    #[error("Project not found")]
    ProjectNotFound,
    #[error("Project belongs to another user")]
    NotProjectOwner,
    #[error("User already owns a project")]
    AlreadyOwnsProject,
    #[error("Internal error")]
    InternalError,
}

impl ApiErrorCode {
    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
            ApiErrorCode::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiErrorCode::UserExists => StatusCode::CONFLICT,
            ApiErrorCode::SessionInvalid => StatusCode::UNAUTHORIZED,
            ApiErrorCode::ProjectNotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::NotProjectOwner => StatusCode::FORBIDDEN,
            ApiErrorCode::AlreadyOwnsProject => StatusCode::CONFLICT,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl reject::Reject for ApiErrorCode {}

impl From<AuthError> for ApiErrorCode {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidCredentials => ApiErrorCode::InvalidCredentials,
            AuthError::UserExists => ApiErrorCode::UserExists,
            AuthError::SessionInvalid => ApiErrorCode::SessionInvalid,
            AuthError::Store(e) => ApiErrorCode::internal(e),
            AuthError::InternalError(e) => ApiErrorCode::internal(e),
        }
    }
}

impl From<ProjectError> for ApiErrorCode {
    fn from(error: ProjectError) -> Self {
        match error {
            ProjectError::AlreadyOwner => ApiErrorCode::AlreadyOwnsProject,
            ProjectError::NotFound => ApiErrorCode::ProjectNotFound,
            ProjectError::NotOwner => ApiErrorCode::NotProjectOwner,
            ProjectError::Store(e) => ApiErrorCode::internal(e),
            ProjectError::InternalError(e) => ApiErrorCode::internal(e),
        }
    }
}
