use super::context::RequestContext;
use super::error::*;
use super::validation::*;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::UserRecord;
use crate::logger::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::header::SET_COOKIE;
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
                details: None,
            }),
        }
    }

    pub fn err_with_details(
        code: ApiErrorCode,
        message: impl Into<String>,
        details: Vec<FieldError>,
    ) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
                details: Some(details),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse;

pub async fn register(
    ctx: RequestContext,
    body: RegisterRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let errors = validate_register(&body);
    if !errors.is_empty() {
        info!(request_id = %ctx.request_id, ?errors, "registration failed validation");
        return Err(reject::custom(ValidationRejection(errors)));
    }

    let RegisterRequest {
        username,
        email,
        password,
    } = body;
    let user_id = auth_service
        .signup(SignupInput {
            username,
            email,
            password,
        })
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    info!(request_id = %ctx.request_id, %user_id, "user registered");

    Ok(warp::reply::json(&ApiResponse::ok(RegisterResponse)))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: UserId,
    pub session_token: SessionToken,
}

pub async fn login(
    ctx: RequestContext,
    body: LoginRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let errors = validate_login(&body);
    if !errors.is_empty() {
        return Err(reject::custom(ValidationRejection(errors)));
    }

    let LoginRequest { username, password } = body;
    let result = auth_service
        .login(LoginInput { username, password })
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    info!(request_id = %ctx.request_id, user_id = %result.user_id, "user authenticated");

    let cookie = format!("session={}; HttpOnly; Path=/", result.session_token);
    let json = warp::reply::json(&ApiResponse::ok(LoginResponse {
        user_id: result.user_id,
        session_token: result.session_token,
    }));

    Ok(warp::reply::with_header(json, SET_COOKIE, cookie))
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse;

pub async fn logout(
    ctx: RequestContext,
    user: UserRecord,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    auth_service
        .logout_all(user.user_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    info!(request_id = %ctx.request_id, user_id = %user.user_id, "sessions revoked");

    Ok(warp::reply::json(&ApiResponse::ok(LogoutResponse)))
}

#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: ProjectId,
    pub title: String,
    pub short_description: String,
    pub long_description: String,
}

impl ProjectResponse {
    fn from_record(record: crate::domain_port::ProjectRecord) -> Self {
        ProjectResponse {
            id: record.project_id,
            title: record.title,
            short_description: record.short_description,
            long_description: record.long_description,
        }
    }
}

pub async fn list_projects(
    query: ListProjectsQuery,
    project_service: Arc<dyn ProjectService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let offset = query.offset.filter(|o| *o >= 0).unwrap_or(0) as u64;
    let limit = query.limit.filter(|l| *l > 0).unwrap_or(20) as u64;

    let projects = project_service
        .list_projects(offset, limit)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let response: Vec<ProjectResponse> = projects
        .into_iter()
        .map(ProjectResponse::from_record)
        .collect();

    Ok(warp::reply::json(&ApiResponse::ok(response)))
}

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    pub short_description: String,
    pub long_description: String,
    #[serde(default)]
    pub roles: Vec<RoleRequest>,
}

#[derive(Debug, Serialize)]
pub struct CreateProjectResponse {
    pub project_id: ProjectId,
}

pub async fn create_project(
    ctx: RequestContext,
    body: CreateProjectRequest,
    user: UserRecord,
    project_service: Arc<dyn ProjectService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let errors = validate_create_project(&body);
    if !errors.is_empty() {
        info!(request_id = %ctx.request_id, ?errors, "project failed validation");
        return Err(reject::custom(ValidationRejection(errors)));
    }

    let input = CreateProjectInput {
        title: body.title,
        short_description: body.short_description,
        long_description: body.long_description,
        roles: body
            .roles
            .into_iter()
            .map(|role| RoleInput {
                title: role.title,
                description: role.description,
                skills: role.skills,
            })
            .collect(),
    };

    let project_id = project_service
        .create_project(input, user.user_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    info!(request_id = %ctx.request_id, %project_id, "project created");

    Ok(warp::reply::json(&ApiResponse::ok(CreateProjectResponse {
        project_id,
    })))
}

#[derive(Debug, Serialize)]
pub struct DeleteProjectResponse;

pub async fn delete_project(
    raw_id: String,
    ctx: RequestContext,
    user: UserRecord,
    project_service: Arc<dyn ProjectService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let project_id = raw_id
        .parse::<ProjectId>()
        .map_err(|_| reject::custom(ApiErrorCode::ProjectNotFound))?;

    project_service
        .delete_project(project_id, user.user_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    info!(request_id = %ctx.request_id, %project_id, "project deleted");

    Ok(warp::reply::json(&ApiResponse::ok(DeleteProjectResponse)))
}
