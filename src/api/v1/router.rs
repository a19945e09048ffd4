use super::context::RequestContext;
use super::error::*;
use super::handler;
use super::handler::ListProjectsQuery;
use crate::application_port::*;
use crate::domain_port::UserRecord;
use crate::server::*;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, http, reject};

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let register = warp::post()
        .and(warp::path("register"))
        .and(warp::path::end())
        .and(with_context())
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::register);

    let login = warp::post()
        .and(warp::path("login"))
        .and(warp::path::end())
        .and(with_context())
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::login);

    let logout = warp::post()
        .and(warp::path("logout"))
        .and(warp::path::end())
        .and(with_context())
        .and(with_session(server.auth_service.clone()))
        .and(with(server.auth_service.clone()))
        .and_then(handler::logout);

    let list_projects = warp::get()
        .and(warp::path("projects"))
        .and(warp::path::end())
        .and(warp::query::<ListProjectsQuery>())
        .and(with(server.project_service.clone()))
        .and_then(handler::list_projects);

    let create_project = warp::post()
        .and(warp::path("projects"))
        .and(warp::path::end())
        .and(with_context())
        .and(warp::body::json())
        .and(with_session(server.auth_service.clone()))
        .and(with(server.project_service.clone()))
        .and_then(handler::create_project);

    let delete_project = warp::delete()
        .and(warp::path("projects"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(with_context())
        .and(with_session(server.auth_service.clone()))
        .and(with(server.project_service.clone()))
        .and_then(handler::delete_project);

    register
        .or(login)
        .or(logout)
        .or(list_projects)
        .or(create_project)
        .or(delete_project)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

fn with_context() -> impl Filter<Extract = (RequestContext,), Error = Infallible> + Clone {
    warp::any().map(RequestContext::new)
}

/// Resolve the presented session (cookie or bearer header) to its user,
/// rejecting the request when neither resolves.
fn with_session(
    auth_service: Arc<dyn AuthService>,
) -> impl Filter<Extract = (UserRecord,), Error = warp::Rejection> + Clone {
    warp::cookie::optional::<String>("session")
        .and(warp::header::optional::<String>(
            http::header::AUTHORIZATION.as_ref(),
        ))
        .and_then(move |cookie: Option<String>, header: Option<String>| {
            let auth_service = auth_service.clone();
            async move {
                let token = cookie.or_else(|| {
                    header
                        .as_deref()
                        .and_then(|h| h.strip_prefix("Bearer "))
                        .map(str::to_string)
                });

                let Some(token) = token else {
                    return Err(reject::custom(ApiErrorCode::SessionInvalid));
                };

                auth_service
                    .authenticate(&SessionToken(token))
                    .await
                    .map_err(ApiErrorCode::from)
                    .map_err(reject::custom)
            }
        })
}
