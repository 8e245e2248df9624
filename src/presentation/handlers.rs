use crate::application::service::UserService;
use crate::domain::error::DomainError;
use crate::domain::user::{CreateUser, User};
use actix_web::{HttpRequest, HttpResponse, ResponseError, error::JsonPayloadError, http::StatusCode, web};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

pub const GREETING: &str = "Hello, World!";

// AppState holding the service
#[derive(Clone)]
pub struct AppState {
    pub service: UserService,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// `{"status": ..., "message": ...}`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub status: Status,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct UserCreatedResponse {
    pub status: Status,
    pub message: &'static str,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct UserIdResponse {
    pub user_id: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid JSON data")]
    InvalidJson(String),
    #[error("Failed to create user")]
    CreateFailed(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::CreateFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Detail goes to the log only; callers get the fixed message
        match self {
            ApiError::InvalidJson(detail) => {
                warn!(error = %detail, status = %status, "Rejected request body")
            }
            ApiError::CreateFailed(detail) => {
                error!(error = %detail, status = %status, "Failed to insert user")
            }
        }

        HttpResponse::build(status).json(MessageResponse {
            status: Status::Error,
            message: self.to_string(),
        })
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::Storage(msg)) => ApiError::CreateFailed(msg.clone()),
            None => ApiError::CreateFailed(err.to_string()),
        }
    }
}

/// Body extraction settings for JSON routes. Every extraction failure, including a
/// missing or foreign `Content-Type`, becomes the 400 envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            ApiError::InvalidJson(err.to_string()).into()
        })
}

// Handlers

#[instrument]
pub async fn hello() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(GREETING)
}

#[instrument]
pub async fn api_root() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse {
        status: Status::Success,
        message: "Welcome to the API".to_string(),
    })
}

/// Echoes the id segment as it appears in the request URI, percent-escapes included.
/// No lookup is performed.
#[instrument(skip(req), fields(user_id))]
pub async fn get_user(req: HttpRequest) -> HttpResponse {
    let user_id = last_segment(req.uri().path()).to_string();
    tracing::Span::current().record("user_id", user_id.as_str());
    HttpResponse::Ok().json(UserIdResponse { user_id })
}

// `web::Path` would percent-decode the segment
fn last_segment(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, segment)| segment)
}

#[instrument(skip(state, req), fields(user_id))]
pub async fn create_user(
    state: web::Data<AppState>,
    req: web::Json<CreateUser>,
) -> Result<HttpResponse, ApiError> {
    info!(name = %req.name, email = %req.email, "Creating new user");
    let user = state.service.create_user(req.into_inner()).await?;
    tracing::Span::current().record("user_id", user.id);
    info!(
        user_id = user.id,
        name = %user.name,
        email = %user.email,
        "User created"
    );
    Ok(HttpResponse::Created().json(UserCreatedResponse {
        status: Status::Success,
        message: "User created successfully",
        user,
    }))
}
