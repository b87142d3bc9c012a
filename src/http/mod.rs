mod admin;
mod task;
mod ticket;
mod user;

use std::{error::Error as StdError, sync::Arc};

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        request, HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, RequestPartsExt as _, Router,
};
use axum_extra::TypedHeader;
use derive_more::From;
use headers::{authorization::Bearer, Authorization};
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};
use tower_http::cors::CorsLayer;

use crate::{
    api::{status, Id, Ticket},
    upstream, Config,
};

/// Builds the gateway with its CORS policy and upstream client.
pub fn app(config: &Config) -> Result<Router, Box<dyn StdError>> {
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);
    for origin in &config.http.cors.allowed_origins {
        cors = cors.allow_origin(origin.parse::<HeaderValue>()?);
    }

    let state = AppState {
        upstream: upstream::Client::new(&config.upstream)?,
        utc_offset: UtcOffset::from_hms(
            config.upstream.utc_offset_hours,
            0,
            0,
        )?,
    };

    Ok(Router::new()
        .route("/auth/login", post(user::login))
        .route("/auth/register", post(user::register))
        .route("/user", get(user::me).put(user::update_me))
        .route("/users/:id", get(user::get))
        .route("/statuses", get(statuses))
        .route("/tickets", get(ticket::list).post(ticket::create))
        .route("/tickets/:id", get(ticket::get).delete(ticket::delete))
        .route("/tickets/:id/evaluate", post(ticket::evaluate))
        .route("/tasks", get(task::list))
        .route("/tasks/stats", get(task::stats))
        .route("/tasks/:id", get(task::get))
        .route("/tasks/:id/start", post(task::start))
        .route("/tasks/:id/complete", post(task::complete))
        .route("/admin/tickets", get(admin::list_tickets))
        .route("/admin/tickets/:id/assign", put(admin::assign_ticket))
        .route("/admin/tickets/:id/reject", put(admin::reject_ticket))
        .route("/admin/students", get(admin::students))
        .route("/admin/repairmen", get(admin::repairmen))
        .route(
            "/admin/users/:id",
            put(admin::update_user).delete(admin::delete_user),
        )
        .route(
            "/admin/users/:id/reset-password",
            post(admin::reset_password),
        )
        .route("/admin/feedbacks", get(admin::feedbacks))
        .route("/admin/feedbacks/:id", delete(admin::delete_feedback))
        .route("/admin/stats/category", get(admin::category_stats))
        .route("/admin/stats/location", get(admin::location_stats))
        .route(
            "/admin/stats/repairman-rating",
            get(admin::repairman_ratings),
        )
        .route("/admin/stats/status", get(admin::status_stats))
        .route("/admin/stats/monthly", get(admin::monthly_stats))
        .route("/admin/stats/overview", get(admin::overview))
        .layer(cors)
        .with_state(Arc::new(state)))
}

type SharedAppState = Arc<AppState>;

struct AppState {
    upstream: upstream::Client,

    utc_offset: UtcOffset,
}

impl AppState {
    /// Current wall-clock time in the upstream's local zone.
    fn local_now(&self) -> PrimitiveDateTime {
        let now = OffsetDateTime::now_utc().to_offset(self.utc_offset);
        PrimitiveDateTime::new(now.date(), now.time())
    }
}

async fn statuses() -> Json<[status::Row; 7]> {
    Json(status::TABLE)
}

/// Caller's bearer token, forwarded upstream untouched.
pub struct Token(String);

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingToken => StatusCode::UNAUTHORIZED,
        }
        .into_response()
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Token {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AuthError::MissingToken)?;
        Ok(Self(bearer.token().to_owned()))
    }
}

/// `:id` path parameter. Dot segments are refused: they would be resolved
/// away in the upstream URL.
pub struct PathId(Id);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for PathId {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        match id.as_str() {
            "" | "." | ".." => {
                Err((StatusCode::BAD_REQUEST, "无效的编号").into_response())
            }
            _ => Ok(Self(Id::from(id))),
        }
    }
}

#[derive(Debug, From)]
pub enum ProxyError {
    #[from]
    Upstream(upstream::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            Self::Upstream(e) => upstream_response(e),
        }
    }
}

/// Status and message to answer with when the upstream call failed.
fn upstream_response(e: upstream::Error) -> Response {
    use upstream::Error as E;

    tracing::warn!(error = %e, "upstream call failed");
    match e {
        E::Transport(e) if e.is_timeout() => {
            (StatusCode::GATEWAY_TIMEOUT, "请求超时，请检查网络连接")
                .into_response()
        }
        E::Transport(_) => (
            StatusCode::BAD_GATEWAY,
            "无法连接到服务器，请检查后端服务是否正常运行",
        )
            .into_response(),
        E::Status { status, message } if status.is_client_error() => {
            (status, message).into_response()
        }
        E::Status { message, .. } => {
            (StatusCode::BAD_GATEWAY, message).into_response()
        }
        E::Rejected { message, .. } => {
            (StatusCode::BAD_REQUEST, message).into_response()
        }
        E::NotJson => {
            (StatusCode::BAD_GATEWAY, "服务器返回了非 JSON 数据")
                .into_response()
        }
        e @ (E::Session(_) | E::MissingField(_) | E::BaseUrl(_)) => {
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
    }
}

/// Updated ticket when the upstream sent one back, otherwise `204`.
fn ticket_or_no_content(ticket: Option<Ticket>) -> Response {
    match ticket {
        Some(ticket) => Json(ticket).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
