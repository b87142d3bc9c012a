//! Student-facing ticket routes.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use derive_more::From;
use serde::Deserialize;

use crate::{
    api::{Category, Page, Priority, Ticket},
    upstream::{self, Evaluation, Filters, NewTicket},
};

use super::{
    ticket_or_no_content, upstream_response, PathId, ProxyError,
    SharedAppState, Token,
};

/// Highest score a student can give.
pub const MAX_SCORE: u8 = 5;

pub(super) async fn list(
    State(state): State<SharedAppState>,
    Token(token): Token,
    Query(filters): Query<Filters>,
) -> Result<Json<Page<Ticket>>, ProxyError> {
    Ok(Json(state.upstream.my_orders(&token, &filters).await?))
}

pub(super) async fn get(
    State(state): State<SharedAppState>,
    Token(token): Token,
    PathId(id): PathId,
) -> Result<Json<Ticket>, ProxyError> {
    Ok(Json(state.upstream.order(&token, &id).await?))
}

pub(super) async fn delete(
    State(state): State<SharedAppState>,
    Token(token): Token,
    PathId(id): PathId,
) -> Result<StatusCode, ProxyError> {
    state.upstream.delete_order(&token, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateTicketInput {
    title: Option<String>,
    category: String,
    location: String,
    description: String,
    priority: Option<String>,
    student_id: Option<String>,
}

pub(super) async fn create(
    State(state): State<SharedAppState>,
    Token(token): Token,
    Json(input): Json<CreateTicketInput>,
) -> Result<Response, CreateTicketError> {
    use CreateTicketError as E;

    let category =
        Category::parse(&input.category).ok_or(E::UnknownCategory)?;
    let location = input.location.trim().to_owned();
    if location.is_empty() {
        return Err(E::MissingLocation);
    }
    if input.description.trim().is_empty() {
        return Err(E::MissingDescription);
    }

    let ticket = NewTicket {
        title: input.title.filter(|t| !t.trim().is_empty()),
        category,
        location,
        description: input.description,
        priority: Priority::from_raw(input.priority.as_deref()),
        student_id: input.student_id.filter(|s| !s.trim().is_empty()),
    };
    let created = state.upstream.create_order(&token, ticket).await?;

    Ok(match created {
        Some(ticket) => (StatusCode::CREATED, Json(ticket)).into_response(),
        None => StatusCode::CREATED.into_response(),
    })
}

#[derive(Debug, From)]
pub enum CreateTicketError {
    #[from]
    Upstream(upstream::Error),
    MissingDescription,
    MissingLocation,
    UnknownCategory,
}

impl IntoResponse for CreateTicketError {
    fn into_response(self) -> Response {
        match self {
            Self::Upstream(e) => upstream_response(e),
            Self::MissingDescription
            | Self::MissingLocation
            | Self::UnknownCategory => StatusCode::BAD_REQUEST.into_response(),
        }
    }
}

pub(super) async fn evaluate(
    State(state): State<SharedAppState>,
    Token(token): Token,
    PathId(id): PathId,
    Json(evaluation): Json<Evaluation>,
) -> Result<Response, EvaluateError> {
    use EvaluateError as E;

    if evaluation.student_id.trim().is_empty() {
        return Err(E::MissingStudentId);
    }
    if !(1..=MAX_SCORE).contains(&evaluation.score) {
        return Err(E::ScoreOutOfRange);
    }

    let ticket = state
        .upstream
        .evaluate_order(&token, &id, &evaluation)
        .await?;
    Ok(ticket_or_no_content(ticket))
}

#[derive(Debug, From)]
pub enum EvaluateError {
    #[from]
    Upstream(upstream::Error),
    MissingStudentId,
    ScoreOutOfRange,
}

impl IntoResponse for EvaluateError {
    fn into_response(self) -> Response {
        match self {
            Self::Upstream(e) => upstream_response(e),
            Self::MissingStudentId | Self::ScoreOutOfRange => {
                StatusCode::BAD_REQUEST.into_response()
            }
        }
    }
}
