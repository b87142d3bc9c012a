//! Repair worker routes.

use axum::{
    extract::{Query, State},
    response::Response,
    Json,
};

use crate::{
    api::{stats::TaskStats, ticket::TaskDetail, Page, Ticket},
    upstream::Filters,
};

use super::{
    ticket_or_no_content, PathId, ProxyError, SharedAppState, Token,
};

pub(super) async fn list(
    State(state): State<SharedAppState>,
    Token(token): Token,
    Query(filters): Query<Filters>,
) -> Result<Json<Page<Ticket>>, ProxyError> {
    Ok(Json(state.upstream.my_tasks(&token, &filters).await?))
}

/// Counters over the first page of the worker's tasks.
pub(super) async fn stats(
    State(state): State<SharedAppState>,
    Token(token): Token,
) -> Result<Json<TaskStats>, ProxyError> {
    let page = state.upstream.my_tasks(&token, &Filters::default()).await?;
    Ok(Json(TaskStats::from_tasks(&page.items)))
}

pub(super) async fn get(
    State(state): State<SharedAppState>,
    Token(token): Token,
    PathId(id): PathId,
) -> Result<Json<TaskDetail>, ProxyError> {
    let task = state.upstream.task(&token, &id).await?;
    Ok(Json(TaskDetail::new(task, state.local_now())))
}

pub(super) async fn start(
    State(state): State<SharedAppState>,
    Token(token): Token,
    PathId(id): PathId,
) -> Result<Response, ProxyError> {
    let task = state.upstream.start_task(&token, &id).await?;
    Ok(ticket_or_no_content(task))
}

pub(super) async fn complete(
    State(state): State<SharedAppState>,
    Token(token): Token,
    PathId(id): PathId,
) -> Result<Response, ProxyError> {
    let task = state.upstream.complete_task(&token, &id).await?;
    Ok(ticket_or_no_content(task))
}
