//! Administrator routes: ticket dispatch, directories, feedback moderation
//! and dashboard statistics.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use derive_more::From;
use serde::Deserialize;

use crate::{
    api::{
        stats::{
            CategoryStat, LocationStat, MonthlyStat, Overview,
            RepairmanRating, StatusStat,
        },
        user::{is_mobile_number, MemberKind},
        Feedback, Id, Member, Page, PasswordReset, Profile, Ticket,
    },
    upstream::{self, Filters, UserUpdate},
};

use super::{
    ticket_or_no_content, upstream_response, PathId, ProxyError,
    SharedAppState, Token,
};

pub(super) async fn list_tickets(
    State(state): State<SharedAppState>,
    Token(token): Token,
    Query(filters): Query<Filters>,
) -> Result<Json<Page<Ticket>>, ProxyError> {
    Ok(Json(state.upstream.all_orders(&token, &filters).await?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AssignInput {
    repairman_id: Id,
}

pub(super) async fn assign_ticket(
    State(state): State<SharedAppState>,
    Token(token): Token,
    PathId(id): PathId,
    Json(AssignInput { repairman_id }): Json<AssignInput>,
) -> Result<Response, ProxyError> {
    let ticket = state
        .upstream
        .assign_order(&token, &id, &repairman_id)
        .await?;
    tracing::info!(ticket = %id, repairman = %repairman_id, "ticket assigned");
    Ok(ticket_or_no_content(ticket))
}

#[derive(Deserialize)]
pub(super) struct RejectInput {
    #[serde(default)]
    reason: String,
}

pub(super) async fn reject_ticket(
    State(state): State<SharedAppState>,
    Token(token): Token,
    PathId(id): PathId,
    Json(RejectInput { reason }): Json<RejectInput>,
) -> Result<Response, RejectTicketError> {
    use RejectTicketError as E;

    let reason = reason.trim();
    if reason.is_empty() {
        return Err(E::MissingReason);
    }

    let ticket = state.upstream.reject_order(&token, &id, reason).await?;
    tracing::info!(ticket = %id, "ticket rejected");
    Ok(ticket_or_no_content(ticket))
}

#[derive(Debug, From)]
pub enum RejectTicketError {
    #[from]
    Upstream(upstream::Error),
    MissingReason,
}

impl IntoResponse for RejectTicketError {
    fn into_response(self) -> Response {
        match self {
            Self::Upstream(e) => upstream_response(e),
            Self::MissingReason => StatusCode::BAD_REQUEST.into_response(),
        }
    }
}

pub(super) async fn students(
    State(state): State<SharedAppState>,
    Token(token): Token,
    Query(filters): Query<Filters>,
) -> Result<Json<Vec<Member>>, ProxyError> {
    let members = state
        .upstream
        .members(&token, MemberKind::Student, &filters)
        .await?;
    Ok(Json(members))
}

pub(super) async fn repairmen(
    State(state): State<SharedAppState>,
    Token(token): Token,
    Query(filters): Query<Filters>,
) -> Result<Json<Vec<Member>>, ProxyError> {
    let members = state
        .upstream
        .members(&token, MemberKind::Repairman, &filters)
        .await?;
    Ok(Json(members))
}

/// Changes someone's nickname or phone. Absent fields are kept.
pub(super) async fn update_user(
    State(state): State<SharedAppState>,
    Token(token): Token,
    PathId(id): PathId,
    Json(update): Json<UserUpdate>,
) -> Result<Json<Profile>, UpdateUserError> {
    use UpdateUserError as E;

    if update.nickname.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(E::BlankNickname);
    }
    if update
        .contact_phone
        .as_deref()
        .is_some_and(|phone| !is_mobile_number(phone))
    {
        return Err(E::InvalidPhone);
    }

    let profile = state.upstream.update_user(&token, &id, update).await?;
    tracing::info!(user = %id, "user updated");
    Ok(Json(profile))
}

#[derive(Debug, From)]
pub enum UpdateUserError {
    #[from]
    Upstream(upstream::Error),
    BlankNickname,
    InvalidPhone,
}

impl IntoResponse for UpdateUserError {
    fn into_response(self) -> Response {
        match self {
            Self::Upstream(e) => upstream_response(e),
            Self::BlankNickname => {
                (StatusCode::BAD_REQUEST, "昵称不能为空").into_response()
            }
            Self::InvalidPhone => {
                (StatusCode::BAD_REQUEST, "手机号格式不正确").into_response()
            }
        }
    }
}

pub(super) async fn reset_password(
    State(state): State<SharedAppState>,
    Token(token): Token,
    PathId(id): PathId,
) -> Result<Json<PasswordReset>, ProxyError> {
    let reset = state.upstream.reset_password(&token, &id).await?;
    tracing::info!(user = %id, "password reset");
    Ok(Json(reset))
}

pub(super) async fn delete_user(
    State(state): State<SharedAppState>,
    Token(token): Token,
    PathId(id): PathId,
) -> Result<StatusCode, ProxyError> {
    state.upstream.delete_user(&token, &id).await?;
    tracing::info!(user = %id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn feedbacks(
    State(state): State<SharedAppState>,
    Token(token): Token,
    Query(filters): Query<Filters>,
) -> Result<Json<Vec<Feedback>>, ProxyError> {
    Ok(Json(state.upstream.feedbacks(&token, &filters).await?))
}

pub(super) async fn delete_feedback(
    State(state): State<SharedAppState>,
    Token(token): Token,
    PathId(id): PathId,
) -> Result<StatusCode, ProxyError> {
    state.upstream.delete_feedback(&token, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn category_stats(
    State(state): State<SharedAppState>,
    Token(token): Token,
) -> Result<Json<Vec<CategoryStat>>, ProxyError> {
    Ok(Json(state.upstream.category_stats(&token).await?))
}

pub(super) async fn location_stats(
    State(state): State<SharedAppState>,
    Token(token): Token,
) -> Result<Json<Vec<LocationStat>>, ProxyError> {
    Ok(Json(state.upstream.location_stats(&token).await?))
}

pub(super) async fn repairman_ratings(
    State(state): State<SharedAppState>,
    Token(token): Token,
) -> Result<Json<Vec<RepairmanRating>>, ProxyError> {
    Ok(Json(state.upstream.repairman_ratings(&token).await?))
}

pub(super) async fn status_stats(
    State(state): State<SharedAppState>,
    Token(token): Token,
) -> Result<Json<Vec<StatusStat>>, ProxyError> {
    Ok(Json(state.upstream.status_stats(&token).await?))
}

pub(super) async fn monthly_stats(
    State(state): State<SharedAppState>,
    Token(token): Token,
) -> Result<Json<Vec<MonthlyStat>>, ProxyError> {
    Ok(Json(state.upstream.monthly_stats(&token).await?))
}

pub(super) async fn overview(
    State(state): State<SharedAppState>,
    Token(token): Token,
) -> Result<Json<Overview>, ProxyError> {
    Ok(Json(state.upstream.overview(&token).await?))
}
