use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use derive_more::From;
use serde::Deserialize;

use crate::{
    api::{user::is_mobile_number, Profile, Session},
    upstream::{self, ProfileUpdate, Registration},
};

use super::{upstream_response, PathId, ProxyError, SharedAppState, Token};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LoginInput {
    user_id: String,
    password: String,
}

pub(super) async fn login(
    State(state): State<SharedAppState>,
    Json(LoginInput { user_id, password }): Json<LoginInput>,
) -> Result<Json<Session>, ProxyError> {
    let session = state.upstream.login(&user_id, &password).await?;
    tracing::info!(role = ?session.user.role, "user logged in");
    Ok(Json(session))
}

/// Signs up. Answers `201` with the new profile when the upstream sent one.
pub(super) async fn register(
    State(state): State<SharedAppState>,
    Json(registration): Json<Registration>,
) -> Result<Response, RegisterError> {
    use RegisterError as E;

    if registration.user_id.trim().is_empty() {
        return Err(E::MissingUserId);
    }
    if registration.password.is_empty() {
        return Err(E::MissingPassword);
    }

    let profile = state.upstream.register(&registration).await?;
    tracing::info!(role = ?registration.role, "user registered");
    Ok(match profile {
        Some(profile) => (StatusCode::CREATED, Json(profile)).into_response(),
        None => StatusCode::CREATED.into_response(),
    })
}

#[derive(Debug, From)]
pub enum RegisterError {
    #[from]
    Upstream(upstream::Error),
    MissingUserId,
    MissingPassword,
}

impl IntoResponse for RegisterError {
    fn into_response(self) -> Response {
        match self {
            Self::Upstream(e) => upstream_response(e),
            Self::MissingUserId | Self::MissingPassword => {
                StatusCode::BAD_REQUEST.into_response()
            }
        }
    }
}

pub(super) async fn me(
    State(state): State<SharedAppState>,
    Token(token): Token,
) -> Result<Json<Profile>, ProxyError> {
    Ok(Json(state.upstream.me(&token).await?))
}

pub(super) async fn update_me(
    State(state): State<SharedAppState>,
    Token(token): Token,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<Profile>, UpdateProfileError> {
    use UpdateProfileError as E;

    if update.nickname.trim().is_empty() {
        return Err(E::BlankNickname);
    }
    if !is_mobile_number(&update.contact_phone) {
        return Err(E::InvalidPhone);
    }

    Ok(Json(state.upstream.update_me(&token, &update).await?))
}

#[derive(Debug, From)]
pub enum UpdateProfileError {
    #[from]
    Upstream(upstream::Error),
    BlankNickname,
    InvalidPhone,
}

impl IntoResponse for UpdateProfileError {
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

pub(super) async fn get(
    State(state): State<SharedAppState>,
    Token(token): Token,
    PathId(id): PathId,
) -> Result<Json<Profile>, ProxyError> {
    Ok(Json(state.upstream.user(&token, &id).await?))
}
