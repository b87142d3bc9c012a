use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{raw::Raw, Id};

/// Shown when the upstream has no name for a person.
pub const UNKNOWN_NAME: &str = "未知";

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,

    /// Repair worker.
    Staff,

    Admin,
}

impl Role {
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "STUDENT" => Some(Self::Student),
            "STAFF" => Some(Self::Staff),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }

    pub const fn token(self) -> &'static str {
        match self {
            Self::Student => "STUDENT",
            Self::Staff => "STAFF",
            Self::Admin => "ADMIN",
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Option<Id>,
    pub username: Option<String>,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub role: Option<Role>,
}

impl Profile {
    pub fn from_raw(value: &Value) -> Self {
        let raw = Raw::new(value);
        Self {
            id: raw.id(&["userId", "id"]),
            username: raw.str(&["username"]),
            name: raw
                .str(&["nickname", "name", "username"])
                .unwrap_or_else(|| UNKNOWN_NAME.to_owned()),
            phone: raw.str(&["contactPhone", "phone"]).unwrap_or_default(),
            email: raw.str(&["email"]),
            avatar: raw.str(&["avatar", "avatarUrl"]),
            role: raw.str(&["role"]).as_deref().and_then(Role::parse),
        }
    }
}

/// Result of a successful login.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Session {
    pub token: String,
    pub user: Profile,
}

#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum SessionError {
    #[display("login response carries no token")]
    MissingToken,

    #[display("unknown user role `{_0}`")]
    UnknownRole(String),
}

impl std::error::Error for SessionError {}

impl Session {
    /// Reads `{ token, user }` from a login payload. A role the UI cannot
    /// route is an error rather than a default.
    pub fn from_raw(value: &Value) -> Result<Self, SessionError> {
        let raw = Raw::new(value);
        let token = raw.str(&["token"]).ok_or(SessionError::MissingToken)?;
        let user_raw = raw.object("user").unwrap_or(raw);
        let user = Profile::from_raw(user_raw.value());
        if user.role.is_none() {
            let role = user_raw.str(&["role"]).unwrap_or_default();
            return Err(SessionError::UnknownRole(role));
        }
        Ok(Self { token, user })
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Student,
    Repairman,
}

impl MemberKind {
    /// Role filter the upstream user directory expects.
    pub const fn role(self) -> Role {
        match self {
            Self::Student => Role::Student,
            Self::Repairman => Role::Staff,
        }
    }
}

/// Entry of the student or repairman directory.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: Option<Id>,

    /// Student or staff number; the upstream uses the user id for it.
    pub number: Option<Id>,
    pub name: String,
    pub phone: String,
    pub kind: MemberKind,
}

impl Member {
    pub fn from_raw(value: &Value, kind: MemberKind) -> Self {
        let raw = Raw::new(value);
        let id = raw.id(&["userId", "id"]);
        Self {
            number: id.clone(),
            id,
            name: raw
                .str(&["nickname", "name"])
                .unwrap_or_else(|| UNKNOWN_NAME.to_owned()),
            phone: raw.str(&["contactPhone", "phone"]).unwrap_or_default(),
            kind,
        }
    }
}

/// Outcome of an administrator's password reset.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub user_id: Option<Id>,
    pub new_password: String,
    pub message: Option<String>,
}

impl PasswordReset {
    /// `None` when the payload carries no new password.
    pub fn from_raw(value: &Value) -> Option<Self> {
        let raw = Raw::new(value);
        Some(Self {
            new_password: raw.str(&["newPassword"])?,
            user_id: raw.id(&["userId", "id"]),
            message: raw.str(&["message"]),
        })
    }
}

/// Mainland mobile number: 11 digits, `1` then `3`..=`9`.
pub fn is_mobile_number(phone: &str) -> bool {
    let bytes = phone.as_bytes();
    bytes.len() == 11
        && bytes[0] == b'1'
        && (b'3'..=b'9').contains(&bytes[1])
        && bytes.iter().all(u8::is_ascii_digit)
}
