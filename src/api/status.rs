use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Ticket lifecycle state as the UI sees it.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Submitted, nobody has taken it yet.
    #[default]
    Pending,

    /// Assigned to a worker who is on it.
    Processing,

    /// Worker reported the repair as done.
    Completed,

    /// Waiting for the student's rating.
    ToBeEvaluated,

    /// Finished, with or without feedback.
    Closed,

    /// Refused by an administrator.
    Rejected,
}

/// Ticket lifecycle state as the upstream API spells it.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackendStatus {
    WaitingAccept,
    InProgress,
    Resolved,
    WaitingFeedback,
    Feedbacked,
    Closed,
    Rejected,
}

/// Display metadata of a frontend token.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct StatusInfo<'a> {
    pub label: Cow<'a, str>,
    pub color: &'static str,
}

/// One row of the backend/frontend correspondence.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Row {
    pub backend: BackendStatus,
    pub frontend: Status,
    pub label: &'static str,
    pub color: &'static str,
}

pub const TABLE: [Row; 7] = [
    row(BackendStatus::WaitingAccept),
    row(BackendStatus::InProgress),
    row(BackendStatus::Resolved),
    row(BackendStatus::WaitingFeedback),
    row(BackendStatus::Feedbacked),
    row(BackendStatus::Closed),
    row(BackendStatus::Rejected),
];

const fn row(backend: BackendStatus) -> Row {
    let frontend = backend.to_frontend();
    Row {
        backend,
        frontend,
        label: frontend.label(),
        color: frontend.color(),
    }
}

impl BackendStatus {
    pub const ALL: [Self; 7] = [
        Self::WaitingAccept,
        Self::InProgress,
        Self::Resolved,
        Self::WaitingFeedback,
        Self::Feedbacked,
        Self::Closed,
        Self::Rejected,
    ];

    pub const fn token(self) -> &'static str {
        match self {
            Self::WaitingAccept => "WAITING_ACCEPT",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
            Self::WaitingFeedback => "WAITING_FEEDBACK",
            Self::Feedbacked => "FEEDBACKED",
            Self::Closed => "CLOSED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Exact, case-sensitive match on the upstream spelling.
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.token() == token)
    }

    /// `Feedbacked` and `Closed` both become [`Status::Closed`]; the
    /// distinction does not survive the mapping.
    pub const fn to_frontend(self) -> Status {
        match self {
            Self::WaitingAccept => Status::Pending,
            Self::InProgress => Status::Processing,
            Self::Resolved => Status::Completed,
            Self::WaitingFeedback => Status::ToBeEvaluated,
            Self::Feedbacked | Self::Closed => Status::Closed,
            Self::Rejected => Status::Rejected,
        }
    }
}

impl From<BackendStatus> for Status {
    fn from(status: BackendStatus) -> Self {
        status.to_frontend()
    }
}

impl Status {
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Processing,
        Self::Completed,
        Self::ToBeEvaluated,
        Self::Closed,
        Self::Rejected,
    ];

    pub const fn token(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::ToBeEvaluated => "to_be_evaluated",
            Self::Closed => "closed",
            Self::Rejected => "rejected",
        }
    }

    /// Case-insensitive match on the frontend spelling.
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.token().eq_ignore_ascii_case(token))
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "待受理",
            Self::Processing => "处理中",
            Self::Completed => "已完成",
            Self::ToBeEvaluated => "待评价",
            Self::Closed => "已关闭",
            Self::Rejected => "已驳回",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Pending => "orange",
            Self::Processing => "blue",
            Self::Completed => "green",
            Self::ToBeEvaluated => "purple",
            Self::Closed => "default",
            Self::Rejected => "red",
        }
    }

    pub fn info(self) -> StatusInfo<'static> {
        StatusInfo {
            label: Cow::Borrowed(self.label()),
            color: self.color(),
        }
    }

    /// Token to send upstream when requesting this state or filtering by
    /// it. `Closed` goes out as `CLOSED`.
    pub const fn to_backend(self) -> BackendStatus {
        match self {
            Self::Pending => BackendStatus::WaitingAccept,
            Self::Processing => BackendStatus::InProgress,
            Self::Completed => BackendStatus::Resolved,
            Self::ToBeEvaluated => BackendStatus::WaitingFeedback,
            Self::Closed => BackendStatus::Closed,
            Self::Rejected => BackendStatus::Rejected,
        }
    }
}

/// Maps any status token the upstream may send to a frontend state.
///
/// Backend tokens are matched exactly, then frontend tokens regardless of
/// case. Anything else, including a missing value, lands on
/// [`Status::Pending`].
pub fn to_frontend(raw: Option<&str>) -> Status {
    let Some(raw) = raw else {
        return Status::default();
    };
    if let Some(status) = BackendStatus::parse(raw) {
        return status.to_frontend();
    }
    Status::parse(raw).unwrap_or_else(|| {
        tracing::debug!(token = raw, "unrecognized status token");
        Status::default()
    })
}

/// Label and color of a frontend token.
///
/// Tokens this build does not know are shown verbatim in the neutral
/// color.
pub fn label_of(token: &str) -> StatusInfo<'_> {
    Status::ALL
        .into_iter()
        .find(|s| s.token() == token)
        .map(Status::info)
        .unwrap_or(StatusInfo {
            label: Cow::Borrowed(token),
            color: "default",
        })
}
