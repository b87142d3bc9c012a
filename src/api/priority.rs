use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    pub const fn token(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.token().eq_ignore_ascii_case(token.trim()))
    }

    /// Absent or unknown values fall back to [`Priority::Low`].
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None => Self::default(),
            Some(raw) => Self::parse(raw).unwrap_or_else(|| {
                tracing::debug!(token = raw, "unrecognized priority");
                Self::default()
            }),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "低",
            Self::Medium => "中",
            Self::High => "高",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Low => "blue",
            Self::Medium => "orange",
            Self::High => "red",
        }
    }
}
