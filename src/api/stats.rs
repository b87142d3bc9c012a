//! Dashboard figures. The upstream statistics views are loosely typed, so
//! every count accepts a few spellings and defaults to zero.

use itertools::Itertools as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    category,
    raw::{self, Raw},
    status::BackendStatus,
    Id, Status, Ticket,
};

/// Label for a status bucket the upstream left unnamed.
pub const UNKNOWN_STATUS: &str = "未知状态";

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStat {
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub value: u64,
    pub total_tickets: u64,
    pub avg_rating: f64,
    pub completed_tickets: u64,
    pub rated_tickets: u64,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct LocationStat {
    pub location: String,
    pub count: u64,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairmanRating {
    pub id: Option<Id>,
    pub name: String,
    pub rating: f64,
    pub completed_orders: u64,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct StatusStat {
    /// `None` when the upstream reported a state this build doesn't know.
    pub status: Option<Status>,
    pub raw: Option<String>,
    pub label: String,
    pub color: String,
    pub value: u64,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct MonthlyStat {
    pub month: String,
    pub orders: u64,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_repairs: u64,
    pub by_status: Vec<StatusStat>,
}

/// A worker's task counters.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub processing: usize,

    /// Everything the worker is done with: completed, awaiting rating and
    /// closed.
    pub completed: usize,
    pub to_be_evaluated: usize,
    pub closed: usize,

    /// Mean over rated tasks, one decimal.
    pub average_rating: Option<f64>,
}

fn count(raw: Raw<'_>, keys: &[&str]) -> u64 {
    raw.truthy(keys)
        .and_then(raw::as_number)
        .filter(|n| *n >= 0.0)
        .map_or(0, |n| n as u64)
}

fn items(data: &Value) -> &[Value] {
    data.as_array().map(Vec::as_slice).unwrap_or_default()
}

pub fn categories(data: &Value) -> Vec<CategoryStat> {
    items(data)
        .iter()
        .map(|item| {
            let raw = Raw::new(item);
            let kind =
                raw.str(&["category", "name", "type"]).unwrap_or_default();
            let total = count(
                raw,
                &["totalTickets", "total_tickets", "count", "value"],
            );
            CategoryStat {
                label: category::category_info(&kind).label,
                kind,
                value: total,
                total_tickets: total,
                avg_rating: raw
                    .f64(&["avgRating"])
                    .or_else(|| {
                        raw.truthy(&["avg_rating"]).and_then(raw::as_number)
                    })
                    .unwrap_or(0.0),
                completed_tickets: count(
                    raw,
                    &["completedTickets", "completed_tickets"],
                ),
                rated_tickets: count(raw, &["ratedTickets", "rated_tickets"]),
            }
        })
        .collect()
}

pub fn locations(data: &Value) -> Vec<LocationStat> {
    items(data)
        .iter()
        .map(|item| {
            let raw = Raw::new(item);
            LocationStat {
                location: raw.str(&["location", "name"]).unwrap_or_default(),
                count: count(raw, &["count", "value"]),
            }
        })
        .collect()
}

pub fn repairman_ratings(data: &Value) -> Vec<RepairmanRating> {
    items(data)
        .iter()
        .map(|item| {
            let raw = Raw::new(item);
            RepairmanRating {
                id: raw.id(&["id"]),
                name: raw.str(&["name"]).unwrap_or_default(),
                rating: raw.f64(&["rating"]).unwrap_or(0.0),
                completed_orders: count(raw, &["completedOrders", "count"]),
            }
        })
        .collect()
}

/// Status distribution. Counts are kept per upstream token, so `FEEDBACKED`
/// and `CLOSED` stay separate buckets even though both are labelled closed.
pub fn statuses(data: &Value) -> Vec<StatusStat> {
    items(data)
        .iter()
        .map(|item| {
            let raw = Raw::new(item);
            let token = raw.str(&["status"]);
            let status = token.as_deref().and_then(|t| {
                BackendStatus::parse(t)
                    .map(BackendStatus::to_frontend)
                    .or_else(|| Status::parse(t))
            });
            let (label, color) = match status {
                Some(s) => (s.label().to_owned(), s.color().to_owned()),
                None => (
                    token.clone().unwrap_or_else(|| UNKNOWN_STATUS.to_owned()),
                    "default".to_owned(),
                ),
            };
            StatusStat {
                status,
                raw: token,
                label,
                color,
                value: count(raw, &["count", "value"]),
            }
        })
        .collect()
}

/// Monthly counts out of `{ months: [...] }`.
pub fn monthly(data: &Value) -> Vec<MonthlyStat> {
    Raw::new(data)
        .array(&["months"])
        .unwrap_or_default()
        .iter()
        .map(|item| {
            let raw = Raw::new(item);
            MonthlyStat {
                month: raw.str(&["month", "date"]).unwrap_or_default(),
                orders: count(raw, &["count", "orders", "value"]),
            }
        })
        .collect()
}

pub fn overview(
    categories: &[CategoryStat],
    by_status: Vec<StatusStat>,
) -> Overview {
    Overview {
        total_repairs: categories.iter().map(|c| c.value).sum(),
        by_status,
    }
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Ticket]) -> Self {
        let counts = tasks.iter().counts_by(|task| task.status);
        let n = |status: Status| counts.get(&status).copied().unwrap_or(0);

        let ratings = tasks.iter().filter_map(|t| t.rating).collect_vec();
        let average_rating = (!ratings.is_empty()).then(|| {
            let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
            (mean * 10.0).round() / 10.0
        });

        Self {
            total: tasks.len(),
            pending: n(Status::Pending),
            processing: n(Status::Processing),
            completed: n(Status::Completed)
                + n(Status::ToBeEvaluated)
                + n(Status::Closed),
            to_be_evaluated: n(Status::ToBeEvaluated),
            closed: n(Status::Closed),
            average_rating,
        }
    }
}
