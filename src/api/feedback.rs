use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    raw::{self, Raw},
    Id,
};

/// A student's rating of a finished repair.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: Option<Id>,

    /// Score from 1 to 5, 0 when the upstream sent none.
    pub rating: f64,
    pub comment: String,
    pub student_id: Option<Id>,
    pub student_name: Option<String>,
    pub repairman_id: Option<Id>,
    pub repairman_name: Option<String>,
    pub created_at: Option<String>,
}

impl Feedback {
    pub fn from_raw(value: &Value) -> Self {
        let raw = Raw::new(value);
        let id = |keys: &[&str]| raw.present(keys).and_then(Id::from_value);
        let text = |keys: &[&str]| raw.present(keys).and_then(raw::as_text);

        Self {
            id: id(&["ratingId", "id"]),
            rating: raw.f64(&["score", "rating"]).unwrap_or(0.0),
            comment: text(&["comment"]).unwrap_or_default(),
            student_id: id(&["studentId", "studentID"]),
            student_name: text(&["studentName"]),
            repairman_id: id(&["staffId", "repairmanId"]),
            repairman_name: text(&["repairmanName", "staffName"]),
            created_at: text(&["ratedAt", "createdAt", "created_at"]),
        }
    }
}

/// Feedback records from a list response, which comes as `{ list }`,
/// `{ data: { list } }`, `{ data: [...] }` or a bare array.
pub fn list(value: &Value) -> Vec<Feedback> {
    let raw = Raw::new(value);
    let nested = raw.object("data");
    raw.array(&["list"])
        .or_else(|| nested.and_then(|data| data.array(&["list"])))
        .or_else(|| raw.array(&["data"]))
        .or_else(|| value.as_array().map(Vec::as_slice))
        .unwrap_or_default()
        .iter()
        .map(Feedback::from_raw)
        .collect()
}
