use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{
    format_description::well_known::Iso8601, macros::format_description,
    Duration, PrimitiveDateTime,
};

use super::{
    raw::{self, Raw},
    status, Category, Id, Priority, Status,
};

/// Fallback title when neither a usable title nor a location is known.
pub const UNTITLED: &str = "报修单";

/// Repair ticket in the one shape the UI relies on.
///
/// Produced by [`reconcile`] right after every upstream fetch; nothing
/// downstream reads upstream field names.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: Option<Id>,
    pub title: String,
    pub description: String,

    /// Category key when recognized, otherwise the upstream text.
    pub category: String,
    pub location: String,
    pub priority: Priority,
    pub status: Status,

    /// Status token exactly as the upstream sent it.
    pub original_status: Option<String>,
    pub student_id: String,
    pub student_name: Option<String>,
    pub contact_phone: Option<String>,
    pub repairman_id: Option<Id>,
    pub repairman_name: Option<String>,
    pub created_at: Option<String>,
    pub assigned_at: Option<String>,
    pub completed_at: Option<String>,
    pub estimated_completion_time: Option<String>,
    pub process_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub rating: Option<f64>,
    pub feedback: Option<String>,
    pub images: Vec<String>,
    pub deleted: bool,
    pub deleted_at: Option<String>,
}

/// Builds a [`Ticket`] out of any upstream ticket payload.
///
/// Where the upstream sends the same datum under several names, the newer
/// name wins: `ticketId` over `id`, `categoryName` over `category`,
/// `locationText` over `location`, `staffId` over `repairmanId`, and so on.
/// Missing fields degrade to empty values; this never fails.
pub fn reconcile(value: &Value) -> Ticket {
    let raw = Raw::new(value);

    let description = raw.str(&["description"]).unwrap_or_default();
    let location = raw.str(&["locationText", "location"]).unwrap_or_default();
    let title =
        title_for(raw.str(&["title"]).as_deref(), &description, &location);

    let original_status = raw.str(&["status"]);
    let status = status::to_frontend(original_status.as_deref());

    let rating_record = raw.object("rating");
    let rating = raw
        .f64(&["ratingScore"])
        .or_else(|| rating_record.and_then(|r| r.f64(&["score"])))
        .or_else(|| raw.f64(&["rating"]));
    let feedback = rating_record
        .and_then(|r| r.present(&["comment"]))
        .or_else(|| raw.present(&["feedback"]))
        .and_then(raw::as_text);

    Ticket {
        id: raw.id(&["ticketId", "id"]),
        title,
        description,
        category: category_key(raw.str(&["categoryName", "category"])),
        location,
        priority: Priority::from_raw(raw.str(&["priority"]).as_deref()),
        status,
        original_status,
        student_id: raw.str(&["studentId", "studentID"]).unwrap_or_default(),
        student_name: raw.str(&["studentNickname", "studentName"]),
        contact_phone: raw.str(&["contactPhone", "studentPhone", "phone"]),
        repairman_id: raw.id(&["staffId", "repairmanId"]),
        repairman_name: raw.str(&["staffName", "repairmanName"]),
        created_at: raw.str(&["createdAt", "created_at"]),
        assigned_at: raw.str(&["assignedAt", "assigned_at"]),
        completed_at: raw.str(&["completedAt", "completed_at"]),
        estimated_completion_time: raw.str(&[
            "estimatedCompletionTime",
            "estimated_completion_time",
        ]),
        process_notes: raw.str(&["processNotes", "notes"]),
        rejection_reason: raw.str(&["rejectionReason", "rejection_reason"]),
        rating,
        feedback,
        images: raw
            .array(&["images"])
            .map(|images| images.iter().filter_map(image_path).collect())
            .unwrap_or_default(),
        deleted: raw.bool(&["deleted"]),
        deleted_at: raw.str(&["deletedAt"]),
    }
}

/// Title to show for a ticket.
///
/// Some upstream endpoints store the description in the title column, so a
/// title equal to the description counts as missing.
pub fn title_for(
    title: Option<&str>,
    description: &str,
    location: &str,
) -> String {
    match title {
        Some(title) if !title.is_empty() && title != description => {
            title.to_owned()
        }
        _ if !location.is_empty() => format!("报修-{location}"),
        _ => UNTITLED.to_owned(),
    }
}

fn category_key(raw: Option<String>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    match Category::parse(&raw) {
        Some(category) => category.key().to_owned(),
        None => {
            tracing::debug!(category = %raw, "unrecognized category");
            raw
        }
    }
}

fn image_path(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(_) => Raw::new(value).str(&["imageUrl", "url"]),
        _ => None,
    }
}

/// Resolves an image path against the upstream asset origin. Absolute URLs
/// are returned untouched.
pub fn absolutize_image(path: &str, origin: &str) -> String {
    if path.starts_with("http") {
        return path.to_owned();
    }
    format!(
        "{}/{}",
        origin.trim_end_matches('/'),
        path.trim_start_matches('/'),
    )
}

/// Parses the upstream's offset-less local timestamps.
pub fn parse_timestamp(s: &str) -> Option<PrimitiveDateTime> {
    let t_separated = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
    );
    let spaced = format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"
    );
    PrimitiveDateTime::parse(s, t_separated)
        .or_else(|_| PrimitiveDateTime::parse(s, spaced))
        .or_else(|_| PrimitiveDateTime::parse(s, &Iso8601::DEFAULT))
        .ok()
}

impl Ticket {
    /// Time spent on the ticket: from assignment until completion, or until
    /// `now` while still open.
    pub fn duration(&self, now: PrimitiveDateTime) -> Option<Duration> {
        let start = parse_timestamp(self.assigned_at.as_deref()?)?;
        let end = match self.completed_at.as_deref() {
            Some(completed_at) => parse_timestamp(completed_at)?,
            None => now,
        };
        Some(end - start)
    }

    pub fn is_overdue(&self, now: PrimitiveDateTime) -> bool {
        if self.completed_at.is_some() {
            return false;
        }
        self.estimated_completion_time
            .as_deref()
            .and_then(parse_timestamp)
            .is_some_and(|deadline| now > deadline)
    }

    pub fn absolutize_images(&mut self, origin: &str) {
        for image in &mut self.images {
            *image = absolutize_image(image, origin);
        }
    }
}

/// Renders a duration as `<h>小时<m>分钟`, or `<m>分钟` under an hour.
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.whole_minutes().max(0);
    let (hours, minutes) = (minutes / 60, minutes % 60);
    if hours > 0 {
        format!("{hours}小时{minutes}分钟")
    } else {
        format!("{minutes}分钟")
    }
}

/// Task as shown to the worker, with time tracking filled in.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Ticket,
    pub duration: Option<String>,
    pub overdue: bool,
}

impl TaskDetail {
    pub fn new(task: Ticket, now: PrimitiveDateTime) -> Self {
        Self {
            duration: task.duration(now).map(format_duration),
            overdue: task.is_overdue(now),
            task,
        }
    }
}
