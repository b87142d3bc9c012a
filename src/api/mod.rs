//! Canonical shapes handed to the UI, and the pure functions that produce
//! them from whatever the upstream API returned.

pub mod category;
pub mod feedback;
pub mod id;
pub mod page;
pub mod priority;
pub mod raw;
pub mod stats;
pub mod status;
pub mod ticket;
pub mod user;

pub use self::{
    category::Category,
    feedback::Feedback,
    id::Id,
    page::Page,
    priority::Priority,
    status::{BackendStatus, Status},
    ticket::Ticket,
    user::{Member, PasswordReset, Profile, Role, Session},
};
