use reqwest::{multipart, Method};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::{
    ticket::reconcile, BackendStatus, Category, Id, Page, Priority, Ticket,
};

use super::{Client, Error, Filters};

/// Repair request as submitted by a student.
#[derive(Clone, Debug)]
pub struct NewTicket {
    pub title: Option<String>,
    pub category: Category,
    pub location: String,
    pub description: String,
    pub priority: Priority,
    pub student_id: Option<String>,
}

/// A student's rating of a finished ticket.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub student_id: String,
    pub score: u8,
    #[serde(default)]
    pub comment: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusChange<'a> {
    new_status: BackendStatus,
    rejection_reason: Option<&'a str>,
}

impl Client {
    fn ticket(&self, data: &Value) -> Ticket {
        let mut ticket = reconcile(data);
        ticket.absolutize_images(self.asset_origin());
        ticket
    }

    fn ticket_page(&self, data: &Value) -> Page<Ticket> {
        Page::from_data(data, |item| self.ticket(item))
    }

    /// Transition endpoints answer with the updated ticket or with nothing.
    fn maybe_ticket(&self, data: &Value) -> Option<Ticket> {
        data.is_object().then(|| self.ticket(data))
    }

    pub async fn my_orders(
        &self,
        token: &str,
        filters: &Filters,
    ) -> Result<Page<Ticket>, Error> {
        let req = self
            .request(Method::GET, &["repair-orders", "my"], Some(token))
            .query(&filters.to_query());
        Ok(self.ticket_page(&self.send(req).await?))
    }

    pub async fn order(&self, token: &str, id: &Id) -> Result<Ticket, Error> {
        let id = id.to_string();
        let req =
            self.request(Method::GET, &["repair-orders", &id], Some(token));
        Ok(self.ticket(&self.send(req).await?))
    }

    /// Submits a ticket as multipart text fields; the upstream wants both
    /// the location and the numeric category id under their creation names.
    pub async fn create_order(
        &self,
        token: &str,
        ticket: NewTicket,
    ) -> Result<Option<Ticket>, Error> {
        let mut form = multipart::Form::new()
            .text("category", ticket.category.key())
            .text("categoryId", ticket.category.id().to_string())
            .text("location", ticket.location.clone())
            .text("locationText", ticket.location)
            .text("description", ticket.description)
            .text("priority", ticket.priority.token());
        if let Some(title) = ticket.title {
            form = form.text("title", title);
        }
        if let Some(student_id) = ticket.student_id {
            form = form.text("studentId", student_id);
        }

        let req = self
            .request(Method::POST, &["repair-orders"], Some(token))
            .multipart(form);
        Ok(self.maybe_ticket(&self.send(req).await?))
    }

    pub async fn delete_order(
        &self,
        token: &str,
        id: &Id,
    ) -> Result<(), Error> {
        let id = id.to_string();
        let req =
            self.request(Method::DELETE, &["repair-orders", &id], Some(token));
        self.send(req).await.map(drop)
    }

    pub async fn evaluate_order(
        &self,
        token: &str,
        id: &Id,
        evaluation: &Evaluation,
    ) -> Result<Option<Ticket>, Error> {
        let id = id.to_string();
        let req = self
            .request(
                Method::POST,
                &["repair-orders", &id, "evaluate"],
                Some(token),
            )
            .json(evaluation);
        Ok(self.maybe_ticket(&self.send(req).await?))
    }

    pub async fn my_tasks(
        &self,
        token: &str,
        filters: &Filters,
    ) -> Result<Page<Ticket>, Error> {
        let req = self
            .request(Method::GET, &["tasks", "my"], Some(token))
            .query(&filters.to_query());
        Ok(self.ticket_page(&self.send(req).await?))
    }

    pub async fn task(&self, token: &str, id: &Id) -> Result<Ticket, Error> {
        let id = id.to_string();
        let req = self.request(Method::GET, &["tasks", &id], Some(token));
        Ok(self.ticket(&self.send(req).await?))
    }

    pub async fn start_task(
        &self,
        token: &str,
        id: &Id,
    ) -> Result<Option<Ticket>, Error> {
        self.change_status(
            token,
            &["tasks", &id.to_string(), "status"],
            BackendStatus::InProgress,
            None,
        )
        .await
    }

    pub async fn complete_task(
        &self,
        token: &str,
        id: &Id,
    ) -> Result<Option<Ticket>, Error> {
        self.change_status(
            token,
            &["tasks", &id.to_string(), "complete"],
            BackendStatus::Resolved,
            None,
        )
        .await
    }

    pub async fn all_orders(
        &self,
        token: &str,
        filters: &Filters,
    ) -> Result<Page<Ticket>, Error> {
        let req = self
            .request(Method::GET, &["admin", "repair-orders"], Some(token))
            .query(&filters.to_query());
        Ok(self.ticket_page(&self.send(req).await?))
    }

    pub async fn assign_order(
        &self,
        token: &str,
        id: &Id,
        repairman_id: &Id,
    ) -> Result<Option<Ticket>, Error> {
        let id = id.to_string();
        let req = self
            .request(
                Method::PUT,
                &["admin", "repair-orders", &id, "assign"],
                Some(token),
            )
            .json(&json!({ "repairmanId": repairman_id }));
        Ok(self.maybe_ticket(&self.send(req).await?))
    }

    pub async fn reject_order(
        &self,
        token: &str,
        id: &Id,
        reason: &str,
    ) -> Result<Option<Ticket>, Error> {
        self.change_status(
            token,
            &["tasks", &id.to_string(), "status"],
            BackendStatus::Rejected,
            Some(reason),
        )
        .await
    }

    async fn change_status(
        &self,
        token: &str,
        path: &[&str],
        new_status: BackendStatus,
        rejection_reason: Option<&str>,
    ) -> Result<Option<Ticket>, Error> {
        let req = self.request(Method::PUT, path, Some(token)).json(
            &StatusChange {
                new_status,
                rejection_reason,
            },
        );
        Ok(self.maybe_ticket(&self.send(req).await?))
    }
}
