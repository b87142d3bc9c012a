use reqwest::Method;

use crate::api::{feedback, Feedback, Id};

use super::{Client, Error, Filters};

impl Client {
    pub async fn feedbacks(
        &self,
        token: &str,
        filters: &Filters,
    ) -> Result<Vec<Feedback>, Error> {
        let req = self
            .request(Method::GET, &["admin", "feedbacks"], Some(token))
            .query(&filters.to_query());
        Ok(feedback::list(&self.send(req).await?))
    }

    pub async fn delete_feedback(
        &self,
        token: &str,
        id: &Id,
    ) -> Result<(), Error> {
        let id = id.to_string();
        let req = self.request(
            Method::DELETE,
            &["admin", "feedbacks", &id],
            Some(token),
        );
        self.send(req).await.map(drop)
    }
}
