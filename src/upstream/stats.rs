use futures::future;
use reqwest::Method;
use serde_json::Value;

use crate::api::stats::{
    self, CategoryStat, LocationStat, MonthlyStat, Overview, RepairmanRating,
    StatusStat,
};

use super::{Client, Error};

impl Client {
    async fn stats(&self, token: &str, name: &str) -> Result<Value, Error> {
        let req =
            self.request(Method::GET, &["admin", "stats", name], Some(token));
        self.send(req).await
    }

    pub async fn category_stats(
        &self,
        token: &str,
    ) -> Result<Vec<CategoryStat>, Error> {
        Ok(stats::categories(&self.stats(token, "category").await?))
    }

    pub async fn location_stats(
        &self,
        token: &str,
    ) -> Result<Vec<LocationStat>, Error> {
        Ok(stats::locations(&self.stats(token, "location").await?))
    }

    pub async fn repairman_ratings(
        &self,
        token: &str,
    ) -> Result<Vec<RepairmanRating>, Error> {
        Ok(stats::repairman_ratings(
            &self.stats(token, "repairman-rating").await?,
        ))
    }

    pub async fn status_stats(
        &self,
        token: &str,
    ) -> Result<Vec<StatusStat>, Error> {
        Ok(stats::statuses(&self.stats(token, "status").await?))
    }

    pub async fn monthly_stats(
        &self,
        token: &str,
    ) -> Result<Vec<MonthlyStat>, Error> {
        Ok(stats::monthly(&self.stats(token, "monthly").await?))
    }

    pub async fn overview(&self, token: &str) -> Result<Overview, Error> {
        let (categories, by_status) = future::try_join(
            self.category_stats(token),
            self.status_stats(token),
        )
        .await?;
        Ok(stats::overview(&categories, by_status))
    }
}
