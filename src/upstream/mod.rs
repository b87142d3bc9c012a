//! Client of the maintenance REST API.
//!
//! Every payload that leaves this module has been normalized into an
//! [`api`](crate::api) type; raw upstream field names stop here.

pub mod feedback;
pub mod stats;
pub mod ticket;
pub mod user;

use std::time::Duration;

use derive_more::{Display, From};
use reqwest::{
    header::CONTENT_TYPE, Method, RequestBuilder, StatusCode, Url,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    api::{user::SessionError, BackendStatus, Status},
    config,
};

pub use self::{
    ticket::{Evaluation, NewTicket},
    user::{ProfileUpdate, Registration, UserUpdate},
};

/// Envelope `code` of a successful call.
pub const OK_CODE: i64 = 200;

#[derive(Debug, Display, From)]
pub enum Error {
    #[display("upstream unreachable: {_0}")]
    #[from]
    Transport(reqwest::Error),

    #[display("upstream answered {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[display("upstream refused the request ({code}): {message}")]
    Rejected { code: i64, message: String },

    #[display("upstream answered with non-JSON data")]
    NotJson,

    #[display("malformed login response: {_0}")]
    #[from]
    Session(SessionError),

    #[display("upstream payload has no `{_0}`")]
    MissingField(&'static str),

    #[display("invalid upstream base URL `{_0}`")]
    BaseUrl(String),
}

impl std::error::Error for Error {}

pub struct Client {
    http: reqwest::Client,

    /// Always a hierarchical URL, so path segments can be appended.
    base_url: Url,
    asset_origin: String,
    login_timeout: Duration,
}

impl Client {
    pub fn new(config: &config::Upstream) -> Result<Self, Error> {
        let base_url = Url::parse(&config.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| Error::BaseUrl(config.base_url.clone()))?;
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url,
            asset_origin: config.asset_origin.clone(),
            login_timeout: config.login_timeout,
        })
    }

    pub fn asset_origin(&self) -> &str {
        &self.asset_origin
    }

    /// Upstream URL for `path` under the base URL. Each element is one
    /// percent-encoded segment, so ids cannot add segments or a query.
    fn url(&self, path: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path);
        }
        url
    }

    fn request(
        &self,
        method: Method,
        path: &[&str],
        token: Option<&str>,
    ) -> RequestBuilder {
        let req = self.http.request(method, self.url(path));
        match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Sends a request and returns the envelope's `data`.
    async fn send(&self, req: RequestBuilder) -> Result<Value, Error> {
        let res = req.send().await?;
        let status = res.status();
        let url = res.url().clone();
        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        let is_json = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"));

        if !status.is_success() {
            let body = if is_json {
                res.json::<Value>().await.ok()
            } else {
                None
            };
            let message = body
                .as_ref()
                .and_then(|body| body.get("message"))
                .and_then(Value::as_str)
                .map_or_else(
                    || format!("请求失败: {}", status.as_u16()),
                    str::to_owned,
                );
            tracing::warn!(%url, %status, %message, "upstream request failed");
            return Err(Error::Status { status, message });
        }
        if !is_json {
            tracing::warn!(
                %url,
                %status,
                "upstream answered with non-JSON data",
            );
            return Err(Error::NotJson);
        }

        unwrap_envelope(res.json().await?)
    }
}

/// Unwraps `{ code, message, data }`. Bodies without a numeric `code` are
/// not enveloped and pass through whole.
pub fn unwrap_envelope(body: Value) -> Result<Value, Error> {
    let Some(code) = body.get("code").and_then(Value::as_i64) else {
        return Ok(body);
    };
    if code != OK_CODE {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("请求失败")
            .to_owned();
        return Err(Error::Rejected { code, message });
    }
    Ok(match body {
        Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
        _ => Value::Null,
    })
}

/// List filters shared by the ticket, task and feedback listings.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    pub status: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub keyword: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl Filters {
    /// Query pairs to send upstream. Blank values and the `all` wildcard are
    /// dropped, and a frontend status is sent as all of its backend tokens.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        fn choice(value: &Option<String>) -> Option<&str> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
        }

        let mut query = Vec::new();
        if let Some(status) = choice(&self.status) {
            match Status::parse(status) {
                // `closed` covers both FEEDBACKED and CLOSED, so every
                // backend token of the state is sent as a repeated param.
                Some(status) => query.extend(
                    BackendStatus::ALL
                        .into_iter()
                        .filter(|b| b.to_frontend() == status)
                        .map(|b| ("status", b.token().to_owned())),
                ),
                None => query.push(("status", status.to_owned())),
            }
        }
        if let Some(category) = choice(&self.category) {
            query.push(("category", category.to_owned()));
        }
        if let Some(priority) = choice(&self.priority) {
            query.push(("priority", priority.to_owned()));
        }
        if let Some(keyword) =
            self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty())
        {
            query.push(("keyword", keyword.to_owned()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            query.push(("pageSize", page_size.to_string()));
        }
        query
    }
}
