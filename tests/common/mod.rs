use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use campus_repair::{
    api::{
        stats::TaskStats, ticket::TaskDetail, Feedback, Member, Page,
        PasswordReset, Profile, Session, Ticket,
    },
    http, Config,
};
use constcat::concat;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::net::TcpListener;

const ADMIN: &str = "/admin";
const ADMIN_TICKETS: &str = concat!(ADMIN, "/tickets");
const ADMIN_STATS: &str = concat!(ADMIN, "/stats");
const ADMIN_USERS: &str = concat!(ADMIN, "/users");

/// Gateway under test, wired to a fresh mock upstream.
pub struct Gateway {
    pub base_url: String,
    pub upstream: Upstream,
}

pub async fn spawn() -> Gateway {
    spawn_with_timeout("5s").await
}

/// Same as [`spawn`], with the given upstream request timeout.
pub async fn spawn_with_timeout(timeout: &str) -> Gateway {
    let upstream = Upstream::default();
    let upstream_addr = serve(upstream.router()).await;
    Gateway {
        base_url: serve_gateway(upstream_addr, timeout).await,
        upstream,
    }
}

/// Gateway whose upstream port refuses connections.
pub async fn spawn_unreachable() -> Gateway {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind a listener");
    let closed = listener.local_addr().expect("no local address");
    drop(listener);
    Gateway {
        base_url: serve_gateway(closed, "5s").await,
        upstream: Upstream::default(),
    }
}

async fn serve_gateway(upstream_addr: SocketAddr, timeout: &str) -> String {
    let config = toml::from_str::<Config>(&format!(
        r#"
        [http.server]
        addr = "127.0.0.1:0"

        [http.cors]
        allowed_origins = ["http://localhost:5173"]

        [upstream]
        base_url = "http://{upstream_addr}/api"
        asset_origin = "http://{upstream_addr}"
        timeout = "{timeout}"
        "#
    ))
    .expect("invalid test config");
    let app = http::app(&config).expect("failed to build the gateway");
    let addr = serve(app).await;
    format!("http://{addr}")
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind a listener");
    let addr = listener.local_addr().expect("no local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server failed");
    });
    addr
}

/// In-process stand-in for the maintenance REST API. Field names drift
/// between endpoints on purpose.
#[derive(Clone, Default)]
pub struct Upstream {
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl Upstream {
    /// Bodies (or query strings for reads) received on `method path`.
    pub fn received(&self, method: &str, path: &str) -> Vec<String> {
        let key = format!("{method} {path}");
        self.requests
            .lock()
            .expect("poisoned")
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, body)| body.clone())
            .collect()
    }

    fn record(&self, method: &Method, uri: &Uri, body: impl Into<String>) {
        self.requests
            .lock()
            .expect("poisoned")
            .push((format!("{method} {}", uri.path()), body.into()));
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/users/me", get(me).put(update_me))
            .route("/api/users/:id", get(user))
            .route("/api/users", get(users))
            .route("/api/repair-orders", post(create_order))
            .route("/api/repair-orders/my", get(list_orders))
            .route("/api/repair-orders/:id", get(order).delete(delete_order))
            .route("/api/repair-orders/:id/evaluate", post(evaluate_order))
            .route("/api/tasks/my", get(my_tasks))
            .route("/api/tasks/:id", get(task))
            .route("/api/tasks/:id/status", put(change_status))
            .route("/api/tasks/:id/complete", put(complete_task))
            .route("/api/admin/repair-orders", get(list_orders))
            .route("/api/admin/repair-orders/:id/assign", put(assign_order))
            .route(
                "/api/admin/users/:id",
                put(update_user).delete(delete_user),
            )
            .route(
                "/api/admin/users/:id/reset-password",
                post(reset_password),
            )
            .route("/api/admin/feedbacks", get(feedbacks))
            .route("/api/admin/feedbacks/:id", delete(delete_feedback))
            .route("/api/admin/stats/:name", get(stats))
            .with_state(self.clone())
    }
}

fn envelope(data: Value) -> Json<Value> {
    Json(json!({ "code": 200, "message": "success", "data": data }))
}

fn authorized(headers: &HeaderMap) -> Result<(), Response> {
    let ok = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer tok-"));
    if ok {
        Ok(())
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "code": 401, "message": "未登录" })),
        )
            .into_response())
    }
}

fn numeric(id: &str) -> Value {
    id.parse::<i64>().map_or_else(|_| json!(id), |n| json!(n))
}

pub fn orders() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "title": "",
            "description": "水龙头漏水",
            "categoryName": "水电维修",
            "location": "1号楼",
            "locationText": "1号楼 302",
            "priority": "HIGH",
            "status": "WAITING_ACCEPT",
            "studentId": "student1",
            "studentNickname": "小明",
            "createdAt": "2024-05-01T08:00:00",
            "images": [
                "/uploads/a.jpg",
                { "imageUrl": "http://cdn.test/b.jpg" },
            ],
        }),
        json!({
            "ticketId": 2,
            "id": 99,
            "title": "宿舍断网",
            "description": "宿舍断网",
            "category": "networkIssues",
            "location": "2号楼",
            "status": "CLOSED",
            "staffId": 7,
            "repairmanId": 8,
            "staffName": "王师傅",
            "ratingScore": 5,
            "feedback": "很快",
        }),
        json!({
            "id": 3,
            "title": "椅子坏了",
            "description": "椅子腿断了",
            "category": "家具维修",
            "status": "FEEDBACKED",
            "rating": { "score": 4, "comment": "不错" },
            "deleted": true,
            "deletedAt": "2024-03-01 10:00:00",
        }),
    ]
}

async fn login(Json(body): Json<Value>) -> Response {
    match (body["userId"].as_str(), body["password"].as_str()) {
        (Some("student1"), Some("secret")) => envelope(json!({
            "token": "tok-student",
            "user": {
                "userId": "student1",
                "username": "student1",
                "nickname": "小明",
                "role": "STUDENT",
                "contactPhone": "13800000000",
            },
        }))
        .into_response(),
        (Some("worker1"), Some("secret")) => envelope(json!({
            "token": "tok-worker",
            "userId": "worker1",
            "nickname": "王师傅",
            "role": "STAFF",
        }))
        .into_response(),
        (Some("ghost"), Some("secret")) => envelope(json!({
            "token": "tok-ghost",
            "user": { "userId": "ghost", "role": "JANITOR" },
        }))
        .into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "code": 401, "message": "用户名或密码错误" })),
        )
            .into_response(),
    }
}

async fn register(
    State(upstream): State<Upstream>,
    method: Method,
    uri: Uri,
    Json(body): Json<Value>,
) -> Response {
    upstream.record(&method, &uri, body.to_string());
    match body["userId"].as_str() {
        Some("student1") => {
            Json(json!({ "code": 400, "message": "用户ID已存在" }))
                .into_response()
        }
        Some("quiet") => envelope(Value::Null).into_response(),
        _ => envelope(json!({
            "userId": body["userId"],
            "nickname": body["nickname"],
            "contactPhone": body["contactPhone"],
            "role": body["role"],
        }))
        .into_response(),
    }
}

async fn me(headers: HeaderMap) -> Result<Response, Response> {
    authorized(&headers)?;
    let token = headers.get(header::AUTHORIZATION);
    if token.is_some_and(|v| v == "Bearer tok-html") {
        return Ok((
            [(header::CONTENT_TYPE, "text/html")],
            "<html>maintenance</html>",
        )
            .into_response());
    }
    if token.is_some_and(|v| v == "Bearer tok-slow") {
        tokio::time::sleep(Duration::from_secs(2)).await;
    }
    Ok(envelope(json!({
        "userId": "student1",
        "username": "student1",
        "nickname": "小明",
        "role": "STUDENT",
        "phone": "13800000000",
    }))
    .into_response())
}

async fn update_me(
    State(upstream): State<Upstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Response> {
    authorized(&headers)?;
    upstream.record(&method, &uri, body.to_string());
    Ok(envelope(json!({
        "userId": "student1",
        "nickname": body["nickname"],
        "contactPhone": body["contactPhone"],
        "avatarUrl": body["avatarUrl"],
        "role": "STUDENT",
    })))
}

async fn user(
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, Response> {
    authorized(&headers)?;
    Ok(match id.as_str() {
        "student1" => Json(json!({
            "userId": "student1",
            "nickname": "小明",
            "phone": "13800000000",
            "role": "STUDENT",
        }))
        .into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "code": 404, "message": "用户不存在" })),
        )
            .into_response(),
    })
}

async fn update_user(
    State(upstream): State<Upstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Response> {
    authorized(&headers)?;
    upstream.record(&method, &uri, body.to_string());
    Ok(envelope(body))
}

async fn reset_password(
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, Response> {
    authorized(&headers)?;
    Ok(envelope(match id.as_str() {
        "ghost" => json!({ "message": "密码已重置", "userId": id }),
        _ => json!({
            "message": "密码已重置",
            "userId": id,
            "newPassword": "Xy7#kq2m",
        }),
    }))
}

async fn delete_user(
    State(upstream): State<Upstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<StatusCode, Response> {
    authorized(&headers)?;
    upstream.record(&method, &uri, "");
    Ok(StatusCode::NO_CONTENT)
}

async fn users(
    State(upstream): State<Upstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>, Response> {
    authorized(&headers)?;
    upstream.record(&method, &uri, uri.query().unwrap_or_default());
    Ok(match query.get("role").map(String::as_str) {
        Some("STAFF") => envelope(json!([
            { "userId": 7, "nickname": "王师傅", "phone": "13900000000" },
        ])),
        _ => envelope(json!({
            "list": [
                {
                    "userId": "student1",
                    "nickname": "小明",
                    "contactPhone": "13800000000",
                },
                { "id": "student2" },
            ],
            "total": 2,
        })),
    })
}

async fn list_orders(
    State(upstream): State<Upstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Json<Value>, Response> {
    authorized(&headers)?;
    upstream.record(&method, &uri, uri.query().unwrap_or_default());
    let statuses = query
        .iter()
        .filter(|(k, _)| k == "status")
        .map(|(_, v)| v.as_str())
        .collect::<Vec<_>>();
    let list = orders()
        .into_iter()
        .filter(|o| {
            statuses.is_empty() || statuses.iter().any(|s| o["status"] == *s)
        })
        .collect::<Vec<_>>();
    let page = query
        .iter()
        .find(|(k, _)| k == "page")
        .and_then(|(_, p)| p.parse::<u64>().ok())
        .unwrap_or(1);
    Ok(envelope(json!({
        "total": list.len(),
        "page": page,
        "pageSize": 10,
        "list": list,
    })))
}

async fn order(
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, Response> {
    authorized(&headers)?;
    Ok(match id.as_str() {
        "1" => envelope(orders()[0].clone()).into_response(),
        "404" => (
            StatusCode::NOT_FOUND,
            Json(json!({ "code": 404, "message": "工单不存在" })),
        )
            .into_response(),
        "13" => Json(json!({ "code": 4001, "message": "工单已被处理" }))
            .into_response(),
        "500" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => Json(json!({ "ticketId": numeric(&id), "status": "in_progress" }))
            .into_response(),
    })
}

async fn create_order(
    State(upstream): State<Upstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Result<Json<Value>, Response> {
    authorized(&headers)?;
    upstream.record(&method, &uri, body);
    Ok(envelope(json!({
        "ticketId": 42,
        "status": "WAITING_ACCEPT",
        "categoryName": "水电维修",
        "locationText": "3号楼 101",
        "description": "灯不亮",
        "priority": "medium",
    })))
}

async fn delete_order(
    headers: HeaderMap,
    Path(_): Path<String>,
) -> Result<StatusCode, Response> {
    authorized(&headers)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn evaluate_order(
    State(upstream): State<Upstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Result<Json<Value>, Response> {
    authorized(&headers)?;
    upstream.record(&method, &uri, body);
    Ok(envelope(Value::Null))
}

pub fn tasks() -> Vec<Value> {
    vec![
        json!({ "id": 1, "status": "WAITING_ACCEPT" }),
        json!({ "id": 2, "status": "IN_PROGRESS" }),
        json!({ "id": 3, "status": "RESOLVED" }),
        json!({ "id": 4, "status": "WAITING_FEEDBACK" }),
        json!({ "id": 5, "status": "FEEDBACKED", "ratingScore": 4 }),
        json!({ "id": 6, "status": "CLOSED", "rating": { "score": 5 } }),
    ]
}

async fn my_tasks(headers: HeaderMap) -> Result<Json<Value>, Response> {
    authorized(&headers)?;
    Ok(envelope(Value::Array(tasks())))
}

async fn task(
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, Response> {
    authorized(&headers)?;
    Ok(envelope(match id.as_str() {
        "10" => json!({
            "id": 10,
            "status": "RESOLVED",
            "assignedAt": "2024-05-01T08:00:00",
            "completedAt": "2024-05-01 10:30:00",
            "estimatedCompletionTime": "2024-05-01T09:00:00",
        }),
        "11" => json!({
            "id": 11,
            "status": "IN_PROGRESS",
            "assignedAt": "2024-05-01T08:00:00.123",
            "estimatedCompletionTime": "2000-01-01T00:00:00",
        }),
        _ => json!({ "id": numeric(&id), "status": "WAITING_ACCEPT" }),
    }))
}

async fn change_status(
    State(upstream): State<Upstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Response> {
    authorized(&headers)?;
    upstream.record(&method, &uri, body.to_string());
    Ok(envelope(json!({
        "ticketId": numeric(&id),
        "status": body["newStatus"],
        "rejectionReason": body["rejectionReason"],
    })))
}

async fn complete_task(
    State(upstream): State<Upstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Response> {
    authorized(&headers)?;
    upstream.record(&method, &uri, body.to_string());
    Ok(envelope(json!({
        "ticketId": numeric(&id),
        "status": body["newStatus"],
        "completedAt": "2024-05-01 10:30:00",
    })))
}

async fn assign_order(
    State(upstream): State<Upstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Response> {
    authorized(&headers)?;
    upstream.record(&method, &uri, body.to_string());
    Ok(envelope(json!({
        "ticketId": numeric(&id),
        "status": "IN_PROGRESS",
        "staffId": body["repairmanId"],
        "staffName": "王师傅",
    })))
}

async fn feedbacks(headers: HeaderMap) -> Result<Json<Value>, Response> {
    authorized(&headers)?;
    Ok(envelope(json!({
        "list": [
            {
                "ratingId": 1,
                "score": 5,
                "comment": "很好",
                "studentId": "student1",
                "staffName": "王师傅",
                "ratedAt": "2024-05-02 09:00:00",
            },
            { "id": 2, "rating": "3", "comment": null },
        ],
    })))
}

async fn delete_feedback(
    State(upstream): State<Upstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Json<Value>, Response> {
    authorized(&headers)?;
    upstream.record(&method, &uri, "");
    Ok(envelope(Value::Null))
}

async fn stats(
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Result<Response, Response> {
    authorized(&headers)?;
    Ok(match name.as_str() {
        "category" => envelope(json!([
            {
                "category": "水电维修",
                "totalTickets": 5,
                "avgRating": 4.2,
                "completedTickets": 4,
                "ratedTickets": 3,
            },
            { "name": "networkIssues", "count": 3, "avg_rating": "3.5" },
        ]))
        .into_response(),
        "location" => envelope(json!([
            { "location": "1号楼", "count": 6 },
            { "name": "2号楼", "value": 2 },
        ]))
        .into_response(),
        "repairman-rating" => envelope(json!([
            {
                "id": 7,
                "name": "王师傅",
                "rating": 4.8,
                "completedOrders": 12,
            },
        ]))
        .into_response(),
        "status" => envelope(json!([
            { "status": "FEEDBACKED", "count": 2 },
            { "status": "CLOSED", "count": 3 },
            { "status": "ARCHIVED", "value": 1 },
            { "count": 4 },
        ]))
        .into_response(),
        "monthly" => envelope(json!({
            "months": [
                { "month": "2024-04", "count": 4 },
                { "date": "2024-05", "orders": 7 },
            ],
        }))
        .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    })
}

pub struct Client {
    inner: reqwest::Client,
    base_url: String,
    pub auth_token: Option<String>,
}

impl Client {
    pub fn new(gateway: &Gateway) -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url: gateway.base_url.clone(),
            auth_token: None,
        }
    }

    pub async fn auth(mut self, user_id: &str, password: &str) -> Self {
        let session = self
            .login(user_id, password)
            .await
            .expect("failed to log in");
        self.auth_token = Some(session.token);
        self
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let req = self.inner.request(method, url);
        match &self.auth_token {
            Some(token) => {
                req.header("Authorization", format!("Bearer {token}"))
            }
            None => req,
        }
    }

    async fn call<T: DeserializeOwned>(
        req: RequestBuilder,
    ) -> Result<Option<T>, StatusCode> {
        let res = req
            .send()
            .await
            .expect("failed to send a request")
            .error_for_status()
            .map_err(|e| e.status().expect("status error"))?;
        if res.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        Ok(Some(res.json::<T>().await.expect("failed to get a response")))
    }

    async fn fetch<T: DeserializeOwned>(
        req: RequestBuilder,
    ) -> Result<T, StatusCode> {
        Ok(Self::call(req).await?.expect("unexpected empty response"))
    }

    /// Status and body text, for checking error responses.
    pub async fn raw(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> (StatusCode, String) {
        let res = self
            .request(method, path)
            .send()
            .await
            .expect("failed to send a request");
        let status = res.status();
        (status, res.text().await.expect("failed to get a response"))
    }

    /// Same as [`Client::raw`], sending `body` as JSON.
    pub async fn raw_json(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Value,
    ) -> (StatusCode, String) {
        let res = self
            .request(method, path)
            .json(&body)
            .send()
            .await
            .expect("failed to send a request");
        let status = res.status();
        (status, res.text().await.expect("failed to get a response"))
    }

    pub async fn login(
        &self,
        user_id: &str,
        password: &str,
    ) -> Result<Session, StatusCode> {
        Self::fetch(
            self.request(reqwest::Method::POST, "/auth/login").json(&json!({
                "userId": user_id,
                "password": password,
            })),
        )
        .await
    }

    pub async fn register(
        &self,
        registration: Value,
    ) -> Result<Option<Profile>, StatusCode> {
        Self::call(
            self.request(reqwest::Method::POST, "/auth/register")
                .json(&registration),
        )
        .await
    }

    pub async fn user(&self) -> Result<Profile, StatusCode> {
        Self::fetch(self.request(reqwest::Method::GET, "/user")).await
    }

    pub async fn update_me(
        &self,
        update: Value,
    ) -> Result<Profile, StatusCode> {
        Self::fetch(self.request(reqwest::Method::PUT, "/user").json(&update))
            .await
    }

    pub async fn get_user(&self, id: &str) -> Result<Profile, StatusCode> {
        Self::fetch(self.request(reqwest::Method::GET, &format!("/users/{id}")))
            .await
    }

    pub async fn update_user(
        &self,
        id: &str,
        update: Value,
    ) -> Result<Profile, StatusCode> {
        Self::fetch(
            self.request(reqwest::Method::PUT, &format!("{ADMIN_USERS}/{id}"))
                .json(&update),
        )
        .await
    }

    pub async fn reset_password(
        &self,
        id: &str,
    ) -> Result<PasswordReset, StatusCode> {
        Self::fetch(self.request(
            reqwest::Method::POST,
            &format!("{ADMIN_USERS}/{id}/reset-password"),
        ))
        .await
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), StatusCode> {
        Self::call::<Value>(self.request(
            reqwest::Method::DELETE,
            &format!("{ADMIN_USERS}/{id}"),
        ))
        .await
        .map(drop)
    }

    pub async fn statuses(&self) -> Result<Value, StatusCode> {
        Self::fetch(self.request(reqwest::Method::GET, "/statuses")).await
    }

    pub async fn get_tickets(
        &self,
        query: &[(&str, &str)],
    ) -> Result<Page<Ticket>, StatusCode> {
        Self::fetch(self.request(reqwest::Method::GET, "/tickets").query(query))
            .await
    }

    pub async fn get_ticket(&self, id: &str) -> Result<Ticket, StatusCode> {
        Self::fetch(
            self.request(reqwest::Method::GET, &format!("/tickets/{id}")),
        )
        .await
    }

    pub async fn add_ticket(
        &self,
        ticket: Value,
    ) -> Result<Option<Ticket>, StatusCode> {
        Self::call(
            self.request(reqwest::Method::POST, "/tickets").json(&ticket),
        )
        .await
    }

    pub async fn delete_ticket(&self, id: &str) -> Result<(), StatusCode> {
        Self::call::<Value>(
            self.request(reqwest::Method::DELETE, &format!("/tickets/{id}")),
        )
        .await
        .map(drop)
    }

    pub async fn evaluate_ticket(
        &self,
        id: &str,
        evaluation: Value,
    ) -> Result<Option<Ticket>, StatusCode> {
        Self::call(
            self.request(
                reqwest::Method::POST,
                &format!("/tickets/{id}/evaluate"),
            )
            .json(&evaluation),
        )
        .await
    }

    pub async fn get_tasks(&self) -> Result<Page<Ticket>, StatusCode> {
        Self::fetch(self.request(reqwest::Method::GET, "/tasks")).await
    }

    pub async fn task_stats(&self) -> Result<TaskStats, StatusCode> {
        Self::fetch(self.request(reqwest::Method::GET, "/tasks/stats")).await
    }

    pub async fn get_task(&self, id: &str) -> Result<TaskDetail, StatusCode> {
        Self::fetch(self.request(reqwest::Method::GET, &format!("/tasks/{id}")))
            .await
    }

    pub async fn start_task(
        &self,
        id: &str,
    ) -> Result<Option<Ticket>, StatusCode> {
        Self::call(
            self.request(reqwest::Method::POST, &format!("/tasks/{id}/start")),
        )
        .await
    }

    pub async fn complete_task(
        &self,
        id: &str,
    ) -> Result<Option<Ticket>, StatusCode> {
        Self::call(
            self.request(
                reqwest::Method::POST,
                &format!("/tasks/{id}/complete"),
            ),
        )
        .await
    }

    pub async fn admin_tickets(
        &self,
        query: &[(&str, &str)],
    ) -> Result<Page<Ticket>, StatusCode> {
        Self::fetch(
            self.request(reqwest::Method::GET, ADMIN_TICKETS).query(query),
        )
        .await
    }

    pub async fn assign_ticket(
        &self,
        id: &str,
        repairman_id: Value,
    ) -> Result<Option<Ticket>, StatusCode> {
        Self::call(
            self.request(
                reqwest::Method::PUT,
                &format!("{ADMIN_TICKETS}/{id}/assign"),
            )
            .json(&json!({ "repairmanId": repairman_id })),
        )
        .await
    }

    pub async fn reject_ticket(
        &self,
        id: &str,
        reason: &str,
    ) -> Result<Option<Ticket>, StatusCode> {
        Self::call(
            self.request(
                reqwest::Method::PUT,
                &format!("{ADMIN_TICKETS}/{id}/reject"),
            )
            .json(&json!({ "reason": reason })),
        )
        .await
    }

    pub async fn students(&self) -> Result<Vec<Member>, StatusCode> {
        Self::fetch(self.request(reqwest::Method::GET, "/admin/students")).await
    }

    pub async fn repairmen(&self) -> Result<Vec<Member>, StatusCode> {
        Self::fetch(self.request(reqwest::Method::GET, "/admin/repairmen"))
            .await
    }

    pub async fn feedbacks(&self) -> Result<Vec<Feedback>, StatusCode> {
        Self::fetch(self.request(reqwest::Method::GET, "/admin/feedbacks"))
            .await
    }

    pub async fn delete_feedback(&self, id: &str) -> Result<(), StatusCode> {
        Self::call::<Value>(self.request(
            reqwest::Method::DELETE,
            &format!("/admin/feedbacks/{id}"),
        ))
        .await
        .map(drop)
    }

    pub async fn stats<T: DeserializeOwned>(
        &self,
        name: &str,
    ) -> Result<T, StatusCode> {
        Self::fetch(
            self.request(
                reqwest::Method::GET,
                &format!("{ADMIN_STATS}/{name}"),
            ),
        )
        .await
    }
}
