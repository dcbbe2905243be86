#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};

use uaifood_admin::auth::{generate_jwt, Claims};
use uaifood_admin::config::AppConfig;
use uaifood_admin::models::Role;
use uaifood_admin::routes::app;

pub const SECRET: &str = "integration-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
}

async fn serve(router: Router) -> Result<TestServer> {
    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    let server = TestServer {
        port,
        base_url: format!("http://127.0.0.1:{}", port),
    };
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}

impl TestServer {
    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            // Any HTTP answer means the listener is up
            if client.get(format!("{}/health", self.base_url)).send().await.is_ok() {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Session service with a known secret, running in this test's runtime
pub async fn session_server() -> Result<TestServer> {
    serve(app(Arc::new(AppConfig::for_tests(SECRET)))).await
}

pub fn token_for(id: i64, role: Role) -> Result<String> {
    let claims = Claims::new(id, format!("User {}", id), format!("user{}@uaifood.com", id), role, 1)?;
    Ok(generate_jwt(&claims, SECRET)?)
}

pub fn cookie(token: &str) -> String {
    format!("uaifoodtoken={}", token)
}

/// One request as seen by the fake backend
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub authorization: Option<String>,
}

impl Recorded {
    pub fn get(&self, key: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct Backend {
    /// Every request except the readiness checks on `/health`
    pub log: Arc<Mutex<Vec<Recorded>>>,
    /// Reported `lastPage` for listings
    pub last_page: u32,
    /// Delay before each listing answer, keyed by requested page
    pub slow_page: Option<(u32, Duration)>,
}

impl Backend {
    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }
}

/// Stand-in for the UaiFood REST API and ViaCEP
pub async fn fake_backend(backend: Backend) -> Result<TestServer> {
    let router = Router::new().fallback(answer).with_state(backend);
    serve(router).await
}

async fn answer(
    State(backend): State<Backend>,
    method: Method,
    uri: Uri,
    headers: axum::http::HeaderMap,
) -> Response {
    let query: Vec<(String, String)> = uri
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();
    let path = uri.path().to_string();

    let recorded = Recorded {
        method: method.clone(),
        path: path.clone(),
        query: query.clone(),
        authorization: headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };
    if path != "/health" {
        if let Ok(mut log) = backend.log.lock() {
            log.push(recorded);
        }
    }

    let page: u32 = query
        .iter()
        .find(|(k, _)| k == "page")
        .and_then(|(_, v)| v.parse().ok())
        .unwrap_or(1);
    let limit: u32 = query
        .iter()
        .find(|(k, _)| k == "limit")
        .and_then(|(_, v)| v.parse().ok())
        .unwrap_or(10);

    if let Some((slow, delay)) = backend.slow_page {
        if slow == page {
            tokio::time::sleep(delay).await;
        }
    }

    let meta = json!({
        "page": page,
        "limit": limit,
        "total": u64::from(backend.last_page) * u64::from(limit),
        "lastPage": backend.last_page,
    });

    match (method, path.as_str()) {
        (_, "/health") => StatusCode::OK.into_response(),
        (Method::GET, "/orders") | (Method::GET, "/orders/my") => {
            Json(json!({ "data": [order(page)], "meta": meta })).into_response()
        }
        (Method::GET, "/users") => Json(json!({ "data": [user(page)], "meta": meta })).into_response(),
        (Method::GET, "/items") => Json(json!({ "data": [], "meta": meta })).into_response(),
        (Method::GET, "/broken") => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Falha ao buscar pedidos" })),
        )
            .into_response(),
        (Method::GET, p) if p.starts_with("/users/") => match p["/users/".len()..].parse::<u32>() {
            Ok(id) => Json(user(id)).into_response(),
            Err(_) => (StatusCode::BAD_REQUEST, Json(json!({ "message": "Id inválido" }))).into_response(),
        },
        (Method::PUT, p) | (Method::DELETE, p) if p.starts_with("/orders/") => StatusCode::NO_CONTENT.into_response(),
        (Method::PUT, p) if p.starts_with("/users/") => StatusCode::NO_CONTENT.into_response(),
        (Method::GET, "/38400000/json/") => Json(json!({
            "cep": "38400-000",
            "logradouro": "Avenida João Naves de Ávila",
            "complemento": "",
            "bairro": "Santa Mônica",
            "localidade": "Uberlândia",
            "uf": "MG",
            "ibge": "3170206",
            "ddd": "34"
        }))
        .into_response(),
        (Method::GET, "/99999999/json/") => Json(json!({ "erro": "true" })).into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" }))).into_response(),
    }
}

fn order(page: u32) -> Value {
    json!({
        "id": page,
        "client": { "name": "Manu", "email": "manu@email.com", "phone": "(34) 91234-5678" },
        "status": "PENDING",
        "paymentMethod": "PIX",
        "createdAt": "2025-11-19T23:26:01.256Z",
        "OrderItem": [{ "item": { "unitPrice": "12.50", "description": "X-Burger" }, "quantity": 2 }]
    })
}

fn user(page: u32) -> Value {
    json!({
        "id": page,
        "name": "Manu",
        "email": "manu@email.com",
        "phone": "(34) 91234-5678",
        "role": "CLIENT",
        "createdAt": "2025-11-19T23:26:01.256Z",
        "updatedAt": "2025-11-19T23:26:01.256Z"
    })
}

