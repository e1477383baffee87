//! In-process fake of the bot backend for HTTP tests

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// A multipart restore request as the backend received it
#[derive(Debug, Clone)]
pub struct RestoreRequest {
    pub wallet_name: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Mutable backend state; tests seed it and inspect it afterwards
#[derive(Debug)]
pub struct FakeState {
    pub status: String,
    pub levels: [i64; 3],
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    pub target_ada: f64,
    pub withdraw_address: String,
    pub wallets: Vec<Value>,
    pub trades: Vec<String>,
    pub backups: HashMap<String, Vec<u8>>,
    /// When set, config writes fail with 422 and this detail
    pub reject_config_writes: Option<String>,
    /// When set, restores fail with 400 and this detail
    pub restore_error: Option<String>,
    /// When set, the backtest answers 200 with an error status
    pub backtest_error: Option<String>,
    /// When set, the backtest answers 503
    pub backtest_unavailable: bool,

    pub hits: HashMap<String, usize>,
    pub strategy_bodies: Vec<Value>,
    pub risk_bodies: Vec<Value>,
    pub profit_bodies: Vec<Value>,
    pub restore_requests: Vec<RestoreRequest>,
    pub wallet_queries: Vec<HashMap<String, String>>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            status: "STOPPED".to_string(),
            levels: [9, 12, 14],
            stop_loss_pct: 0.012,
            take_profit_pct: 0.03,
            target_ada: 100.0,
            withdraw_address: String::new(),
            wallets: Vec::new(),
            trades: Vec::new(),
            backups: HashMap::new(),
            reject_config_writes: None,
            restore_error: None,
            backtest_error: None,
            backtest_unavailable: false,
            hits: HashMap::new(),
            strategy_bodies: Vec::new(),
            risk_bodies: Vec::new(),
            profit_bodies: Vec::new(),
            restore_requests: Vec::new(),
            wallet_queries: Vec::new(),
        }
    }
}

type Shared = Arc<Mutex<FakeState>>;

/// Handle to a running fake backend
pub struct FakeBackend {
    pub base_url: String,
    pub state: Shared,
}

impl FakeBackend {
    pub fn hits(&self, route: &str) -> usize {
        self.state.lock().unwrap().hits.get(route).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.state.lock().unwrap().hits.values().sum()
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }
}

pub fn wallet_json(name: &str, balance_ada: f64, target_ada: f64, progress_pct: f64) -> Value {
    json!({
        "name": name,
        "address": format!("addr_test1_{}", name),
        "balance_ada": balance_ada,
        "target_ada": target_ada,
        "progress_pct": progress_pct,
    })
}

/// Bind to an ephemeral port and serve the fake backend in the background
pub async fn spawn_backend(state: FakeState) -> FakeBackend {
    let state: Shared = Arc::new(Mutex::new(state));

    let app = Router::new()
        .route("/config", get(get_config))
        .route("/config/strategy", post(post_strategy))
        .route("/config/risk", post(post_risk))
        .route("/config/profit", post(post_profit))
        .route("/bot/start", post(start_bot))
        .route("/bot/stop", post(stop_bot))
        .route("/bot/optimize", post(optimize))
        .route("/bot/backtest", get(backtest))
        .route("/wallets", get(list_wallets))
        .route("/wallet/restore", post(restore_wallet))
        .route("/wallet/backup/:name", post(backup_wallet))
        .route("/trades", get(trades))
        .route("/profit", get(profit))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeBackend {
        base_url: format!("http://{}", addr),
        state,
    }
}

/// A URL nothing is listening on
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn hit(state: &mut FakeState, route: &str) {
    *state.hits.entry(route.to_string()).or_default() += 1;
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

async fn get_config(State(state): State<Shared>) -> Json<Value> {
    let mut s = state.lock().unwrap();
    hit(&mut s, "GET /config");
    Json(json!({
        "status": s.status,
        "strategy": {"level1": s.levels[0], "level2": s.levels[1], "level3": s.levels[2]},
        "risk": {"stop_loss_pct": s.stop_loss_pct, "take_profit_pct": s.take_profit_pct},
        "profit": {"target_ada": s.target_ada, "withdraw_address": s.withdraw_address},
    }))
}

async fn post_strategy(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    hit(&mut s, "POST /config/strategy");
    s.strategy_bodies.push(body.clone());
    if let Some(message) = s.reject_config_writes.clone() {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, &message);
    }
    for (i, key) in ["level1", "level2", "level3"].iter().enumerate() {
        if let Some(level) = body[*key].as_i64() {
            s.levels[i] = level;
        }
    }
    Json(json!({"status": "updated"})).into_response()
}

async fn post_risk(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    hit(&mut s, "POST /config/risk");
    s.risk_bodies.push(body.clone());
    if let Some(message) = s.reject_config_writes.clone() {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, &message);
    }
    s.stop_loss_pct = body["stop_loss_pct"].as_f64().unwrap_or(s.stop_loss_pct);
    s.take_profit_pct = body["take_profit_pct"].as_f64().unwrap_or(s.take_profit_pct);
    Json(json!({"status": "updated"})).into_response()
}

async fn post_profit(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    hit(&mut s, "POST /config/profit");
    s.profit_bodies.push(body.clone());
    if let Some(message) = s.reject_config_writes.clone() {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, &message);
    }
    s.target_ada = body["target_ada"].as_f64().unwrap_or(s.target_ada);
    if let Some(address) = body["withdraw_address"].as_str() {
        s.withdraw_address = address.to_string();
    }
    Json(json!({"status": "updated"})).into_response()
}

async fn start_bot(State(state): State<Shared>) -> Json<Value> {
    let mut s = state.lock().unwrap();
    hit(&mut s, "POST /bot/start");
    s.status = "RUNNING".to_string();
    Json(json!({"status": "RUNNING"}))
}

async fn stop_bot(State(state): State<Shared>) -> Json<Value> {
    let mut s = state.lock().unwrap();
    hit(&mut s, "POST /bot/stop");
    s.status = "STOPPED".to_string();
    Json(json!({"status": "STOPPED"}))
}

async fn optimize(State(state): State<Shared>) -> Json<Value> {
    let mut s = state.lock().unwrap();
    hit(&mut s, "POST /bot/optimize");
    s.levels = [7, 11, 13];
    Json(json!({"status": "success", "params": {"level1": 7, "level2": 11, "level3": 13}}))
}

async fn backtest(State(state): State<Shared>) -> Response {
    let mut s = state.lock().unwrap();
    hit(&mut s, "GET /bot/backtest");
    if s.backtest_unavailable {
        return detail(StatusCode::SERVICE_UNAVAILABLE, "Backtest engine busy");
    }
    match &s.backtest_error {
        Some(message) => Json(json!({"status": "error", "detail": message})).into_response(),
        None => Json(json!({
            "status": "success",
            "result": {
                "total_trades": 12,
                "win_rate": 58.3,
                "equity_curve": [1000.0, 1012.5, 1004.0, 1030.2],
            }
        }))
        .into_response(),
    }
}

async fn list_wallets(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut s = state.lock().unwrap();
    hit(&mut s, "GET /wallets");
    s.wallet_queries.push(query);
    Json(Value::Array(s.wallets.clone()))
}

async fn restore_wallet(State(state): State<Shared>, mut multipart: Multipart) -> Response {
    let mut request = RestoreRequest {
        wallet_name: String::new(),
        file_name: String::new(),
        bytes: Vec::new(),
    };

    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "wallet_name" => request.wallet_name = field.text().await.unwrap_or_default(),
            "file" => {
                request.file_name = field.file_name().unwrap_or_default().to_string();
                request.bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
            }
            _ => {}
        }
    }

    let mut s = state.lock().unwrap();
    hit(&mut s, "POST /wallet/restore");
    let wallet_name = request.wallet_name.clone();
    s.restore_requests.push(request);

    if let Some(message) = s.restore_error.clone() {
        return detail(StatusCode::BAD_REQUEST, &message);
    }
    let target_ada = s.target_ada;
    s.wallets.push(wallet_json(&wallet_name, 0.0, target_ada, 0.0));
    Json(json!({"status": "success", "wallet": {"name": wallet_name}})).into_response()
}

async fn backup_wallet(State(state): State<Shared>, Path(name): Path<String>) -> Response {
    let mut s = state.lock().unwrap();
    hit(&mut s, "POST /wallet/backup");
    match s.backups.get(&name) {
        Some(bytes) => bytes.clone().into_response(),
        None => detail(StatusCode::BAD_REQUEST, &format!("Wallet '{}' not found.", name)),
    }
}

async fn trades(State(state): State<Shared>) -> Json<Value> {
    let mut s = state.lock().unwrap();
    hit(&mut s, "GET /trades");
    Json(json!({"recent_trades": s.trades}))
}

async fn profit(State(state): State<Shared>) -> Json<Value> {
    let mut s = state.lock().unwrap();
    hit(&mut s, "GET /profit");
    Json(json!({"usdc": 1012.5, "ada": 250.25}))
}
