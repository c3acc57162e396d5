#![allow(dead_code)]

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use play_verify::Config;
use play_verify::config::Credentials;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// One canned HTTP answer.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
    /// Held back this long before answering.
    pub delay: Option<Duration>,
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Scripted replies per endpoint. Replies are consumed in order; the last one
/// keeps being served once the queue is down to it.
#[derive(Debug, Default)]
pub struct Replies {
    pub token: VecDeque<Reply>,
    pub subscription: VecDeque<Reply>,
    pub order: VecDeque<Reply>,
}

impl Replies {
    pub fn happy(token: &str, subscription: Value, order: Value) -> Self {
        Self {
            token: [Reply::ok(serde_json::json!({
                "access_token": token,
                "token_type": "Bearer",
                "expires_in": 3599,
            }))]
            .into(),
            subscription: [Reply::ok(subscription)].into(),
            order: [Reply::ok(order)].into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubscriptionCall {
    pub package: String,
    pub product_id: String,
    pub token: String,
    pub authorization: Option<String>,
    pub accept: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OrderCall {
    pub package: String,
    pub order_id: String,
    pub authorization: Option<String>,
}

/// Everything the stub saw, in arrival order.
#[derive(Debug, Default)]
pub struct Recorded {
    pub token_forms: Vec<HashMap<String, String>>,
    pub subscription_calls: Vec<SubscriptionCall>,
    pub order_calls: Vec<OrderCall>,
}

struct StubState {
    replies: Mutex<Replies>,
    recorded: Mutex<Recorded>,
}

pub struct Stub {
    pub base_url: String,
    state: Arc<StubState>,
}

impl Stub {
    pub fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.state.recorded.lock().unwrap()
    }

    /// Config pointing both the token endpoint and the API base at the stub.
    pub fn config(&self) -> Config {
        Config {
            credentials: Credentials {
                client_id: "cid.apps.googleusercontent.com".into(),
                client_secret: "shh".into(),
                refresh_token: "1//refresh".into(),
                token_endpoint: format!("{}/token", self.base_url),
            },
            api_base: self.base_url.clone(),
            timeout: Duration::from_secs(5),
            max_retries: 0,
            retry_delay: Duration::ZERO,
        }
    }

    /// Environment for running the binary against this stub.
    pub fn env(&self) -> Vec<(&'static str, String)> {
        vec![
            ("GOOGLE_PLAY_CLIENT_ID", "cid.apps.googleusercontent.com".into()),
            ("GOOGLE_PLAY_CLIENT_SECRET", "shh".into()),
            ("GOOGLE_PLAY_REFRESH_TOKEN", "1//refresh".into()),
            ("GOOGLE_PLAY_ACCESS_URL", format!("{}/token", self.base_url)),
            ("GOOGLE_PLAY_API_BASE", self.base_url.clone()),
        ]
    }
}

fn next(queue: &mut VecDeque<Reply>) -> Reply {
    (if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    })
    .unwrap_or_else(|| Reply::status(500, serde_json::json!({"error": "no reply scripted"})))
}

async fn respond(reply: Reply) -> (StatusCode, Json<Value>) {
    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }
    (StatusCode::from_u16(reply.status).unwrap(), Json(reply.body))
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn token(
    State(state): State<Arc<StubState>>,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    state.recorded.lock().unwrap().token_forms.push(form);
    let reply = next(&mut state.replies.lock().unwrap().token);
    respond(reply).await
}

async fn subscription(
    State(state): State<Arc<StubState>>,
    Path((package, product_id, token)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state
        .recorded
        .lock()
        .unwrap()
        .subscription_calls
        .push(SubscriptionCall {
            package,
            product_id,
            token,
            authorization: header_value(&headers, header::AUTHORIZATION),
            accept: header_value(&headers, header::ACCEPT),
        });
    let reply = next(&mut state.replies.lock().unwrap().subscription);
    respond(reply).await
}

async fn order(
    State(state): State<Arc<StubState>>,
    Path((package, order_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.recorded.lock().unwrap().order_calls.push(OrderCall {
        package,
        order_id,
        authorization: header_value(&headers, header::AUTHORIZATION),
    });
    let reply = next(&mut state.replies.lock().unwrap().order);
    respond(reply).await
}

/// Starts an in-process stand-in for the OAuth token endpoint and the Play
/// Developer API on an ephemeral port.
pub async fn spawn_stub(replies: Replies) -> Stub {
    let state = Arc::new(StubState {
        replies: Mutex::new(replies),
        recorded: Mutex::new(Recorded::default()),
    });

    let app = Router::new()
        .route("/token", post(token))
        .route(
            "/applications/{package}/purchases/subscriptions/{product_id}/tokens/{token}",
            get(subscription),
        )
        .route(
            "/applications/{package}/purchases/orders/{order_id}",
            get(order),
        )
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind stub listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Stub {
        base_url: format!("http://{addr}"),
        state,
    }
}
