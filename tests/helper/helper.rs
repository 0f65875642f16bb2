use axum::{body::Body, http::Request, Router};
use serde::de::DeserializeOwned;
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;

use appointment_notifier::{
    app::{build_app, AppState},
    models::Appointment,
};

use super::fakes::{InMemoryStore, RecordingGateway};

pub struct TestApp {
    pub store: Arc<InMemoryStore>,
    pub gateway: Arc<RecordingGateway>,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::default());
        let gateway = Arc::new(RecordingGateway::default());
        let state = AppState::new(store.clone(), gateway.clone(), Duration::from_secs(5));
        Self {
            store,
            gateway,
            state: Arc::new(state),
        }
    }

    pub fn router(&self) -> Router {
        build_app(self.state.clone())
    }
}

pub fn appointment(
    service: &str,
    time_slot: &str,
    reminder_ts: Option<i64>,
    token: Option<&str>,
    notification_sent: bool,
) -> Appointment {
    Appointment {
        _id: None,
        service: service.to_owned(),
        time_slot: time_slot.to_owned(),
        reminder_ts,
        fcm_token: token.map(str::to_owned),
        notification_sent,
    }
}

pub fn build_post_request(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .method("POST")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

pub fn build_get_request(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

pub async fn send<T: DeserializeOwned>(app: Router, req: Request<Body>) -> (u16, T) {
    let res = app.oneshot(req).await.unwrap();
    let status = res.status().as_u16();
    let body = hyper::body::to_bytes(res.into_body()).await.unwrap();
    let body: T = serde_json::from_slice(&body).unwrap();
    (status, body)
}
