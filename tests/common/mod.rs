#![allow(dead_code)]

use anyhow::Result;
use goldenlock::{
    api::ApiClient,
    config::AppConfig,
    navigation::{Navigator, Route},
    notify::{Notification, NotificationStore},
    service::SessionService,
    session::SessionContext,
};
use serde_json::{json, Value};
use std::{net::TcpListener, time::Duration};

pub fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

pub struct Harness {
    pub service: SessionService,
    pub navigator: Navigator,
}

impl Harness {
    /// Service against `base_url` with toasts that never expire.
    pub fn new(base_url: &str, initial: Route) -> Result<Self> {
        let config = AppConfig {
            api_base_url: base_url.to_string(),
            timeout: Duration::from_secs(5),
            toast_duration_ms: 0,
            session_file: None,
        };
        let navigator = Navigator::new(initial);
        let api = ApiClient::new(&config, navigator.clone())?;
        let service = SessionService::new(
            api,
            NotificationStore::new(config.toast_duration_ms),
            SessionContext::in_memory(),
        );
        Ok(Self { service, navigator })
    }

    pub fn toasts(&self) -> Vec<Notification> {
        self.service.notifier().snapshot()
    }

    pub fn messages(&self) -> Vec<String> {
        self.toasts()
            .into_iter()
            .map(|notification| notification.message)
            .collect()
    }
}

pub fn profile(role: &str) -> Value {
    json!({
        "id": 1,
        "email": "ada@example.com",
        "username": "ada",
        "role": role,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-02T00:00:00Z"
    })
}

pub fn user(id: u64, email: &str, role: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "username": null,
        "role": role,
        "is_active": true,
        "is_staff": false,
        "created_at": "2024-02-01T08:30:00Z",
        "updated_at": "2024-02-01T08:30:00Z",
        "last_login": null
    })
}

pub fn login_record(id: u64, email: &str) -> Value {
    json!({
        "id": id,
        "user_email": email,
        "username": null,
        "ip_address": "10.0.0.1",
        "timestamp": "2024-03-01T12:00:00Z"
    })
}
