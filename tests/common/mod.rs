#![allow(dead_code)]

use emaillistchecker::{Client, ClientConfig};
use std::time::Duration;
use wiremock::MockServer;

pub const API_KEY: &str = "test-key";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn base_url(server: &MockServer) -> String {
    format!("{}/api/v1", server.uri())
}

pub fn client_for(server: &MockServer) -> Client {
    client_with_timeout(server, Duration::from_secs(5))
}

pub fn client_with_timeout(server: &MockServer, timeout: Duration) -> Client {
    init_tracing();
    let config = ClientConfig::builder()
        .api_key(API_KEY)
        .base_url(base_url(server))
        .timeout(timeout)
        .build()
        .unwrap();
    Client::with_config(config).unwrap()
}
