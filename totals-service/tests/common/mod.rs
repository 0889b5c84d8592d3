//! Test helper module for totals-service integration tests.
//!
//! Spawns the HTTP service on a random port; no external stores are needed.

#![allow(dead_code)]

use serde_json::Value;
use service_core::config::Config as CoreConfig;
use totals_service::config::{PolicyConfig, TotalsConfig};
use totals_service::startup::Application;

/// Test application wrapper for integration tests.
pub struct TestApp {
    pub http_address: String,
    pub http_port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn a new test application with the default policy.
    pub async fn spawn() -> Self {
        Self::spawn_with_policy(PolicyConfig::default()).await
    }

    /// Spawn a new test application on a random port.
    pub async fn spawn_with_policy(policy: PolicyConfig) -> Self {
        let config = TotalsConfig {
            common: CoreConfig { port: 0 }, // Random port
            service_name: "totals-service-test".to_string(),
            service_version: "0.1.0".to_string(),
            log_level: "warn".to_string(),
            otlp_endpoint: None,
            policy,
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let http_port = app.port();
        let http_address = format!("http://127.0.0.1:{}", http_port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", http_address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            http_address,
            http_port,
            client,
        }
    }

    /// POST a JSON body and return the status and parsed response.
    pub async fn post_json(&self, path: &str, body: &Value) -> (reqwest::StatusCode, Value) {
        let response = self
            .client
            .post(format!("{}{}", self.http_address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let body = response.json().await.unwrap_or(Value::Null);
        (status, body)
    }
}
