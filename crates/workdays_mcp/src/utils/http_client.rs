use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Proxy, header};
use serde_json::Value;

use crate::config::Config;
use crate::core::{
    error::{WorkdayServerError, WorkdayServerResult},
    sources::JsonFetcher,
};

/// Longest slice of an error body echoed back in messages
const ERROR_BODY_PREVIEW: usize = 200;

/// Build a reqwest client from the server configuration
pub fn build_client(config: &Config) -> WorkdayServerResult<Client> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.default_timeout)
        .redirect(reqwest::redirect::Policy::limited(10));

    if let Some(proxy_url) = &config.proxy_url {
        let proxy = Proxy::all(proxy_url).map_err(|e| WorkdayServerError::ClientError {
            message: e.to_string(),
        })?;
        builder = builder.proxy(proxy);
    }

    builder.build().map_err(|e| WorkdayServerError::ClientError {
        message: e.to_string(),
    })
}

/// [`JsonFetcher`] backed by a shared reqwest client
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &Config) -> WorkdayServerResult<Self> {
        Ok(Self::new(build_client(config)?))
    }
}

#[async_trait]
impl JsonFetcher for HttpFetcher {
    async fn get_json(&self, url: &str, timeout: Duration) -> WorkdayServerResult<Value> {
        tracing::debug!(%url, timeout_ms = timeout.as_millis() as u64, "fetching");

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| request_failure(url, timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
            return Err(WorkdayServerError::UpstreamUnavailable {
                url: url.to_string(),
                message: format!("HTTP {}: {}", status.as_u16(), preview),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| request_failure(url, timeout, e))
    }
}

fn request_failure(url: &str, timeout: Duration, err: reqwest::Error) -> WorkdayServerError {
    let message = if err.is_timeout() {
        format!("request timed out after {}ms", timeout.as_millis())
    } else if err.is_decode() {
        format!("response is not valid JSON: {}", err)
    } else {
        err.to_string()
    };

    WorkdayServerError::UpstreamUnavailable {
        url: url.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serve a single connection, answering with `response` after `delay`
    async fn one_shot_server(response: &'static str, delay: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                tokio::time::sleep(delay).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}/2024.json", addr)
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(&Config::default()).is_ok());

        let config = Config {
            proxy_url: Some("http://proxy.local:8080".to_string()),
            ..Config::default()
        };
        assert!(build_client(&config).is_ok());
    }

    #[tokio::test]
    async fn test_timeout_is_a_fetch_failure() {
        let url = one_shot_server("HTTP/1.1 200 OK\r\n\r\n{}", Duration::from_secs(5)).await;
        let fetcher = HttpFetcher::from_config(&Config::default()).unwrap();

        let started = Instant::now();
        let result = fetcher.get_json(&url, Duration::from_millis(200)).await;

        assert!(matches!(
            result,
            Err(WorkdayServerError::UpstreamUnavailable { .. })
        ));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_error_status_is_a_fetch_failure() {
        let url = one_shot_server(
            "HTTP/1.1 503 Service Unavailable\r\ncontent-length: 4\r\nconnection: close\r\n\r\nbusy",
            Duration::ZERO,
        )
        .await;
        let fetcher = HttpFetcher::from_config(&Config::default()).unwrap();

        let result = fetcher.get_json(&url, Duration::from_secs(2)).await;
        assert!(matches!(
            result,
            Err(WorkdayServerError::UpstreamUnavailable { .. })
        ));
    }
}
