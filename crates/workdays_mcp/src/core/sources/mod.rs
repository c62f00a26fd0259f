//! Holiday data sources.
//!
//! Each provider publishes one JSON document per calendar year. An adapter
//! fetches that document through a [`JsonFetcher`], validates its shape and
//! normalizes it into [`YearHolidays`], so the resolver never sees a
//! provider-specific payload.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::{
    error::WorkdayServerResult,
    models::{Provider, YearHolidays},
};

mod nate;
mod timor;

pub use nate::NateSource;
pub use timor::TimorSource;

/// Fetches a JSON document, bounded by a per-request timeout
///
/// Network errors, non-2xx statuses, timeouts and undecodable bodies are all
/// reported as `UpstreamUnavailable`.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn get_json(&self, url: &str, timeout: Duration) -> WorkdayServerResult<Value>;
}

/// One year of holiday data from a single provider
#[async_trait]
pub trait HolidaySource: Send + Sync {
    fn provider(&self) -> Provider;

    async fn fetch_year(&self, year: i32, timeout: Duration) -> WorkdayServerResult<YearHolidays>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::JsonFetcher;
    use crate::core::error::{WorkdayServerError, WorkdayServerResult};

    /// In-memory fetcher that records every URL it is asked for
    #[derive(Default)]
    pub struct StaticFetcher {
        responses: HashMap<String, Value>,
        requests: Mutex<Vec<String>>,
    }

    impl StaticFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, url: &str, body: Value) -> Self {
            self.responses.insert(url.to_string(), body);
            self
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl JsonFetcher for StaticFetcher {
        async fn get_json(&self, url: &str, _timeout: Duration) -> WorkdayServerResult<Value> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| WorkdayServerError::UpstreamUnavailable {
                    url: url.to_string(),
                    message: "HTTP 404: Not Found".to_string(),
                })
        }
    }
}
