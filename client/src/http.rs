use std::future::Future;

use anyhow::{Context, Result};
use pokedex_catalog::FetchError;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::{ClientConfig, RetryPolicy};

/// JSON over HTTP with retries on transient failures
///
/// Every call maps its failure to a [`FetchError`]; only transport errors,
/// 429 and 5xx responses are retried, following the configured backoff.
pub struct HttpTransport {
    client: Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        self.config.url(path)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let body = self
            .execute(url, || self.client.get(url).query(query))
            .await?;
        Ok(pokedex_protocol::decode(&body)?)
    }

    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, FetchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self
            .execute(url, || self.client.post(url).json(body))
            .await?;
        Ok(pokedex_protocol::decode(&body)?)
    }

    /// POST without a request body
    pub async fn post_empty<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let body = self.execute(url, || self.client.post(url)).await?;
        Ok(pokedex_protocol::decode(&body)?)
    }

    async fn execute<F>(&self, url: &str, build: F) -> Result<String, FetchError>
    where
        F: Fn() -> RequestBuilder,
    {
        with_retry(&self.config.retry, url, || send_once(build())).await
    }
}

/// Call `send` until it succeeds, fails permanently, or runs out of attempts
pub(crate) async fn with_retry<F, Fut>(
    policy: &RetryPolicy,
    url: &str,
    mut send: F,
) -> Result<String, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String, FetchError>>,
{
    let mut attempt = 1;

    loop {
        match send().await {
            Ok(body) => return Ok(body),
            Err(e) if is_transient(&e) && attempt < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    url,
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Request failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::debug!(url, attempt, error = %e, "Request failed");
                return Err(e);
            }
        }
    }
}

async fn send_once(request: RequestBuilder) -> Result<String, FetchError> {
    let response = request.send().await.map_err(transport_error)?;
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::NotFound(response.url().to_string()));
    }
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("Unexpected status")
                .to_string(),
        });
    }

    response.text().await.map_err(transport_error)
}

fn transport_error(err: reqwest::Error) -> FetchError {
    // Alternate formatting keeps the source chain (connect refused, timed out, ...)
    FetchError::Transport(format!("{:#}", anyhow::Error::new(err)))
}

/// Failures a plain resend may fix
pub(crate) fn is_transient(err: &FetchError) -> bool {
    match err {
        FetchError::Transport(_) => true,
        FetchError::Status { status, .. } => *status == 429 || *status >= 500,
        FetchError::Decode(_) | FetchError::NotFound(_) | FetchError::Unsupported(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::time::Duration;

    fn quick_policy(max_attempts: usize) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            backoff_multiplier: 2.0,
        }
    }

    fn unavailable() -> FetchError {
        FetchError::Status {
            status: 503,
            message: "Service Unavailable".into(),
        }
    }

    /// Replays `script` one response per call and counts the calls
    async fn run(
        policy: &RetryPolicy,
        script: Vec<Result<String, FetchError>>,
    ) -> (Result<String, FetchError>, usize) {
        let mut script = VecDeque::from(script);
        let mut calls = 0;
        let result = with_retry(policy, "http://localhost:4000/pokemon", || {
            calls += 1;
            let next = script
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::Transport("script exhausted".into())));
            async move { next }
        })
        .await;
        (result, calls)
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient_failures() {
        let (result, calls) = run(
            &quick_policy(3),
            vec![
                Err(FetchError::Transport("connection reset".into())),
                Err(unavailable()),
                Ok("{}".to_string()),
            ],
        )
        .await;

        assert_eq!(result.unwrap(), "{}");
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_retry_stops_on_permanent_failure() {
        let (result, calls) = run(
            &quick_policy(3),
            vec![
                Err(FetchError::NotFound("/pokemon/0".into())),
                Ok("{}".to_string()),
            ],
        )
        .await;

        assert!(matches!(result, Err(FetchError::NotFound(_))));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_attempts() {
        let (result, calls) = run(
            &quick_policy(2),
            vec![
                Err(FetchError::Transport("timed out".into())),
                Err(unavailable()),
                Ok("{}".to_string()),
            ],
        )
        .await;

        assert!(matches!(result, Err(FetchError::Status { status: 503, .. })));
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn test_no_retry_policy_sends_once() {
        let (result, calls) = run(&RetryPolicy::none(), vec![Err(unavailable())]).await;

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_transient_classification() {
        assert!(is_transient(&FetchError::Transport("connection reset".into())));
        assert!(is_transient(&FetchError::Status {
            status: 503,
            message: "Service Unavailable".into(),
        }));
        assert!(is_transient(&FetchError::Status {
            status: 429,
            message: "Too Many Requests".into(),
        }));

        assert!(!is_transient(&FetchError::Status {
            status: 400,
            message: "Bad Request".into(),
        }));
        assert!(!is_transient(&FetchError::NotFound("/pokemon/0".into())));
        assert!(!is_transient(&FetchError::Decode("expected value".into())));
        assert!(!is_transient(&FetchError::Unsupported("favorites".into())));
    }

    #[test]
    fn test_transport_builds_from_default_config() {
        let transport = HttpTransport::new(ClientConfig::default()).unwrap();
        assert_eq!(transport.url("pokemon"), "http://localhost:4000/pokemon");
    }
}
