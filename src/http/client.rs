//! Low-level HTTP client: `InfoHttp`.
//!
//! The upstream exposes every public query as a POST to `/info` with a `type`
//! discriminator. Only the asset-context query is needed here: it seeds the
//! snapshot store before the first streamed account snapshot arrives.

use crate::domain::market::wire::MetaAndAssetCtxs;
use crate::error::HttpError;
use crate::http::retry::{RetryConfig, RetryPolicy};

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Body of an `/info` request.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InfoRequest {
    MetaAndAssetCtxs,
}

/// HTTP client for the `/info` endpoint.
#[derive(Debug, Clone)]
pub struct InfoHttp {
    info_url: String,
    client: Client,
    retry: RetryPolicy,
}

impl InfoHttp {
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder
                .timeout(Duration::from_secs(30))
                .pool_max_idle_per_host(10);
        }

        Ok(Self {
            info_url: format!("{}/info", base_url.trim_end_matches('/')),
            client: builder.build()?,
            retry: RetryPolicy::Idempotent,
        })
    }

    /// Overrides the retry policy for every request.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn info_url(&self) -> &str {
        &self.info_url
    }

    /// Perp universe plus the current context of every perp, index-aligned.
    pub async fn meta_and_asset_ctxs(&self) -> Result<MetaAndAssetCtxs, HttpError> {
        self.info(&InfoRequest::MetaAndAssetCtxs).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn info<T: DeserializeOwned>(&self, request: &InfoRequest) -> Result<T, HttpError> {
        let Some(config) = self.retry.config() else {
            return self.do_request(request).await;
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_request::<T>(request).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    if is_retryable(&e, &config).await && attempt < config.max_retries {
                        let delay = config.delay_for_attempt(attempt);
                        tracing::debug!(
                            attempt = attempt + 1,
                            max = config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            "Retrying {:?} request",
                            request
                        );
                        futures_timer::Delay::new(delay).await;
                        last_error = Some(e);
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_request<T: DeserializeOwned>(&self, request: &InfoRequest) -> Result<T, HttpError> {
        let resp = self
            .client
            .post(&self.info_url)
            .json(request)
            .send()
            .await?;
        let status = resp.status();

        if status.is_success() {
            let parsed = resp.json::<T>().await?;
            return Ok(parsed);
        }

        let status_code = status.as_u16();
        let body_text = resp.text().await.unwrap_or_default();
        Err(status_error(status_code, body_text))
    }
}

/// Whether `error` should be retried under `config`. Waits out an explicit
/// rate-limit delay first.
async fn is_retryable(error: &HttpError, config: &RetryConfig) -> bool {
    match error {
        HttpError::ServerError { status, .. } => config.retryable_statuses.contains(status),
        HttpError::RateLimited { retry_after_ms } => {
            if let Some(ms) = retry_after_ms {
                futures_timer::Delay::new(Duration::from_millis(*ms)).await;
            }
            config.retryable_statuses.contains(&429)
        }
        HttpError::Timeout => true,
        HttpError::Reqwest(re) => {
            #[cfg(not(target_arch = "wasm32"))]
            let retryable = re.is_connect() || re.is_timeout() || re.is_request();
            #[cfg(target_arch = "wasm32")]
            let retryable = re.is_timeout() || re.is_request();
            retryable
        }
        _ => false,
    }
}

fn status_error(status: u16, body: String) -> HttpError {
    match status {
        429 => HttpError::RateLimited {
            retry_after_ms: None,
        },
        400..=499 => HttpError::BadRequest(body),
        _ => HttpError::ServerError { status, body },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_request_body() {
        assert_eq!(
            serde_json::to_value(InfoRequest::MetaAndAssetCtxs).unwrap(),
            serde_json::json!({"type": "metaAndAssetCtxs"})
        );
    }

    #[test]
    fn test_info_url_trims_trailing_slash() {
        let http = InfoHttp::new("https://api.example.xyz/").unwrap();
        assert_eq!(http.info_url(), "https://api.example.xyz/info");
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(429, String::new()),
            HttpError::RateLimited { .. }
        ));
        assert!(matches!(
            status_error(422, "bad".into()),
            HttpError::BadRequest(_)
        ));
        assert!(matches!(
            status_error(503, String::new()),
            HttpError::ServerError { status: 503, .. }
        ));
    }

    #[tokio::test]
    async fn test_retryable_classification() {
        let config = RetryConfig::idempotent();
        assert!(is_retryable(&HttpError::Timeout, &config).await);
        assert!(
            is_retryable(
                &HttpError::ServerError {
                    status: 502,
                    body: String::new()
                },
                &config
            )
            .await
        );
        assert!(!is_retryable(&HttpError::BadRequest("x".into()), &config).await);
    }

    #[test]
    fn test_meta_and_asset_ctxs_response_shape() {
        let body = r#"[{"universe":[{"name":"BTC","szDecimals":5,"maxLeverage":40}]},
            [{"funding":"0.0000125","openInterest":"1200","prevDayPx":"62000","dayNtlVlm":"1",
              "premium":null,"oraclePx":"64010","markPx":"64000","midPx":null,
              "impactPxs":["63999","64001"],"dayBaseVlm":"10"}]]"#;
        let (meta, ctxs): MetaAndAssetCtxs = serde_json::from_str(body).unwrap();
        assert_eq!(meta.universe[0].max_leverage, 40);
        assert!(ctxs[0].mid_px.is_none());
    }
}
