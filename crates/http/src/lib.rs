//! HTTP Fetcher (C2): retries, TLS fallback, domain-availability probe,
//! redirect inspection.

use jobscout_ratelimit::RateLimiter;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;

#[derive(Debug, Error)]
pub enum FetchError {
    /// DNS failure / connection refused / unreachable. Aborts the whole
    /// site scan immediately; NOT retried (§7).
    #[error("domain unreachable: {0}")]
    DomainUnreachable(String),
    #[error("transient fetch failure: {0}")]
    Transient(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub url: String,
    pub final_url: String,
    pub status: u16,
    pub body: String,
    pub content_type: Option<String>,
    pub headers: HashMap<String, String>,
}

/// Registered-domain boundary crossing signal for `detect_redirect` (§4.2).
#[derive(Debug, Clone)]
pub struct RedirectInfo {
    pub final_url: String,
    pub crossed_registered_domain: bool,
}

const MAX_RETRIES: u32 = 3;
const RETRY_BASE: Duration = Duration::from_secs(1);
const RETRY_CAP: Duration = Duration::from_secs(10);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

pub struct HttpFetcher {
    client: reqwest::Client,
    insecure_client: OnceCell<reqwest::Client>,
    rate_limiter: Arc<RateLimiter>,
}

impl HttpFetcher {
    pub fn new(rate_limiter: Arc<RateLimiter>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .pool_max_idle_per_host(20)
            .user_agent("Mozilla/5.0 (compatible; jobscout/0.1)")
            .build()
            .expect("default client config is valid");
        Self {
            client,
            insecure_client: OnceCell::new(),
            rate_limiter,
        }
    }

    async fn insecure_client(&self) -> &reqwest::Client {
        self.insecure_client
            .get_or_init(|| async {
                reqwest::Client::builder()
                    .timeout(DEFAULT_TIMEOUT)
                    .danger_accept_invalid_certs(true)
                    .user_agent("Mozilla/5.0 (compatible; jobscout/0.1)")
                    .build()
                    .expect("insecure client config is valid")
            })
            .await
    }

    /// `GET(url) -> Result<Body, Error>`. Returns `Ok(None)` on 4xx/5xx
    /// without raising (§4.2 iv); `Err(DomainUnreachable)` aborts the scan.
    pub async fn get(&self, url: &str) -> Result<Option<FetchResponse>, FetchError> {
        let _lease = self.rate_limiter.acquire(url).await;

        let mut use_insecure = false;
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let client = if use_insecure {
                self.insecure_client().await.clone()
            } else {
                self.client.clone()
            };

            match client.get(url).send().await {
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    let final_url = resp.url().to_string();
                    let content_type = resp
                        .headers()
                        .get(reqwest::header::CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .map(|s| s.to_string());
                    let retry_after = resp
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(RateLimiter::parse_retry_after);
                    let mut headers = HashMap::new();
                    for (k, v) in resp.headers().iter() {
                        if let Ok(v) = v.to_str() {
                            headers.insert(k.as_str().to_lowercase(), v.to_string());
                        }
                    }

                    self.rate_limiter
                        .on_response(url, status, retry_after)
                        .await;

                    let body = resp.text().await.unwrap_or_default();

                    if !(200..400).contains(&status) {
                        return Ok(None);
                    }
                    return Ok(Some(FetchResponse {
                        url: url.to_string(),
                        final_url,
                        status,
                        body,
                        content_type,
                        headers,
                    }));
                }
                Err(e) => {
                    let message = e.to_string();
                    if jobscout_core::patterns::is_network_unreachable_message(&message) {
                        return Err(FetchError::DomainUnreachable(message));
                    }
                    if e.is_connect() && !use_insecure && looks_like_tls_failure(&message) {
                        tracing::warn!(url, "TLS verification failed, retrying without verification");
                        use_insecure = true;
                        continue;
                    }
                    if attempt >= MAX_RETRIES {
                        return Err(FetchError::Transient(message));
                    }
                    let backoff = RETRY_BASE.mul_f64(2f64.powi(attempt as i32 - 1)).min(RETRY_CAP);
                    tracing::debug!(url, attempt, backoff_ms = backoff.as_millis(), "retrying fetch");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    /// Fail fast on dead domains before any heavy browser work: HEAD,
    /// falling back to GET, with a short timeout (§4.2 vi).
    pub async fn probe_domain(&self, url: &str) -> Result<bool, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .map_err(|e| FetchError::Other(e.into()))?;

        match client.head(url).send().await {
            Ok(resp) => Ok(resp.status().as_u16() < 500),
            Err(e) => {
                if jobscout_core::patterns::is_network_unreachable_message(&e.to_string()) {
                    return Err(FetchError::DomainUnreachable(e.to_string()));
                }
                match client.get(url).send().await {
                    Ok(resp) => Ok(resp.status().as_u16() < 500),
                    Err(e) => {
                        if jobscout_core::patterns::is_network_unreachable_message(&e.to_string())
                        {
                            Err(FetchError::DomainUnreachable(e.to_string()))
                        } else {
                            Ok(false)
                        }
                    }
                }
            }
        }
    }

    /// Final URL after following redirects, plus whether the registered
    /// domain changed (signal of M&A / domain parking) (§4.2 vii).
    pub async fn detect_redirect(&self, url: &str) -> Result<RedirectInfo, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Other(e.into()))?;
        let final_url = resp.url().to_string();
        let crossed = registrable_domain(url) != registrable_domain(&final_url);
        Ok(RedirectInfo {
            final_url,
            crossed_registered_domain: crossed,
        })
    }
}

fn looks_like_tls_failure(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("certificate") || lower.contains("tls") || lower.contains("ssl")
}

/// Best-effort registrable-domain extraction (last two labels after
/// stripping `www.`). Not a full public-suffix-list implementation; good
/// enough for the cross-domain signal this feeds (§4.2, §4.13).
pub fn registrable_domain(url: &str) -> String {
    let host = url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .unwrap_or_else(|| url.to_string());
    let host = host.strip_prefix("www.").unwrap_or(&host).to_lowercase();
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 2 {
        host
    } else {
        labels[labels.len() - 2..].join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registrable_domain_strips_www_and_subdomains() {
        assert_eq!(
            registrable_domain("https://karriere.synqony.com/jobs"),
            "synqony.com"
        );
        assert_eq!(
            registrable_domain("https://www.8com.de/offene-stellen"),
            "8com.de"
        );
        assert_eq!(registrable_domain("https://8com.de/warum-8com/karriere"), "8com.de");
    }
}
