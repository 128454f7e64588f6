use async_trait::async_trait;
use dossier_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::sync::Arc;
use std::time::Duration;

/// Fetches `http://` and `https://` references with a shared client.
#[derive(Debug, Clone)]
pub struct HttpResourceProvider {
    client: reqwest::Client,
}

impl HttpResourceProvider {
    pub fn new(timeout: Duration) -> Result<Self, ResourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("dossier/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ResourceError::Io(format!("could not build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

pub(crate) fn is_http(src: &str) -> bool {
    let lower = src.get(..8).unwrap_or(src).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[async_trait]
impl ResourceProvider for HttpResourceProvider {
    async fn load(&self, src: &str) -> Result<SharedResourceData, ResourceError> {
        if !is_http(src) {
            return Err(ResourceError::InvalidPath(src.to_string()));
        }

        log::debug!("Fetching {}", src);
        let response = self
            .client
            .get(src)
            .send()
            .await
            .map_err(|e| ResourceError::Io(format!("{}: {}", src, e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ResourceError::NotFound(src.to_string()));
        }
        if !status.is_success() {
            return Err(ResourceError::Http {
                src: src.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ResourceError::Io(format!("{}: {}", src, e)))?;
        Ok(Arc::new(bytes.to_vec()))
    }

    fn handles(&self, src: &str) -> bool {
        is_http(src)
    }

    fn name(&self) -> &'static str {
        "HttpResourceProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_http_schemes_case_insensitively() {
        assert!(is_http("https://example.com/a.png"));
        assert!(is_http("HTTP://example.com/a.png"));
        assert!(!is_http("ftp://example.com/a.png"));
        assert!(!is_http("assets/a.png"));
        assert!(!is_http("http"));
    }

    #[tokio::test]
    async fn rejects_non_http_references_without_a_request() {
        let provider = HttpResourceProvider::new(Duration::from_secs(1)).unwrap();
        let result = provider.load("assets/portrait.jpg").await;
        assert!(matches!(result, Err(ResourceError::InvalidPath(_))));
    }
}
