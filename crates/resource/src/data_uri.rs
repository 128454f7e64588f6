use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dossier_traits::{ResourceError, ResourceProvider, SharedResourceData};
use std::sync::Arc;

/// Decodes inline `data:[<mediatype>];base64,<payload>` references.
#[derive(Debug, Default, Clone, Copy)]
pub struct DataUriProvider;

impl DataUriProvider {
    pub fn new() -> Self {
        Self
    }

    fn decode(src: &str) -> Result<Vec<u8>, ResourceError> {
        let decode_error = |message: &str| ResourceError::Decode {
            src: truncated(src),
            message: message.to_string(),
        };

        let rest = src.strip_prefix("data:").ok_or_else(|| decode_error("missing 'data:' prefix"))?;
        let (header, payload) = rest.split_once(',').ok_or_else(|| decode_error("missing ',' separator"))?;
        if !header.split(';').any(|part| part.eq_ignore_ascii_case("base64")) {
            return Err(decode_error("only base64 payloads are supported"));
        }

        let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        STANDARD.decode(compact).map_err(|e| decode_error(&e.to_string()))
    }
}

/// Data URIs can be huge; error messages only carry their head.
fn truncated(src: &str) -> String {
    match src.char_indices().nth(48) {
        Some((idx, _)) => format!("{}...", &src[..idx]),
        None => src.to_string(),
    }
}

#[async_trait]
impl ResourceProvider for DataUriProvider {
    async fn load(&self, src: &str) -> Result<SharedResourceData, ResourceError> {
        Self::decode(src).map(Arc::new)
    }

    fn handles(&self, src: &str) -> bool {
        src.starts_with("data:")
    }

    fn name(&self) -> &'static str {
        "DataUriProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn decodes_base64_payload() {
        let provider = DataUriProvider::new();
        let data = provider.load("data:image/png;base64,aGVsbG8=").await.unwrap();
        assert_eq!(&*data, b"hello");
    }

    #[tokio::test]
    async fn tolerates_line_wrapped_payloads() {
        let provider = DataUriProvider::new();
        let data = provider.load("data:image/png;base64,aGVs\nbG8=").await.unwrap();
        assert_eq!(&*data, b"hello");
    }

    #[tokio::test]
    async fn rejects_plain_and_broken_payloads() {
        let provider = DataUriProvider::new();
        for src in ["data:text/plain,hello", "data:image/png;base64", "data:image/png;base64,@@@"] {
            let result = provider.load(src).await;
            assert!(matches!(result, Err(ResourceError::Decode { .. })), "{src} decoded");
        }
    }

    #[test]
    fn long_sources_are_truncated_in_errors() {
        let src = format!("data:image/png;base64,{}", "A".repeat(500));
        assert!(truncated(&src).len() < 60);
        assert_eq!(truncated("data:,x"), "data:,x");
    }
}
