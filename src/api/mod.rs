mod transport;

pub use transport::{HttpTransport, Transport};

use crate::error::ClientError;
use crate::media::normalize::fields::is_truthy;
use crate::media::{normalize, MediaResult, Platform};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use url::Url;

/// Client for the third-party extraction API.
pub struct ApiClient {
    transport: Box<dyn Transport>,
    base_url: Url,
    api_key: String,
}

/// Accepts only input that parses as an absolute URL.
pub fn validate_url(input: &str) -> Result<Url, ClientError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ClientError::MissingUrl);
    }

    Url::parse(input).map_err(|source| ClientError::InvalidUrl {
        input: input.to_string(),
        source,
    })
}

/// Pulls `data` out of the `{status, data}` envelope. A falsy status or a
/// missing/falsy `data` is a soft failure.
pub fn unwrap_envelope(body: Value) -> Result<Value, ClientError> {
    let Value::Object(mut envelope) = body else {
        warn!("Extraction API returned a non-object body");
        return Err(ClientError::ApiSoftFailure);
    };

    let status = envelope.get("status").is_some_and(is_truthy);
    match envelope.remove("data") {
        Some(data) if status && is_truthy(&data) => Ok(data),
        _ => {
            let reason = envelope
                .get("msg")
                .or_else(|| envelope.get("message"))
                .and_then(Value::as_str)
                .unwrap_or("no message");
            warn!("Extraction API reported failure: {}", reason);
            Err(ClientError::ApiSoftFailure)
        }
    }
}

impl ApiClient {
    pub fn new(
        transport: Box<dyn Transport>,
        base_url: &str,
        api_key: impl Into<String>,
    ) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| anyhow::anyhow!("Invalid API base URL '{}': {}", base_url, e))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow::anyhow!(
                "API base URL '{}' cannot carry a path",
                base_url
            ));
        }

        info!(
            "Extraction API client initialized ({} transport, {})",
            transport.name(),
            base_url
        );

        Ok(Self {
            transport,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// `{base}/{segment}?url={target}&apikey={key}`
    pub fn request_url(&self, platform: Platform, target: &Url) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(platform.api_segment());
        }
        url.query_pairs_mut()
            .clear()
            .append_pair("url", target.as_str())
            .append_pair("apikey", &self.api_key);
        url
    }

    /// Validates `input`, asks the API for it and normalizes the answer.
    /// Resolves to [`ClientError::Cancelled`] as soon as `cancel` fires.
    pub async fn fetch(
        &self,
        platform: Platform,
        input: &str,
        cancel: &CancellationToken,
    ) -> Result<MediaResult, ClientError> {
        let target = validate_url(input)?;
        let request = self.request_url(platform, &target);

        info!("Requesting {} media for {}", platform, target);

        let body = tokio::select! {
            _ = cancel.cancelled() => {
                info!("Request for {} superseded", target);
                return Err(ClientError::Cancelled);
            }
            body = self.transport.get_json(&request) => body?,
        };

        let data = unwrap_envelope(body)?;
        Ok(normalize(platform, &data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    enum Reply {
        Body(Value),
        Fail,
        Hang,
    }

    struct FakeTransport {
        calls: Arc<Mutex<Vec<Url>>>,
        reply: Reply,
    }

    #[async_trait]
    impl Transport for FakeTransport {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn get_json(&self, url: &Url) -> Result<Value, ClientError> {
            self.calls.lock().unwrap().push(url.clone());
            match &self.reply {
                Reply::Body(body) => Ok(body.clone()),
                Reply::Fail => Err(ClientError::Network("connection reset".into())),
                Reply::Hang => std::future::pending().await,
            }
        }
    }

    fn fake_client(reply: Reply) -> (ApiClient, Arc<Mutex<Vec<Url>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let transport = FakeTransport {
            calls: Arc::clone(&calls),
            reply,
        };
        let client = ApiClient::new(Box::new(transport), "https://api.example.com/api", "k3y").unwrap();
        (client, calls)
    }

    #[test]
    fn test_validate_url() {
        assert!(matches!(validate_url("   "), Err(ClientError::MissingUrl)));
        assert!(matches!(
            validate_url("not a url"),
            Err(ClientError::InvalidUrl { .. })
        ));
        assert!(matches!(
            validate_url("www.tiktok.com/@a/video/1"),
            Err(ClientError::InvalidUrl { .. })
        ));
        assert_eq!(
            validate_url(" https://vt.tiktok.com/abc/ ").unwrap().as_str(),
            "https://vt.tiktok.com/abc/"
        );
    }

    #[test]
    fn test_request_url_per_platform() {
        let (client, _) = fake_client(Reply::Fail);
        let target = Url::parse("https://www.instagram.com/p/xyz/?igsh=1&a=b").unwrap();

        let url = client.request_url(Platform::Instagram, &target);
        assert_eq!(url.path(), "/api/ig");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("url".to_string(), target.to_string()),
                ("apikey".to_string(), "k3y".to_string())
            ]
        );

        for (platform, segment) in [
            (Platform::Tiktok, "/api/tiktok"),
            (Platform::Youtube, "/api/yt"),
            (Platform::Facebook, "/api/fb"),
        ] {
            assert_eq!(client.request_url(platform, &target).path(), segment);
        }
    }

    #[test]
    fn test_trailing_slash_base() {
        let transport = FakeTransport {
            calls: Arc::default(),
            reply: Reply::Fail,
        };
        let client = ApiClient::new(Box::new(transport), "https://api.example.com/api/", "k").unwrap();
        let target = Url::parse("https://youtu.be/x").unwrap();
        assert_eq!(client.request_url(Platform::Youtube, &target).path(), "/api/yt");
    }

    #[test]
    fn test_unwrap_envelope() {
        assert_eq!(
            unwrap_envelope(json!({"status": true, "data": {"a": 1}})).unwrap(),
            json!({"a": 1})
        );
        assert_eq!(
            unwrap_envelope(json!({"status": true, "data": []})).unwrap(),
            json!([])
        );
        for body in [
            json!({"status": false, "data": {"a": 1}}),
            json!({"status": true}),
            json!({"status": true, "data": null}),
            json!({"status": true, "data": ""}),
            json!({"data": {"a": 1}}),
            json!([1, 2]),
        ] {
            assert!(matches!(
                unwrap_envelope(body),
                Err(ClientError::ApiSoftFailure)
            ));
        }
    }

    #[tokio::test]
    async fn test_fetch_normalizes_data() {
        let (client, calls) = fake_client(Reply::Body(json!({
            "status": true,
            "data": {"video": "https://cdn/v.mp4", "author": {"nickname": "n"}}
        })));

        let result = client
            .fetch(Platform::Tiktok, "https://vt.tiktok.com/abc/", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.preview.author_name, "n");
        assert_eq!(result.assets.len(), 1);
        assert_eq!(calls.lock().unwrap().len(), 1);
        assert_eq!(calls.lock().unwrap()[0].path(), "/api/tiktok");
    }

    #[tokio::test]
    async fn test_invalid_url_never_reaches_transport() {
        let (client, calls) = fake_client(Reply::Fail);

        let err = client
            .fetch(Platform::Tiktok, "not a url", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::InvalidUrl { .. }));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_soft_failure_and_network_error() {
        let (client, _) = fake_client(Reply::Body(json!({"status": false, "msg": "limit"})));
        let err = client
            .fetch(Platform::Youtube, "https://youtu.be/x", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::ApiSoftFailure));

        let (client, _) = fake_client(Reply::Fail);
        let err = client
            .fetch(Platform::Youtube, "https://youtu.be/x", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }

    #[tokio::test]
    async fn test_unrecognized_payload_is_normalization_error() {
        let (client, _) = fake_client(Reply::Body(json!({"status": true, "data": "just text"})));
        let err = client
            .fetch(Platform::Tiktok, "https://vt.tiktok.com/abc/", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Normalization(_)));
    }

    #[tokio::test]
    async fn test_cancel_supersedes_in_flight_request() {
        let (client, calls) = fake_client(Reply::Hang);
        let token = CancellationToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let err = client
            .fetch(Platform::Facebook, "https://fb.watch/x", &token)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Cancelled));
        assert_eq!(calls.lock().unwrap().len(), 1);
    }
}
