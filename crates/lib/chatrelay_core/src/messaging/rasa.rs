//! Rasa REST channel client.
//!
//! Messages go to `POST {base}/webhooks/rest/webhook`; attachments travel as
//! base64 entries under `metadata.attachments`, which custom actions can read
//! from the tracker's latest message metadata.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::debug;
use url::Url;

use super::{MessagingClient, MessagingError, ResponseItem};
use crate::config::BackendConfig;
use crate::message::{Attachment, OutboundMessage};

const WEBHOOK_PATH: [&str; 3] = ["webhooks", "rest", "webhook"];

#[derive(Serialize)]
struct WebhookRequest<'a> {
    sender: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<WebhookMetadata<'a>>,
}

#[derive(Serialize)]
struct WebhookMetadata<'a> {
    attachments: Vec<WebhookAttachment<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookAttachment<'a> {
    filename: Option<&'a str>,
    content_type: Option<&'a str>,
    size: usize,
    data: String,
}

impl<'a> From<&'a Attachment> for WebhookAttachment<'a> {
    fn from(a: &'a Attachment) -> Self {
        Self {
            filename: a.file_name.as_deref(),
            content_type: a.content_type.as_deref(),
            size: a.size(),
            data: STANDARD.encode(&a.data),
        }
    }
}

impl<'a> From<&'a OutboundMessage> for WebhookRequest<'a> {
    fn from(m: &'a OutboundMessage) -> Self {
        let metadata = (!m.files().is_empty()).then(|| WebhookMetadata {
            attachments: m.files().iter().map(WebhookAttachment::from).collect(),
        });
        Self {
            sender: m.sender(),
            message: m.text(),
            metadata,
        }
    }
}

/// [`MessagingClient`] backed by a Rasa server's REST channel.
#[derive(Clone, Debug)]
pub struct RasaClient {
    http: Client,
    base_url: Url,
}

impl RasaClient {
    /// Builds a client with the configured timeout and TLS policy.
    pub fn new(config: &BackendConfig) -> Result<Self, MessagingError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            MessagingError::Config(format!("invalid base URL '{}': {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(MessagingError::Config(format!(
                "base URL '{}' cannot carry a path",
                config.base_url
            )));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends escaped path segments to the base URL.
    fn endpoint<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, MessagingError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MessagingError::Config("base URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Turns a non-2xx response into [`MessagingError::Status`].
async fn ensure_success(resp: Response) -> Result<Response, MessagingError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp
        .text()
        .await
        .unwrap_or_else(|_| "<no body>".to_string());
    Err(MessagingError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl MessagingClient for RasaClient {
    async fn send(&self, message: &OutboundMessage) -> Result<Vec<ResponseItem>, MessagingError> {
        let url = self.endpoint(WEBHOOK_PATH)?;
        debug!(
            %url,
            sender = message.sender(),
            files = message.files().len(),
            "posting message to backend"
        );

        let resp = self
            .http
            .post(url)
            .json(&WebhookRequest::from(message))
            .send()
            .await?;
        let items: Vec<ResponseItem> = ensure_success(resp).await?.json().await?;

        debug!(sender = message.sender(), replies = items.len(), "backend replied");
        Ok(items)
    }

    async fn tracker(&self, sender: &str) -> Result<serde_json::Value, MessagingError> {
        let url = self.endpoint(["conversations", sender, "tracker"])?;
        debug!(%url, "fetching conversation tracker");

        let resp = self.http.get(url).send().await?;
        Ok(ensure_success(resp).await?.json().await?)
    }

    async fn status(&self) -> Result<(), MessagingError> {
        let url = self.endpoint(std::iter::empty())?;
        let resp = self.http.get(url).send().await?;
        ensure_success(resp).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> RasaClient {
        RasaClient::new(&BackendConfig {
            base_url: base.into(),
            ..BackendConfig::default()
        })
        .expect("client")
    }

    #[test]
    fn webhook_url_is_appended_to_base() {
        let c = client("http://localhost:5005");
        assert_eq!(
            c.endpoint(WEBHOOK_PATH).unwrap().as_str(),
            "http://localhost:5005/webhooks/rest/webhook"
        );
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let c = client("https://bots.example.com/rasa/");
        assert_eq!(
            c.endpoint(WEBHOOK_PATH).unwrap().as_str(),
            "https://bots.example.com/rasa/webhooks/rest/webhook"
        );
    }

    #[test]
    fn tracker_sender_is_escaped() {
        let c = client("http://localhost:5005");
        assert_eq!(
            c.endpoint(["conversations", "a/b c", "tracker"])
                .unwrap()
                .as_str(),
            "http://localhost:5005/conversations/a%2Fb%20c/tracker"
        );
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let err = RasaClient::new(&BackendConfig {
            base_url: "not a url".into(),
            ..BackendConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, MessagingError::Config(_)));
    }

    #[test]
    fn metadata_is_omitted_without_files() {
        let msg = OutboundMessage::new(Some("u1".into()), Some("hello".into()), vec![]).unwrap();
        let json = serde_json::to_value(WebhookRequest::from(&msg)).unwrap();
        assert_eq!(json, serde_json::json!({"sender": "u1", "message": "hello"}));
    }

    #[test]
    fn attachments_are_base64_encoded() {
        let msg = OutboundMessage::new(
            Some("u1".into()),
            Some("see file".into()),
            vec![Attachment {
                file_name: Some("cv.pdf".into()),
                content_type: Some("application/pdf".into()),
                data: b"hello".to_vec(),
            }],
        )
        .unwrap();
        let json = serde_json::to_value(WebhookRequest::from(&msg)).unwrap();
        assert_eq!(
            json["metadata"]["attachments"],
            serde_json::json!([{
                "filename": "cv.pdf",
                "contentType": "application/pdf",
                "size": 5,
                "data": "aGVsbG8="
            }])
        );
    }
}
