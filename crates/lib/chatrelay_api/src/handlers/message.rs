//! Message relay handler — validate, forward to the backend, relay its replies.

use axum::Json;
use axum::extract::{Form, FromRequest, Multipart, Request, State};
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use chatrelay_core::message::{Attachment, OutboundMessage};
use chatrelay_core::messaging::ResponseItem;
use serde::Deserialize;
use tracing::{debug, error};

use crate::AppState;
use crate::error::{AppError, AppResult};

/// Raw form fields of `POST /message`, before validation.
///
/// Accepts `multipart/form-data` (with `files` parts) or
/// `application/x-www-form-urlencoded`. A request without a content type
/// decodes to an empty form; an unreadable one is rejected.
#[derive(Debug, Default)]
pub struct MessageForm {
    pub sender: Option<String>,
    pub text: Option<String>,
    pub files: Vec<Attachment>,
}

#[derive(Deserialize)]
struct UrlEncodedFields {
    sender: Option<String>,
    text: Option<String>,
}

/// Maps a body-decoding failure, keeping 413 for oversized uploads.
fn body_error(status: StatusCode, text: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(text)
    } else {
        AppError::MalformedBody(text)
    }
}

fn multipart_error(e: MultipartError) -> AppError {
    body_error(e.status(), e.body_text())
}

impl MessageForm {
    async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            match field.name() {
                Some("sender") => form.sender = Some(field.text().await.map_err(multipart_error)?),
                Some("text") => form.text = Some(field.text().await.map_err(multipart_error)?),
                Some("files") => {
                    let file_name = field.file_name().map(str::to_string);
                    let content_type = field.content_type().map(str::to_string);
                    let data = field.bytes().await.map_err(multipart_error)?.to_vec();
                    form.files.push(Attachment {
                        file_name,
                        content_type,
                        data,
                    });
                }
                _ => {}
            }
        }
        Ok(form)
    }
}

impl<S> FromRequest<S> for MessageForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .map(|v| {
                v.to_str().map(str::to_ascii_lowercase).map_err(|_| {
                    AppError::UnsupportedMediaType("non-UTF-8 content type".into())
                })
            })
            .transpose()?;

        match content_type.as_deref() {
            None => Ok(Self::default()),
            Some(ct) if ct.starts_with("multipart/form-data") => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| body_error(e.status(), e.body_text()))?;
                Self::from_multipart(multipart).await
            }
            Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => {
                let Form(fields) = Form::<UrlEncodedFields>::from_request(req, state)
                    .await
                    .map_err(|e| body_error(e.status(), e.body_text()))?;
                Ok(Self {
                    sender: fields.sender,
                    text: fields.text,
                    files: Vec::new(),
                })
            }
            Some(other) => Err(AppError::UnsupportedMediaType(other.to_string())),
        }
    }
}

/// `POST /message` — forward one message and return the backend's replies.
pub async fn send_message_handler(
    State(state): State<AppState>,
    form: MessageForm,
) -> AppResult<Json<Vec<ResponseItem>>> {
    let message = OutboundMessage::new(form.sender, form.text, form.files)
        .inspect_err(|e| debug!("rejected message: {e}"))?;

    let responses = state.client.send(&message).await.map_err(|e| {
        error!(
            sender = message.sender(),
            files = message.files().len(),
            error = %e,
            "error sending message to backend"
        );
        AppError::backend("Error sending message", e)
    })?;

    Ok(Json(responses))
}
