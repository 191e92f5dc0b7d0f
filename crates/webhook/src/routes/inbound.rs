//! Inbound message webhook.

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::{Form, Json};
use orchestrator::InboundEvent;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, WebhookError};
use crate::state::AppState;

/// Fields read from Twilio's form-encoded webhook; everything else is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct InboundForm {
    #[serde(rename = "WaId")]
    pub wa_id: Option<String>,
    #[serde(rename = "ProfileName")]
    pub profile_name: Option<String>,
    #[serde(rename = "Body")]
    pub body: Option<String>,
    #[serde(rename = "From")]
    pub from: Option<String>,
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| WebhookError::Malformed(format!("missing {}", field)))
}

impl InboundForm {
    /// Convert to an event, rejecting missing or blank required fields.
    pub fn into_event(self) -> Result<InboundEvent> {
        let sender_id = required(self.wa_id, "WaId")?;
        let text = required(self.body, "Body")?;
        let destination = required(self.from, "From")?;
        let display_name = self.profile_name.filter(|v| !v.trim().is_empty());

        Ok(InboundEvent::new(sender_id, display_name, text, destination))
    }
}

#[derive(Debug, Serialize)]
pub struct Accepted {
    pub status: &'static str,
    pub path: String,
}

/// `POST /webhook/receive`
pub async fn receive(
    State(state): State<AppState>,
    form: std::result::Result<Form<InboundForm>, FormRejection>,
) -> Result<Json<Accepted>> {
    let Form(form) = form.map_err(|e| WebhookError::Malformed(e.body_text()))?;
    let event = form.into_event()?;
    debug!(sender = %event.sender_id, "Webhook received");

    let report = state.orchestrator.handle(event).await;
    match report.path {
        Some(path) if !report.failed => Ok(Json(Accepted {
            status: "ok",
            path: path.to_string(),
        })),
        _ => Err(WebhookError::Processing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(wa_id: Option<&str>, body: Option<&str>, from: Option<&str>) -> InboundForm {
        InboundForm {
            wa_id: wa_id.map(str::to_string),
            profile_name: Some(" ".to_string()),
            body: body.map(str::to_string),
            from: from.map(str::to_string),
        }
    }

    #[test]
    fn test_into_event() {
        let event = form(Some("2782"), Some("hi"), Some("whatsapp:+2782"))
            .into_event()
            .unwrap();
        assert_eq!(event.sender_id, "2782");
        assert_eq!(event.destination, "whatsapp:+2782");
        assert!(event.display_name.is_none());
    }

    #[test]
    fn test_missing_fields() {
        for (wa_id, body, from) in [
            (None, Some("hi"), Some("to")),
            (Some("2782"), Some(""), Some("to")),
            (Some("2782"), Some("hi"), None),
        ] {
            assert!(matches!(
                form(wa_id, body, from).into_event(),
                Err(WebhookError::Malformed(_))
            ));
        }
    }
}
