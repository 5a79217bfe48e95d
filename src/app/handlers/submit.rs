//! Asynchronous form submission
//!
//! Serializes a form, sends it through the injected [`Transport`] and turns
//! the outcome into a notification plus a typed result. The overlay is shown
//! for the duration of the request and hidden on every exit path.

use crate::app::Page;
use crate::core::error::TransportError;
use crate::core::http::{Body, Method, REQUESTED_WITH_HEADER, Request, Response, Transport};
use crate::core::stock::Severity;
use serde_json::Value;
use thiserror::Error;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";
pub const INVALID_RESPONSE_MESSAGE: &str = "Unexpected response from server.";
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Success!";

/// Why a submission did not produce a usable response
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("form not found: {0}")]
    FormNotFound(String),

    #[error("form {0} is already being submitted")]
    Busy(String),

    #[error("network error: {0}")]
    Transport(#[from] TransportError),

    #[error("server rejected the submission with status {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    #[error("unexpected response body: {0}")]
    InvalidResponse(String),
}

/// Submits `form_id` and reports the outcome to the user.
///
/// `url` and `method` override the form's own action and method.
///
/// # Errors
///
/// See [`SubmitError`]. Every variant except `FormNotFound` and `Busy` has
/// already been shown as a danger notification when this returns.
pub async fn submit_form<T: Transport>(
    page: &mut Page,
    transport: &T,
    form_id: &str,
    url: Option<&str>,
    method: Option<Method>,
) -> Result<Value, SubmitError> {
    let Some(form) = page.form_mut(form_id) else {
        tracing::error!("Form not found: {}", form_id);
        return Err(SubmitError::FormNotFound(form_id.to_string()));
    };

    if form.submitting {
        tracing::warn!("Ignoring duplicate submission of {}", form_id);
        return Err(SubmitError::Busy(form_id.to_string()));
    }

    let request = Request::new(
        method.unwrap_or(form.method),
        url.map_or_else(|| form.action.clone(), str::to_string),
    )
    .header(REQUESTED_WITH_HEADER.0, REQUESTED_WITH_HEADER.1)
    .body(Body::Form(form.to_payload()));

    tracing::info!("Submitting {} via {} {}", form_id, request.method, request.url);

    let in_flight = InFlight::begin(page, form_id);
    let outcome = transport.send(request).await;
    drop(in_flight);

    settle_submission(page, form_id, outcome)
}

/// Marks a form as submitting and shows the overlay until dropped.
///
/// Dropping releases both, so a cancelled submission (timeout, `select!`,
/// task abort) leaves the page usable.
struct InFlight<'a> {
    page: &'a mut Page,
    form_id: &'a str,
}

impl<'a> InFlight<'a> {
    fn begin(page: &'a mut Page, form_id: &'a str) -> Self {
        if let Some(form) = page.form_mut(form_id) {
            form.submitting = true;
        }
        page.overlay.show();
        Self { page, form_id }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.page.overlay.hide();
        if let Some(form) = self.page.form_mut(self.form_id) {
            form.submitting = false;
        }
    }
}

fn settle_submission(
    page: &mut Page,
    form_id: &str,
    outcome: Result<Response, TransportError>,
) -> Result<Value, SubmitError> {
    let response = match outcome {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Form submission error for {}: {}", form_id, e);
            page.notify(NETWORK_ERROR_MESSAGE, Severity::Danger);
            return Err(SubmitError::Transport(e));
        }
    };

    if !response.is_success() {
        let message = response.message();
        tracing::error!(
            "Submission of {} rejected with status {}",
            form_id,
            response.status
        );
        page.notify(
            message.as_deref().unwrap_or(GENERIC_ERROR_MESSAGE),
            Severity::Danger,
        );
        return Err(SubmitError::Rejected {
            status: response.status,
            message,
        });
    }

    match response.parse_json::<Value>() {
        Ok(data) => {
            let message = data
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_SUCCESS_MESSAGE)
                .to_string();
            page.notify(message, Severity::Success);
            Ok(data)
        }
        Err(e) => {
            tracing::error!("Submission of {} returned a non-JSON body: {}", form_id, e);
            page.notify(INVALID_RESPONSE_MESSAGE, Severity::Danger);
            Err(SubmitError::InvalidResponse(e.to_string()))
        }
    }
}
