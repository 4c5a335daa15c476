//! General contact messages sent from the site footer form.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, response::Response};
use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::remote::{ContactMessage, DataService, MessageId, RemoteError};
use crate::reviews::Language;
use crate::validation::{Field, FieldErrors};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("contact form invalid: {0}")]
    Validation(FieldErrors),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

pub fn prepare_message(
    form: &ContactForm,
    language: Language,
) -> Result<ContactMessage, FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.require(Field::Name, &form.name);
    errors.require_email(&form.email);
    errors.require(Field::Subject, &form.subject);
    errors.require(Field::Message, &form.message);
    errors.into_result()?;

    Ok(ContactMessage {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        subject: form.subject.trim().to_string(),
        message: form.message.trim().to_string(),
        language,
    })
}

pub struct ContactService<D> {
    service: Arc<D>,
    language: Language,
}

impl<D> ContactService<D>
where
    D: DataService + 'static,
{
    pub fn new(service: Arc<D>, language: Language) -> Self {
        Self { service, language }
    }

    pub async fn submit(&self, form: ContactForm) -> Result<MessageId, ContactError> {
        let message = prepare_message(&form, self.language).map_err(ContactError::Validation)?;
        match self.service.submit_contact_message(message).await {
            Ok(id) => {
                info!(message = %id.0, "contact message accepted");
                Ok(id)
            }
            Err(err) => {
                warn!(error = %err, "contact message failed");
                Err(err.into())
            }
        }
    }
}

pub fn contact_router<D>(service: Arc<ContactService<D>>) -> Router
where
    D: DataService + 'static,
{
    Router::new()
        .route("/api/v1/contact", post(submit_handler::<D>))
        .with_state(service)
}

pub(crate) async fn submit_handler<D>(
    State(service): State<Arc<ContactService<D>>>,
    Json(form): Json<ContactForm>,
) -> Response
where
    D: DataService + 'static,
{
    match service.submit(form).await {
        Ok(id) => (StatusCode::ACCEPTED, Json(json!({ "message_id": id }))).into_response(),
        Err(ContactError::Validation(fields)) => {
            let payload = json!({ "error": "contact form invalid", "fields": fields });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(ContactError::Remote(err)) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::BAD_GATEWAY, Json(payload)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;

    #[test]
    fn prepare_message_trims_fields() {
        let form = ContactForm {
            name: " Lena ".to_string(),
            email: "lena@example.de".to_string(),
            subject: "Anreise".to_string(),
            message: "Gibt es Parkplätze?".to_string(),
        };
        let message = prepare_message(&form, Language::De).expect("valid");
        assert_eq!(message.name, "Lena");
        assert_eq!(message.language, Language::De);
    }

    #[test]
    fn prepare_message_requires_subject_and_valid_email() {
        let form = ContactForm {
            name: "Lena".to_string(),
            email: "lena-at-example".to_string(),
            subject: String::new(),
            message: "Hallo".to_string(),
        };
        let errors = prepare_message(&form, Language::De).expect_err("invalid");
        assert_eq!(errors.get(Field::Subject), Some(ValidationError::Required));
        assert_eq!(errors.get(Field::Email), Some(ValidationError::InvalidEmail));
        assert!(!errors.contains(Field::Name));
    }
}
