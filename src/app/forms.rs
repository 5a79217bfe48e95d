//! Form model and required-field validation
//!
//! Fields carry their own `invalid` decoration so the page can render inline
//! errors. Validation never submits or navigates.

use crate::app::Page;
use crate::core::error::ElementKind;
use crate::core::http::{FormPart, FormPayload, Method};
use crate::core::stock::Severity;
use crate::validators::is_blank;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Number,
    Select,
    #[strum(serialize = "textarea")]
    TextArea,
    Hidden,
    File,
}

/// A file chosen in a file input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    File(Option<FileUpload>),
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub value: FieldValue,
    pub required: bool,
    pub readonly: bool,
    /// Inline error decoration
    pub invalid: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let value = match kind {
            FieldKind::File => FieldValue::File(None),
            _ => FieldValue::Text(String::new()),
        };
        Self {
            name: name.into(),
            kind,
            value,
            required: false,
            readonly: false,
            invalid: false,
        }
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut field = Self::new(name, FieldKind::Text);
        field.value = FieldValue::Text(value.into());
        field
    }

    pub fn hidden(name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut field = Self::new(name, FieldKind::Hidden);
        field.value = FieldValue::Text(value.into());
        field
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    /// Sets the text value; ignored on file inputs
    pub fn set_text(&mut self, value: impl Into<String>) {
        if let FieldValue::Text(current) = &mut self.value {
            *current = value.into();
        }
    }

    pub fn set_file(&mut self, file: Option<FileUpload>) {
        if self.kind == FieldKind::File {
            self.value = FieldValue::File(file);
        }
    }

    pub fn text_value(&self) -> Option<&str> {
        match &self.value {
            FieldValue::Text(text) => Some(text),
            FieldValue::File(_) => None,
        }
    }

    /// Required-field rule: blank text, or no file chosen
    pub fn is_missing(&self) -> bool {
        match &self.value {
            FieldValue::Text(text) => is_blank(text),
            FieldValue::File(file) => file.is_none(),
        }
    }

    /// Can receive initial focus
    pub fn is_focusable(&self) -> bool {
        self.kind != FieldKind::Hidden && !self.readonly
    }
}

/// Names of the required fields that failed validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub missing: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Form {
    pub id: String,
    pub action: String,
    pub method: Method,
    pub fields: Vec<Field>,
    /// Set while a submission is in flight
    pub submitting: bool,
}

impl Form {
    pub fn new(id: impl Into<String>, action: impl Into<String>, method: Method) -> Self {
        Self {
            id: id.into(),
            action: action.into(),
            method,
            fields: Vec::new(),
            submitting: false,
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    pub fn first_focusable(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.is_focusable())
    }

    /// Checks every required field and updates the decorations.
    ///
    /// Returns None if validation passed
    pub fn validate(&mut self) -> Option<FormErrors> {
        let mut errors = FormErrors::default();

        for field in &mut self.fields {
            field.invalid = field.required && field.is_missing();
            if field.invalid {
                errors.missing.push(field.name.clone());
            }
        }

        if errors.missing.is_empty() {
            None
        } else {
            Some(errors)
        }
    }

    /// Serializes every named field, files included
    pub fn to_payload(&self) -> FormPayload {
        let mut payload = FormPayload::default();
        for field in self.fields.iter().filter(|f| !f.name.is_empty()) {
            match &field.value {
                FieldValue::Text(text) => payload.push_text(&field.name, text),
                FieldValue::File(Some(file)) => payload.parts.push((
                    field.name.clone(),
                    FormPart::File {
                        filename: file.filename.clone(),
                        content_type: file.content_type.clone(),
                        bytes: file.bytes.clone(),
                    },
                )),
                FieldValue::File(None) => payload.parts.push((
                    field.name.clone(),
                    FormPart::File {
                        filename: String::new(),
                        content_type: "application/octet-stream".to_string(),
                        bytes: Vec::new(),
                    },
                )),
            }
        }
        payload
    }
}

/// Validates the required fields of `form_id`, decorating failures.
///
/// Emits a single danger notification when anything is missing. An unknown
/// form id is logged and reported as invalid.
pub fn validate_form(page: &mut Page, form_id: &str) -> bool {
    let Some(form) = page.form_mut(form_id) else {
        tracing::error!("{} not found: {}", ElementKind::Form, form_id);
        return false;
    };

    match form.validate() {
        None => true,
        Some(errors) => {
            tracing::warn!(
                "Form {} is missing required fields: {}",
                form_id,
                errors.missing.join(", ")
            );
            page.notifications
                .notify(REQUIRED_FIELDS_MESSAGE, Severity::Danger);
            false
        }
    }
}
