//! Form validation
//!
//! Turns raw form input into validated drafts and patches, or a list of
//! per-field messages. Validation never touches a store.

use crate::config::{
    MIN_CLIENT_CONTACT_LENGTH, MIN_CLIENT_LOCATION_LENGTH, MIN_CLIENT_NAME_LENGTH,
    MIN_CLIENT_PHONE_LENGTH, MIN_DOCUMENT_DESCRIPTION_LENGTH, MIN_DOCUMENT_TITLE_LENGTH,
};
use crate::database::{
    ClientPatch, ClientStatus, DocumentPatch, DocumentStatus, NewClient, NewDocument,
};
use crate::storage::FileUpload;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern should compile")
});

/// A message attached to one form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every field that failed validation, in form order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn as_slice(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Message for a field, if that field failed
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    fn push(&mut self, field: &'static str, message: &str) {
        self.errors.push(FieldError {
            field,
            message: message.to_string(),
        });
    }

    fn check(&mut self, ok: bool, field: &'static str, message: &str) {
        if !ok {
            self.push(field, message);
        }
    }

    fn min_chars(&mut self, value: &str, min: usize, field: &'static str, message: &str) {
        self.check(value.chars().count() >= min, field, message);
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ===== Client =====

/// Raw client form input
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientForm {
    pub name: String,
    pub contact: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub status: String,
}

impl Default for ClientForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            contact: String::new(),
            email: String::new(),
            phone: String::new(),
            location: String::new(),
            status: ClientStatus::default().to_string(),
        }
    }
}

impl ClientForm {
    pub fn validate(self) -> Result<NewClient, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.min_chars(
            &self.name,
            MIN_CLIENT_NAME_LENGTH,
            "name",
            "Name must be at least 2 characters.",
        );
        errors.min_chars(
            &self.contact,
            MIN_CLIENT_CONTACT_LENGTH,
            "contact",
            "Contact name is required.",
        );
        errors.check(
            is_valid_email(&self.email),
            "email",
            "Please enter a valid email address.",
        );
        errors.min_chars(
            &self.phone,
            MIN_CLIENT_PHONE_LENGTH,
            "phone",
            "Please enter a valid phone number.",
        );
        errors.min_chars(
            &self.location,
            MIN_CLIENT_LOCATION_LENGTH,
            "location",
            "Location is required.",
        );
        let status = self.status.parse::<ClientStatus>().ok();
        errors.check(status.is_some(), "status", "Please select a client status.");

        errors.into_result(())?;

        Ok(NewClient {
            name: self.name,
            contact: self.contact,
            email: self.email,
            phone: self.phone,
            location: self.location,
            status: status.unwrap_or_default(),
        })
    }

    /// Validate the whole form and express it as a full-field patch
    pub fn into_patch(self) -> Result<ClientPatch, ValidationErrors> {
        let client = self.validate()?;
        Ok(ClientPatch {
            name: Some(client.name),
            contact: Some(client.contact),
            email: Some(client.email),
            phone: Some(client.phone),
            location: Some(client.location),
            status: Some(client.status),
            projects: None,
        })
    }
}

impl ClientPatch {
    /// Check only the fields the patch sets
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if let Some(name) = &self.name {
            errors.min_chars(
                name,
                MIN_CLIENT_NAME_LENGTH,
                "name",
                "Name must be at least 2 characters.",
            );
        }
        if let Some(contact) = &self.contact {
            errors.min_chars(
                contact,
                MIN_CLIENT_CONTACT_LENGTH,
                "contact",
                "Contact name is required.",
            );
        }
        if let Some(email) = &self.email {
            errors.check(
                is_valid_email(email),
                "email",
                "Please enter a valid email address.",
            );
        }
        if let Some(phone) = &self.phone {
            errors.min_chars(
                phone,
                MIN_CLIENT_PHONE_LENGTH,
                "phone",
                "Please enter a valid phone number.",
            );
        }
        if let Some(location) = &self.location {
            errors.min_chars(
                location,
                MIN_CLIENT_LOCATION_LENGTH,
                "location",
                "Location is required.",
            );
        }

        errors.into_result(())
    }
}

// ===== Document =====

/// Raw document form input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub client: String,
    pub status: String,
    /// Blank means "derive from attachment" or "keep / default"
    pub file_size: String,
    pub file_type: String,
    pub attachment: Option<FileUpload>,
}

impl Default for DocumentForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: String::new(),
            client: String::new(),
            status: DocumentStatus::default().to_string(),
            file_size: String::new(),
            file_type: String::new(),
            attachment: None,
        }
    }
}

/// A document form that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDocument {
    pub title: String,
    pub description: String,
    pub category: String,
    pub client: String,
    pub status: DocumentStatus,
    pub file_size: Option<String>,
    pub file_type: Option<String>,
    pub file_name: Option<String>,
    pub attachment: Option<FileUpload>,
}

impl DocumentForm {
    pub fn validate(self) -> Result<ValidDocument, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.min_chars(
            &self.title,
            MIN_DOCUMENT_TITLE_LENGTH,
            "title",
            "Title must be at least 2 characters",
        );
        errors.min_chars(
            &self.description,
            MIN_DOCUMENT_DESCRIPTION_LENGTH,
            "description",
            "Description must be at least 5 characters",
        );
        errors.check(
            !self.category.is_empty(),
            "category",
            "Category is required",
        );
        errors.check(!self.client.is_empty(), "client", "Client is required");
        let status = self.status.parse::<DocumentStatus>().ok();
        errors.check(
            status.is_some(),
            "status",
            "Please select a document status",
        );
        if let Some(upload) = &self.attachment {
            errors.check(
                !upload.file_name().is_empty(),
                "file",
                "Attached file must have a name",
            );
        }

        errors.into_result(())?;

        // An attachment always wins over hand-typed file metadata
        let (file_size, file_type, file_name) = match &self.attachment {
            Some(upload) => (
                Some(upload.formatted_size()),
                upload.file_type(),
                Some(upload.file_name().to_string()),
            ),
            None => (non_blank(&self.file_size), non_blank(&self.file_type), None),
        };

        Ok(ValidDocument {
            title: self.title,
            description: self.description,
            category: self.category,
            client: self.client,
            status: status.unwrap_or_default(),
            file_size,
            file_type,
            file_name,
            attachment: self.attachment,
        })
    }
}

impl ValidDocument {
    /// Draft for insertion; `file` is the blob hash of the stored attachment
    pub fn into_draft(self, file: Option<String>) -> (NewDocument, Option<FileUpload>) {
        let draft = NewDocument {
            title: self.title,
            description: self.description,
            category: self.category,
            client: self.client,
            status: self.status,
            file_size: self.file_size,
            file_type: self.file_type,
            file_name: self.file_name,
            file,
        };
        (draft, self.attachment)
    }

    /// Patch for an edit; blank file metadata keeps the stored values
    pub fn into_patch(self, file: Option<String>) -> (DocumentPatch, Option<FileUpload>) {
        let patch = DocumentPatch {
            title: Some(self.title),
            description: Some(self.description),
            category: Some(self.category),
            client: Some(self.client),
            status: Some(self.status),
            file_size: self.file_size,
            file_type: self.file_type,
            file_name: self.file_name,
            file,
        };
        (patch, self.attachment)
    }
}

// ===== Note =====

/// Validate note text, returning it trimmed
pub fn validate_note_text(text: &str) -> Result<String, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let trimmed = text.trim();
    errors.check(!trimmed.is_empty(), "text", "Note cannot be empty");
    errors.into_result(trimmed.to_string())
}
