//! Entity models
//!
//! Rust structs representing CRM entities, the validated drafts used to
//! create them and the partial patches used to edit them.
//! All models use serde for serialization to frontend.

use super::repository::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier assigned by a collection on insert
pub type EntityId = u64;

/// Kinds of entity managed by the CRM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Client,
    Document,
    Note,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Client => "Client",
            EntityKind::Document => "Document",
            EntityKind::Note => "Note",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ===== Client =====

/// Lifecycle status of a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ClientStatus {
    #[default]
    Active,
    Pending,
    Completed,
}

impl ClientStatus {
    pub const ALL: [ClientStatus; 3] = [
        ClientStatus::Active,
        ClientStatus::Pending,
        ClientStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ClientStatus::Active => "Active",
            ClientStatus::Pending => "Pending",
            ClientStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ClientStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| format!("Unknown client status: {}", s))
    }
}

/// A construction client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: EntityId,
    pub name: String,
    pub contact: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub status: ClientStatus,
    pub projects: u32,
}

/// Validated client fields, ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub contact: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub status: ClientStatus,
}

/// Partial client update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub status: Option<ClientStatus>,
    pub projects: Option<u32>,
}

impl Entity for Client {
    type Draft = NewClient;
    type Patch = ClientPatch;

    const KIND: EntityKind = EntityKind::Client;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(id: EntityId, draft: NewClient, _now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            contact: draft.contact,
            email: draft.email,
            phone: draft.phone,
            location: draft.location,
            status: draft.status,
            projects: 0,
        }
    }

    fn apply_patch(&mut self, patch: ClientPatch, _now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(contact) = patch.contact {
            self.contact = contact;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(projects) = patch.projects {
            self.projects = projects;
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.contact.as_str(),
            self.email.as_str(),
            self.location.as_str(),
        ]
    }
}

// ===== Document =====

/// Review status of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DocumentStatus {
    #[default]
    Draft,
    Pending,
    #[serde(rename = "In Review")]
    InReview,
    Approved,
    Rejected,
}

impl DocumentStatus {
    pub const ALL: [DocumentStatus; 5] = [
        DocumentStatus::Draft,
        DocumentStatus::Pending,
        DocumentStatus::InReview,
        DocumentStatus::Approved,
        DocumentStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentStatus::Draft => "Draft",
            DocumentStatus::Pending => "Pending",
            DocumentStatus::InReview => "In Review",
            DocumentStatus::Approved => "Approved",
            DocumentStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        DocumentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| format!("Unknown document status: {}", s))
    }
}

/// A construction document (permit, contract, quote...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Free-text client name, not linked to a `Client` id
    pub client: String,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub file_size: String,
    pub file_type: String,
    pub file_name: Option<String>,
    /// Blob hash of the attached file
    pub file: Option<String>,
}

/// Validated document fields, ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub title: String,
    pub description: String,
    pub category: String,
    pub client: String,
    pub status: DocumentStatus,
    pub file_size: Option<String>,
    pub file_type: Option<String>,
    pub file_name: Option<String>,
    pub file: Option<String>,
}

/// Partial document update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub client: Option<String>,
    pub status: Option<DocumentStatus>,
    pub file_size: Option<String>,
    pub file_type: Option<String>,
    pub file_name: Option<String>,
    pub file: Option<String>,
}

impl Entity for Document {
    type Draft = NewDocument;
    type Patch = DocumentPatch;

    const KIND: EntityKind = EntityKind::Document;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(id: EntityId, draft: NewDocument, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            client: draft.client,
            status: draft.status,
            created_at: now,
            updated_at: now,
            file_size: draft
                .file_size
                .unwrap_or_else(|| crate::config::DEFAULT_DOCUMENT_FILE_SIZE.to_string()),
            file_type: draft
                .file_type
                .unwrap_or_else(|| crate::config::DEFAULT_DOCUMENT_FILE_TYPE.to_string()),
            file_name: draft.file_name,
            file: draft.file,
        }
    }

    fn apply_patch(&mut self, patch: DocumentPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(client) = patch.client {
            self.client = client;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(file_size) = patch.file_size {
            self.file_size = file_size;
        }
        if let Some(file_type) = patch.file_type {
            self.file_type = file_type;
        }
        if patch.file_name.is_some() {
            self.file_name = patch.file_name;
        }
        if patch.file.is_some() {
            self.file = patch.file;
        }
        // updated_at never moves backwards, even with a skewed clock
        self.updated_at = now.max(self.updated_at);
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.category.as_str(),
            self.client.as_str(),
        ]
    }
}

// ===== Note =====

/// Person who wrote a note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub avatar: Option<String>,
}

impl Default for Author {
    fn default() -> Self {
        Self {
            name: crate::config::DEFAULT_NOTE_AUTHOR.to_string(),
            avatar: None,
        }
    }
}

/// A note attached to a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: EntityId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub document_id: EntityId,
    pub author: Author,
}

/// Validated note, ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub document_id: EntityId,
    pub text: String,
    pub author: Author,
}

impl Entity for Note {
    type Draft = NewNote;
    /// Notes are immutable once written
    type Patch = ();

    const KIND: EntityKind = EntityKind::Note;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(id: EntityId, draft: NewNote, now: DateTime<Utc>) -> Self {
        Self {
            id,
            text: draft.text,
            created_at: now,
            document_id: draft.document_id,
            author: draft.author,
        }
    }

    fn apply_patch(&mut self, _patch: (), _now: DateTime<Utc>) {}

    fn search_fields(&self) -> Vec<&str> {
        vec![self.text.as_str()]
    }
}

// ===== Renovation Task =====

/// A priced renovation task from the catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: EntityId,
    pub name: String,
    pub category: String,
    pub description: String,
    /// Cost in euros per unit
    pub cost: f64,
    /// Labor in hours per unit
    pub labor: f64,
    pub has_subsidy: bool,
}
