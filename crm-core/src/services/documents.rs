//! Documents service
//!
//! Handles document records, their attached files and their notes.
//! Integrates the document collection, BlobStore and NotesService.

use crate::database::{Author, Collection, Document, EntityId, Note};
use crate::error::{AppError, Result};
use crate::services::notes::NotesService;
use crate::storage::BlobStore;
use crate::validation::ValidDocument;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Service for managing documents
#[derive(Clone)]
pub struct DocumentsService {
    documents: Collection<Document>,
    notes: NotesService,
    blob_store: BlobStore,
    /// Serializes writes that span the document, note and blob stores
    write_gate: Arc<Mutex<()>>,
}

impl DocumentsService {
    pub fn new(documents: Collection<Document>, notes: NotesService, blob_store: BlobStore) -> Self {
        Self {
            documents,
            notes,
            blob_store,
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Create a document, storing its attachment if one was picked
    pub async fn create_document(&self, document: ValidDocument) -> Result<Document> {
        tracing::info!("Creating new document: {}", document.title);

        let _guard = self.write_gate.lock().await;

        let file = match &document.attachment {
            Some(upload) => Some(self.blob_store.write(upload.bytes()).await?),
            None => None,
        };
        let (draft, _) = document.into_draft(file);

        let document = self.documents.add(draft).await;

        tracing::info!("Document created successfully: {}", document.id);

        Ok(document)
    }

    /// Get a document by ID
    pub async fn get_document(&self, id: EntityId) -> Result<Document> {
        self.documents.get(id).await
    }

    pub async fn find_document(&self, id: EntityId) -> Option<Document> {
        self.documents.find(id).await
    }

    /// List all documents in insertion order
    pub async fn list_documents(&self) -> Vec<Document> {
        self.documents.list().await
    }

    /// Update a document. Blank file metadata keeps the stored values;
    /// a new attachment replaces the old one.
    pub async fn update_document(&self, id: EntityId, document: ValidDocument) -> Result<Document> {
        tracing::debug!("Updating document: {}", id);

        let _guard = self.write_gate.lock().await;

        let previous = self.documents.get(id).await?;

        let file = match &document.attachment {
            Some(upload) => Some(self.blob_store.write(upload.bytes()).await?),
            None => None,
        };
        let (patch, _) = document.into_patch(file.clone());

        let updated = match self.documents.update(id, patch).await {
            Ok(updated) => updated,
            Err(e) => {
                // Deleted between lookup and update
                if let Some(hash) = &file {
                    self.release_blob(hash).await;
                }
                return Err(e);
            }
        };

        if let (Some(old_hash), Some(new_hash)) = (&previous.file, &file) {
            if old_hash != new_hash {
                self.release_blob(old_hash).await;
            }
        }

        tracing::debug!("Document updated successfully: {}", updated.id);

        Ok(updated)
    }

    /// Delete a document together with its notes and unshared file
    pub async fn delete_document(&self, id: EntityId) -> Result<Document> {
        tracing::info!("Deleting document: {}", id);

        let _guard = self.write_gate.lock().await;

        let document = self.documents.remove(id).await?;
        let notes_removed = self.notes.remove_for_document(id).await;

        if let Some(hash) = &document.file {
            self.release_blob(hash).await;
        }

        tracing::info!(
            "Document deleted successfully: {} ({} notes removed)",
            id,
            notes_removed
        );

        Ok(document)
    }

    /// Search documents by title, category or client
    pub async fn search_documents(&self, query: &str) -> Vec<Document> {
        self.documents.search(query).await
    }

    pub async fn count_documents(&self) -> usize {
        self.documents.len().await
    }

    /// Bytes of the document's attached file, if it has one
    pub async fn get_attachment(&self, id: EntityId) -> Result<Option<Vec<u8>>> {
        let document = self.documents.get(id).await?;
        match document.file {
            Some(hash) => Ok(Some(self.blob_store.read(&hash).await?)),
            None => Ok(None),
        }
    }

    /// Add a note to an existing document. The document cannot be deleted
    /// between the existence check and the insert.
    pub async fn add_note(&self, document_id: EntityId, text: &str, author: Author) -> Result<Note> {
        let _guard = self.write_gate.lock().await;
        if self.documents.find(document_id).await.is_none() {
            return Err(AppError::not_found("Document", document_id));
        }
        self.notes.add_note(document_id, text, author).await
    }

    /// Notes of a document, oldest first
    pub async fn notes_for(&self, document_id: EntityId) -> Vec<Note> {
        self.notes.notes_for(document_id).await
    }

    pub fn notes(&self) -> &NotesService {
        &self.notes
    }

    /// Drop a blob once no document references it
    async fn release_blob(&self, hash: &str) {
        let still_referenced = !self
            .documents
            .filter(|doc| doc.file.as_deref() == Some(hash))
            .await
            .is_empty();

        if !still_referenced {
            self.blob_store.delete(hash).await;
        }
    }
}
