//! Documents page
//!
//! Searchable document list with add, edit and delete dialogs, plus a
//! preview dialog that shows the selected document's notes and lets the
//! user add new ones.

use super::{close, open, signal, ListSummary};
use crate::config::DOCUMENT_CATEGORIES;
use crate::database::{Author, Document, EntityId, EntityKind, Note};
use crate::error::{AppError, Result};
use crate::services::{Dialog, DocumentsService, MutationPipeline, Operation};
use crate::validation::{validate_note_text, DocumentForm};

pub struct DocumentsPage {
    documents: DocumentsService,
    pipeline: MutationPipeline,
    author: Author,
    search_query: String,
    /// Target of the edit or delete dialog
    selected: Option<EntityId>,
    /// Document shown in the preview dialog
    preview: Option<EntityId>,
    add_dialog: Option<Dialog>,
    edit_dialog: Option<Dialog>,
    delete_dialog: Option<Dialog>,
    preview_dialog: Option<Dialog>,
}

impl DocumentsPage {
    pub fn new(documents: DocumentsService, pipeline: MutationPipeline, author: Author) -> Self {
        Self {
            documents,
            pipeline,
            author,
            search_query: String::new(),
            selected: None,
            preview: None,
            add_dialog: None,
            edit_dialog: None,
            delete_dialog: None,
            preview_dialog: None,
        }
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub async fn visible_documents(&self) -> Vec<Document> {
        self.documents.search_documents(&self.search_query).await
    }

    pub async fn summary(&self) -> ListSummary {
        ListSummary {
            shown: self.visible_documents().await.len(),
            total: self.documents.count_documents().await,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pipeline.is_loading()
    }

    /// Options for the category select
    pub fn categories(&self) -> &'static [&'static str] {
        DOCUMENT_CATEGORIES
    }

    // ===== Add =====

    pub fn open_add_dialog(&mut self) -> Dialog {
        open(&mut self.add_dialog)
    }

    pub fn close_add_dialog(&mut self) {
        close(&mut self.add_dialog);
    }

    pub async fn submit_add(&mut self, form: DocumentForm) -> Result<Document> {
        let document = form.validate()?;

        let documents = self.documents.clone();
        let operation = Operation::create(EntityKind::Document).with_subject(document.title.clone());
        let created = self
            .pipeline
            .run(operation, signal(&self.add_dialog), || async move {
                documents.create_document(document).await
            })
            .await?;

        close(&mut self.add_dialog);
        Ok(created)
    }

    // ===== Edit =====

    pub async fn open_edit_dialog(&mut self, id: EntityId) -> Result<Dialog> {
        let document = self.documents.get_document(id).await?;
        self.selected = Some(document.id);
        Ok(open(&mut self.edit_dialog))
    }

    pub fn close_edit_dialog(&mut self) {
        close(&mut self.edit_dialog);
    }

    /// Form pre-filled from a stored document; file metadata is left
    /// blank so an edit keeps the stored values
    pub async fn edit_form(&self, id: EntityId) -> Result<DocumentForm> {
        let document = self.documents.get_document(id).await?;
        Ok(DocumentForm {
            title: document.title,
            description: document.description,
            category: document.category,
            client: document.client,
            status: document.status.to_string(),
            ..DocumentForm::default()
        })
    }

    pub async fn submit_edit(&mut self, id: EntityId, form: DocumentForm) -> Result<Document> {
        let document = form.validate()?;

        let documents = self.documents.clone();
        let operation =
            Operation::update(EntityKind::Document, id).with_subject(document.title.clone());
        let result = self
            .pipeline
            .run(operation, signal(&self.edit_dialog), || async move {
                documents.update_document(id, document).await
            })
            .await;

        match result {
            Ok(updated) => {
                close(&mut self.edit_dialog);
                Ok(updated)
            }
            Err(e) => Err(self.recover(id, e)),
        }
    }

    // ===== Delete =====

    pub async fn open_delete_dialog(&mut self, id: EntityId) -> Result<Dialog> {
        let document = self.documents.get_document(id).await?;
        self.selected = Some(document.id);
        Ok(open(&mut self.delete_dialog))
    }

    pub fn close_delete_dialog(&mut self) {
        close(&mut self.delete_dialog);
    }

    /// Delete the selected document along with its notes
    pub async fn confirm_delete(&mut self) -> Result<Document> {
        let id = self.selected.ok_or(AppError::NoSelection("document"))?;

        let documents = self.documents.clone();
        let operation = Operation::delete(EntityKind::Document, id);
        let result = self
            .pipeline
            .run(operation, signal(&self.delete_dialog), || async move {
                documents.delete_document(id).await
            })
            .await;

        match result {
            Ok(removed) => {
                self.selected = None;
                close(&mut self.delete_dialog);
                if self.preview == Some(id) {
                    self.close_preview();
                }
                Ok(removed)
            }
            Err(e) => Err(self.recover(id, e)),
        }
    }

    // ===== Preview & notes =====

    pub async fn open_preview(&mut self, id: EntityId) -> Result<Dialog> {
        let document = self.documents.get_document(id).await?;
        self.preview = Some(document.id);
        Ok(open(&mut self.preview_dialog))
    }

    pub fn close_preview(&mut self) {
        self.preview = None;
        close(&mut self.preview_dialog);
    }

    pub async fn preview_document(&self) -> Option<Document> {
        match self.preview {
            Some(id) => self.documents.find_document(id).await,
            None => None,
        }
    }

    /// Notes of the previewed document, oldest first
    pub async fn preview_notes(&self) -> Vec<Note> {
        self.documents.notes().notes_for_selection(self.preview).await
    }

    pub async fn preview_attachment(&self) -> Result<Option<Vec<u8>>> {
        let id = self.preview.ok_or(AppError::NoSelection("document"))?;
        self.documents.get_attachment(id).await
    }

    /// Add a note to the previewed document
    pub async fn add_note(&mut self, text: &str) -> Result<Note> {
        let document_id = self.preview.ok_or(AppError::NoSelection("document"))?;
        let text = validate_note_text(text)?;

        let documents = self.documents.clone();
        let author = self.author.clone();
        let operation = Operation::create(EntityKind::Note);
        let result = self
            .pipeline
            .run(operation, signal(&self.preview_dialog), || async move {
                documents.add_note(document_id, &text, author).await
            })
            .await;

        result.map_err(|e| self.recover(document_id, e))
    }

    /// A vanished document drops every reference to it held by the page
    fn recover(&mut self, id: EntityId, error: AppError) -> AppError {
        if error.is_not_found() {
            tracing::warn!("Document {} no longer exists, clearing selection", id);
            if self.selected == Some(id) {
                self.selected = None;
                close(&mut self.edit_dialog);
                close(&mut self.delete_dialog);
            }
            if self.preview == Some(id) {
                self.close_preview();
            }
        }
        error
    }
}
