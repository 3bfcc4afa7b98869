//! Notes service
//!
//! The association index between documents and their notes.
//! Notes are kept in creation order and only ever removed together
//! with their document.

use crate::database::{Author, Collection, EntityId, NewNote, Note};
use crate::error::Result;
use crate::validation::validate_note_text;

/// Service for managing document notes
#[derive(Clone)]
pub struct NotesService {
    notes: Collection<Note>,
}

impl NotesService {
    pub fn new(notes: Collection<Note>) -> Self {
        Self { notes }
    }

    /// Notes for a document, oldest first
    pub async fn notes_for(&self, document_id: EntityId) -> Vec<Note> {
        self.notes
            .filter(|note| note.document_id == document_id)
            .await
    }

    /// Notes for the current selection; no selection yields no notes
    pub async fn notes_for_selection(&self, selected: Option<EntityId>) -> Vec<Note> {
        match selected {
            Some(document_id) => self.notes_for(document_id).await,
            None => Vec::new(),
        }
    }

    /// Add a note to a document. The text is trimmed and must not be empty.
    ///
    /// Callers are responsible for checking that the document exists.
    pub async fn add_note(
        &self,
        document_id: EntityId,
        text: &str,
        author: Author,
    ) -> Result<Note> {
        let text = validate_note_text(text)?;

        let note = self
            .notes
            .add(NewNote {
                document_id,
                text,
                author,
            })
            .await;

        tracing::info!("Note {} added to document {}", note.id, document_id);

        Ok(note)
    }

    /// Remove every note of a document, returning how many were removed
    pub async fn remove_for_document(&self, document_id: EntityId) -> usize {
        let removed = self
            .notes
            .remove_where(|note| note.document_id == document_id)
            .await;

        if removed > 0 {
            tracing::debug!("Removed {} notes of document {}", removed, document_id);
        }

        removed
    }

    pub async fn count_notes(&self) -> usize {
        self.notes.len().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn create_test_service() -> NotesService {
        NotesService::new(Collection::new())
    }

    #[tokio::test]
    async fn test_notes_are_grouped_by_document_in_creation_order() {
        let service = create_test_service();

        service.add_note(1, "Permit submitted", Author::default()).await.unwrap();
        service.add_note(2, "Awaiting audit", Author::default()).await.unwrap();
        service.add_note(1, "Permit approved", Author::default()).await.unwrap();

        let notes = service.notes_for(1).await;
        let texts: Vec<&str> = notes.iter().map(|n| n.text.as_str()).collect();

        assert_eq!(texts, vec!["Permit submitted", "Permit approved"]);
        assert!(notes.iter().all(|n| n.document_id == 1));
        assert_eq!(notes[0].author.name, "Current User");
    }

    #[tokio::test]
    async fn test_whitespace_note_is_rejected() {
        let service = create_test_service();

        let result = service.add_note(1, "   \n\t", Author::default()).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(service.count_notes().await, 0);
    }

    #[tokio::test]
    async fn test_no_selection_yields_empty_view() {
        let service = create_test_service();
        service.add_note(1, "Check plans", Author::default()).await.unwrap();

        assert!(service.notes_for_selection(None).await.is_empty());
        assert_eq!(service.notes_for_selection(Some(1)).await.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_for_document() {
        let service = create_test_service();
        service.add_note(1, "a", Author::default()).await.unwrap();
        service.add_note(1, "b", Author::default()).await.unwrap();
        service.add_note(2, "c", Author::default()).await.unwrap();

        assert_eq!(service.remove_for_document(1).await, 2);
        assert!(service.notes_for(1).await.is_empty());
        assert_eq!(service.notes_for(2).await.len(), 1);
    }
}
