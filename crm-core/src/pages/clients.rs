//! Clients page
//!
//! Searchable client list with add, edit and delete dialogs.

use super::{close, open, signal, ListSummary};
use crate::database::{Client, EntityId, EntityKind};
use crate::error::{AppError, Result};
use crate::services::{ClientsService, Dialog, MutationPipeline, Operation};
use crate::validation::ClientForm;

pub struct ClientsPage {
    clients: ClientsService,
    pipeline: MutationPipeline,
    search_query: String,
    selected: Option<EntityId>,
    add_dialog: Option<Dialog>,
    edit_dialog: Option<Dialog>,
    delete_dialog: Option<Dialog>,
}

impl ClientsPage {
    pub fn new(clients: ClientsService, pipeline: MutationPipeline) -> Self {
        Self {
            clients,
            pipeline,
            search_query: String::new(),
            selected: None,
            add_dialog: None,
            edit_dialog: None,
            delete_dialog: None,
        }
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Clients matching the search box, in list order
    pub async fn visible_clients(&self) -> Vec<Client> {
        self.clients.search_clients(&self.search_query).await
    }

    pub async fn summary(&self) -> ListSummary {
        ListSummary {
            shown: self.visible_clients().await.len(),
            total: self.clients.count_clients().await,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pipeline.is_loading()
    }

    /// The client targeted by the edit or delete dialog
    pub async fn selected_client(&self) -> Option<Client> {
        match self.selected {
            Some(id) => self.clients.find_client(id).await,
            None => None,
        }
    }

    // ===== Add =====

    pub fn open_add_dialog(&mut self) -> Dialog {
        open(&mut self.add_dialog)
    }

    pub fn close_add_dialog(&mut self) {
        close(&mut self.add_dialog);
    }

    pub async fn submit_add(&mut self, form: ClientForm) -> Result<Client> {
        let draft = form.validate()?;

        let clients = self.clients.clone();
        let operation = Operation::create(EntityKind::Client).with_subject(draft.name.clone());
        let client = self
            .pipeline
            .run(operation, signal(&self.add_dialog), || async move {
                Ok(clients.create_client(draft).await)
            })
            .await?;

        close(&mut self.add_dialog);
        Ok(client)
    }

    // ===== Edit =====

    pub async fn open_edit_dialog(&mut self, id: EntityId) -> Result<Dialog> {
        let client = self.clients.get_client(id).await?;
        self.selected = Some(client.id);
        Ok(open(&mut self.edit_dialog))
    }

    pub fn close_edit_dialog(&mut self) {
        close(&mut self.edit_dialog);
    }

    pub async fn submit_edit(&mut self, id: EntityId, form: ClientForm) -> Result<Client> {
        let patch = form.into_patch()?;

        let clients = self.clients.clone();
        let operation = Operation::update(EntityKind::Client, id)
            .with_subject(patch.name.clone().unwrap_or_default());
        let result = self
            .pipeline
            .run(operation, signal(&self.edit_dialog), || async move {
                clients.update_client(id, patch).await
            })
            .await;

        match result {
            Ok(client) => {
                close(&mut self.edit_dialog);
                Ok(client)
            }
            Err(e) => Err(self.recover(id, e)),
        }
    }

    // ===== Delete =====

    pub async fn open_delete_dialog(&mut self, id: EntityId) -> Result<Dialog> {
        let client = self.clients.get_client(id).await?;
        self.selected = Some(client.id);
        Ok(open(&mut self.delete_dialog))
    }

    pub fn close_delete_dialog(&mut self) {
        close(&mut self.delete_dialog);
    }

    /// Delete the client selected by `open_delete_dialog`
    pub async fn confirm_delete(&mut self) -> Result<Client> {
        let id = self.selected.ok_or(AppError::NoSelection("client"))?;

        let clients = self.clients.clone();
        let operation = Operation::delete(EntityKind::Client, id);
        let result = self
            .pipeline
            .run(operation, signal(&self.delete_dialog), || async move {
                clients.delete_client(id).await
            })
            .await;

        match result {
            Ok(client) => {
                self.selected = None;
                close(&mut self.delete_dialog);
                Ok(client)
            }
            Err(e) => Err(self.recover(id, e)),
        }
    }

    /// A vanished client drops the selection and its dialogs; the list
    /// re-syncs on the next read.
    fn recover(&mut self, id: EntityId, error: AppError) -> AppError {
        if error.is_not_found() {
            tracing::warn!("Client {} no longer exists, clearing selection", id);
            if self.selected == Some(id) {
                self.selected = None;
            }
            close(&mut self.edit_dialog);
            close(&mut self.delete_dialog);
        }
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::seed::sample_clients;
    use crate::database::{ClientStatus, Collection};
    use crate::services::{ActivityLog, Notifier, SimulatedBackend};
    use std::sync::Arc;
    use std::time::Duration;

    fn create_test_page(latency: Duration) -> ClientsPage {
        let pipeline = MutationPipeline::new(
            Arc::new(SimulatedBackend::new(latency)),
            Notifier::new(),
            ActivityLog::default(),
        );
        ClientsPage::new(
            ClientsService::new(Collection::with_items(sample_clients())),
            pipeline,
        )
    }

    fn form(name: &str) -> ClientForm {
        ClientForm {
            name: name.to_string(),
            contact: "Sergio Ruiz".to_string(),
            email: "sruiz@obras.es".to_string(),
            phone: "+34 600 111 222".to_string(),
            location: "Barcelona".to_string(),
            ..ClientForm::default()
        }
    }

    #[tokio::test]
    async fn test_search_narrows_visible_clients() {
        let mut page = create_test_page(Duration::ZERO);

        page.set_search_query("Barcelona");
        let names: Vec<String> = page
            .visible_clients()
            .await
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(
            names,
            vec!["Construcciones Modernas S.L.", "InnovaHogar Barcelona"]
        );
        assert_eq!(page.summary().await, ListSummary { shown: 2, total: 8 });
    }

    #[tokio::test]
    async fn test_add_client() {
        let mut page = create_test_page(Duration::ZERO);
        let dialog = page.open_add_dialog();

        let client = page.submit_add(form("Obras Costa Brava")).await.unwrap();

        assert_eq!(client.id, 9);
        assert_eq!(client.status, ClientStatus::Active);
        assert_eq!(client.projects, 0);
        assert!(!dialog.is_open());
        assert_eq!(page.summary().await.total, 9);
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_store() {
        let mut page = create_test_page(Duration::ZERO);
        page.open_add_dialog();

        let err = page
            .submit_add(ClientForm {
                email: "nope".to_string(),
                ..form("Obras Costa Brava")
            })
            .await
            .unwrap_err();

        assert_eq!(err.field_errors().len(), 1);
        assert_eq!(page.summary().await.total, 8);
    }

    #[tokio::test]
    async fn test_edit_client_keeps_projects() {
        let mut page = create_test_page(Duration::ZERO);
        page.open_edit_dialog(1).await.unwrap();

        let updated = page
            .submit_edit(
                1,
                ClientForm {
                    status: "Completed".to_string(),
                    ..form("Construcciones Modernas S.L.")
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, ClientStatus::Completed);
        assert_eq!(updated.contact, "Sergio Ruiz");
        assert_eq!(updated.projects, 5);
    }

    #[tokio::test]
    async fn test_delete_selected_client() {
        let mut page = create_test_page(Duration::ZERO);
        let dialog = page.open_delete_dialog(4).await.unwrap();

        let removed = page.confirm_delete().await.unwrap();

        assert_eq!(removed.name, "InnovaHogar Barcelona");
        assert!(page.selected_client().await.is_none());
        assert!(!dialog.is_open());
        assert!(matches!(
            page.confirm_delete().await,
            Err(AppError::NoSelection("client"))
        ));
    }

    #[tokio::test]
    async fn test_vanished_client_clears_selection() {
        let mut page = create_test_page(Duration::ZERO);
        let service = page.clients.clone();

        page.open_delete_dialog(2).await.unwrap();
        service.delete_client(2).await.unwrap();

        let err = page.confirm_delete().await.unwrap_err();

        assert!(err.is_not_found());
        assert!(page.selected.is_none());
        assert!(page.delete_dialog.is_none());
        assert_eq!(page.summary().await.total, 7);
    }

    #[tokio::test]
    async fn test_open_edit_for_missing_client() {
        let mut page = create_test_page(Duration::ZERO);

        assert!(page.open_edit_dialog(77).await.unwrap_err().is_not_found());
        assert!(page.edit_dialog.is_none());
    }

    #[tokio::test]
    async fn test_submit_on_closed_dialog_is_cancelled() {
        let mut page = create_test_page(Duration::ZERO);

        for _ in 0..50 {
            let dialog = page.open_add_dialog();
            dialog.close();

            let result = page.submit_add(form("Obras Costa Brava")).await;

            assert!(matches!(result, Err(AppError::Cancelled)));
        }
        assert_eq!(page.summary().await.total, 8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closing_add_dialog_cancels_submission() {
        let mut page = create_test_page(Duration::from_millis(500));
        let dialog = page.open_add_dialog();

        let (result, ()) = tokio::join!(page.submit_add(form("Obras Costa Brava")), async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            dialog.close();
        });

        assert!(matches!(result, Err(AppError::Cancelled)));
        assert_eq!(page.summary().await.total, 8);
        assert!(!page.is_loading());
    }
}
