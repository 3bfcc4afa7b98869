//! Client details page
//!
//! Shows one client, with edit and delete. After a delete the page has
//! nothing left to show and the caller navigates back to the list.

use super::{close, open, signal};
use crate::database::{Client, EntityId, EntityKind};
use crate::error::Result;
use crate::services::{ClientsService, Dialog, MutationPipeline, Operation};
use crate::validation::ClientForm;

pub struct ClientDetailsPage {
    clients: ClientsService,
    pipeline: MutationPipeline,
    client_id: EntityId,
    client: Option<Client>,
    deleted: bool,
    edit_dialog: Option<Dialog>,
    delete_dialog: Option<Dialog>,
}

impl ClientDetailsPage {
    pub fn new(clients: ClientsService, pipeline: MutationPipeline, client_id: EntityId) -> Self {
        Self {
            clients,
            pipeline,
            client_id,
            client: None,
            deleted: false,
            edit_dialog: None,
            delete_dialog: None,
        }
    }

    /// Read the client from the shared store
    pub async fn load(&mut self) -> Result<&Client> {
        let client = self.clients.get_client(self.client_id).await?;
        Ok(&*self.client.insert(client))
    }

    pub fn client(&self) -> Option<&Client> {
        self.client.as_ref()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn is_loading(&self) -> bool {
        self.pipeline.is_loading()
    }

    /// Form pre-filled with the loaded client
    pub fn edit_form(&self) -> Option<ClientForm> {
        self.client.as_ref().map(|client| ClientForm {
            name: client.name.clone(),
            contact: client.contact.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
            location: client.location.clone(),
            status: client.status.to_string(),
        })
    }

    pub fn open_edit_dialog(&mut self) -> Dialog {
        open(&mut self.edit_dialog)
    }

    pub fn close_edit_dialog(&mut self) {
        close(&mut self.edit_dialog);
    }

    pub async fn submit_edit(&mut self, form: ClientForm) -> Result<Client> {
        let patch = form.into_patch()?;

        let id = self.client_id;
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
                self.client = Some(client.clone());
                Ok(client)
            }
            Err(e) => {
                if e.is_not_found() {
                    self.forget();
                }
                Err(e)
            }
        }
    }

    pub fn open_delete_dialog(&mut self) -> Dialog {
        open(&mut self.delete_dialog)
    }

    pub fn close_delete_dialog(&mut self) {
        close(&mut self.delete_dialog);
    }

    pub async fn confirm_delete(&mut self) -> Result<Client> {
        let id = self.client_id;
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
                self.forget();
                self.deleted = true;
                Ok(client)
            }
            Err(e) => {
                if e.is_not_found() {
                    self.forget();
                }
                Err(e)
            }
        }
    }

    fn forget(&mut self) {
        tracing::debug!("Dropping client {} from details page", self.client_id);
        self.client = None;
        close(&mut self.edit_dialog);
        close(&mut self.delete_dialog);
    }
}
