//! Clients service
//!
//! High-level business logic for client records.

use crate::database::{Client, ClientPatch, ClientStatus, Collection, EntityId, NewClient};
use crate::error::Result;

/// Service for managing clients
#[derive(Clone)]
pub struct ClientsService {
    clients: Collection<Client>,
}

impl ClientsService {
    pub fn new(clients: Collection<Client>) -> Self {
        Self { clients }
    }

    /// Create a new client with no projects yet
    pub async fn create_client(&self, client: NewClient) -> Client {
        tracing::info!("Creating new client: {}", client.name);

        let client = self.clients.add(client).await;

        tracing::info!("Client created successfully: {}", client.id);

        client
    }

    /// Get a client by ID
    pub async fn get_client(&self, id: EntityId) -> Result<Client> {
        self.clients.get(id).await
    }

    pub async fn find_client(&self, id: EntityId) -> Option<Client> {
        self.clients.find(id).await
    }

    /// List all clients in insertion order
    pub async fn list_clients(&self) -> Vec<Client> {
        self.clients.list().await
    }

    /// Update a client with a partial patch
    pub async fn update_client(&self, id: EntityId, patch: ClientPatch) -> Result<Client> {
        tracing::debug!("Updating client: {}", id);

        patch.validate()?;
        let client = self.clients.update(id, patch).await?;

        tracing::debug!("Client updated successfully: {}", client.id);

        Ok(client)
    }

    /// Delete a client
    pub async fn delete_client(&self, id: EntityId) -> Result<Client> {
        tracing::info!("Deleting client: {}", id);

        let client = self.clients.remove(id).await?;

        tracing::info!("Client deleted successfully: {}", id);

        Ok(client)
    }

    /// Search clients by name, contact, email or location
    pub async fn search_clients(&self, query: &str) -> Vec<Client> {
        self.clients.search(query).await
    }

    pub async fn count_clients(&self) -> usize {
        self.clients.len().await
    }

    /// Total projects across clients in the given status
    pub async fn count_projects(&self, status: ClientStatus) -> u32 {
        self.clients
            .filter(|client| client.status == status)
            .await
            .iter()
            .map(|client| client.projects)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::seed::sample_clients;
    use crate::error::AppError;

    fn create_test_service() -> ClientsService {
        ClientsService::new(Collection::with_items(sample_clients()))
    }

    fn new_client() -> NewClient {
        NewClient {
            name: "Rehabilitaciones Sur".to_string(),
            contact: "Pedro Navarro".to_string(),
            email: "pnavarro@rehabsur.es".to_string(),
            phone: "+34 690 123 456".to_string(),
            location: "Granada".to_string(),
            status: ClientStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_client() {
        let service = create_test_service();

        let client = service.create_client(new_client()).await;
        let fetched = service.get_client(client.id).await.unwrap();

        assert_eq!(client.id, 9);
        assert_eq!(fetched, client);
        assert_eq!(service.count_clients().await, 9);
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_patch() {
        let service = create_test_service();

        let patch = ClientPatch {
            email: Some("broken".to_string()),
            ..ClientPatch::default()
        };
        let result = service.update_client(1, patch).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(
            service.get_client(1).await.unwrap().email,
            "carlos@construccionesmodernas.es"
        );
    }

    #[tokio::test]
    async fn test_search_clients() {
        let service = create_test_service();

        let results = service.search_clients("madrid").await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "Reformas Integrales Martínez");
        assert_eq!(results[1].name, "Architech Solutions");
    }

    #[tokio::test]
    async fn test_count_active_projects() {
        let service = create_test_service();

        // 5 + 3 + 2 + 2 + 3
        assert_eq!(service.count_projects(ClientStatus::Active).await, 15);
        assert_eq!(service.count_projects(ClientStatus::Pending).await, 2);
    }

    #[tokio::test]
    async fn test_delete_client() {
        let service = create_test_service();

        let removed = service.delete_client(5).await.unwrap();

        assert_eq!(removed.name, "Constructora López y Asociados");
        assert!(service.find_client(5).await.is_none());
        assert!(service.delete_client(5).await.unwrap_err().is_not_found());
    }
}
