//! # Client Store
//!
//! The client list plus the "current client" selection.
//!
//! ## Selection
//!
//! The selection is stored as an id and resolved against the list on every
//! read. [`ClientStore::set_current_client`] accepts any id; if that client
//! is not (or no longer) in the list, [`ClientStore::current_client`] yields
//! `None`. Deleting the selected client clears the selection.
//!
//! ## API-backed mutations
//!
//! `*_via_api` operations and [`ClientStore::create_client_from_api`] call
//! the backend once, apply the result locally only on success, report the
//! outcome through the [`Notifier`], and return whether they succeeded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use complai_core::{Client, ClientId, ClientPatch, NewClient};
use parking_lot::RwLock;

use crate::backend::ClientBackend;
use crate::notify::{Notifier, TracingNotifier};
use crate::repository::{InMemoryRepository, Repository};
use crate::LoadingGuard;

/// Client list, selection and loading flag.
pub struct ClientStore {
    clients: InMemoryRepository<Client>,
    current: RwLock<Option<ClientId>>,
    loading: AtomicBool,
    backend: Arc<dyn ClientBackend>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for ClientStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientStore")
            .field("clients", &self.clients.len())
            .field("current", &*self.current.read())
            .field("loading", &self.is_loading())
            .finish()
    }
}

impl ClientStore {
    /// Empty store talking to `backend`, logging notifications.
    pub fn new(backend: Arc<dyn ClientBackend>) -> Self {
        Self {
            clients: InMemoryRepository::new(),
            current: RwLock::new(None),
            loading: AtomicBool::new(false),
            backend,
            notifier: Arc::new(TracingNotifier),
        }
    }

    /// Seed the list.
    pub fn with_clients(self, clients: Vec<Client>) -> Self {
        Self {
            clients: InMemoryRepository::seeded(clients),
            ..self
        }
    }

    /// Route notifications elsewhere.
    pub fn with_notifier(self, notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier, ..self }
    }

    // -- Reads --------------------------------------------------------------

    /// All clients, in insertion order.
    pub fn clients(&self) -> Vec<Client> {
        self.clients.list()
    }

    pub fn get(&self, id: &ClientId) -> Option<Client> {
        self.clients.get_by_id(id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// The selected client, if it is still in the list.
    pub fn current_client(&self) -> Option<Client> {
        let id = self.current.read().clone()?;
        self.clients.get_by_id(&id)
    }

    /// The raw selection, whether or not it resolves.
    pub fn current_client_id(&self) -> Option<ClientId> {
        self.current.read().clone()
    }

    // -- Local mutations ----------------------------------------------------

    /// Select a client by id, or clear the selection with `None`.
    pub fn set_current_client(&self, id: Option<ClientId>) {
        tracing::debug!(client_id = ?id, "current client changed");
        *self.current.write() = id;
    }

    /// Apply `patch` to the held client. Returns the updated record, or
    /// `None` if the id is not held.
    pub fn update_client(&self, id: &ClientId, patch: &ClientPatch) -> Option<Client> {
        self.clients.update(id, |c| c.apply(patch))
    }

    /// Remove a client. Clears the selection if it pointed at this client.
    pub fn delete_client(&self, id: &ClientId) -> Option<Client> {
        let removed = self.clients.remove(id)?;
        let mut current = self.current.write();
        if current.as_ref() == Some(id) {
            *current = None;
        }
        Some(removed)
    }

    // -- Backend-driven operations -----------------------------------------

    /// Initial fetch. Merges the backend's clients into the list, keeping
    /// local records for ids already held.
    pub async fn load(&self) -> bool {
        match self.fetch_and_merge().await {
            Some(added) => {
                tracing::info!(added, total = self.len(), "clients loaded");
                true
            }
            None => false,
        }
    }

    /// Re-fetch and merge by id. Ids already held are skipped.
    pub async fn refresh_clients(&self) -> bool {
        match self.fetch_and_merge().await {
            Some(added) => {
                self.notifier
                    .success("Clients refreshed", &format!("{added} new client(s)"));
                true
            }
            None => false,
        }
    }

    async fn fetch_and_merge(&self) -> Option<usize> {
        let _guard = LoadingGuard::start(&self.loading);
        match self.backend.list_clients().await {
            Ok(reply) => Some(self.clients.insert_missing(reply.data)),
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch clients");
                self.notifier
                    .error("Failed to load clients", &e.user_message());
                None
            }
        }
    }

    /// Create a client through the backend and append the returned record.
    ///
    /// The input is validated first; nothing is sent if it is invalid. On
    /// any failure the list is left unchanged.
    pub async fn create_client_from_api(&self, mut new: NewClient) -> bool {
        if let Err(e) = new.validate() {
            self.notifier.error("Invalid client", &e.to_string());
            return false;
        }
        match self.backend.create_client(&new).await {
            Ok(reply) => {
                let created = reply.data;
                let message = reply
                    .message
                    .unwrap_or_else(|| format!("{} was added", created.name));
                tracing::info!(client_id = %created.id, "client created");
                self.clients.upsert(created);
                self.notifier.success("Client created", &message);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "client creation failed");
                self.notifier
                    .error("Failed to create client", &e.user_message());
                false
            }
        }
    }

    /// Update a client through the backend and store the returned record.
    ///
    /// When the client is held locally the patch is also checked against
    /// the merged record, so a GSTIN cannot be set for a different PAN.
    pub async fn update_client_via_api(&self, id: &ClientId, mut patch: ClientPatch) -> bool {
        let checked = patch.validate().and_then(|()| match self.clients.get_by_id(id) {
            Some(mut merged) => {
                merged.apply(&patch);
                merged.validate_registrations()
            }
            None => Ok(()),
        });
        if let Err(e) = checked {
            self.notifier.error("Invalid client", &e.to_string());
            return false;
        }
        match self.backend.update_client(id, &patch).await {
            Ok(reply) => {
                let updated = reply.data;
                let message = reply
                    .message
                    .unwrap_or_else(|| format!("{} was updated", updated.name));
                self.clients.upsert(updated);
                self.notifier.success("Client updated", &message);
                true
            }
            Err(e) => {
                tracing::warn!(client_id = %id, error = %e, "client update failed");
                self.notifier
                    .error("Failed to update client", &e.user_message());
                false
            }
        }
    }

    /// Delete a client through the backend, then locally.
    pub async fn delete_client_via_api(&self, id: &ClientId) -> bool {
        match self.backend.delete_client(id).await {
            Ok(reply) => {
                self.delete_client(id);
                let message = reply
                    .message
                    .unwrap_or_else(|| format!("client {id} was removed"));
                self.notifier.success("Client deleted", &message);
                true
            }
            Err(e) => {
                tracing::warn!(client_id = %id, error = %e, "client deletion failed");
                self.notifier
                    .error("Failed to delete client", &e.user_message());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::demo_clients;
    use crate::notify::{NotificationLevel, RecordingNotifier};
    use async_trait::async_trait;
    use chrono::Utc;
    use complai_api_client::{ApiError, ApiReply};
    use complai_core::{ClientStatus, ClientType};
    use parking_lot::Mutex;

    /// Backend answering from canned values.
    #[derive(Default)]
    struct FakeBackend {
        remote: Vec<Client>,
        fail: bool,
        created: Mutex<Vec<NewClient>>,
    }

    fn rejected() -> ApiError {
        ApiError::Rejected {
            endpoint: "fake".into(),
            message: "backend unavailable".into(),
        }
    }

    #[async_trait]
    impl ClientBackend for FakeBackend {
        async fn list_clients(&self) -> Result<ApiReply<Vec<Client>>, ApiError> {
            if self.fail {
                return Err(rejected());
            }
            Ok(ApiReply {
                data: self.remote.clone(),
                message: None,
            })
        }

        async fn create_client(&self, client: &NewClient) -> Result<ApiReply<Client>, ApiError> {
            if self.fail {
                return Err(rejected());
            }
            self.created.lock().push(client.clone());
            Ok(ApiReply {
                data: Client::from_new(ClientId::new("new-1"), client.clone(), Utc::now()),
                message: None,
            })
        }

        async fn update_client(
            &self,
            id: &ClientId,
            patch: &ClientPatch,
        ) -> Result<ApiReply<Client>, ApiError> {
            if self.fail {
                return Err(rejected());
            }
            let mut c = demo_clients()
                .into_iter()
                .find(|c| &c.id == id)
                .ok_or_else(rejected)?;
            c.apply(patch);
            Ok(ApiReply {
                data: c,
                message: Some("Updated".into()),
            })
        }

        async fn delete_client(&self, _id: &ClientId) -> Result<ApiReply<()>, ApiError> {
            if self.fail {
                return Err(rejected());
            }
            Ok(ApiReply {
                data: (),
                message: None,
            })
        }
    }

    fn store(backend: FakeBackend) -> (ClientStore, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let store = ClientStore::new(Arc::new(backend))
            .with_clients(demo_clients())
            .with_notifier(notifier.clone());
        (store, notifier)
    }

    fn failing() -> FakeBackend {
        FakeBackend {
            fail: true,
            ..FakeBackend::default()
        }
    }

    #[tokio::test]
    async fn create_appends_and_notifies_success() {
        let (store, notifier) = store(FakeBackend::default());
        let before = store.len();

        assert!(store.create_client_from_api(NewClient::new("  Zen Labs  ", ClientType::Opc)).await);

        assert_eq!(store.len(), before + 1);
        let last = store.clients().pop().unwrap();
        assert_eq!(last.name, "Zen Labs");
        let n = notifier.last().unwrap();
        assert_eq!(n.level, NotificationLevel::Success);
        assert_eq!(n.message, "Zen Labs was added");
    }

    #[tokio::test]
    async fn failed_create_leaves_list_unchanged() {
        let (store, notifier) = store(failing());
        let before = store.clients();

        assert!(!store.create_client_from_api(NewClient::new("Zen Labs", ClientType::Opc)).await);

        assert_eq!(store.clients(), before);
        let n = notifier.last().unwrap();
        assert_eq!(n.level, NotificationLevel::Error);
        assert_eq!(n.message, "backend unavailable");
    }

    #[tokio::test]
    async fn invalid_create_is_not_sent() {
        let backend = Arc::new(FakeBackend::default());
        let store = ClientStore::new(backend.clone());
        let mut new = NewClient::new("Bad PAN Co", ClientType::Llp);
        new.pan = Some("12345".into());

        assert!(!store.create_client_from_api(new).await);
        assert!(backend.created.lock().is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn refresh_skips_held_ids() {
        let mut remote = demo_clients();
        remote[0].name = "Renamed remotely".into();
        let mut extra = remote[1].clone();
        extra.id = ClientId::new("99");
        remote.push(extra);

        let (store, _) = store(FakeBackend {
            remote,
            ..FakeBackend::default()
        });

        assert!(store.refresh_clients().await);
        assert!(store.refresh_clients().await);

        let clients = store.clients();
        assert_eq!(clients.len(), 4);
        assert_eq!(clients[0].name, "Acme Technologies Pvt Ltd");
        assert_eq!(clients[3].id.as_str(), "99");
    }

    #[tokio::test]
    async fn failed_load_notifies_and_resets_loading() {
        let (store, notifier) = store(failing());
        assert!(!store.load().await);
        assert!(!store.is_loading());
        assert_eq!(store.len(), 3);
        assert_eq!(notifier.last().unwrap().title, "Failed to load clients");
    }

    #[test]
    fn selection_resolves_against_list() {
        let (store, _) = store(FakeBackend::default());

        store.set_current_client(Some(ClientId::new("2")));
        assert_eq!(store.current_client().unwrap().name, "Greenleaf Advisors LLP");

        store.set_current_client(Some(ClientId::new("unknown")));
        assert!(store.current_client().is_none());
        assert_eq!(store.current_client_id(), Some(ClientId::new("unknown")));

        store.set_current_client(None);
        assert!(store.current_client().is_none());
        assert!(store.current_client_id().is_none());
    }

    #[test]
    fn deleting_selected_client_clears_selection() {
        let (store, _) = store(FakeBackend::default());
        store.set_current_client(Some(ClientId::new("1")));

        assert!(store.delete_client(&ClientId::new("2")).is_some());
        assert!(store.current_client().is_some());

        assert!(store.delete_client(&ClientId::new("1")).is_some());
        assert!(store.current_client_id().is_none());
        assert!(store.delete_client(&ClientId::new("1")).is_none());
    }

    #[test]
    fn local_update_applies_patch() {
        let (store, _) = store(FakeBackend::default());
        let patch = ClientPatch {
            status: Some(ClientStatus::Inactive),
            ..ClientPatch::default()
        };
        let updated = store.update_client(&ClientId::new("1"), &patch).unwrap();
        assert!(!updated.is_active());
        assert_eq!(updated.name, "Acme Technologies Pvt Ltd");
        assert!(store.update_client(&ClientId::new("404"), &patch).is_none());
    }

    #[tokio::test]
    async fn update_via_api_stores_returned_record() {
        let (store, notifier) = store(FakeBackend::default());
        let patch = ClientPatch {
            name: Some("Acme Tech".into()),
            ..ClientPatch::default()
        };
        assert!(store.update_client_via_api(&ClientId::new("1"), patch).await);
        assert_eq!(store.get(&ClientId::new("1")).unwrap().name, "Acme Tech");
        assert_eq!(notifier.last().unwrap().message, "Updated");
    }

    #[tokio::test]
    async fn update_via_api_checks_gstin_against_held_pan() {
        let (store, notifier) = store(failing());
        let patch = ClientPatch {
            gst: Some("27AAPFU0939F1ZV".into()),
            ..ClientPatch::default()
        };
        assert!(!store.update_client_via_api(&ClientId::new("1"), patch).await);

        // Rejected locally; the failing backend was never reached.
        let last = notifier.last().unwrap();
        assert_eq!(last.level, NotificationLevel::Error);
        assert_eq!(last.title, "Invalid client");
        assert!(last.message.contains("invalid GSTIN"));
        assert_eq!(
            store.get(&ClientId::new("1")).unwrap().gst.as_deref(),
            Some("29AABCT1332L1ZA")
        );
    }

    #[tokio::test]
    async fn delete_via_api_failure_keeps_client() {
        let (store, _) = store(failing());
        store.set_current_client(Some(ClientId::new("1")));
        assert!(!store.delete_client_via_api(&ClientId::new("1")).await);
        assert!(store.current_client().is_some());
    }

    #[tokio::test]
    async fn delete_via_api_removes_and_clears_selection() {
        let (store, _) = store(FakeBackend::default());
        store.set_current_client(Some(ClientId::new("3")));
        assert!(store.delete_client_via_api(&ClientId::new("3")).await);
        assert!(store.get(&ClientId::new("3")).is_none());
        assert!(store.current_client_id().is_none());
    }
}
