//! Application state shared across screens.

use std::sync::Arc;

use thiserror::Error;

use crate::cart::{CartStore, FileCartStorage};
use crate::catalog::CatalogGateway;
use crate::checkout::CheckoutOrchestrator;
use crate::config::StorefrontConfig;
use crate::db::{FeedbackRepository, OrdersRepository};
use crate::docstore::{DocStoreClient, StoreError};
use crate::identity::{AuthError, IdentityClient, SessionAdapter};
use crate::media::{MediaError, MediaService};
use crate::payment::{PayMongoClient, PaymentError};

/// Error building the application state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("document store client: {0}")]
    Store(#[from] StoreError),
    #[error("identity client: {0}")]
    Identity(#[from] AuthError),
    #[error("media client: {0}")]
    Media(#[from] MediaError),
    #[error("payment client: {0}")]
    Payment(#[from] PaymentError),
}

/// Application state shared across all screens.
///
/// Cheaply cloneable via `Arc`; the app shell builds one at startup and
/// hands clones to whatever needs the hosted-service clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    docstore: DocStoreClient,
    identity: IdentityClient,
    payments: PayMongoClient,
    media: MediaService,
}

impl AppState {
    /// Build the service clients from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any HTTP client fails to build.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let docstore = DocStoreClient::new(&config.docstore)?;
        let identity = IdentityClient::new(&config.identity)?;
        let payments = PayMongoClient::new(&config.payment)?;
        let media = MediaService::new(&config.storage)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                docstore,
                identity,
                payments,
                media,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the document store client.
    #[must_use]
    pub fn docstore(&self) -> &DocStoreClient {
        &self.inner.docstore
    }

    /// Get a reference to the identity service client.
    #[must_use]
    pub fn identity(&self) -> &IdentityClient {
        &self.inner.identity
    }

    /// Get a reference to the payment gateway client.
    #[must_use]
    pub fn payments(&self) -> &PayMongoClient {
        &self.inner.payments
    }

    /// Get a reference to the media service.
    #[must_use]
    pub fn media(&self) -> &MediaService {
        &self.inner.media
    }

    /// Load the device's cart from the configured cart directory.
    #[must_use]
    pub fn cart_store(&self) -> CartStore<FileCartStorage> {
        CartStore::load(FileCartStorage::new(&self.inner.config.cart_dir))
    }

    /// A signed-out session adapter over the shared clients.
    #[must_use]
    pub fn session(&self) -> SessionAdapter<'_, IdentityClient, DocStoreClient> {
        SessionAdapter::new(self.identity(), self.docstore())
    }

    /// Catalog gateway over the shared document store client.
    #[must_use]
    pub fn catalog(&self) -> CatalogGateway<'_, DocStoreClient> {
        CatalogGateway::new(self.docstore())
    }

    /// Orders repository over the shared document store client.
    #[must_use]
    pub fn orders(&self) -> OrdersRepository<'_, DocStoreClient> {
        OrdersRepository::new(self.docstore())
    }

    /// Feedback repository over the shared document store client.
    #[must_use]
    pub fn feedback(&self) -> FeedbackRepository<'_, DocStoreClient> {
        FeedbackRepository::new(self.docstore())
    }

    /// Checkout orchestrator over the shared clients.
    #[must_use]
    pub fn checkout(&self) -> CheckoutOrchestrator<'_, PayMongoClient, DocStoreClient> {
        CheckoutOrchestrator::new(self.payments(), self.docstore())
    }
}
