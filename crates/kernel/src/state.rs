//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::content::{ContentService, ElementDefinitionRegistry};
use crate::db;
use crate::menu::NavigationRegistry;
use crate::permissions::{AccessPolicy, PermissionPolicy};
use crate::store::{ContentStore, PgContentStore};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Content store (Postgres in production, in-memory in tests).
    store: Arc<dyn ContentStore>,

    /// Element definitions.
    ///
    /// Frozen at startup: changing definitions requires a restart.
    definitions: Arc<ElementDefinitionRegistry>,

    /// Navigation entries.
    ///
    /// Frozen at startup, like the definitions.
    navigation: Arc<NavigationRegistry>,

    /// Content query service.
    content: ContentService,

    /// Default language code for locale-less requests.
    default_language: String,
}

impl AppState {
    /// Create application state from configuration: connect to the
    /// database, apply migrations, and load the declarative registries.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = db::create_pool(config)
            .await
            .context("failed to create database pool")?;

        db::run_migrations(&pool)
            .await
            .context("failed to run migrations")?;

        let store: Arc<dyn ContentStore> = Arc::new(PgContentStore::new(pool));

        let definitions = Arc::new(
            ElementDefinitionRegistry::from_file(&config.element_definitions_path)
                .context("failed to load element definitions")?,
        );
        info!(definitions = definitions.len(), "element definitions loaded");

        let navigation = match &config.navigation_path {
            Some(path) => {
                NavigationRegistry::from_file(path).context("failed to load navigation")?
            }
            None => NavigationRegistry::with_defaults(),
        };
        info!(entries = navigation.len(), "navigation entries loaded");

        Ok(Self::with_store(
            store,
            definitions,
            Arc::new(navigation),
            Arc::new(PermissionPolicy),
            config.default_language.clone(),
        ))
    }

    /// Assemble state from already-built parts.
    ///
    /// This is the seam integration tests use to run the real service and
    /// routes against an in-memory store and a custom policy.
    pub fn with_store(
        store: Arc<dyn ContentStore>,
        definitions: Arc<ElementDefinitionRegistry>,
        navigation: Arc<NavigationRegistry>,
        policy: Arc<dyn AccessPolicy>,
        default_language: String,
    ) -> Self {
        let content = ContentService::new(
            store.clone(),
            definitions.clone(),
            policy,
            default_language.clone(),
        );

        Self {
            inner: Arc::new(AppStateInner {
                store,
                definitions,
                navigation,
                content,
                default_language,
            }),
        }
    }

    /// Get the content store.
    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.inner.store
    }

    /// Get the element definition registry.
    pub fn definitions(&self) -> &Arc<ElementDefinitionRegistry> {
        &self.inner.definitions
    }

    /// Get the navigation registry.
    pub fn navigation(&self) -> &Arc<NavigationRegistry> {
        &self.inner.navigation
    }

    /// Get the content service.
    pub fn content(&self) -> &ContentService {
        &self.inner.content
    }

    /// Get the default language code.
    pub fn default_language(&self) -> &str {
        &self.inner.default_language
    }

    /// Check if the content store is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.inner.store.healthy().await
    }
}
