//! Module wiring: configuration, storage, domain service and API surfaces

use crate::config::Config;
use crate::contract::InspectionApi;
use crate::domain::{
    CatalogRepository, EventPublisher, InspectionRepository, PhotoStore, Service,
    TemplateRepository, TracingEventPublisher,
};
use crate::infra::storage::{
    Migrator, SeaOrmCatalogRepository, SeaOrmInspectionRepository, SeaOrmTemplateRepository,
};
use crate::infra::{
    InMemoryCatalogRepository, InMemoryInspectionRepository, InMemoryPhotoStore,
    InMemoryTemplateRepository,
};
use anyhow::Result;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

/// Initialised inspection engine: the domain service plus its native client
pub struct InspectionEngineModule {
    config: Config,
    service: Arc<Service>,
    client: Arc<dyn InspectionApi>,
}

impl InspectionEngineModule {
    /// Migrate `db`, build the SeaORM repositories and seed an empty store
    pub async fn init(
        config: Config,
        db: DatabaseConnection,
        photo_store: Arc<dyn PhotoStore>,
    ) -> Result<Self> {
        Migrator::up(&db, None).await?;
        tracing::info!("Inspection engine migrations completed");

        let conn = Arc::new(db);
        let module = Self::assemble(
            config,
            Arc::new(SeaOrmInspectionRepository::new(conn.clone())),
            Arc::new(SeaOrmTemplateRepository::new(conn.clone())),
            Arc::new(SeaOrmCatalogRepository::new(conn)),
            photo_store,
            Arc::new(TracingEventPublisher),
        );
        module.seed().await?;
        Ok(module)
    }

    /// Fully in-memory engine for previews and tests
    pub async fn in_memory(config: Config) -> Result<Self> {
        let module = Self::assemble(
            config,
            Arc::new(InMemoryInspectionRepository::default()),
            Arc::new(InMemoryTemplateRepository::default()),
            Arc::new(InMemoryCatalogRepository::default()),
            Arc::new(InMemoryPhotoStore::default()),
            Arc::new(TracingEventPublisher),
        );
        module.seed().await?;
        Ok(module)
    }

    /// Wire pre-built collaborators without touching the store
    pub fn assemble(
        config: Config,
        inspection_repo: Arc<dyn InspectionRepository>,
        template_repo: Arc<dyn TemplateRepository>,
        catalog_repo: Arc<dyn CatalogRepository>,
        photo_store: Arc<dyn PhotoStore>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        let service = Arc::new(Service::new(
            inspection_repo,
            template_repo,
            catalog_repo,
            photo_store,
            event_publisher,
            config.clone(),
        ));
        let client: Arc<dyn InspectionApi> =
            Arc::new(crate::api::native::NativeClient::new(service.clone()));

        Self {
            config,
            service,
            client,
        }
    }

    async fn seed(&self) -> Result<()> {
        self.service
            .seed_defaults()
            .await
            .map_err(|e| anyhow::anyhow!("seeding catalog and templates: {}", e))?;
        tracing::info!(
            default_template = %self.config.default_template,
            parts = self.service.part_dictionary().len(),
            "Inspection engine initialized"
        );
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process client
    pub fn client(&self) -> Arc<dyn InspectionApi> {
        self.client.clone()
    }

    /// REST routes mounted on `router`
    pub fn register_rest(&self, router: axum::Router) -> Result<axum::Router> {
        tracing::info!("Registering inspection engine REST routes");
        crate::api::rest::register_routes(router, self.service.clone())
    }
}
