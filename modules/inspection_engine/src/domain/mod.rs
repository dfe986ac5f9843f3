//! Domain layer - business logic and services

pub mod catalog;
pub mod events;
pub mod form;
pub mod inspection;
pub mod photo;
pub mod repository;
pub mod service;
pub mod template;
pub mod validation;

pub use catalog::{Catalog, CatalogCache, ColorTable};
pub use events::{EventPublisher, InspectionEvent, NoOpEventPublisher, TracingEventPublisher};
pub use form::{DamageEntryForm, SaveOutcome, StatusVocabulary};
pub use repository::{CatalogRepository, InspectionRepository, PhotoStore, TemplateRepository};
pub use service::Service;
pub use template::{builtin_sedan, TemplateRegistry};
