//! Storage layer - database entities and repositories

pub mod entity;
pub mod mapper;
pub mod migrations;
pub mod repositories;

pub use migrations::Migrator;
pub use repositories::{
    SeaOrmCatalogRepository, SeaOrmInspectionRepository, SeaOrmTemplateRepository,
};
