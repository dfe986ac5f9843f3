//! Infrastructure layer - storage, photo stores and in-memory repositories

pub mod memory;
pub mod photos;
pub mod storage;

pub use memory::{
    InMemoryCatalogRepository, InMemoryInspectionRepository, InMemoryPhotoStore,
    InMemoryTemplateRepository,
};
pub use photos::FsPhotoStore;
