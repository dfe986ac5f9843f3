//! In-memory repositories for previews and tests

use crate::contract::{
    CarTemplate, ColorMapping, DisplayCondition, Inspection, PartDefinition, PartKey, PhotoRef,
};
use crate::domain::catalog::Catalog;
use crate::domain::repository::{
    CatalogRepository, FinalizedConflict, InspectionRepository, PhotoStore, TemplateRepository,
};
use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryInspectionRepository {
    items: RwLock<HashMap<Uuid, Inspection>>,
}

#[async_trait]
impl InspectionRepository for InMemoryInspectionRepository {
    async fn save(&self, inspection: &Inspection) -> Result<Inspection> {
        let mut items = self.items.write();
        if let Some(stored) = items.get(&inspection.id) {
            if stored.is_finalized() {
                if stored.finalized_at == inspection.finalized_at {
                    return Ok(stored.clone());
                }
                return Err(FinalizedConflict(inspection.id).into());
            }
        }
        items.insert(inspection.id, inspection.clone());
        Ok(inspection.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Inspection>> {
        Ok(self.items.read().get(&id).cloned())
    }

    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<Inspection>> {
        let mut all: Vec<Inspection> = self.items.read().values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(all
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.items.write().remove(&id).is_some())
    }

    async fn clear_vehicle_link(&self, car_id: Uuid) -> Result<u64> {
        let mut items = self.items.write();
        let mut cleared = 0;
        for inspection in items.values_mut() {
            if inspection.car_id == Some(car_id) {
                inspection.car_id = None;
                cleared += 1;
            }
        }
        Ok(cleared)
    }
}

#[derive(Default)]
pub struct InMemoryTemplateRepository {
    items: RwLock<BTreeMap<String, CarTemplate>>,
}

impl InMemoryTemplateRepository {
    /// Store without validation, keeping the default flag unique
    pub fn insert(&self, template: CarTemplate) {
        let mut items = self.items.write();
        if template.is_default {
            for other in items.values_mut() {
                other.is_default = false;
            }
        }
        items.insert(template.id.clone(), template);
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplateRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<CarTemplate>> {
        Ok(self.items.read().get(id).cloned())
    }

    async fn find_by_body_type(&self, body_type: &str) -> Result<Option<CarTemplate>> {
        let items = self.items.read();
        let mut candidates: Vec<&CarTemplate> = items
            .values()
            .filter(|t| t.is_active && t.body_type == body_type)
            .collect();
        candidates.sort_by_key(|t| !t.is_default);
        Ok(candidates.first().map(|t| (*t).clone()))
    }

    async fn find_default(&self) -> Result<Option<CarTemplate>> {
        Ok(self
            .items
            .read()
            .values()
            .find(|t| t.is_default && t.is_active)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<CarTemplate>> {
        Ok(self.items.read().values().cloned().collect())
    }

    async fn upsert(&self, template: &CarTemplate) -> Result<CarTemplate> {
        self.insert(template.clone());
        Ok(template.clone())
    }
}

#[derive(Default)]
pub struct InMemoryCatalogRepository {
    parts: RwLock<BTreeMap<PartKey, PartDefinition>>,
    colors: RwLock<BTreeMap<DisplayCondition, ColorMapping>>,
}

impl InMemoryCatalogRepository {
    pub fn seeded(catalog: &Catalog) -> Self {
        let repo = Self::default();
        {
            let mut parts = repo.parts.write();
            for part in catalog.parts() {
                parts.insert(part.key.clone(), part.clone());
            }
            let mut colors = repo.colors.write();
            for mapping in catalog.colors().iter() {
                colors.insert(mapping.condition, mapping.clone());
            }
        }
        repo
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn list_parts(&self) -> Result<Vec<PartDefinition>> {
        let mut parts: Vec<PartDefinition> = self.parts.read().values().cloned().collect();
        parts.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.key.cmp(&b.key)));
        Ok(parts)
    }

    async fn list_colors(&self) -> Result<Vec<ColorMapping>> {
        Ok(self.colors.read().values().cloned().collect())
    }

    async fn upsert_part(&self, part: &PartDefinition) -> Result<()> {
        self.parts.write().insert(part.key.clone(), part.clone());
        Ok(())
    }

    async fn upsert_color(&self, mapping: &ColorMapping) -> Result<()> {
        self.colors.write().insert(mapping.condition, mapping.clone());
        Ok(())
    }
}

/// Keeps uploaded JPEGs in memory under `/uploads/<uuid>.jpg` references
#[derive(Default)]
pub struct InMemoryPhotoStore {
    photos: RwLock<HashMap<PhotoRef, Vec<u8>>>,
}

impl InMemoryPhotoStore {
    pub fn get(&self, reference: &str) -> Option<Vec<u8>> {
        self.photos.read().get(reference).cloned()
    }

    pub fn len(&self) -> usize {
        self.photos.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.read().is_empty()
    }
}

#[async_trait]
impl PhotoStore for InMemoryPhotoStore {
    async fn upload(&self, jpeg: &[u8]) -> Result<PhotoRef> {
        let reference = format!("/uploads/{}.jpg", Uuid::new_v4());
        self.photos.write().insert(reference.clone(), jpeg.to_vec());
        Ok(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::NewInspection;
    use crate::domain::template::builtin_sedan;
    use chrono::Utc;

    #[tokio::test]
    async fn test_clear_vehicle_link_keeps_inspections() {
        let repo = InMemoryInspectionRepository::default();
        let car = Uuid::new_v4();
        let mut finalized = Inspection::create(
            NewInspection {
                template_type: "sedan".to_string(),
                car_id: Some(car),
                ..Default::default()
            },
            Utc::now(),
        );
        finalized.finalize(Utc::now()).unwrap();
        repo.save(&finalized).await.unwrap();

        assert_eq!(repo.clear_vehicle_link(car).await.unwrap(), 1);
        let stored = repo.find_by_id(finalized.id).await.unwrap().unwrap();
        assert_eq!(stored.car_id, None);
        assert!(stored.is_finalized());
    }

    #[tokio::test]
    async fn test_finalized_inspection_is_not_overwritten() {
        let repo = InMemoryInspectionRepository::default();
        let draft = Inspection::create(
            NewInspection {
                template_type: "sedan".to_string(),
                ..Default::default()
            },
            Utc::now(),
        );
        repo.save(&draft).await.unwrap();

        let mut finalized = draft.clone();
        finalized.finalize(Utc::now()).unwrap();
        repo.save(&finalized).await.unwrap();
        repo.save(&finalized).await.unwrap();

        let err = repo.save(&draft).await.unwrap_err();
        assert!(err.downcast_ref::<FinalizedConflict>().is_some());

        let stored = repo.find_by_id(draft.id).await.unwrap().unwrap();
        assert!(stored.is_finalized());
        assert_eq!(stored.finalized_at, finalized.finalized_at);
    }

    #[tokio::test]
    async fn test_single_default_template() {
        let repo = InMemoryTemplateRepository::default();
        repo.insert(builtin_sedan());
        let mut suv = builtin_sedan();
        suv.id = "suv".to_string();
        suv.body_type = "suv".to_string();
        repo.upsert(&suv).await.unwrap();

        let defaults: Vec<_> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .filter(|t| t.is_default)
            .collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, "suv");
    }

    #[tokio::test]
    async fn test_photo_store_round_trip() {
        let store = InMemoryPhotoStore::default();
        let reference = store.upload(&[0xFF, 0xD8, 0xFF]).await.unwrap();
        assert!(reference.starts_with("/uploads/") && reference.ends_with(".jpg"));
        assert_eq!(store.get(&reference), Some(vec![0xFF, 0xD8, 0xFF]));
    }
}
