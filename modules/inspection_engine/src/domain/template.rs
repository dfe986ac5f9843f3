//! Template registry
//!
//! Templates are looked up by id first, then by body type. A miss falls back to
//! the default template so the inspection screen always has something to draw.

use super::catalog::Catalog;
use super::repository::TemplateRepository;
use super::validation::validate_template;
use crate::contract::{
    BilingualLabel, CarTemplate, InspectionError, PartKey, TemplatePartMapping, ViewAngle,
};
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

pub const SEDAN_TEMPLATE_ID: &str = "sedan";

pub struct TemplateRegistry {
    repo: Arc<dyn TemplateRepository>,
    fallback_id: String,
}

impl TemplateRegistry {
    pub fn new(repo: Arc<dyn TemplateRepository>, fallback_id: impl Into<String>) -> Self {
        Self {
            repo,
            fallback_id: fallback_id.into(),
        }
    }

    /// Exact lookup by id or active body type, no fallback
    pub async fn find(&self, template_type: &str) -> Result<CarTemplate, InspectionError> {
        if let Some(template) = self.repo.find_by_id(template_type).await.map_err(internal)? {
            if template.is_active {
                return Ok(template);
            }
        }
        self.repo
            .find_by_body_type(template_type)
            .await
            .map_err(internal)?
            .ok_or_else(|| InspectionError::TemplateNotFound {
                template: template_type.to_string(),
            })
    }

    /// Lookup with fallback to the default template
    pub async fn resolve(&self, template_type: &str) -> Result<CarTemplate, InspectionError> {
        match self.find(template_type).await {
            Ok(template) => Ok(template),
            Err(InspectionError::TemplateNotFound { .. }) => {
                let fallback = self.default_template().await?;
                tracing::warn!(
                    requested = template_type,
                    fallback = %fallback.id,
                    "Template not found, using default"
                );
                Ok(fallback)
            }
            Err(e) => Err(e),
        }
    }

    async fn default_template(&self) -> Result<CarTemplate, InspectionError> {
        if let Some(template) = self.repo.find_default().await.map_err(internal)? {
            return Ok(template);
        }
        self.repo
            .find_by_id(&self.fallback_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| InspectionError::TemplateNotFound {
                template: self.fallback_id.clone(),
            })
    }

    pub async fn list(&self) -> Result<Vec<CarTemplate>, InspectionError> {
        self.repo.list_all().await.map_err(internal)
    }

    /// Validate against the current part dictionary and store
    pub async fn register(
        &self,
        template: &CarTemplate,
        catalog: &Catalog,
    ) -> Result<CarTemplate, InspectionError> {
        validate_template(template, |key| catalog.part(key).is_some())?;
        let stored = self.repo.upsert(template).await.map_err(internal)?;
        tracing::info!(template_id = %stored.id, body_type = %stored.body_type, "Template registered");
        Ok(stored)
    }
}

fn internal(e: anyhow::Error) -> InspectionError {
    tracing::error!(error = %e, "Template repository failure");
    InspectionError::Internal
}

const SEDAN_FRONT: &str = include_str!("../../assets/templates/sedan/front.svg");
const SEDAN_REAR: &str = include_str!("../../assets/templates/sedan/rear.svg");
const SEDAN_LEFT: &str = include_str!("../../assets/templates/sedan/left.svg");
const SEDAN_RIGHT: &str = include_str!("../../assets/templates/sedan/right.svg");
const SEDAN_TOP: &str = include_str!("../../assets/templates/sedan/top.svg");

// part key, element id, angles the part is drawn in
const SEDAN_LAYOUT: [(&str, &str, &[ViewAngle]); 26] = {
    use ViewAngle::{Front, Left, Rear, Right, Top};
    [
        ("front_bumper", "front-bumper", &[Front, Left, Right, Top]),
        ("grille", "grille", &[Front]),
        ("hood", "hood", &[Front, Left, Right, Top]),
        ("windshield", "windshield", &[Front, Left, Right, Top]),
        ("headlight_left", "headlight-left", &[Front]),
        ("headlight_right", "headlight-right", &[Front]),
        ("rear_bumper", "rear-bumper", &[Rear, Left, Right, Top]),
        ("trunk", "trunk", &[Rear, Left, Right, Top]),
        ("rear_windshield", "rear-windshield", &[Rear, Left, Right, Top]),
        ("taillight_left", "taillight-left", &[Rear]),
        ("taillight_right", "taillight-right", &[Rear]),
        ("front_left_fender", "front-left-fender", &[Left, Top]),
        ("front_left_door", "front-left-door", &[Left, Top]),
        ("rear_left_door", "rear-left-door", &[Left, Top]),
        ("rear_left_fender", "rear-left-fender", &[Left, Top]),
        ("left_mirror", "left-mirror", &[Front, Rear, Left, Top]),
        ("front_right_fender", "front-right-fender", &[Right, Top]),
        ("front_right_door", "front-right-door", &[Right, Top]),
        ("rear_right_door", "rear-right-door", &[Right, Top]),
        ("rear_right_fender", "rear-right-fender", &[Right, Top]),
        ("right_mirror", "right-mirror", &[Front, Rear, Right, Top]),
        ("roof", "roof", &[Front, Rear, Left, Right, Top]),
        ("wheel_front_left", "wheel-fl", &[Front, Left]),
        ("wheel_front_right", "wheel-fr", &[Front, Right]),
        ("wheel_rear_left", "wheel-rl", &[Rear, Left]),
        ("wheel_rear_right", "wheel-rr", &[Rear, Right]),
    ]
};

/// Bundled sedan template, the default body type
pub fn builtin_sedan() -> CarTemplate {
    let diagrams = BTreeMap::from([
        (ViewAngle::Front, SEDAN_FRONT.to_string()),
        (ViewAngle::Rear, SEDAN_REAR.to_string()),
        (ViewAngle::Left, SEDAN_LEFT.to_string()),
        (ViewAngle::Right, SEDAN_RIGHT.to_string()),
        (ViewAngle::Top, SEDAN_TOP.to_string()),
    ]);

    let mut parts = Vec::with_capacity(SEDAN_LAYOUT.len());
    for (key, element_id, angles) in SEDAN_LAYOUT {
        match PartKey::new(key) {
            Ok(part_key) => parts.push(TemplatePartMapping {
                part_key,
                element_id: element_id.to_string(),
                angles: angles.iter().copied().collect::<BTreeSet<_>>(),
                visible: true,
            }),
            Err(e) => tracing::error!(key, error = %e, "Skipping malformed sedan mapping"),
        }
    }

    let now = Utc::now();
    CarTemplate {
        id: SEDAN_TEMPLATE_ID.to_string(),
        body_type: "sedan".to_string(),
        name: BilingualLabel::new("سيدان", "Sedan"),
        is_active: true,
        is_default: true,
        diagrams,
        parts,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryTemplateRepository;

    fn registry_with(templates: Vec<CarTemplate>) -> TemplateRegistry {
        let repo = InMemoryTemplateRepository::default();
        for template in templates {
            repo.insert(template);
        }
        TemplateRegistry::new(Arc::new(repo), SEDAN_TEMPLATE_ID)
    }

    #[test]
    fn test_builtin_sedan_is_valid() {
        let catalog = Catalog::builtin();
        let template = builtin_sedan();
        validate_template(&template, |key| catalog.part(key).is_some()).unwrap();
        assert_eq!(template.parts.len(), catalog.parts().len());
        assert_eq!(template.available_angles().len(), 5);
    }

    #[test]
    fn test_every_sedan_row_becomes_a_mapping() {
        let template = builtin_sedan();
        assert_eq!(template.parts.len(), SEDAN_LAYOUT.len());
        for ((key, element_id, _), mapping) in SEDAN_LAYOUT.iter().zip(&template.parts) {
            assert_eq!(mapping.part_key.as_str(), *key);
            assert_eq!(mapping.element_id, *element_id);
        }
    }

    #[tokio::test]
    async fn test_resolve_by_body_type() {
        let mut hatch = builtin_sedan();
        hatch.id = "hatch-2024".to_string();
        hatch.body_type = "hatchback".to_string();
        hatch.is_default = false;
        let registry = registry_with(vec![builtin_sedan(), hatch]);

        let found = registry.resolve("hatchback").await.unwrap();
        assert_eq!(found.id, "hatch-2024");
    }

    #[tokio::test]
    async fn test_unknown_body_type_falls_back_to_default() {
        let registry = registry_with(vec![builtin_sedan()]);

        let err = registry.find("pickup").await.unwrap_err();
        assert!(matches!(err, InspectionError::TemplateNotFound { .. }));

        let template = registry.resolve("pickup").await.unwrap();
        assert_eq!(template.id, SEDAN_TEMPLATE_ID);
    }

    #[tokio::test]
    async fn test_inactive_template_is_skipped() {
        let mut retired = builtin_sedan();
        retired.id = "coupe".to_string();
        retired.body_type = "coupe".to_string();
        retired.is_active = false;
        retired.is_default = false;
        let registry = registry_with(vec![builtin_sedan(), retired]);

        let template = registry.resolve("coupe").await.unwrap();
        assert_eq!(template.id, SEDAN_TEMPLATE_ID);
    }

    #[tokio::test]
    async fn test_no_default_is_an_error() {
        let registry = registry_with(vec![]);
        let err = registry.resolve("sedan").await.unwrap_err();
        assert!(matches!(err, InspectionError::TemplateNotFound { .. }));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_register_rejects_unknown_part() {
        let registry = registry_with(vec![]);
        let mut template = builtin_sedan();
        if let Some(first) = template.parts.first_mut() {
            first.part_key = PartKey::new("spoiler").unwrap();
        }
        let err = registry
            .register(&template, &Catalog::builtin())
            .await
            .unwrap_err();
        assert!(matches!(err, InspectionError::InvalidTemplate { .. }));
    }
}
