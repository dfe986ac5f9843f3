//! SeaORM entities for database tables

/// Inspections table entity
pub mod inspection {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "inspections")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,

        /// Template id or body type the inspection is drawn with
        pub template_type: String,

        /// Vehicle listing link, nulled rather than cascaded on vehicle delete
        pub car_id: Option<Uuid>,

        /// `draft` or `finalized`
        pub status: String,

        pub vehicle: Json,
        pub customer: Option<Json>,
        pub inspector: Option<Json>,

        #[sea_orm(column_type = "Text", nullable)]
        pub general_notes: Option<String>,

        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
        pub finalized_at: Option<DateTimeUtc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::inspection_part::Entity")]
        Parts,
    }

    impl Related<super::inspection_part::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Parts.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Per-part damage records, one row per (inspection, part)
pub mod inspection_part {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "inspection_parts")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub inspection_id: Uuid,

        #[sea_orm(primary_key, auto_increment = false)]
        pub part_key: String,

        pub condition: String,
        pub severity: Option<String>,

        #[sea_orm(column_type = "Text", nullable)]
        pub notes: Option<String>,

        /// Ordered photo references
        pub photos: Json,

        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::inspection::Entity",
            from = "Column::InspectionId",
            to = "super::inspection::Column::Id",
            on_delete = "Cascade"
        )]
        Inspection,
    }

    impl Related<super::inspection::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Inspection.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Car templates table entity
pub mod car_template {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "car_templates")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,

        pub body_type: String,
        pub name_ar: String,
        pub name_en: String,
        pub is_active: bool,
        pub is_default: bool,

        /// View angle -> SVG source
        pub diagrams: Json,

        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::template_part_mapping::Entity")]
        Mappings,
    }

    impl Related<super::template_part_mapping::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Mappings.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Part-to-element mappings of a template
pub mod template_part_mapping {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "template_part_mappings")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub template_id: String,

        #[sea_orm(primary_key, auto_increment = false)]
        pub part_key: String,

        pub element_id: String,

        /// View angle names the part is drawn in
        pub angles: Json,

        pub visible: bool,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::car_template::Entity",
            from = "Column::TemplateId",
            to = "super::car_template::Column::Id",
            on_delete = "Cascade"
        )]
        Template,
    }

    impl Related<super::car_template::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Template.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Part dictionary table entity
pub mod part_definition {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "part_definitions")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub key: String,

        pub label_ar: String,
        pub label_en: String,
        pub category: String,
        pub sort_order: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Color mapping table entity
pub mod color_mapping {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "color_mappings")]
    pub struct Model {
        /// Display condition, including `not_inspected`
        #[sea_orm(primary_key, auto_increment = false)]
        pub condition: String,

        pub color: String,
        pub label_ar: String,
        pub label_en: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}
