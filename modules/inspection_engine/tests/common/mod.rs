//! Shared fixtures for inspection engine integration tests
#![allow(dead_code)]

use inspection_engine::config::Config;
use inspection_engine::contract::{CustomerInfo, InspectorInfo, VehicleInfo};
use inspection_engine::domain::Service;
use inspection_engine::infra::storage::Migrator;
use inspection_engine::{InspectionEngineModule, NewInspection, PartKey};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use uuid::Uuid;

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

/// Engine over in-memory repositories, seeded with the built-in catalog and sedan
pub async fn in_memory_module() -> InspectionEngineModule {
    InspectionEngineModule::in_memory(Config::default())
        .await
        .expect("in-memory module should initialise")
}

pub async fn in_memory_service() -> Arc<Service> {
    in_memory_module().await.service()
}

/// Fresh SQLite database with every migration applied
pub async fn sqlite_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("sqlite memory database");
    Migrator::up(&db, None).await.expect("migrations apply");
    db
}

pub fn key(part_key: &str) -> PartKey {
    PartKey::new(part_key).expect("valid part key")
}

/// A realistic sedan inspection request
pub fn sample_new_inspection(car_id: Option<Uuid>) -> NewInspection {
    NewInspection {
        template_type: "sedan".to_string(),
        car_id,
        vehicle: VehicleInfo {
            make: Some("Toyota".to_string()),
            model: Some("Camry".to_string()),
            year: Some(2021),
            vin: Some("4T1BF1FK5CU123456".to_string()),
            plate: Some("ABC 1234".to_string()),
            color: Some("White".to_string()),
            mileage: Some(48_200),
        },
        customer: Some(CustomerInfo {
            name: Some("Sara Al-Harbi".to_string()),
            phone: Some("+966500000000".to_string()),
            email: None,
        }),
        inspector: Some(InspectorInfo {
            id: Some("insp-07".to_string()),
            name: Some("Omar".to_string()),
        }),
        general_notes: Some("Vehicle delivered washed".to_string()),
    }
}

/// Small PNG suitable for the photo pipeline
pub fn sample_photo(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut bytes = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("encode png");
    bytes.into_inner()
}
