//! Database seeder for Khata development and testing.
//!
//! Seeds a demo company with its system chart of accounts, common GST rates,
//! a customer, and a dispatched shipment ready to be invoiced.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use khata_db::entities::{companies, customers, shipment_items, shipments, tax_rates};
use khata_db::repositories::AccountRepository;

/// Demo company ID (consistent for all seeds)
const DEMO_COMPANY_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Demo customer ID (consistent for all seeds)
const DEMO_CUSTOMER_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Demo shipment ID (consistent for all seeds)
const DEMO_SHIPMENT_ID: &str = "00000000-0000-0000-0000-000000000003";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = khata_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo company...");
    seed_company(&db).await;

    println!("Seeding chart of accounts...");
    AccountRepository::new(db.clone())
        .seed_system_chart(demo_company_id())
        .await
        .expect("Failed to seed chart of accounts");

    println!("Seeding GST rates...");
    seed_tax_rates(&db).await;

    println!("Seeding demo customer...");
    seed_customer(&db).await;

    println!("Seeding demo shipment...");
    seed_shipment(&db).await;

    println!("Seeding complete!");
}

fn demo_company_id() -> Uuid {
    Uuid::parse_str(DEMO_COMPANY_ID).unwrap()
}

fn demo_customer_id() -> Uuid {
    Uuid::parse_str(DEMO_CUSTOMER_ID).unwrap()
}

fn demo_shipment_id() -> Uuid {
    Uuid::parse_str(DEMO_SHIPMENT_ID).unwrap()
}

/// Seeds the demo company.
async fn seed_company(db: &DatabaseConnection) {
    if companies::Entity::find_by_id(demo_company_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo company already exists, skipping...");
        return;
    }

    let now = Utc::now().into();
    companies::ActiveModel {
        id: Set(demo_company_id()),
        name: Set("Khata Demo Traders".to_string()),
        gstin: Set(Some("27AAACK1234F1Z5".to_string())),
        state: Set("Maharashtra".to_string()),
        default_gst_rate: Set(dec!(18)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert demo company");
}

/// Seeds common HSN-to-rate mappings.
async fn seed_tax_rates(db: &DatabaseConnection) {
    // (hsn, total GST percent): food grains 0/5, garments 12, machinery 18,
    // automobiles 28.
    let rates = [
        ("1006", dec!(0)),
        ("0910", dec!(5)),
        ("6109", dec!(12)),
        ("8471", dec!(18)),
        ("8703", dec!(28)),
    ];

    let existing = tax_rates::Entity::find().all(db).await.unwrap_or_default();
    if existing
        .iter()
        .any(|r| r.company_id == demo_company_id())
    {
        println!("  GST rates already exist, skipping...");
        return;
    }

    let now = Utc::now().into();
    for (hsn, rate) in rates {
        tax_rates::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(demo_company_id()),
            hsn_code: Set(hsn.to_string()),
            rate_percent: Set(rate),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .expect("Failed to insert tax rate");
    }
}

/// Seeds an intra-state demo customer (CGST+SGST applies).
async fn seed_customer(db: &DatabaseConnection) {
    if customers::Entity::find_by_id(demo_customer_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo customer already exists, skipping...");
        return;
    }

    let now = Utc::now().into();
    customers::ActiveModel {
        id: Set(demo_customer_id()),
        company_id: Set(demo_company_id()),
        name: Set("Sharma General Stores".to_string()),
        state: Set("Maharashtra".to_string()),
        gstin: Set(Some("27AABCS9876G1Z1".to_string())),
        billing_address: Set(Some("42 MG Road, Pune, Maharashtra 411001".to_string())),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert demo customer");
}

/// Seeds a dispatched shipment with two items, ready for invoicing.
async fn seed_shipment(db: &DatabaseConnection) {
    if shipments::Entity::find_by_id(demo_shipment_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo shipment already exists, skipping...");
        return;
    }

    let now = Utc::now().into();
    let today = Utc::now().date_naive();
    shipments::ActiveModel {
        id: Set(demo_shipment_id()),
        company_id: Set(demo_company_id()),
        customer_id: Set(Some(demo_customer_id())),
        dispatch_number: Set(format!("GD-{}-00001", today.format("%Y-%m"))),
        dispatch_date: Set(today),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert demo shipment");

    let items = [
        ("Laptop 14-inch", Some("8471"), dec!(2), dec!(45000), dec!(38000), dec!(1000)),
        ("Cotton T-shirt", Some("6109"), dec!(50), dec!(350), dec!(210), dec!(0)),
    ];

    for (name, hsn, qty, price, cost, discount) in items {
        shipment_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            shipment_id: Set(demo_shipment_id()),
            product_name: Set(name.to_string()),
            hsn_code: Set(hsn.map(String::from)),
            quantity: Set(qty),
            selling_price: Set(Some(price)),
            cost_price: Set(Some(cost)),
            discount: Set(discount),
            created_at: Set(now),
        }
        .insert(db)
        .await
        .expect("Failed to insert shipment item");
    }
}
