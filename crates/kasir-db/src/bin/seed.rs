//! # Seed Data
//!
//! Loads the starter menu into an empty Kasir POS database.
//!
//! ## Usage
//! ```bash
//! cargo run -p kasir-db --bin seed
//! cargo run -p kasir-db --bin seed -- --db ./data/kasir.db
//! ```
//!
//! Does nothing if the products table already has rows.

use kasir_core::NewProduct;
use kasir_db::{Database, DbConfig};

/// name, price, stock
const MENU: &[(&str, i64, i64)] = &[
    ("bebek bumbu hitam", 15_000, 60),
    ("ayam bumbu hitam", 12_000, 60),
    ("es teh", 3_000, 120),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let mut db_path = "kasir.db".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Kasir POS Seed Data");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./kasir.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Kasir POS Seed Data");
    println!("======================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        db.close().await;
        return Ok(());
    }

    for (name, price, stock) in MENU {
        let product = NewProduct {
            name: name.to_string(),
            price: *price,
            stock: *stock,
        };
        let created = db.products().insert(&product).await?;
        println!("  #{} {} @ {}", created.id, created.name, created.price());
    }

    println!();
    println!("✓ Seeded {} products", MENU.len());

    db.close().await;
    Ok(())
}
