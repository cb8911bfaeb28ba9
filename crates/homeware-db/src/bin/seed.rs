//! # Seed Data Generator
//!
//! Populates the database with development products and coupons.
//!
//! ## Usage
//! ```bash
//! # Generate 500 products (default)
//! cargo run -p homeware-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p homeware-db --bin seed -- --count 2000
//!
//! # Specify database path
//! cargo run -p homeware-db --bin seed -- --db ./data/shop.db
//! ```
//!
//! ## Generated Data
//! Home goods across categories (furniture, decor, kitchen, bedding,
//! lighting), each with a deterministic price, stock level and tax rate,
//! plus a handful of coupons:
//! - WELCOME10: public, 10% off
//! - FESTIVE20: public, 20% off, tight usage budget
//! - VIP25: targeted, granted to the demo user

use chrono::{Duration, Utc};
use std::env;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use homeware_core::{Coupon, Product};
use homeware_db::{Database, DbConfig};

/// Product categories with base names for realistic test data
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Furniture",
        &[
            "Oak Bookshelf",
            "Walnut Side Table",
            "Pine Bench",
            "Rattan Chair",
            "Velvet Armchair",
            "Console Table",
            "Shoe Cabinet",
            "Corner Desk",
            "Folding Stool",
            "TV Stand",
        ],
    ),
    (
        "Decor",
        &[
            "Ceramic Vase",
            "Wall Mirror",
            "Picture Frame",
            "Scented Candle",
            "Dried Flowers",
            "Woven Wall Hanging",
            "Brass Figurine",
            "Glass Terrarium",
            "Clay Pot",
            "Jute Basket",
        ],
    ),
    (
        "Kitchen",
        &[
            "Copper Kettle",
            "Serving Board",
            "Stoneware Bowl",
            "Knife Block",
            "Spice Rack",
            "Glass Carafe",
            "Teak Tray",
            "Cast Iron Pan",
            "Salad Servers",
            "Butter Dish",
        ],
    ),
    (
        "Bedding",
        &[
            "Linen Duvet Cover",
            "Cotton Throw",
            "Wool Blanket",
            "Throw Pillow",
            "Mattress Topper",
            "Flannel Sheets",
            "Quilted Bedspread",
            "Body Pillow",
            "Silk Pillowcase",
            "Weighted Blanket",
        ],
    ),
    (
        "Lighting",
        &[
            "Brass Lamp",
            "Paper Lantern",
            "Floor Lamp",
            "Desk Lamp",
            "Pendant Light",
            "String Lights",
            "Wall Sconce",
            "Reading Light",
            "Salt Lamp",
            "Candle Holder",
        ],
    ),
];

/// Size/variant suffixes with price addons in cents
const VARIANTS: &[(&str, i64)] = &[
    ("Small", 0),
    ("Medium", 800),
    ("Large", 2000),
    ("Natural", 400),
    ("Charcoal", 600),
    ("Sage", 600),
    ("Set of 2", 1500),
    ("Set of 4", 3500),
];

/// Tax rates in basis points
const TAX_RATES: &[u32] = &[0, 500, 1200, 1800];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 500;
    let mut db_path = String::from("./homeware_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(500);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Homeware Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 500)");
                println!("  -d, --db <PATH>    Database file path (default: ./homeware_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Homeware Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Generate products
    println!();
    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: for (category_idx, (_category, names)) in CATEGORIES.iter().enumerate() {
        for (name_idx, name) in names.iter().enumerate() {
            for (variant_idx, (variant, price_addon)) in VARIANTS.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let seed = category_idx * 1000 + name_idx * 20 + variant_idx;
                let product = generate_product(name, variant, *price_addon, seed);

                if let Err(e) = db.products().insert(&product).await {
                    eprintln!("Failed to insert {}: {}", product.name, e);
                    continue;
                }

                generated += 1;

                if generated % 100 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    // Coupons
    println!();
    println!("Creating coupons...");

    let now = Utc::now();
    let welcome = coupon("WELCOME10", 1000, true, 1000, now);
    let festive = coupon("FESTIVE20", 2000, true, 50, now);
    let vip = coupon("VIP25", 2500, false, 100, now);

    db.coupons().insert(&welcome).await?;
    db.coupons().insert(&festive).await?;
    db.coupons().insert(&vip).await?;
    db.coupons().grant("demo-user", &vip.id).await?;

    println!("  WELCOME10: 10% off, public");
    println!("  FESTIVE20: 20% off, public, 50 uses");
    println!("  VIP25:     25% off, granted to demo-user");

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with deterministic pseudo-random data.
fn generate_product(name: &str, variant: &str, price_addon: i64, seed: usize) -> Product {
    let now = Utc::now();

    // Base price $9.99 - $89.99 plus the variant addon
    let base_price = 999 + ((seed * 37) % 8000) as i64;
    let price_cents = base_price + price_addon;

    let tax_rate_bps = TAX_RATES[seed % TAX_RATES.len()];

    // Stock 0-100; some products are intentionally out of stock
    let stock_quantity = (seed % 101) as i64;

    Product {
        id: Uuid::new_v4().to_string(),
        name: format!("{} {}", name, variant),
        description: None,
        price_cents,
        tax_rate_bps,
        stock_quantity,
        created_at: now,
        updated_at: now,
    }
}

/// Builds a coupon valid from yesterday for ninety days.
fn coupon(
    code: &str,
    discount_bps: u32,
    is_public: bool,
    max_uses: i64,
    now: chrono::DateTime<Utc>,
) -> Coupon {
    Coupon {
        id: Uuid::new_v4().to_string(),
        code: code.to_string(),
        discount_bps,
        is_public,
        valid_from: now - Duration::days(1),
        valid_to: now + Duration::days(90),
        max_uses,
        total_used: 0,
        created_at: now,
        updated_at: now,
    }
}
