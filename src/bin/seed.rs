use std::sync::Arc;

use anyhow::Context;
use storefront_state::{
    config::AppConfig,
    dto::auth::RegisterRequest,
    error::AppError,
    models::Product,
    storage::FileStore,
    store::accounts::{AccountDirectory, LocalDirectory},
};

const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "demo1234";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let products = sample_products();
    if let Some(parent) = config.catalog_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(&config.catalog_path, serde_json::to_vec_pretty(&products)?)
        .with_context(|| format!("writing {}", config.catalog_path.display()))?;

    let storage = Arc::new(FileStore::open(&config.data_dir)?);
    let directory = LocalDirectory::open(storage);
    let request = RegisterRequest {
        name: "Demo Shopper".into(),
        email: DEMO_EMAIL.into(),
        password: DEMO_PASSWORD.into(),
    };
    let user_id = match directory.register(&request).await {
        Ok(user) => user.id,
        Err(AppError::EmailInUse) => "existing".to_string(),
        Err(err) => return Err(anyhow::anyhow!(err.to_string())),
    };

    println!(
        "Seed completed. {} products written to {}; demo account {DEMO_EMAIL} / {DEMO_PASSWORD} ({user_id})",
        products.len(),
        config.catalog_path.display()
    );
    Ok(())
}

fn sample_products() -> Vec<Product> {
    let base_date = 1_716_634_345_448_i64;
    let rows: [(&str, &str, i64, &str, &str, bool); 16] = [
        ("Women Round Neck Cotton Top", "Lightweight knit top for everyday wear.", 100, "Women", "Topwear", true),
        ("Men Round Neck Pure Cotton T-shirt", "Breathable cotton tee with a relaxed fit.", 200, "Men", "Topwear", true),
        ("Girls Round Neck Cotton Top", "Soft cotton top sized for kids.", 220, "Kids", "Topwear", true),
        ("Men Tapered Fit Flat-Front Trousers", "Tapered trousers with a clean front.", 110, "Men", "Bottomwear", false),
        ("Women Zip-Front Relaxed Fit Jacket", "Relaxed jacket with a full zip.", 180, "Women", "Winterwear", false),
        ("Boy Round Neck Pure Cotton T-shirt", "Everyday cotton tee for kids.", 60, "Kids", "Topwear", false),
        ("Men Printed Plain Cotton Shirt", "Printed cotton shirt with a regular collar.", 140, "Men", "Topwear", false),
        ("Women Palazzo Pants with Waist Belt", "Wide-leg pants with a matching belt.", 130, "Women", "Bottomwear", true),
        ("Kid Tapered Slim Fit Trouser", "Slim trousers with an elastic waist.", 90, "Kids", "Bottomwear", false),
        ("Men Slim Fit Relaxed Denim Jacket", "Classic denim jacket with button front.", 250, "Men", "Winterwear", true),
        ("Women Cotton Straight Kurta", "Straight cotton kurta for daily wear.", 120, "Women", "Topwear", false),
        ("Girls Quilted Puffer Jacket", "Insulated puffer for cold days.", 160, "Kids", "Winterwear", false),
        ("Men Regular Fit Chinos", "Cotton chinos in a regular fit.", 150, "Men", "Bottomwear", false),
        ("Women High-Rise Skinny Jeans", "Stretch denim with a high rise.", 170, "Women", "Bottomwear", false),
        ("Men Hooded Knit Sweatshirt", "Fleece-lined hoodie with kangaroo pocket.", 190, "Men", "Winterwear", false),
        ("Women Oversized Sweatshirt", "Dropped-shoulder sweatshirt.", 160, "Women", "Winterwear", false),
    ];

    rows.iter()
        .enumerate()
        .map(|(i, (name, description, price, category, sub_category, bestseller))| Product {
            id: format!("aaaa{:02}", i + 1),
            name: name.to_string(),
            description: description.to_string(),
            price: *price,
            image: vec![format!("/images/p_img{}.png", i + 1)],
            category: category.to_string(),
            sub_category: sub_category.to_string(),
            sizes: ["S", "M", "L", "XL"].iter().map(|s| s.to_string()).collect(),
            date: base_date + i as i64,
            bestseller: *bestseller,
        })
        .collect()
}
