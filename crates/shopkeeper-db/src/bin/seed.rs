//! Seeds a development database with sample catalogue data.
//!
//! Usage: `cargo run --bin seed -- [path]` (defaults to `shopkeeper.db`).

use shopkeeper_core::{ClientInput, ProductInput};
use shopkeeper_db::{Database, DbConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "shopkeeper.db".to_string());

    let db = Database::new(DbConfig::new(&path)).await?;

    if db.products().count().await? > 0 {
        info!(path = %path, "database already has products, leaving it alone");
        db.close().await;
        return Ok(());
    }

    let products = [
        ("Linen Shirt", "white", 24, 1_500, 2_900),
        ("Linen Shirt", "navy", 18, 1_500, 2_900),
        ("Denim Jacket", "indigo", 8, 4_200, 7_900),
        ("Wool Sweater", "gray", 12, 3_000, 5_500),
        ("Cotton Tee", "black", 60, 600, 1_400),
        ("Cotton Tee", "red", 45, 600, 1_400),
        ("Summer Dress", "floral", 10, 2_800, 5_200),
        ("Canvas Cap", "beige", 30, 500, 1_200),
    ];

    for (name, color, stock, cost_cents, sale_price_cents) in products {
        db.products()
            .upsert(
                None,
                ProductInput {
                    name: name.to_string(),
                    color: color.to_string(),
                    stock,
                    cost_cents,
                    sale_price_cents,
                    image_url: None,
                },
            )
            .await?;
    }

    db.clients()
        .upsert(
            None,
            ClientInput {
                name: "Maria Lopez".to_string(),
                document_id: "1090123456".to_string(),
                phone: "+57 300 555 0199".to_string(),
                address: "Calle 10 #4-21".to_string(),
            },
        )
        .await?;

    info!(path = %path, "seeded sample catalogue and one client");
    db.close().await;
    Ok(())
}
