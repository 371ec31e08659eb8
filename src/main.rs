use rust_decimal::Decimal;
use tracing::{error, info, Instrument};

use cafe_inventory::app_system::{setup_tracing, InventorySystem, SystemConfig, SystemError};
use cafe_inventory::catalog::{AddProductRequest, LoginRequest, SignupRequest};

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = SystemConfig::from_env()?;
    let system = InventorySystem::start(&config).await?;
    let catalog = &system.catalog;

    let span = tracing::info_span!("staff_signup");
    let user_id = async {
        info!("Registering staff account");
        catalog
            .signup(SignupRequest {
                name: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
    }
    .instrument(span)
    .await?;

    let logged_in = catalog
        .login(LoginRequest {
            email: "alice@example.com".to_string(),
            password: "secret123".to_string(),
        })
        .await?;
    info!(user_id, logged_in, "Staff member logged in");

    let span = tracing::info_span!("catalog_seed");
    let (espresso, croissant) = async {
        let espresso = catalog
            .add_product(AddProductRequest {
                name: "Espresso beans".to_string(),
                description: "1kg house roast".to_string(),
                category: "Coffee".to_string(),
                price: Decimal::new(2400, 2),
                quantity: 8,
            })
            .await?;
        let croissant = catalog
            .add_product(AddProductRequest {
                name: "Croissant".to_string(),
                description: "Butter croissant".to_string(),
                category: "Bakery".to_string(),
                price: Decimal::new(325, 2),
                quantity: 12,
            })
            .await?;
        Ok::<_, SystemError>((espresso, croissant))
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("sales");
    async {
        match catalog.sell(espresso.id, 5).await {
            Ok(receipt) => info!(%receipt, "Sale processed"),
            Err(e) => error!(error = %e, "Sale failed"),
        }
        // Only three bags left, so this one is refused.
        match catalog.sell(espresso.id, 4).await {
            Ok(receipt) => info!(%receipt, "Sale processed"),
            Err(e) => error!(error = %e, "Sale failed"),
        }
        if let Err(e) = catalog.restock(croissant.id, 6).await {
            error!(error = %e, "Restock failed");
        }
    }
    .instrument(span)
    .await;

    for product in catalog.low_stock().await? {
        info!(
            product_id = product.id,
            name = %product.name,
            quantity = product.quantity,
            "Low inventory"
        );
    }
    let summary = catalog.inventory_summary().await?;
    info!(
        products = summary.product_count,
        units = summary.total_units,
        value = %summary.stock_value,
        low = summary.low_stock_count,
        "Inventory summary"
    );

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
