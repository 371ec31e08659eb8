//! End-to-end checks through [`InventorySystem`], with real store actors.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::app_system::{InventorySystem, SystemConfig};
use crate::catalog::{
    parse_request, AddProductRequest, CatalogError, LoginRequest, SignupRequest,
};
use crate::ledger::MovementKind;

fn in_memory() -> SystemConfig {
    SystemConfig::default()
}

fn product(name: &str, quantity: i64) -> AddProductRequest {
    AddProductRequest {
        name: name.to_string(),
        description: format!("{name} from the counter"),
        category: "Bakery".to_string(),
        price: Decimal::new(300, 2),
        quantity,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_three_concurrent_sales_of_four_from_ten() {
    let system = InventorySystem::start(&in_memory()).await.unwrap();
    let catalog = Arc::new(system.catalog.clone());
    let created = catalog.add_product(product("Sourdough", 10)).await.unwrap();
    let id = created.id;

    let sales: Vec<_> = (0..3)
        .map(|_| {
            let catalog = Arc::clone(&catalog);
            tokio::spawn(async move { catalog.sell(id, 4).await })
        })
        .collect();

    let mut outcomes = Vec::new();
    for sale in sales {
        outcomes.push(sale.await.unwrap());
    }

    let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
    let rejected: Vec<_> = outcomes.iter().filter_map(|o| o.as_ref().err()).collect();
    assert_eq!(succeeded, 2);
    assert_eq!(
        rejected,
        vec![&CatalogError::InsufficientStock {
            requested: 4,
            available: 2
        }]
    );
    assert_eq!(catalog.get_product(id).await.unwrap().quantity, 2);

    let sales_logged = catalog
        .stock_movements()
        .await
        .iter()
        .filter(|m| m.kind == MovementKind::Sale)
        .count();
    assert_eq!(sales_logged, 2);

    drop(catalog);
    system.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_mixed_traffic_on_many_products_keeps_stock_non_negative() {
    let system = InventorySystem::start(&in_memory()).await.unwrap();
    let catalog = Arc::new(system.catalog.clone());

    let mut ids = Vec::new();
    for i in 0..4 {
        ids.push(catalog.add_product(product(&format!("item {i}"), 6)).await.unwrap().id);
    }

    let tasks: Vec<_> = (0..64u32)
        .map(|n| {
            let catalog = Arc::clone(&catalog);
            let id = ids[(n % 4) as usize];
            tokio::spawn(async move {
                if n % 5 == 0 {
                    let _ = catalog.restock(id, 2).await;
                } else {
                    let _ = catalog.sell(id, i64::from(n % 3) + 1).await;
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    // Replaying the journal per product must land exactly on the stored quantity.
    let movements = catalog.stock_movements().await;
    for product in catalog.list_products().await.unwrap() {
        let replayed: i64 = movements
            .iter()
            .filter(|m| m.product_id == product.id)
            .map(|m| m.delta)
            .sum();
        assert_eq!(6 + replayed, i64::from(product.quantity));
    }

    drop(catalog);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_json_request_to_low_stock_report() {
    let system = InventorySystem::start(&in_memory()).await.unwrap();
    let catalog = &system.catalog;

    let request: AddProductRequest = parse_request(
        r#"{"name":"Muffin","description":"Blueberry","category":"Bakery","price":"2.75","quantity":3}"#,
    )
    .unwrap();
    let muffin = catalog.add_product(request).await.unwrap();
    catalog.add_product(product("Bagel", 5)).await.unwrap();

    let low = catalog.low_stock().await.unwrap();
    assert_eq!(low, vec![muffin.clone()]);

    catalog.restock(muffin.id, 2).await.unwrap();
    assert!(catalog.low_stock().await.unwrap().is_empty());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_signup_login_round_trip() {
    let system = InventorySystem::start(&in_memory()).await.unwrap();
    let catalog = &system.catalog;

    let id = catalog
        .signup(SignupRequest {
            name: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret123".to_string(),
        })
        .await
        .unwrap();

    let attempt = |password: &str| LoginRequest {
        email: "alice@example.com".to_string(),
        password: password.to_string(),
    };
    assert_eq!(catalog.login(attempt("secret123")).await, Ok(id));
    assert_eq!(
        catalog.login(attempt("wrong")).await,
        Err(CatalogError::InvalidCredentials)
    );

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_snapshot_directory_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = SystemConfig {
        data_dir: Some(dir.path().to_path_buf()),
        ..SystemConfig::default()
    };

    let system = InventorySystem::start(&config).await.unwrap();
    let scone = system.catalog.add_product(product("Scone", 9)).await.unwrap();
    system.catalog.sell(scone.id, 4).await.unwrap();
    let user = system
        .catalog
        .signup(SignupRequest {
            name: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap();
    system.shutdown().await.unwrap();

    assert!(dir.path().join("products.json").exists());
    assert!(dir.path().join("users.json").exists());

    let system = InventorySystem::start(&config).await.unwrap();
    let products = system.catalog.list_products().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, scone.id);
    assert_eq!(products[0].quantity, 5);

    let users = system.catalog.list_users().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, user);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_with_outstanding_catalog_clone() {
    let system = InventorySystem::start(&in_memory()).await.unwrap();
    let lingering = system.catalog.clone();

    system.shutdown().await.unwrap();

    assert!(matches!(
        lingering.list_products().await,
        Err(CatalogError::Store(_))
    ));
}
