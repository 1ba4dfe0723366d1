//! Database functionality tests
//!
//! Tests for migrations, the size chart repository and product link integrity

use std::time::Duration;

use anyhow::Result;
use sea_orm::{ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter};
use sizechart::database::entities::*;
use sizechart::database::setup_database;
use sizechart::errors::CoreErrorKind;
use sizechart::services::{SizeChartInput, SizeChartService};
use tempfile::NamedTempFile;

/// Create a test database connection with migrations
async fn setup_test_db() -> Result<(DatabaseConnection, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    Ok((db, temp_file))
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn tshirt_chart(product_ids: Option<&[&str]>) -> SizeChartInput {
    SizeChartInput {
        name: "Men's T-Shirt".to_string(),
        description: Some("Chest measured in inches".to_string()),
        columns: strings(&["Size", "Chest", "Length"]),
        rows: vec![
            strings(&["S", "34-36", "28"]),
            strings(&["M", "38-40", "29"]),
            strings(&["L", "42-44", "30"]),
        ],
        product_ids: product_ids.map(strings),
    }
}

#[tokio::test]
async fn test_database_migrations() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    let charts = size_charts::Entity::find().all(&db).await?;
    assert_eq!(charts.len(), 0);

    let products = products::Entity::find().all(&db).await?;
    assert_eq!(products.len(), 0);

    Ok(())
}

#[tokio::test]
async fn test_create_stores_chart_and_products() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let service = SizeChartService::new(db.clone());

    let chart = service
        .create(tshirt_chart(Some(&["111", "gid://shopify/Product/222", "111"])))
        .await?;

    assert_eq!(chart.name, "Men's T-Shirt");
    assert_eq!(chart.columns, strings(&["Size", "Chest", "Length"]));
    assert_eq!(chart.rows.len(), 3);
    assert_eq!(
        chart.product_ids,
        strings(&["gid://shopify/Product/111", "gid://shopify/Product/222"])
    );

    // Table body is stored as JSON text
    let stored = size_charts::Entity::find_by_id(chart.id.as_str())
        .one(&db)
        .await?
        .expect("chart row should exist");
    assert_eq!(stored.columns, r#"["Size","Chest","Length"]"#);

    let linked = products::Entity::find()
        .filter(products::Column::SizeChartId.eq(chart.id.as_str()))
        .all(&db)
        .await?;
    assert_eq!(linked.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_ids() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let service = SizeChartService::new(db);

    let (first, second) = tokio::join!(
        service.create(SizeChartInput {
            name: "Polo Shirts".to_string(),
            ..tshirt_chart(None)
        }),
        service.create(SizeChartInput {
            name: "Rain Jackets".to_string(),
            ..tshirt_chart(None)
        })
    );
    let (first, second) = (first?, second?);

    assert_ne!(first.id, second.id);
    assert_eq!(first.name, "Polo Shirts");
    assert_eq!(second.name, "Rain Jackets");
    assert_eq!(service.count().await?, 2);

    Ok(())
}

#[tokio::test]
async fn test_update_replaces_product_links() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let service = SizeChartService::new(db.clone());

    let chart = service.create(tshirt_chart(Some(&["1", "2"]))).await?;

    let updated = service
        .update(&chart.id, tshirt_chart(Some(&["2", "3"])))
        .await?;
    assert_eq!(
        updated.product_ids,
        strings(&["gid://shopify/Product/2", "gid://shopify/Product/3"])
    );
    assert!(updated.updated_at >= chart.updated_at);
    assert_eq!(updated.created_at, chart.created_at);

    // Product 1 survives without a chart
    let orphan = products::Entity::find_by_id("gid://shopify/Product/1")
        .one(&db)
        .await?
        .expect("product row should remain");
    assert_eq!(orphan.size_chart_id, None);
    assert!(service.find_chart_for_product("1").await?.is_none());

    let cleared = service.update(&chart.id, tshirt_chart(Some(&[]))).await?;
    assert!(cleared.product_ids.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_delete_then_not_found() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let service = SizeChartService::new(db.clone());

    let chart = service.create(tshirt_chart(Some(&["77"]))).await?;
    service.delete(&chart.id).await?;

    let err = service.get_by_id(&chart.id).await.unwrap_err();
    assert_eq!(err.kind(), CoreErrorKind::NotFound);

    let err = service.delete(&chart.id).await.unwrap_err();
    assert_eq!(err.kind(), CoreErrorKind::NotFound);

    let err = service
        .update(&chart.id, tshirt_chart(None))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), CoreErrorKind::NotFound);

    let product = products::Entity::find_by_id("gid://shopify/Product/77")
        .one(&db)
        .await?
        .expect("product row should remain");
    assert_eq!(product.size_chart_id, None);

    Ok(())
}

#[tokio::test]
async fn test_listing_is_newest_first() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let service = SizeChartService::new(db);

    for name in ["Hoodies", "Jeans", "Socks"] {
        service
            .create(SizeChartInput {
                name: name.to_string(),
                ..tshirt_chart(None)
            })
            .await?;
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let names: Vec<String> = service
        .list_all()
        .await?
        .into_iter()
        .map(|summary| summary.name)
        .collect();
    assert_eq!(names, strings(&["Socks", "Jeans", "Hoodies"]));

    let latest = service.list_latest(2).await?;
    assert_eq!(latest.len(), 2);
    assert_eq!(latest[0].name, "Socks");
    assert_eq!(latest[0].column_count, 3);
    assert_eq!(latest[0].row_count, 3);

    Ok(())
}
