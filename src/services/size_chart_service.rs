use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::database::entities::{products, size_charts};
use crate::errors::{CoreError, CoreResult};
use crate::services::{normalize_product_id, normalize_product_ids, ValidationService};

const ENTITY: &str = "SizeChart";

/// A size chart with its table and linked products
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SizeChart {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Global ids of the linked products, sorted
    pub product_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing projection without the table body
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SizeChartSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub column_count: usize,
    pub row_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted by create and update.
///
/// `product_ids: None` on update leaves the current links alone; `Some` replaces
/// them entirely (an empty list unlinks everything).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SizeChartInput {
    pub name: String,
    pub description: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub product_ids: Option<Vec<String>>,
}

struct ValidatedChart {
    name: String,
    description: Option<String>,
    columns_json: String,
    rows_json: String,
    product_ids: Option<Vec<String>>,
}

impl SizeChartInput {
    /// Run every write-time check and canonicalize product ids.
    pub fn validate(&self) -> CoreResult<()> {
        self.clone().into_validated().map(|_| ())
    }

    fn into_validated(self) -> CoreResult<ValidatedChart> {
        let name = ValidationService::validate_chart_name(&self.name)?;
        ValidationService::validate_chart_grid(&self.columns, &self.rows)?;

        let product_ids = self
            .product_ids
            .as_deref()
            .map(normalize_product_ids)
            .transpose()?;

        let columns_json = serde_json::to_string(&self.columns)
            .map_err(|e| CoreError::internal("Failed to encode columns").with_source(e))?;
        let rows_json = serde_json::to_string(&self.rows)
            .map_err(|e| CoreError::internal("Failed to encode rows").with_source(e))?;

        Ok(ValidatedChart {
            name,
            description: ValidationService::normalize_description(self.description.as_deref()),
            columns_json,
            rows_json,
            product_ids,
        })
    }
}

fn decode_columns(model: &size_charts::Model) -> CoreResult<Vec<String>> {
    serde_json::from_str(&model.columns).map_err(|e| {
        CoreError::internal(format!("Stored columns of size chart {} are corrupt", model.id))
            .with_source(e)
    })
}

fn decode_rows(model: &size_charts::Model) -> CoreResult<Vec<Vec<String>>> {
    serde_json::from_str(&model.rows).map_err(|e| {
        CoreError::internal(format!("Stored rows of size chart {} are corrupt", model.id))
            .with_source(e)
    })
}

impl SizeChartSummary {
    fn from_model(model: size_charts::Model) -> CoreResult<Self> {
        let column_count = decode_columns(&model)?.len();
        let row_count = decode_rows(&model)?.len();

        Ok(Self {
            id: model.id,
            name: model.name,
            description: model.description,
            column_count,
            row_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Repository for size charts and their product links
#[derive(Clone)]
pub struct SizeChartService {
    db: DatabaseConnection,
}

impl SizeChartService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a chart and connect-or-create its products in one transaction
    pub async fn create(&self, input: SizeChartInput) -> CoreResult<SizeChart> {
        let validated = input.into_validated()?;
        let now = Utc::now();

        let txn = self.db.begin().await?;

        let chart = size_charts::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(validated.name),
            description: Set(validated.description),
            columns: Set(validated.columns_json),
            rows: Set(validated.rows_json),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        if let Some(product_ids) = &validated.product_ids {
            link_products(&txn, &chart.id, product_ids, now).await?;
        }

        let chart = load_chart(&txn, chart).await?;
        txn.commit().await?;

        info!(
            chart_id = %chart.id,
            products = chart.product_ids.len(),
            "Created size chart"
        );
        Ok(chart)
    }

    pub async fn get_by_id(&self, id: &str) -> CoreResult<SizeChart> {
        let model = size_charts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found(ENTITY, id))?;

        load_chart(&self.db, model).await
    }

    /// All charts, newest first
    pub async fn list_all(&self) -> CoreResult<Vec<SizeChartSummary>> {
        let models = size_charts::Entity::find()
            .order_by_desc(size_charts::Column::CreatedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(SizeChartSummary::from_model).collect()
    }

    /// The `limit` newest charts
    pub async fn list_latest(&self, limit: u64) -> CoreResult<Vec<SizeChartSummary>> {
        let models = size_charts::Entity::find()
            .order_by_desc(size_charts::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;

        models.into_iter().map(SizeChartSummary::from_model).collect()
    }

    pub async fn count(&self) -> CoreResult<u64> {
        Ok(size_charts::Entity::find().count(&self.db).await?)
    }

    /// Replace a chart's fields, and its product links when `product_ids` is given
    pub async fn update(&self, id: &str, input: SizeChartInput) -> CoreResult<SizeChart> {
        let validated = input.into_validated()?;
        let now = Utc::now();

        let txn = self.db.begin().await?;

        let existing = size_charts::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| CoreError::not_found(ENTITY, id))?;

        let mut chart: size_charts::ActiveModel = existing.into();
        chart.name = Set(validated.name);
        chart.description = Set(validated.description);
        chart.columns = Set(validated.columns_json);
        chart.rows = Set(validated.rows_json);
        chart.updated_at = Set(now);
        let chart = chart.update(&txn).await?;

        if let Some(product_ids) = &validated.product_ids {
            unlink_products(&txn, &chart.id).await?;
            link_products(&txn, &chart.id, product_ids, now).await?;
        }

        let chart = load_chart(&txn, chart).await?;
        txn.commit().await?;

        info!(
            chart_id = %chart.id,
            products = chart.product_ids.len(),
            "Updated size chart"
        );
        Ok(chart)
    }

    /// Delete a chart; its products stay but lose their link
    pub async fn delete(&self, id: &str) -> CoreResult<()> {
        let txn = self.db.begin().await?;

        let existing = size_charts::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| CoreError::not_found(ENTITY, id))?;

        unlink_products(&txn, &existing.id).await?;
        size_charts::Entity::delete_by_id(existing.id.clone())
            .exec(&txn)
            .await?;

        txn.commit().await?;

        info!(chart_id = %existing.id, "Deleted size chart");
        Ok(())
    }

    /// Resolve the chart linked to a product. Accepts numeric or global ids.
    pub async fn find_chart_for_product(&self, product_id: &str) -> CoreResult<Option<SizeChart>> {
        let gid = normalize_product_id(product_id)?;

        let Some(product) = products::Entity::find_by_id(gid.as_str())
            .one(&self.db)
            .await?
        else {
            debug!(product_id = %gid, "No product record");
            return Ok(None);
        };

        let Some(chart_id) = product.size_chart_id else {
            debug!(product_id = %gid, "Product has no size chart");
            return Ok(None);
        };

        match size_charts::Entity::find_by_id(chart_id).one(&self.db).await? {
            Some(model) => Ok(Some(load_chart(&self.db, model).await?)),
            None => Ok(None),
        }
    }
}

async fn load_chart<C: ConnectionTrait>(conn: &C, model: size_charts::Model) -> CoreResult<SizeChart> {
    let product_ids = products::Entity::find()
        .filter(products::Column::SizeChartId.eq(model.id.as_str()))
        .order_by_asc(products::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(|product| product.id)
        .collect();

    let columns = decode_columns(&model)?;
    let rows = decode_rows(&model)?;

    Ok(SizeChart {
        id: model.id,
        name: model.name,
        description: model.description,
        columns,
        rows,
        product_ids,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

/// Connect-or-create: missing product rows are inserted, existing ones are
/// re-pointed at the chart (moving them off any previous chart).
async fn link_products<C: ConnectionTrait>(
    conn: &C,
    chart_id: &str,
    product_ids: &[String],
    now: DateTime<Utc>,
) -> CoreResult<()> {
    for product_id in product_ids {
        match products::Entity::find_by_id(product_id.as_str()).one(conn).await? {
            Some(existing) => {
                let mut product: products::ActiveModel = existing.into();
                product.size_chart_id = Set(Some(chart_id.to_string()));
                product.update(conn).await?;
            }
            None => {
                products::ActiveModel {
                    id: Set(product_id.clone()),
                    size_chart_id: Set(Some(chart_id.to_string())),
                    created_at: Set(now),
                }
                .insert(conn)
                .await?;
            }
        }
    }

    Ok(())
}

async fn unlink_products<C: ConnectionTrait>(conn: &C, chart_id: &str) -> CoreResult<()> {
    products::Entity::update_many()
        .col_expr(products::Column::SizeChartId, Expr::value(Option::<String>::None))
        .filter(products::Column::SizeChartId.eq(chart_id))
        .exec(conn)
        .await?;

    Ok(())
}
