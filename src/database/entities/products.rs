use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A storefront product known to the app. Rows are created lazily the first
/// time a product is linked to a chart and survive the chart's deletion.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String, // gid://shopify/Product/<n>
    pub size_chart_id: Option<String>,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::size_charts::Entity",
        from = "Column::SizeChartId",
        to = "super::size_charts::Column::Id",
        on_delete = "SetNull"
    )]
    SizeCharts,
}

impl Related<super::size_charts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SizeCharts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
