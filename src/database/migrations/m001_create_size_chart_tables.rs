use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SizeCharts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SizeCharts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SizeCharts::Name).string().not_null())
                    .col(ColumnDef::new(SizeCharts::Description).text())
                    .col(ColumnDef::new(SizeCharts::Columns).text().not_null())
                    .col(ColumnDef::new(SizeCharts::Rows).text().not_null())
                    .col(
                        ColumnDef::new(SizeCharts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SizeCharts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Products::SizeChartId).string())
                    .col(
                        ColumnDef::new(Products::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-products-size_chart_id")
                            .from(Products::Table, Products::SizeChartId)
                            .to(SizeCharts::Table, SizeCharts::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-size_charts-created_at")
                    .table(SizeCharts::Table)
                    .col(SizeCharts::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-products-size_chart_id")
                    .table(Products::Table)
                    .col(Products::SizeChartId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SizeCharts::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum SizeCharts {
    Table,
    Id,
    Name,
    Description,
    Columns,
    Rows,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
    SizeChartId,
    CreatedAt,
}
