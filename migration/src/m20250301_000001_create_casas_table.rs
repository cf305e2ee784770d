use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `casas` table and its columns.
#[derive(DeriveIden)]
enum Casas {
    Table,
    IdCasa,
    Titulo,
    Descripcion,
    Precio,
    Direccion,
    Latitud,
    Longitud,
    Estatus,
    Habitaciones,
    Banos,
    SuperficieM2,
    FechaPublicacion,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Casas::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Casas::IdCasa)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Casas::Titulo).string_len(255).not_null())
                    .col(ColumnDef::new(Casas::Descripcion).text().null())
                    .col(ColumnDef::new(Casas::Precio).decimal_len(10, 2).not_null())
                    .col(ColumnDef::new(Casas::Direccion).string_len(255).null())
                    .col(ColumnDef::new(Casas::Latitud).decimal_len(10, 8).null())
                    .col(ColumnDef::new(Casas::Longitud).decimal_len(11, 8).null())
                    .col(
                        ColumnDef::new(Casas::Estatus)
                            .string_len(10)
                            .not_null()
                            .default("en venta"),
                    )
                    .col(ColumnDef::new(Casas::Habitaciones).integer().null())
                    .col(ColumnDef::new(Casas::Banos).integer().null())
                    .col(ColumnDef::new(Casas::SuperficieM2).integer().null())
                    .col(
                        ColumnDef::new(Casas::FechaPublicacion)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Casas::Table).to_owned())
            .await
    }
}
