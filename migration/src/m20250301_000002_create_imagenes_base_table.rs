use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `imagenes_base` gallery table and its columns.
#[derive(DeriveIden)]
enum ImagenesBase {
    Table,
    IdImagen,
    Nombre,
    ImagenData,
    TipoContenido,
    Categoria,
    FechaCreacion,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ImagenesBase::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ImagenesBase::IdImagen)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ImagenesBase::Nombre).string_len(255).not_null())
                    .col(ColumnDef::new(ImagenesBase::ImagenData).blob().not_null())
                    .col(
                        ColumnDef::new(ImagenesBase::TipoContenido)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ImagenesBase::Categoria).string_len(100).null())
                    .col(
                        ColumnDef::new(ImagenesBase::FechaCreacion)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ImagenesBase::Table).to_owned())
            .await
    }
}
