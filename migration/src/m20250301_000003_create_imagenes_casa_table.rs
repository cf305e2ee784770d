use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `imagenes_casa` link table and its columns.
#[derive(DeriveIden)]
enum ImagenesCasa {
    Table,
    IdImagenCasa,
    CasaId,
    ImagenBaseId,
    TextoAlternativo,
    Orden,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum Casas {
    Table,
    IdCasa,
}

#[derive(DeriveIden)]
enum ImagenesBase {
    Table,
    IdImagen,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ImagenesCasa::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ImagenesCasa::IdImagenCasa)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ImagenesCasa::CasaId).integer().not_null())
                    // Nullable while existing rows are backfilled with a gallery image.
                    .col(ColumnDef::new(ImagenesCasa::ImagenBaseId).integer().null())
                    .col(
                        ColumnDef::new(ImagenesCasa::TextoAlternativo)
                            .string_len(100)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ImagenesCasa::Orden)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_imagenes_casa_casa_id")
                            .from(ImagenesCasa::Table, ImagenesCasa::CasaId)
                            .to(Casas::Table, Casas::IdCasa)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_imagenes_casa_imagen_base_id")
                            .from(ImagenesCasa::Table, ImagenesCasa::ImagenBaseId)
                            .to(ImagenesBase::Table, ImagenesBase::IdImagen)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ImagenesCasa::Table).to_owned())
            .await
    }
}
