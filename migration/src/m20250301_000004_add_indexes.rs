use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum ImagenesCasa {
    Table,
    CasaId,
    ImagenBaseId,
    Orden,
}

#[derive(DeriveIden)]
enum ImagenesBase {
    Table,
    Nombre,
    Categoria,
}

#[derive(DeriveIden)]
enum Casas {
    Table,
    Estatus,
    FechaPublicacion,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Index on imagenes_casa (casa_id, orden) for a property's ordered image list
        manager
            .create_index(
                Index::create()
                    .name("idx_imagenes_casa_casa_id_orden")
                    .table(ImagenesCasa::Table)
                    .col(ImagenesCasa::CasaId)
                    .col(ImagenesCasa::Orden)
                    .to_owned(),
            )
            .await?;

        // Index on imagenes_casa.imagen_base_id for the gallery-side cascade
        manager
            .create_index(
                Index::create()
                    .name("idx_imagenes_casa_imagen_base_id")
                    .table(ImagenesCasa::Table)
                    .col(ImagenesCasa::ImagenBaseId)
                    .to_owned(),
            )
            .await?;

        // Index on imagenes_base.nombre for the default gallery ordering
        manager
            .create_index(
                Index::create()
                    .name("idx_imagenes_base_nombre")
                    .table(ImagenesBase::Table)
                    .col(ImagenesBase::Nombre)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_imagenes_base_categoria")
                    .table(ImagenesBase::Table)
                    .col(ImagenesBase::Categoria)
                    .to_owned(),
            )
            .await?;

        // Index on casas (estatus, fecha_publicacion) for the list filters
        manager
            .create_index(
                Index::create()
                    .name("idx_casas_estatus_fecha_publicacion")
                    .table(Casas::Table)
                    .col(Casas::Estatus)
                    .col(Casas::FechaPublicacion)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_imagenes_casa_casa_id_orden")
                    .table(ImagenesCasa::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_imagenes_casa_imagen_base_id")
                    .table(ImagenesCasa::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_imagenes_base_nombre")
                    .table(ImagenesBase::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_imagenes_base_categoria")
                    .table(ImagenesBase::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_casas_estatus_fecha_publicacion")
                    .table(Casas::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
