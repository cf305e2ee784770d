#![allow(dead_code)]

use sea_orm::prelude::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::str::FromStr;

use casas_admin::models::casas::CasaForm;
use casas_admin::models::imagenes_base::{ImagenBaseForm, UploadedFile};

/// Fresh in-memory SQLite database with every migration applied.
///
/// A single pooled connection keeps the in-memory database alive and shared.
pub async fn setup_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("Failed to open in-memory SQLite");
    casas_admin::run_migrations(&db)
        .await
        .expect("Failed to run migrations");
    db
}

pub fn casa_form(titulo: &str, precio: &str) -> CasaForm {
    CasaForm {
        titulo: titulo.to_string(),
        descripcion: None,
        precio: Decimal::from_str(precio).expect("valid decimal"),
        direccion: None,
        latitud: None,
        longitud: None,
        estatus: None,
        habitaciones: None,
        banos: None,
        superficie_m2: None,
        imagenes: Vec::new(),
    }
}

pub fn upload_form(
    filename: &str,
    content_type: &str,
    bytes: &[u8],
    nombre: Option<&str>,
    categoria: Option<&str>,
) -> ImagenBaseForm {
    ImagenBaseForm {
        archivo_imagen: Some(UploadedFile {
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            bytes: bytes.to_vec(),
        }),
        nombre: nombre.map(str::to_string),
        categoria: categoria.map(str::to_string),
    }
}

/// A few bytes that start like a JPEG file.
pub const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0\x00\x10JFIF\x00roof";
