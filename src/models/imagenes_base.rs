use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validation::{FieldErrors, non_blank};

/// SeaORM entity for the `imagenes_base` table: the shared image gallery.
///
/// The image bytes live in the row itself and are loaded eagerly with it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "imagenes_base")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id_imagen: i32,
    pub nombre: String,
    #[sea_orm(column_type = "Blob")]
    #[serde(skip)]
    pub imagen_data: Vec<u8>,
    pub tipo_contenido: String,
    pub categoria: Option<String>,
    pub fecha_creacion: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::imagenes_casa::Entity")]
    ImagenesCasa,
}

impl Related<super::imagenes_casa::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ImagenesCasa.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Builds a `data:` URI for direct use as an `<img src>`.
    ///
    /// Returns `None` when either the payload or its content type is empty.
    /// The encoding is redone on every call.
    pub fn image_src(&self) -> Option<String> {
        data_uri(&self.tipo_contenido, &self.imagen_data)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.nombre)
    }
}

/// `data:<content_type>;base64,<payload>`, or `None` if either part is empty.
pub fn data_uri(content_type: &str, payload: &[u8]) -> Option<String> {
    if payload.is_empty() || content_type.is_empty() {
        return None;
    }
    Some(format!(
        "data:{content_type};base64,{}",
        STANDARD.encode(payload)
    ))
}

// ── DTOs ──

/// A file received through the gallery upload form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Gallery upload form: a mandatory image file plus optional name and category.
#[derive(Debug, Clone, Default)]
pub struct ImagenBaseForm {
    pub archivo_imagen: Option<UploadedFile>,
    pub nombre: Option<String>,
    pub categoria: Option<String>,
}

impl ImagenBaseForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        match &self.archivo_imagen {
            None => errors.add("archivo_imagen", "This field is required."),
            Some(file) if file.bytes.is_empty() => {
                errors.add("archivo_imagen", "The submitted file is empty.")
            }
            Some(file) if !file.content_type.starts_with("image/") => errors.add(
                "archivo_imagen",
                "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
            ),
            Some(file) => errors.max_chars("archivo_imagen", &file.content_type, 100),
        }

        let nombre = self.resolved_nombre().unwrap_or_default();
        if nombre.is_empty() {
            errors.add("nombre", "This field is required.");
        }
        errors.max_chars("nombre", &nombre, 255);
        if let Some(categoria) = &self.categoria {
            errors.max_chars("categoria", categoria, 100);
        }

        errors.into_result()
    }

    /// The display name to store: the typed name, else the uploaded file name.
    pub fn resolved_nombre(&self) -> Option<String> {
        self.nombre
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .or_else(|| self.archivo_imagen.as_ref().map(|f| f.filename.clone()))
    }

    /// Category with blank input treated as absent.
    pub fn categoria(&self) -> Option<String> {
        non_blank(self.categoria.clone())
    }
}

/// Query parameters accepted by the gallery list view.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagenBaseListQuery {
    pub q: Option<String>,
    pub categoria: Option<String>,
    pub fecha_creacion: Option<crate::admin::list::DateRange>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}
