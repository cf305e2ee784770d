use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validation::FieldErrors;

/// SeaORM entity for the `imagenes_casa` table: an ordered link between a
/// property and a gallery image.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "imagenes_casa")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id_imagen_casa: i32,
    pub casa_id: i32,
    /// Still nullable until every legacy row points at a gallery image.
    pub imagen_base_id: Option<i32>,
    pub texto_alternativo: Option<String>,
    pub orden: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::casas::Entity",
        from = "Column::CasaId",
        to = "super::casas::Column::IdCasa",
        on_delete = "Cascade"
    )]
    Casa,
    #[sea_orm(
        belongs_to = "super::imagenes_base::Entity",
        from = "Column::ImagenBaseId",
        to = "super::imagenes_base::Column::IdImagen",
        on_delete = "Cascade"
    )]
    ImagenBase,
}

impl Related<super::casas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Casa.def()
    }
}

impl Related<super::imagenes_base::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ImagenBase.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A link loaded together with both of its parents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImagenCasaDetalle {
    pub enlace: Model,
    pub casa: super::casas::Model,
    pub imagen_base: Option<super::imagenes_base::Model>,
}

impl ImagenCasaDetalle {
    /// The linked gallery image's `data:` URI, if there is a linked image.
    pub fn image_src(&self) -> Option<String> {
        self.imagen_base.as_ref().and_then(|img| img.image_src())
    }
}

impl fmt::Display for ImagenCasaDetalle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.imagen_base {
            Some(img) => write!(f, "Imagen de {} - {}", self.casa.titulo, img.nombre),
            None => write!(f, "Imagen de {} (Sin imagen base)", self.casa.titulo),
        }
    }
}

// ── DTOs ──

/// One row of the inline image table on the property change form.
///
/// Rows with an `id_imagen_casa` edit an existing link of that property; rows
/// without one create a new link. `delete` removes an existing link.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InlineImagenCasa {
    pub id_imagen_casa: Option<i32>,
    pub imagen_base: Option<i32>,
    pub texto_alternativo: Option<String>,
    #[serde(default)]
    pub orden: i32,
    #[serde(default)]
    pub delete: bool,
}

impl InlineImagenCasa {
    /// Reads the submitted inline table; field messages are keyed
    /// `imagenes.<row>.<field>`.
    pub fn parse_rows(errors: &mut FieldErrors, raw: Option<serde_json::Value>) -> Vec<InlineImagenCasa> {
        let rows = match raw {
            None | Some(serde_json::Value::Null) => return Vec::new(),
            Some(serde_json::Value::Array(rows)) => rows,
            Some(_) => {
                errors.add("imagenes", "Enter a list of values.");
                return Vec::new();
            }
        };

        rows.into_iter()
            .enumerate()
            .filter_map(|(i, row)| {
                let serde_json::Value::Object(mut row) = row else {
                    errors.add(&format!("imagenes.{i}"), "Enter a valid value.");
                    return None;
                };
                let key = |field: &str| format!("imagenes.{i}.{field}");
                Some(InlineImagenCasa {
                    id_imagen_casa: errors
                        .parse_integer(&key("id_imagen_casa"), row.remove("id_imagen_casa")),
                    imagen_base: errors.parse_integer(&key("imagen_base"), row.remove("imagen_base")),
                    texto_alternativo: errors
                        .parse_text(&key("texto_alternativo"), row.remove("texto_alternativo")),
                    orden: errors
                        .parse_integer(&key("orden"), row.remove("orden"))
                        .unwrap_or_default(),
                    delete: errors.parse_bool(&key("delete"), row.remove("delete")),
                })
            })
            .collect()
    }
}

/// Standalone change form for a link.
#[derive(Debug, Clone, Deserialize)]
pub struct ImagenCasaForm {
    pub casa: i32,
    pub imagen_base: Option<i32>,
    pub texto_alternativo: Option<String>,
    #[serde(default)]
    pub orden: i32,
}

impl ImagenCasaForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if let Some(texto) = &self.texto_alternativo {
            errors.max_chars("texto_alternativo", texto, 100);
        }
        errors.into_result()
    }
}

/// The standalone link form as submitted, before any field is interpreted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagenCasaFormInput {
    pub casa: Option<serde_json::Value>,
    pub imagen_base: Option<serde_json::Value>,
    pub texto_alternativo: Option<serde_json::Value>,
    pub orden: Option<serde_json::Value>,
}

impl ImagenCasaFormInput {
    pub fn parse(self) -> Result<ImagenCasaForm, FieldErrors> {
        let (form, errors) = self.read();
        errors.into_result().map(|()| form)
    }

    /// The best-effort form together with every field message.
    pub fn read(self) -> (ImagenCasaForm, FieldErrors) {
        let mut errors = FieldErrors::default();

        let casa = errors.parse_integer("casa", self.casa);
        let casa = errors.require("casa", casa);
        let form = ImagenCasaForm {
            casa: casa.unwrap_or_default(),
            imagen_base: errors.parse_integer("imagen_base", self.imagen_base),
            texto_alternativo: errors.parse_text("texto_alternativo", self.texto_alternativo),
            orden: errors.parse_integer("orden", self.orden).unwrap_or_default(),
        };

        if let Err(form_errors) = form.validate() {
            errors.extend(form_errors);
        }
        (form, errors)
    }
}

/// Query parameters accepted by the link list view.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagenCasaListQuery {
    pub q: Option<String>,
    pub casa: Option<i32>,
    pub categoria: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}
