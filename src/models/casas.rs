use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::imagenes_casa::InlineImagenCasa;
use crate::validation::FieldErrors;

/// Listing status stored as the lowercase Spanish label.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum Estatus {
    #[default]
    #[sea_orm(string_value = "en venta")]
    #[serde(rename = "en venta")]
    EnVenta,
    #[sea_orm(string_value = "vendida")]
    #[serde(rename = "vendida")]
    Vendida,
}

/// SeaORM entity for the `casas` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "casas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id_casa: i32,
    pub titulo: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub descripcion: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub precio: Decimal,
    pub direccion: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((10, 8)))", nullable)]
    pub latitud: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((11, 8)))", nullable)]
    pub longitud: Option<Decimal>,
    pub estatus: Estatus,
    pub habitaciones: Option<i32>,
    pub banos: Option<i32>,
    pub superficie_m2: Option<i32>,
    pub fecha_publicacion: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::imagenes_casa::Entity")]
    Imagenes,
}

impl Related<super::imagenes_casa::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Imagenes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.titulo)
    }
}

// ── DTOs ──

/// Change form for a property, used for both create and update.
///
/// `imagenes` is the inline table of gallery links edited together with the
/// property; rows are applied in the same transaction as the property itself.
#[derive(Debug, Clone)]
pub struct CasaForm {
    pub titulo: String,
    pub descripcion: Option<String>,
    pub precio: Decimal,
    pub direccion: Option<String>,
    pub latitud: Option<Decimal>,
    pub longitud: Option<Decimal>,
    pub estatus: Option<Estatus>,
    pub habitaciones: Option<i32>,
    pub banos: Option<i32>,
    pub superficie_m2: Option<i32>,
    pub imagenes: Vec<InlineImagenCasa>,
}

/// The property change form as submitted, before any field is interpreted.
///
/// Every key is optional and untyped so that a missing, malformed or unknown
/// value becomes a message on that field instead of a rejected body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CasaFormInput {
    pub titulo: Option<serde_json::Value>,
    pub descripcion: Option<serde_json::Value>,
    pub precio: Option<serde_json::Value>,
    pub direccion: Option<serde_json::Value>,
    pub latitud: Option<serde_json::Value>,
    pub longitud: Option<serde_json::Value>,
    pub estatus: Option<serde_json::Value>,
    pub habitaciones: Option<serde_json::Value>,
    pub banos: Option<serde_json::Value>,
    pub superficie_m2: Option<serde_json::Value>,
    pub imagenes: Option<serde_json::Value>,
}

impl CasaFormInput {
    /// Interprets every field and runs the form checks.
    pub fn parse(self) -> Result<CasaForm, FieldErrors> {
        let (form, errors) = self.read();
        errors.into_result().map(|()| form)
    }

    /// Like [`parse`](Self::parse), but hands back the best-effort form
    /// together with every field message so more checks can be added.
    pub fn read(self) -> (CasaForm, FieldErrors) {
        let mut errors = FieldErrors::default();

        let titulo = errors.parse_text("titulo", self.titulo).unwrap_or_default();
        let precio = errors.parse_decimal("precio", self.precio);
        let precio = errors.require("precio", precio);

        let form = CasaForm {
            titulo,
            descripcion: errors.parse_text("descripcion", self.descripcion),
            precio: precio.unwrap_or_default(),
            direccion: errors.parse_text("direccion", self.direccion),
            latitud: errors.parse_decimal("latitud", self.latitud),
            longitud: errors.parse_decimal("longitud", self.longitud),
            estatus: errors.parse_choice("estatus", self.estatus),
            habitaciones: errors.parse_integer("habitaciones", self.habitaciones),
            banos: errors.parse_integer("banos", self.banos),
            superficie_m2: errors.parse_integer("superficie_m2", self.superficie_m2),
            imagenes: InlineImagenCasa::parse_rows(&mut errors, self.imagenes),
        };

        if let Err(form_errors) = form.validate() {
            errors.extend(form_errors);
        }
        (form, errors)
    }
}

impl CasaForm {
    /// Field-level checks mirroring the column constraints.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        errors.required_text("titulo", &self.titulo);
        errors.max_chars("titulo", &self.titulo, 255);
        if let Some(direccion) = &self.direccion {
            errors.max_chars("direccion", direccion, 255);
        }
        errors.decimal("precio", &self.precio, 10, 2);
        if let Some(latitud) = &self.latitud {
            errors.decimal("latitud", latitud, 10, 8);
        }
        if let Some(longitud) = &self.longitud {
            errors.decimal("longitud", longitud, 11, 8);
        }

        for (i, row) in self.imagenes.iter().enumerate() {
            if let Some(texto) = &row.texto_alternativo {
                errors.max_chars(&format!("imagenes.{i}.texto_alternativo"), texto, 100);
            }
        }

        errors.into_result()
    }
}

/// Query parameters accepted by the property list view.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CasaListQuery {
    pub q: Option<String>,
    pub estatus: Option<Estatus>,
    pub precio: Option<Decimal>,
    pub fecha_publicacion: Option<crate::admin::list::DateRange>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Row of the property list view.
#[derive(Debug, Clone, Serialize)]
pub struct CasaRow {
    pub id_casa: i32,
    pub titulo: String,
    pub precio: Decimal,
    pub estatus: Estatus,
    pub habitaciones: Option<i32>,
    pub banos: Option<i32>,
    pub fecha_publicacion: DateTimeUtc,
}

impl From<Model> for CasaRow {
    fn from(m: Model) -> Self {
        Self {
            id_casa: m.id_casa,
            titulo: m.titulo,
            precio: m.precio,
            estatus: m.estatus,
            habitaciones: m.habitaciones,
            banos: m.banos,
            fecha_publicacion: m.fecha_publicacion,
        }
    }
}
