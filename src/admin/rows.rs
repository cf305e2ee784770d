use sea_orm::prelude::DateTimeUtc;
use serde::Serialize;

use crate::admin::preview::preview_imagen;
use crate::models::{casas, imagenes_base, imagenes_casa::ImagenCasaDetalle};

/// Row of the gallery list view.
#[derive(Debug, Clone, Serialize)]
pub struct ImagenBaseRow {
    pub id_imagen: i32,
    pub nombre: String,
    pub categoria: Option<String>,
    pub tipo_contenido: String,
    pub fecha_creacion: DateTimeUtc,
    pub preview_imagen: String,
}

impl From<imagenes_base::Model> for ImagenBaseRow {
    fn from(m: imagenes_base::Model) -> Self {
        let preview = preview_imagen(m.image_src().as_deref()).into_string();
        Self {
            id_imagen: m.id_imagen,
            nombre: m.nombre,
            categoria: m.categoria,
            tipo_contenido: m.tipo_contenido,
            fecha_creacion: m.fecha_creacion,
            preview_imagen: preview,
        }
    }
}

/// Row of the link list view and of the inline table on a property.
#[derive(Debug, Clone, Serialize)]
pub struct ImagenCasaRow {
    pub id_imagen_casa: i32,
    pub casa_id: i32,
    pub casa: String,
    pub imagen_base_id: Option<i32>,
    pub imagen_base: Option<String>,
    pub texto_alternativo: Option<String>,
    pub orden: i32,
    pub display: String,
    pub preview_imagen: String,
}

impl From<ImagenCasaDetalle> for ImagenCasaRow {
    fn from(d: ImagenCasaDetalle) -> Self {
        let display = d.to_string();
        let preview = preview_imagen(d.image_src().as_deref()).into_string();
        Self {
            id_imagen_casa: d.enlace.id_imagen_casa,
            casa_id: d.enlace.casa_id,
            casa: d.casa.to_string(),
            imagen_base_id: d.enlace.imagen_base_id,
            imagen_base: d.imagen_base.map(|img| img.nombre),
            texto_alternativo: d.enlace.texto_alternativo,
            orden: d.enlace.orden,
            display,
            preview_imagen: preview,
        }
    }
}

/// Property change view: the record plus its ordered inline image rows.
#[derive(Debug, Clone, Serialize)]
pub struct CasaDetalle {
    #[serde(flatten)]
    pub casa: casas::Model,
    pub imagenes: Vec<ImagenCasaRow>,
}
