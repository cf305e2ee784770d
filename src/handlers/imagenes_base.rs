use actix_multipart::{Field, Multipart};
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, web};
use futures_util::StreamExt;
use sea_orm::DatabaseConnection;

use crate::admin::list::{AutocompleteMore, AutocompleteOption, AutocompleteQuery, AutocompleteResponse};
use crate::admin::preview::preview_imagen;
use crate::admin::rows::ImagenBaseRow;
use crate::db::imagenes_base as imagen_db;
use crate::error::AdminError;
use crate::models::imagenes_base::{ImagenBaseForm, ImagenBaseListQuery, UploadedFile};

/// Upper bound for a single text part of the upload form.
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// Size cap for uploaded image files, shared through app data.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_bytes: usize,
}

/// GET /admin/imagenes-base: gallery list view.
pub async fn get_imagenes_base(
    db: web::Data<DatabaseConnection>,
    query: web::Query<ImagenBaseListQuery>,
) -> Result<HttpResponse, AdminError> {
    let page = imagen_db::list_imagenes_base(db.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(page.map(ImagenBaseRow::from)))
}

/// GET /admin/imagenes-base/{id}: a single gallery image with its preview.
pub async fn get_imagen_base(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AdminError> {
    let id = path.into_inner();
    let imagen = imagen_db::get_imagen_base_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| AdminError::NotFound(format!("Imagen {id}")))?;
    Ok(HttpResponse::Ok().json(ImagenBaseRow::from(imagen)))
}

/// GET /admin/imagenes-base/{id}/preview: HTML preview fragment.
pub async fn preview_imagen_base(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AdminError> {
    let id = path.into_inner();
    let imagen = imagen_db::get_imagen_base_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| AdminError::NotFound(format!("Imagen {id}")))?;
    let markup = preview_imagen(imagen.image_src().as_deref());
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(markup.into_string()))
}

/// GET /admin/imagenes-base/autocomplete: gallery picker.
pub async fn autocomplete_imagenes_base(
    db: web::Data<DatabaseConnection>,
    query: web::Query<AutocompleteQuery>,
) -> Result<HttpResponse, AdminError> {
    let (opciones, more) =
        imagen_db::autocomplete_imagenes_base(db.get_ref(), query.term.as_deref()).await?;
    Ok(HttpResponse::Ok().json(AutocompleteResponse {
        results: opciones
            .into_iter()
            .map(|o| AutocompleteOption {
                id: o.id_imagen,
                text: o.nombre,
            })
            .collect(),
        pagination: AutocompleteMore { more },
    }))
}

/// POST /admin/imagenes-base: upload a new gallery image (multipart).
pub async fn create_imagen_base(
    db: web::Data<DatabaseConnection>,
    limits: web::Data<UploadLimits>,
    payload: Multipart,
) -> Result<HttpResponse, AdminError> {
    let form = read_upload_form(payload, limits.max_bytes).await?;
    form.validate()?;

    let imagen = imagen_db::insert_imagen_base(db.get_ref(), form).await?;
    tracing::info!(
        id_imagen = imagen.id_imagen,
        nombre = %imagen.nombre,
        bytes = imagen.imagen_data.len(),
        "gallery image uploaded"
    );
    Ok(HttpResponse::Created().json(ImagenBaseRow::from(imagen)))
}

/// PUT /admin/imagenes-base/{id}: replace a gallery image (multipart).
///
/// The file is mandatory here too, exactly as on the upload form.
pub async fn update_imagen_base(
    db: web::Data<DatabaseConnection>,
    limits: web::Data<UploadLimits>,
    path: web::Path<i32>,
    payload: Multipart,
) -> Result<HttpResponse, AdminError> {
    let id = path.into_inner();
    let form = read_upload_form(payload, limits.max_bytes).await?;
    form.validate()?;

    let imagen = imagen_db::update_imagen_base(db.get_ref(), id, form).await?;
    tracing::info!(id_imagen = id, "gallery image replaced");
    Ok(HttpResponse::Ok().json(ImagenBaseRow::from(imagen)))
}

/// DELETE /admin/imagenes-base/{id}: delete a gallery image and its links.
pub async fn delete_imagen_base(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AdminError> {
    let id = path.into_inner();
    let result = imagen_db::delete_imagen_base(db.get_ref(), id).await?;
    if result.rows_affected == 0 {
        return Err(AdminError::NotFound(format!("Imagen {id}")));
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Imagen {id} deleted"),
    })))
}

/// Read the gallery upload form out of a multipart body.
///
/// A file part with neither a filename nor content is what browsers send
/// when no file was picked; it is treated as absent.
async fn read_upload_form(
    mut payload: Multipart,
    max_bytes: usize,
) -> Result<ImagenBaseForm, AdminError> {
    let mut form = ImagenBaseForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "archivo_imagen" => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or_default()
                    .to_string();
                let content_type = field
                    .content_type()
                    .map(|m| m.to_string())
                    .unwrap_or_default();
                let bytes = read_field(&mut field, "archivo_imagen", max_bytes).await?;

                if filename.is_empty() && bytes.is_empty() {
                    continue;
                }
                form.archivo_imagen = Some(UploadedFile {
                    filename,
                    content_type,
                    bytes,
                });
            }
            "nombre" => form.nombre = Some(read_text(&mut field, "nombre").await?),
            "categoria" => form.categoria = Some(read_text(&mut field, "categoria").await?),
            _ => {
                read_field(&mut field, &name, MAX_TEXT_FIELD_BYTES).await?;
            }
        }
    }

    Ok(form)
}

/// Read one multipart field into memory with a hard size limit.
async fn read_field(field: &mut Field, name: &str, max_bytes: usize) -> Result<Vec<u8>, AdminError> {
    let mut buf: Vec<u8> = Vec::new();
    while let Some(chunk) = field.next().await {
        let data = chunk?;
        if buf.len().saturating_add(data.len()) > max_bytes {
            return Err(AdminError::field(
                name,
                format!("File too large (max {max_bytes} bytes)."),
            ));
        }
        buf.extend_from_slice(&data);
    }
    Ok(buf)
}

async fn read_text(field: &mut Field, name: &str) -> Result<String, AdminError> {
    let bytes = read_field(field, name, MAX_TEXT_FIELD_BYTES).await?;
    String::from_utf8(bytes).map_err(|_| AdminError::field(name, "Enter valid UTF-8 text."))
}
