use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, web};
use sea_orm::{DatabaseConnection, DbErr};

use crate::admin::preview::preview_imagen;
use crate::admin::rows::ImagenCasaRow;
use crate::db::casas as casa_db;
use crate::db::imagenes_base as imagen_db;
use crate::db::imagenes_casa as imagen_casa_db;
use crate::error::{AdminError, is_foreign_key_violation};
use crate::models::imagenes_casa::{ImagenCasaForm, ImagenCasaFormInput, ImagenCasaListQuery};
use crate::validation::{FieldErrors, INVALID_CHOICE};

/// Field checks plus existence of the referenced property and image.
async fn check_form(
    db: &DatabaseConnection,
    input: ImagenCasaFormInput,
) -> Result<ImagenCasaForm, AdminError> {
    let (form, mut errors) = input.read();
    // Without a readable `casa` there is nothing to look up.
    if errors.get("casa").is_none() {
        errors.extend(missing_references(db, &form).await?);
    }
    errors.into_result()?;
    Ok(form)
}

/// Existence of the referenced property and image.
async fn missing_references(db: &DatabaseConnection, form: &ImagenCasaForm) -> Result<FieldErrors, DbErr> {
    let mut errors = FieldErrors::default();

    if casa_db::get_casa_by_id(db, form.casa).await?.is_none() {
        errors.add("casa", INVALID_CHOICE);
    }
    if let Some(imagen) = form.imagen_base {
        if imagen_db::existing_ids(db, &[imagen]).await?.is_empty() {
            errors.add("imagen_base", INVALID_CHOICE);
        }
    }

    Ok(errors)
}

/// Turns a write that lost a race with a delete into the field error the
/// checks would now report.
async fn write_error(db: &DatabaseConnection, form: &ImagenCasaForm, e: DbErr) -> AdminError {
    if is_foreign_key_violation(&e) {
        match missing_references(db, form).await {
            Ok(errors) if !errors.is_empty() => return errors.into(),
            Ok(_) => {}
            Err(recheck) => return recheck.into(),
        }
    }
    e.into()
}

async fn load_row(db: &DatabaseConnection, id: i32) -> Result<ImagenCasaRow, AdminError> {
    imagen_casa_db::get_detalle_by_id(db, id)
        .await?
        .map(ImagenCasaRow::from)
        .ok_or_else(|| AdminError::NotFound(format!("Imagen de casa {id}")))
}

/// GET /admin/imagenes-casa: link list view.
pub async fn get_imagenes_casa(
    db: web::Data<DatabaseConnection>,
    query: web::Query<ImagenCasaListQuery>,
) -> Result<HttpResponse, AdminError> {
    let page = imagen_casa_db::list_imagenes_casa(db.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(page.map(ImagenCasaRow::from)))
}

/// GET /admin/imagenes-casa/{id}: a single link with its preview.
pub async fn get_imagen_casa(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AdminError> {
    let row = load_row(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(row))
}

/// GET /admin/imagenes-casa/{id}/preview: HTML preview fragment.
pub async fn preview_imagen_casa(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AdminError> {
    let id = path.into_inner();
    let detalle = imagen_casa_db::get_detalle_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| AdminError::NotFound(format!("Imagen de casa {id}")))?;
    let markup = preview_imagen(detalle.image_src().as_deref());
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(markup.into_string()))
}

/// POST /admin/imagenes-casa: link a gallery image to a property.
pub async fn create_imagen_casa(
    db: web::Data<DatabaseConnection>,
    body: web::Json<ImagenCasaFormInput>,
) -> Result<HttpResponse, AdminError> {
    let form = check_form(db.get_ref(), body.into_inner()).await?;

    let link = match imagen_casa_db::insert_imagen_casa(db.get_ref(), form.clone()).await {
        Ok(link) => link,
        Err(e) => return Err(write_error(db.get_ref(), &form, e).await),
    };
    tracing::info!(
        id_imagen_casa = link.id_imagen_casa,
        casa_id = link.casa_id,
        imagen_base_id = ?link.imagen_base_id,
        "imagen de casa created"
    );
    Ok(HttpResponse::Created().json(load_row(db.get_ref(), link.id_imagen_casa).await?))
}

/// PUT /admin/imagenes-casa/{id}: update a link.
pub async fn update_imagen_casa(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<ImagenCasaFormInput>,
) -> Result<HttpResponse, AdminError> {
    let id = path.into_inner();

    if imagen_casa_db::get_imagen_casa_by_id(db.get_ref(), id).await?.is_none() {
        return Err(AdminError::NotFound(format!("Imagen de casa {id}")));
    }
    let form = check_form(db.get_ref(), body.into_inner()).await?;

    if let Err(e) = imagen_casa_db::update_imagen_casa(db.get_ref(), id, form.clone()).await {
        return Err(write_error(db.get_ref(), &form, e).await);
    }
    Ok(HttpResponse::Ok().json(load_row(db.get_ref(), id).await?))
}

/// DELETE /admin/imagenes-casa/{id}: delete a link.
pub async fn delete_imagen_casa(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AdminError> {
    let id = path.into_inner();
    let result = imagen_casa_db::delete_imagen_casa(db.get_ref(), id).await?;
    if result.rows_affected == 0 {
        return Err(AdminError::NotFound(format!("Imagen de casa {id}")));
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Imagen de casa {id} deleted"),
    })))
}
