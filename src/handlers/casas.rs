use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::admin::list::{AutocompleteMore, AutocompleteOption, AutocompleteQuery, AutocompleteResponse};
use crate::admin::rows::{CasaDetalle, ImagenCasaRow};
use crate::db::casas as casa_db;
use crate::db::imagenes_casa as imagen_casa_db;
use crate::error::{AdminError, is_foreign_key_violation};
use crate::models::casas::{self, CasaForm, CasaFormInput, CasaListQuery, CasaRow};

/// Change view payload: the property plus its inline rows in `orden` order.
async fn detalle(db: &DatabaseConnection, casa: casas::Model) -> Result<CasaDetalle, AdminError> {
    let imagenes = imagen_casa_db::list_by_casa(db, casa.id_casa)
        .await?
        .into_iter()
        .map(ImagenCasaRow::from)
        .collect();
    Ok(CasaDetalle { casa, imagenes })
}

/// Field checks plus the database-backed checks of the inline rows,
/// reported together.
async fn check_form(
    db: &DatabaseConnection,
    casa_id: Option<i32>,
    input: CasaFormInput,
) -> Result<CasaForm, AdminError> {
    let (form, mut errors) = input.read();
    errors.extend(casa_db::check_inline_rows(db, casa_id, &form.imagenes).await?);
    errors.into_result()?;
    Ok(form)
}

/// Turns a write that lost a race with a delete into the field error the
/// checks would now report.
async fn write_error(
    db: &DatabaseConnection,
    casa_id: Option<i32>,
    form: &CasaForm,
    e: sea_orm::DbErr,
) -> AdminError {
    if is_foreign_key_violation(&e) {
        match casa_db::check_inline_rows(db, casa_id, &form.imagenes).await {
            Ok(errors) if !errors.is_empty() => return errors.into(),
            Ok(_) => {}
            Err(recheck) => return recheck.into(),
        }
    }
    e.into()
}

/// GET /admin/casas: property list view.
pub async fn get_casas(
    db: web::Data<DatabaseConnection>,
    query: web::Query<CasaListQuery>,
) -> Result<HttpResponse, AdminError> {
    let page = casa_db::list_casas(db.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(page.map(CasaRow::from)))
}

/// GET /admin/casas/{id}: property change view.
pub async fn get_casa(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AdminError> {
    let id = path.into_inner();
    let casa = casa_db::get_casa_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| AdminError::NotFound(format!("Casa {id}")))?;
    Ok(HttpResponse::Ok().json(detalle(db.get_ref(), casa).await?))
}

/// GET /admin/casas/autocomplete: property picker.
pub async fn autocomplete_casas(
    db: web::Data<DatabaseConnection>,
    query: web::Query<AutocompleteQuery>,
) -> Result<HttpResponse, AdminError> {
    let (found, more) = casa_db::autocomplete_casas(db.get_ref(), query.term.as_deref()).await?;
    Ok(HttpResponse::Ok().json(AutocompleteResponse {
        results: found
            .into_iter()
            .map(|casa| AutocompleteOption {
                id: casa.id_casa,
                text: casa.to_string(),
            })
            .collect(),
        pagination: AutocompleteMore { more },
    }))
}

/// POST /admin/casas: create a property with its inline image rows.
pub async fn create_casa(
    db: web::Data<DatabaseConnection>,
    body: web::Json<CasaFormInput>,
) -> Result<HttpResponse, AdminError> {
    let form = check_form(db.get_ref(), None, body.into_inner()).await?;

    let casa = match casa_db::insert_casa(db.get_ref(), form.clone()).await {
        Ok(casa) => casa,
        Err(e) => return Err(write_error(db.get_ref(), None, &form, e).await),
    };
    tracing::info!(id_casa = casa.id_casa, titulo = %casa.titulo, "casa created");
    Ok(HttpResponse::Created().json(detalle(db.get_ref(), casa).await?))
}

/// PUT /admin/casas/{id}: update a property and its inline image rows.
pub async fn update_casa(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<CasaFormInput>,
) -> Result<HttpResponse, AdminError> {
    let id = path.into_inner();

    if casa_db::get_casa_by_id(db.get_ref(), id).await?.is_none() {
        return Err(AdminError::NotFound(format!("Casa {id}")));
    }
    let form = check_form(db.get_ref(), Some(id), body.into_inner()).await?;

    let casa = match casa_db::update_casa(db.get_ref(), id, form.clone()).await {
        Ok(casa) => casa,
        Err(e) => return Err(write_error(db.get_ref(), Some(id), &form, e).await),
    };
    tracing::info!(id_casa = id, "casa updated");
    Ok(HttpResponse::Ok().json(detalle(db.get_ref(), casa).await?))
}

/// DELETE /admin/casas/{id}: delete a property and all of its image links.
pub async fn delete_casa(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AdminError> {
    let id = path.into_inner();
    let result = casa_db::delete_casa(db.get_ref(), id).await?;
    if result.rows_affected == 0 {
        return Err(AdminError::NotFound(format!("Casa {id}")));
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Casa {id} deleted"),
    })))
}
