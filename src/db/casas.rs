use sea_orm::*;
use std::collections::HashSet;

use crate::admin::list::{AUTOCOMPLETE_PAGE_SIZE, Page, Pagination, search_condition};
use crate::db::imagenes_base as imagenes_base_db;
use crate::models::casas::{self, CasaForm, CasaListQuery};
use crate::models::imagenes_casa::{self, InlineImagenCasa};
use crate::validation::{FieldErrors, INVALID_CHOICE, non_blank};

#[derive(Debug, FromQueryResult)]
struct IdImagenCasa {
    id_imagen_casa: i32,
}

/// Copy the property fields of a change form onto an active model.
fn apply_form(active: &mut casas::ActiveModel, form: &CasaForm) {
    active.titulo = Set(form.titulo.trim().to_string());
    active.descripcion = Set(non_blank(form.descripcion.clone()));
    active.precio = Set(form.precio);
    active.direccion = Set(non_blank(form.direccion.clone()));
    active.latitud = Set(form.latitud);
    active.longitud = Set(form.longitud);
    active.estatus = Set(form.estatus.unwrap_or_default());
    active.habitaciones = Set(form.habitaciones);
    active.banos = Set(form.banos);
    active.superficie_m2 = Set(form.superficie_m2);
}

/// Check the inline image rows of a change form against the database.
///
/// Every picked gallery image must exist, and rows that edit an existing
/// link must name a link of this property (`casa_id` is `None` on create).
pub async fn check_inline_rows(
    db: &DatabaseConnection,
    casa_id: Option<i32>,
    rows: &[InlineImagenCasa],
) -> Result<FieldErrors, DbErr> {
    let picked: Vec<i32> = rows
        .iter()
        .filter(|row| !row.delete)
        .filter_map(|row| row.imagen_base)
        .collect();
    let known = imagenes_base_db::existing_ids(db, &picked).await?;

    let own: HashSet<i32> = match casa_id {
        Some(id) => imagenes_casa::Entity::find()
            .select_only()
            .column(imagenes_casa::Column::IdImagenCasa)
            .filter(imagenes_casa::Column::CasaId.eq(id))
            .into_model::<IdImagenCasa>()
            .all(db)
            .await?
            .into_iter()
            .map(|row| row.id_imagen_casa)
            .collect(),
        None => HashSet::new(),
    };

    let mut errors = FieldErrors::default();
    for (i, row) in rows.iter().enumerate() {
        if let Some(imagen) = row.imagen_base {
            if !row.delete && !known.contains(&imagen) {
                errors.add(&format!("imagenes.{i}.imagen_base"), INVALID_CHOICE);
            }
        }
        if let Some(id) = row.id_imagen_casa {
            if !own.contains(&id) {
                errors.add(&format!("imagenes.{i}.id_imagen_casa"), INVALID_CHOICE);
            }
        }
    }
    Ok(errors)
}

/// Apply the inline image table of a property inside the caller's transaction.
async fn apply_inline_rows<C: ConnectionTrait>(
    conn: &C,
    casa_id: i32,
    rows: Vec<InlineImagenCasa>,
) -> Result<(), DbErr> {
    for row in rows {
        match (row.id_imagen_casa, row.delete) {
            (Some(id), true) => {
                imagenes_casa::Entity::delete_many()
                    .filter(imagenes_casa::Column::IdImagenCasa.eq(id))
                    .filter(imagenes_casa::Column::CasaId.eq(casa_id))
                    .exec(conn)
                    .await?;
            }
            (Some(id), false) => {
                let link = imagenes_casa::Entity::find_by_id(id)
                    .filter(imagenes_casa::Column::CasaId.eq(casa_id))
                    .one(conn)
                    .await?
                    .ok_or(DbErr::RecordNotFound(format!("Imagen de casa {id}")))?;

                let mut active: imagenes_casa::ActiveModel = link.into();
                active.imagen_base_id = Set(row.imagen_base);
                active.texto_alternativo = Set(non_blank(row.texto_alternativo));
                active.orden = Set(row.orden);
                active.update(conn).await?;
            }
            // A blank extra row is not a link.
            (None, true) => {}
            (None, false) => {
                let texto = non_blank(row.texto_alternativo);
                if row.imagen_base.is_none() && texto.is_none() && row.orden == 0 {
                    continue;
                }
                imagenes_casa::ActiveModel {
                    casa_id: Set(casa_id),
                    imagen_base_id: Set(row.imagen_base),
                    texto_alternativo: Set(texto),
                    orden: Set(row.orden),
                    ..Default::default()
                }
                .insert(conn)
                .await?;
            }
        }
    }
    Ok(())
}

/// Insert a new property together with its inline image rows.
pub async fn insert_casa(db: &DatabaseConnection, input: CasaForm) -> Result<casas::Model, DbErr> {
    let txn = db.begin().await?;

    let mut new_casa = casas::ActiveModel {
        fecha_publicacion: Set(chrono::Utc::now()),
        ..Default::default()
    };
    apply_form(&mut new_casa, &input);
    let casa = new_casa.insert(&txn).await?;

    apply_inline_rows(&txn, casa.id_casa, input.imagenes).await?;
    txn.commit().await?;

    Ok(casa)
}

/// Fetch a single property by ID.
pub async fn get_casa_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<casas::Model>, DbErr> {
    casas::Entity::find_by_id(id).one(db).await
}

/// Fetch one page of properties, newest first.
pub async fn list_casas(
    db: &DatabaseConnection,
    query: &CasaListQuery,
) -> Result<Page<casas::Model>, DbErr> {
    let pagination = Pagination::new(query.page, query.limit);
    let mut select = casas::Entity::find();

    if let Some(estatus) = query.estatus {
        select = select.filter(casas::Column::Estatus.eq(estatus));
    }
    if let Some(precio) = query.precio {
        select = select.filter(casas::Column::Precio.eq(precio));
    }
    if let Some(range) = query.fecha_publicacion {
        let (start, end) = range.bounds(chrono::Utc::now());
        select = select
            .filter(casas::Column::FechaPublicacion.gte(start))
            .filter(casas::Column::FechaPublicacion.lt(end));
    }
    select = select.filter(search_condition(query.q.as_deref(), |term| {
        Condition::any()
            .add(casas::Column::Titulo.contains(term))
            .add(casas::Column::Descripcion.contains(term))
            .add(casas::Column::Direccion.contains(term))
    }));

    let paginator = select
        .order_by_desc(casas::Column::IdCasa)
        .paginate(db, pagination.limit);
    let count = paginator.num_items().await?;
    let results = paginator.fetch_page(pagination.index()).await?;

    Ok(Page {
        count,
        page: pagination.page,
        results,
    })
}

/// Picker lookup over the title. The flag is `true` when more matches exist
/// beyond the returned batch.
pub async fn autocomplete_casas(
    db: &DatabaseConnection,
    term: Option<&str>,
) -> Result<(Vec<casas::Model>, bool), DbErr> {
    let mut found = casas::Entity::find()
        .filter(search_condition(term, |t| {
            Condition::any().add(casas::Column::Titulo.contains(t))
        }))
        .order_by_asc(casas::Column::Titulo)
        .order_by_asc(casas::Column::IdCasa)
        .limit(AUTOCOMPLETE_PAGE_SIZE + 1)
        .all(db)
        .await?;

    let more = found.len() as u64 > AUTOCOMPLETE_PAGE_SIZE;
    found.truncate(AUTOCOMPLETE_PAGE_SIZE as usize);
    Ok((found, more))
}

/// Update a property and apply its inline image rows in one transaction.
///
/// `fecha_publicacion` is never touched.
pub async fn update_casa(
    db: &DatabaseConnection,
    id: i32,
    input: CasaForm,
) -> Result<casas::Model, DbErr> {
    let txn = db.begin().await?;

    let casa = casas::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(DbErr::RecordNotFound(format!("Casa {id}")))?;

    let mut active: casas::ActiveModel = casa.into();
    apply_form(&mut active, &input);
    let updated = active.update(&txn).await?;

    apply_inline_rows(&txn, id, input.imagenes).await?;
    txn.commit().await?;

    Ok(updated)
}

/// Delete a property and all of its image links.
pub async fn delete_casa(db: &DatabaseConnection, id: i32) -> Result<DeleteResult, DbErr> {
    let txn = db.begin().await?;

    let links = imagenes_casa::Entity::delete_many()
        .filter(imagenes_casa::Column::CasaId.eq(id))
        .exec(&txn)
        .await?;
    let result = casas::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        id_casa = id,
        links_removed = links.rows_affected,
        "deleted casa"
    );
    Ok(result)
}
