use sea_orm::*;
use std::collections::HashSet;

use crate::admin::list::{AUTOCOMPLETE_PAGE_SIZE, Page, Pagination, search_condition};
use crate::models::imagenes_base::{self, ImagenBaseForm, ImagenBaseListQuery};
use crate::models::imagenes_casa;

#[derive(Debug, FromQueryResult)]
struct IdImagen {
    id_imagen: i32,
}

/// Gallery entry as offered by the image picker, without its payload.
#[derive(Debug, Clone, FromQueryResult)]
pub struct ImagenBaseOpcion {
    pub id_imagen: i32,
    pub nombre: String,
}

/// Copy a validated upload form onto an active model.
///
/// Payload and content type are only ever written together; with no file in
/// the form both are left as they were.
fn apply_form(active: &mut imagenes_base::ActiveModel, form: ImagenBaseForm) {
    if let Some(nombre) = form.resolved_nombre() {
        active.nombre = Set(nombre);
    }
    active.categoria = Set(form.categoria());
    if let Some(file) = form.archivo_imagen {
        active.imagen_data = Set(file.bytes);
        active.tipo_contenido = Set(file.content_type);
    }
}

/// Insert a new gallery image from an upload form.
pub async fn insert_imagen_base(
    db: &DatabaseConnection,
    form: ImagenBaseForm,
) -> Result<imagenes_base::Model, DbErr> {
    let mut new_imagen = imagenes_base::ActiveModel {
        fecha_creacion: Set(chrono::Utc::now()),
        ..Default::default()
    };
    apply_form(&mut new_imagen, form);

    new_imagen.insert(db).await
}

/// Fetch a single gallery image by ID.
pub async fn get_imagen_base_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<imagenes_base::Model>, DbErr> {
    imagenes_base::Entity::find_by_id(id).one(db).await
}

/// Fetch one page of the gallery, ordered by name.
pub async fn list_imagenes_base(
    db: &DatabaseConnection,
    query: &ImagenBaseListQuery,
) -> Result<Page<imagenes_base::Model>, DbErr> {
    let pagination = Pagination::new(query.page, query.limit);
    let mut select = imagenes_base::Entity::find();

    if let Some(categoria) = query.categoria.as_deref() {
        select = select.filter(imagenes_base::Column::Categoria.eq(categoria));
    }
    if let Some(range) = query.fecha_creacion {
        let (start, end) = range.bounds(chrono::Utc::now());
        select = select
            .filter(imagenes_base::Column::FechaCreacion.gte(start))
            .filter(imagenes_base::Column::FechaCreacion.lt(end));
    }
    select = select.filter(search_condition(query.q.as_deref(), search_term));

    let paginator = select
        .order_by_asc(imagenes_base::Column::Nombre)
        .order_by_asc(imagenes_base::Column::IdImagen)
        .paginate(db, pagination.limit);
    let count = paginator.num_items().await?;
    let results = paginator.fetch_page(pagination.index()).await?;

    Ok(Page {
        count,
        page: pagination.page,
        results,
    })
}

fn search_term(term: &str) -> Condition {
    Condition::any()
        .add(imagenes_base::Column::Nombre.contains(term))
        .add(imagenes_base::Column::Categoria.contains(term))
}

/// Picker lookup over name and category. The flag is `true` when more
/// matches exist beyond the returned batch.
pub async fn autocomplete_imagenes_base(
    db: &DatabaseConnection,
    term: Option<&str>,
) -> Result<(Vec<ImagenBaseOpcion>, bool), DbErr> {
    let mut opciones = imagenes_base::Entity::find()
        .select_only()
        .column(imagenes_base::Column::IdImagen)
        .column(imagenes_base::Column::Nombre)
        .filter(search_condition(term, search_term))
        .order_by_asc(imagenes_base::Column::Nombre)
        .order_by_asc(imagenes_base::Column::IdImagen)
        .limit(AUTOCOMPLETE_PAGE_SIZE + 1)
        .into_model::<ImagenBaseOpcion>()
        .all(db)
        .await?;

    let more = opciones.len() as u64 > AUTOCOMPLETE_PAGE_SIZE;
    opciones.truncate(AUTOCOMPLETE_PAGE_SIZE as usize);
    Ok((opciones, more))
}

/// Which of `ids` exist in the gallery.
pub async fn existing_ids<C: ConnectionTrait>(
    conn: &C,
    ids: &[i32],
) -> Result<HashSet<i32>, DbErr> {
    if ids.is_empty() {
        return Ok(HashSet::new());
    }

    let found = imagenes_base::Entity::find()
        .select_only()
        .column(imagenes_base::Column::IdImagen)
        .filter(imagenes_base::Column::IdImagen.is_in(ids.iter().copied()))
        .into_model::<IdImagen>()
        .all(conn)
        .await?;

    Ok(found.into_iter().map(|row| row.id_imagen).collect())
}

/// Re-upload an existing gallery image.
pub async fn update_imagen_base(
    db: &DatabaseConnection,
    id: i32,
    form: ImagenBaseForm,
) -> Result<imagenes_base::Model, DbErr> {
    let imagen = imagenes_base::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound(format!("Imagen {id}")))?;

    let mut active: imagenes_base::ActiveModel = imagen.into();
    apply_form(&mut active, form);

    active.update(db).await
}

/// Delete a gallery image and every link that references it.
pub async fn delete_imagen_base(db: &DatabaseConnection, id: i32) -> Result<DeleteResult, DbErr> {
    let txn = db.begin().await?;

    let links = imagenes_casa::Entity::delete_many()
        .filter(imagenes_casa::Column::ImagenBaseId.eq(id))
        .exec(&txn)
        .await?;
    let result = imagenes_base::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        id_imagen = id,
        links_removed = links.rows_affected,
        "deleted gallery image"
    );
    Ok(result)
}
