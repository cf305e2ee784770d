use sea_orm::*;
use std::collections::HashMap;

use crate::admin::list::{Page, Pagination, search_condition};
use crate::models::imagenes_casa::{self, ImagenCasaDetalle, ImagenCasaForm, ImagenCasaListQuery};
use crate::models::{casas, imagenes_base};
use crate::validation::non_blank;

/// Insert a new link between a property and a gallery image.
pub async fn insert_imagen_casa(
    db: &DatabaseConnection,
    input: ImagenCasaForm,
) -> Result<imagenes_casa::Model, DbErr> {
    let new_link = imagenes_casa::ActiveModel {
        casa_id: Set(input.casa),
        imagen_base_id: Set(input.imagen_base),
        texto_alternativo: Set(non_blank(input.texto_alternativo)),
        orden: Set(input.orden),
        ..Default::default()
    };

    new_link.insert(db).await
}

/// Fetch a single link by ID.
pub async fn get_imagen_casa_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<imagenes_casa::Model>, DbErr> {
    imagenes_casa::Entity::find_by_id(id).one(db).await
}

/// Fetch a single link together with its property and gallery image.
pub async fn get_detalle_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<ImagenCasaDetalle>, DbErr> {
    let found = imagenes_casa::Entity::find_by_id(id)
        .find_also_related(imagenes_base::Entity)
        .one(db)
        .await?;

    match found {
        Some(row) => Ok(attach_casas(db, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

/// All links of one property, ordered by `orden`.
pub async fn list_by_casa<C: ConnectionTrait>(
    conn: &C,
    casa_id: i32,
) -> Result<Vec<ImagenCasaDetalle>, DbErr> {
    let rows = imagenes_casa::Entity::find()
        .filter(imagenes_casa::Column::CasaId.eq(casa_id))
        .find_also_related(imagenes_base::Entity)
        .order_by_asc(imagenes_casa::Column::Orden)
        .order_by_asc(imagenes_casa::Column::IdImagenCasa)
        .all(conn)
        .await?;

    attach_casas(conn, rows).await
}

/// Fetch one page of links across all properties, ordered by `orden`.
pub async fn list_imagenes_casa(
    db: &DatabaseConnection,
    query: &ImagenCasaListQuery,
) -> Result<Page<ImagenCasaDetalle>, DbErr> {
    let pagination = Pagination::new(query.page, query.limit);
    let mut select = imagenes_casa::Entity::find()
        .find_also_related(imagenes_base::Entity)
        .join(JoinType::InnerJoin, imagenes_casa::Relation::Casa.def());

    if let Some(casa_id) = query.casa {
        select = select.filter(imagenes_casa::Column::CasaId.eq(casa_id));
    }
    if let Some(categoria) = query.categoria.as_deref() {
        select = select.filter(imagenes_base::Column::Categoria.eq(categoria));
    }
    select = select.filter(search_condition(query.q.as_deref(), |term| {
        Condition::any()
            .add(casas::Column::Titulo.contains(term))
            .add(imagenes_base::Column::Nombre.contains(term))
    }));

    let paginator = select
        .order_by_asc(imagenes_casa::Column::Orden)
        .order_by_asc(imagenes_casa::Column::IdImagenCasa)
        .paginate(db, pagination.limit);
    let count = paginator.num_items().await?;
    let rows = paginator.fetch_page(pagination.index()).await?;

    Ok(Page {
        count,
        page: pagination.page,
        results: attach_casas(db, rows).await?,
    })
}

/// Pair each link with its parent property, loaded in one query.
async fn attach_casas<C: ConnectionTrait>(
    conn: &C,
    rows: Vec<(imagenes_casa::Model, Option<imagenes_base::Model>)>,
) -> Result<Vec<ImagenCasaDetalle>, DbErr> {
    let mut casa_ids: Vec<i32> = rows.iter().map(|(link, _)| link.casa_id).collect();
    casa_ids.sort_unstable();
    casa_ids.dedup();

    let por_id: HashMap<i32, casas::Model> = if casa_ids.is_empty() {
        HashMap::new()
    } else {
        casas::Entity::find()
            .filter(casas::Column::IdCasa.is_in(casa_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|casa| (casa.id_casa, casa))
            .collect()
    };

    rows.into_iter()
        .map(|(enlace, imagen_base)| {
            let casa = por_id
                .get(&enlace.casa_id)
                .cloned()
                .ok_or_else(|| DbErr::RecordNotFound(format!("Casa {}", enlace.casa_id)))?;
            Ok(ImagenCasaDetalle {
                enlace,
                casa,
                imagen_base,
            })
        })
        .collect()
}

/// Update an existing link.
pub async fn update_imagen_casa(
    db: &DatabaseConnection,
    id: i32,
    input: ImagenCasaForm,
) -> Result<imagenes_casa::Model, DbErr> {
    let link = imagenes_casa::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound(format!("Imagen de casa {id}")))?;

    let mut active: imagenes_casa::ActiveModel = link.into();
    active.casa_id = Set(input.casa);
    active.imagen_base_id = Set(input.imagen_base);
    active.texto_alternativo = Set(non_blank(input.texto_alternativo));
    active.orden = Set(input.orden);

    active.update(db).await
}

/// Delete a link by ID.
pub async fn delete_imagen_casa(db: &DatabaseConnection, id: i32) -> Result<DeleteResult, DbErr> {
    imagenes_casa::Entity::delete_by_id(id).exec(db).await
}
