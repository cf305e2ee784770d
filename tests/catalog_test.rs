//! Persistence-level tests for properties, the gallery and their links,
//! run against an in-memory SQLite database.
//!
//! Run with: `cargo test --test catalog_test`
mod common;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use sea_orm::prelude::Decimal;
use sea_orm::{EntityTrait, PaginatorTrait};

use std::str::FromStr;

use casas_admin::admin::list::DateRange;
use casas_admin::db::casas as casa_db;
use casas_admin::db::imagenes_base as imagen_db;
use casas_admin::db::imagenes_casa as imagen_casa_db;
use casas_admin::error::is_foreign_key_violation;
use casas_admin::models::casas::{self, CasaListQuery, Estatus};
use casas_admin::models::imagenes_base::ImagenBaseListQuery;
use casas_admin::models::imagenes_casa::{self, ImagenCasaForm, ImagenCasaListQuery, InlineImagenCasa};

use common::{JPEG_BYTES, casa_form, setup_db, upload_form};

fn link(casa: i32, imagen_base: Option<i32>, orden: i32) -> ImagenCasaForm {
    ImagenCasaForm {
        casa,
        imagen_base,
        texto_alternativo: None,
        orden,
    }
}

#[tokio::test]
async fn test_new_casa_defaults_to_for_sale() {
    let db = setup_db().await;
    let before = chrono::Utc::now();

    let casa = casa_db::insert_casa(&db, casa_form("Casa Azul", "150000.00"))
        .await
        .unwrap();

    assert_eq!(casa.estatus, Estatus::EnVenta);
    assert_eq!(casa.precio, Decimal::new(15_000_000, 2));
    assert!(casa.fecha_publicacion >= before - chrono::Duration::seconds(1));
    assert_eq!(casa.to_string(), "Casa Azul");
}

#[tokio::test]
async fn test_update_keeps_publication_date() {
    let db = setup_db().await;
    let casa = casa_db::insert_casa(&db, casa_form("Casa Azul", "150000.00"))
        .await
        .unwrap();

    let mut form = casa_form("Casa Azul renovada", "175000.50");
    form.estatus = Some(Estatus::Vendida);
    form.habitaciones = Some(3);
    let updated = casa_db::update_casa(&db, casa.id_casa, form).await.unwrap();

    assert_eq!(updated.titulo, "Casa Azul renovada");
    assert_eq!(updated.estatus, Estatus::Vendida);
    assert_eq!(updated.habitaciones, Some(3));
    assert_eq!(updated.fecha_publicacion, casa.fecha_publicacion);
}

#[tokio::test]
async fn test_update_missing_casa_is_not_found() {
    let db = setup_db().await;
    let err = casa_db::update_casa(&db, 404, casa_form("Nada", "1.00"))
        .await
        .unwrap_err();
    assert!(matches!(err, sea_orm::DbErr::RecordNotFound(_)));
}

#[tokio::test]
async fn test_upload_without_name_uses_file_name() {
    let db = setup_db().await;

    let imagen = imagen_db::insert_imagen_base(
        &db,
        upload_form("roof.jpg", "image/jpeg", JPEG_BYTES, None, None),
    )
    .await
    .unwrap();

    assert_eq!(imagen.nombre, "roof.jpg");
    assert_eq!(imagen.tipo_contenido, "image/jpeg");
    assert_eq!(imagen.imagen_data, JPEG_BYTES);
    assert_eq!(
        imagen.image_src().unwrap(),
        format!("data:image/jpeg;base64,{}", STANDARD.encode(JPEG_BYTES))
    );

    // The payload survives the round trip through the database.
    let stored = imagen_db::get_imagen_base_by_id(&db, imagen.id_imagen)
        .await
        .unwrap()
        .unwrap();
    let src = stored.image_src().unwrap();
    let encoded = src.strip_prefix("data:image/jpeg;base64,").unwrap();
    assert_eq!(STANDARD.decode(encoded).unwrap(), JPEG_BYTES);
}

#[tokio::test]
async fn test_reupload_replaces_payload_and_type_together() {
    let db = setup_db().await;
    let imagen = imagen_db::insert_imagen_base(
        &db,
        upload_form("roof.jpg", "image/jpeg", JPEG_BYTES, Some("Techo"), None),
    )
    .await
    .unwrap();

    let updated = imagen_db::update_imagen_base(
        &db,
        imagen.id_imagen,
        upload_form("roof.png", "image/png", b"\x89PNG", Some("Techo"), Some("exterior")),
    )
    .await
    .unwrap();

    assert_eq!(updated.nombre, "Techo");
    assert_eq!(updated.tipo_contenido, "image/png");
    assert_eq!(updated.imagen_data, b"\x89PNG");
    assert_eq!(updated.categoria.as_deref(), Some("exterior"));
    assert_eq!(updated.fecha_creacion, imagen.fecha_creacion);
}

#[tokio::test]
async fn test_links_list_in_ascending_order() {
    let db = setup_db().await;
    let casa = casa_db::insert_casa(&db, casa_form("Casa Azul", "150000.00"))
        .await
        .unwrap();
    let roof = imagen_db::insert_imagen_base(
        &db,
        upload_form("roof.jpg", "image/jpeg", JPEG_BYTES, None, None),
    )
    .await
    .unwrap();

    let second = imagen_casa_db::insert_imagen_casa(&db, link(casa.id_casa, Some(roof.id_imagen), 2))
        .await
        .unwrap();
    let first = imagen_casa_db::insert_imagen_casa(&db, link(casa.id_casa, Some(roof.id_imagen), 1))
        .await
        .unwrap();

    let links = imagen_casa_db::list_by_casa(&db, casa.id_casa).await.unwrap();
    let ids: Vec<i32> = links.iter().map(|d| d.enlace.id_imagen_casa).collect();
    assert_eq!(ids, vec![first.id_imagen_casa, second.id_imagen_casa]);
    assert_eq!(links[0].to_string(), "Imagen de Casa Azul - roof.jpg");
    assert_eq!(links[0].image_src(), roof.image_src());
}

#[tokio::test]
async fn test_link_order_defaults_to_zero() {
    let db = setup_db().await;
    let casa = casa_db::insert_casa(&db, casa_form("Casa Azul", "150000.00"))
        .await
        .unwrap();

    let form: ImagenCasaForm =
        serde_json::from_value(serde_json::json!({ "casa": casa.id_casa })).unwrap();
    let created = imagen_casa_db::insert_imagen_casa(&db, form).await.unwrap();

    assert_eq!(created.orden, 0);
}

#[tokio::test]
async fn test_link_without_base_image_uses_placeholder() {
    let db = setup_db().await;
    let casa = casa_db::insert_casa(&db, casa_form("Casa Azul", "150000.00"))
        .await
        .unwrap();

    let created = imagen_casa_db::insert_imagen_casa(&db, link(casa.id_casa, None, 0))
        .await
        .unwrap();
    let detalle = imagen_casa_db::get_detalle_by_id(&db, created.id_imagen_casa)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(detalle.to_string(), "Imagen de Casa Azul (Sin imagen base)");
    assert_eq!(detalle.image_src(), None);
}

#[tokio::test]
async fn test_deleting_casa_removes_its_links_only() {
    let db = setup_db().await;
    let azul = casa_db::insert_casa(&db, casa_form("Casa Azul", "150000.00"))
        .await
        .unwrap();
    let roja = casa_db::insert_casa(&db, casa_form("Casa Roja", "99000.00"))
        .await
        .unwrap();
    let roof = imagen_db::insert_imagen_base(
        &db,
        upload_form("roof.jpg", "image/jpeg", JPEG_BYTES, None, None),
    )
    .await
    .unwrap();

    for orden in 0..3 {
        imagen_casa_db::insert_imagen_casa(&db, link(azul.id_casa, Some(roof.id_imagen), orden))
            .await
            .unwrap();
    }
    imagen_casa_db::insert_imagen_casa(&db, link(roja.id_casa, Some(roof.id_imagen), 0))
        .await
        .unwrap();

    let result = casa_db::delete_casa(&db, azul.id_casa).await.unwrap();
    assert_eq!(result.rows_affected, 1);

    assert!(imagen_casa_db::list_by_casa(&db, azul.id_casa).await.unwrap().is_empty());
    assert_eq!(imagen_casa_db::list_by_casa(&db, roja.id_casa).await.unwrap().len(), 1);
    // The shared gallery image is not owned by the property.
    assert!(imagen_db::get_imagen_base_by_id(&db, roof.id_imagen).await.unwrap().is_some());
}

#[tokio::test]
async fn test_deleting_gallery_image_removes_links_to_it() {
    let db = setup_db().await;
    let casa = casa_db::insert_casa(&db, casa_form("Casa Azul", "150000.00"))
        .await
        .unwrap();
    let roof = imagen_db::insert_imagen_base(
        &db,
        upload_form("roof.jpg", "image/jpeg", JPEG_BYTES, None, None),
    )
    .await
    .unwrap();
    let garden = imagen_db::insert_imagen_base(
        &db,
        upload_form("garden.png", "image/png", b"\x89PNG", None, Some("jardin")),
    )
    .await
    .unwrap();

    imagen_casa_db::insert_imagen_casa(&db, link(casa.id_casa, Some(roof.id_imagen), 0))
        .await
        .unwrap();
    let kept = imagen_casa_db::insert_imagen_casa(&db, link(casa.id_casa, Some(garden.id_imagen), 1))
        .await
        .unwrap();

    imagen_db::delete_imagen_base(&db, roof.id_imagen).await.unwrap();

    let remaining = imagen_casa_db::list_by_casa(&db, casa.id_casa).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].enlace.id_imagen_casa, kept.id_imagen_casa);
    assert_eq!(imagenes_casa::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_inline_rows_are_saved_with_the_casa() {
    let db = setup_db().await;
    let roof = imagen_db::insert_imagen_base(
        &db,
        upload_form("roof.jpg", "image/jpeg", JPEG_BYTES, None, None),
    )
    .await
    .unwrap();

    let mut form = casa_form("Casa Azul", "150000.00");
    form.imagenes = vec![
        InlineImagenCasa {
            imagen_base: Some(roof.id_imagen),
            texto_alternativo: Some("Techo".to_string()),
            orden: 5,
            ..Default::default()
        },
        // Untouched extra row.
        InlineImagenCasa::default(),
    ];
    let casa = casa_db::insert_casa(&db, form).await.unwrap();

    let links = imagen_casa_db::list_by_casa(&db, casa.id_casa).await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].enlace.orden, 5);
    assert_eq!(links[0].enlace.texto_alternativo.as_deref(), Some("Techo"));

    // Edit the existing row and add a second one in the same save.
    let existing = links[0].enlace.id_imagen_casa;
    let mut form = casa_form("Casa Azul", "150000.00");
    form.imagenes = vec![
        InlineImagenCasa {
            id_imagen_casa: Some(existing),
            imagen_base: Some(roof.id_imagen),
            orden: 9,
            ..Default::default()
        },
        InlineImagenCasa {
            imagen_base: Some(roof.id_imagen),
            orden: 1,
            ..Default::default()
        },
    ];
    casa_db::update_casa(&db, casa.id_casa, form).await.unwrap();

    let links = imagen_casa_db::list_by_casa(&db, casa.id_casa).await.unwrap();
    let ordenes: Vec<i32> = links.iter().map(|d| d.enlace.orden).collect();
    assert_eq!(ordenes, vec![1, 9]);
    assert_eq!(links[1].enlace.texto_alternativo, None);

    // Delete one row through the inline table.
    let mut form = casa_form("Casa Azul", "150000.00");
    form.imagenes = vec![InlineImagenCasa {
        id_imagen_casa: Some(existing),
        delete: true,
        ..Default::default()
    }];
    casa_db::update_casa(&db, casa.id_casa, form).await.unwrap();

    let links = imagen_casa_db::list_by_casa(&db, casa.id_casa).await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].enlace.orden, 1);
}

#[tokio::test]
async fn test_inline_rows_reject_unknown_references() {
    let db = setup_db().await;
    let azul = casa_db::insert_casa(&db, casa_form("Casa Azul", "150000.00"))
        .await
        .unwrap();
    let roja = casa_db::insert_casa(&db, casa_form("Casa Roja", "99000.00"))
        .await
        .unwrap();
    let ajeno = imagen_casa_db::insert_imagen_casa(&db, link(roja.id_casa, None, 0))
        .await
        .unwrap();

    let rows = vec![
        InlineImagenCasa {
            imagen_base: Some(999),
            ..Default::default()
        },
        InlineImagenCasa {
            id_imagen_casa: Some(ajeno.id_imagen_casa),
            ..Default::default()
        },
    ];
    let errors = casa_db::check_inline_rows(&db, Some(azul.id_casa), &rows)
        .await
        .unwrap();

    assert!(errors.get("imagenes.0.imagen_base").is_some());
    assert!(errors.get("imagenes.1.id_imagen_casa").is_some());
    assert!(errors.get("imagenes.1.imagen_base").is_none());
}

#[tokio::test]
async fn test_gallery_list_filters_and_orders_by_name() {
    let db = setup_db().await;
    for (file, categoria) in [
        ("zaguan.jpg", Some("exterior")),
        ("alberca.jpg", Some("exterior")),
        ("cocina.jpg", Some("interior")),
        ("sin-categoria.jpg", None),
    ] {
        imagen_db::insert_imagen_base(
            &db,
            upload_form(file, "image/jpeg", JPEG_BYTES, None, categoria),
        )
        .await
        .unwrap();
    }

    let all = imagen_db::list_imagenes_base(&db, &ImagenBaseListQuery::default())
        .await
        .unwrap();
    let nombres: Vec<&str> = all.results.iter().map(|i| i.nombre.as_str()).collect();
    assert_eq!(
        nombres,
        vec!["alberca.jpg", "cocina.jpg", "sin-categoria.jpg", "zaguan.jpg"]
    );
    assert_eq!(all.count, 4);

    let exterior = imagen_db::list_imagenes_base(
        &db,
        &ImagenBaseListQuery {
            categoria: Some("exterior".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(exterior.count, 2);

    let searched = imagen_db::list_imagenes_base(
        &db,
        &ImagenBaseListQuery {
            q: Some("interior coc".to_string()),
            fecha_creacion: Some(DateRange::Today),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(searched.results.len(), 1);
    assert_eq!(searched.results[0].nombre, "cocina.jpg");

    let paged = imagen_db::list_imagenes_base(
        &db,
        &ImagenBaseListQuery {
            page: Some(2),
            limit: Some(3),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(paged.count, 4);
    assert_eq!(paged.results.len(), 1);
    assert_eq!(paged.results[0].nombre, "zaguan.jpg");
}

#[tokio::test]
async fn test_casa_list_filters_by_status_and_search() {
    let db = setup_db().await;
    let mut vendida = casa_form("Casa Roja", "99000.00");
    vendida.estatus = Some(Estatus::Vendida);
    vendida.direccion = Some("Calle Pino 12".to_string());
    casa_db::insert_casa(&db, vendida).await.unwrap();
    let mut azul = casa_form("Casa Azul", "150000.00");
    azul.descripcion = Some("Terraza con alberca".to_string());
    casa_db::insert_casa(&db, azul).await.unwrap();

    let en_venta = casa_db::list_casas(
        &db,
        &CasaListQuery {
            estatus: Some(Estatus::EnVenta),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(en_venta.count, 1);
    assert_eq!(en_venta.results[0].titulo, "Casa Azul");

    let por_direccion = casa_db::list_casas(
        &db,
        &CasaListQuery {
            q: Some("Pino".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(por_direccion.count, 1);
    assert_eq!(por_direccion.results[0].titulo, "Casa Roja");

    let por_descripcion = casa_db::list_casas(
        &db,
        &CasaListQuery {
            q: Some("alberca".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(por_descripcion.count, 1);
    assert_eq!(por_descripcion.results[0].titulo, "Casa Azul");

    // Price matches by value, whatever the written scale.
    for precio in ["150000", "150000.00"] {
        let por_precio = casa_db::list_casas(
            &db,
            &CasaListQuery {
                precio: Some(Decimal::from_str(precio).unwrap()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(por_precio.count, 1, "precio={precio}");
        assert_eq!(por_precio.results[0].titulo, "Casa Azul");
    }

    let de_hoy = casa_db::list_casas(
        &db,
        &CasaListQuery {
            fecha_publicacion: Some(DateRange::Today),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(de_hoy.count, 2);

    // Newest first.
    let all = casa_db::list_casas(&db, &CasaListQuery::default()).await.unwrap();
    let titulos: Vec<&str> = all.results.iter().map(|c| c.titulo.as_str()).collect();
    assert_eq!(titulos, vec!["Casa Azul", "Casa Roja"]);
}

#[tokio::test]
async fn test_inline_row_to_missing_image_rolls_back_the_casa() {
    let db = setup_db().await;

    // The image is gone by the time the property is written.
    let mut form = casa_form("Casa Azul", "150000.00");
    form.imagenes = vec![InlineImagenCasa {
        imagen_base: Some(999),
        ..Default::default()
    }];
    let err = casa_db::insert_casa(&db, form.clone()).await.unwrap_err();

    assert!(is_foreign_key_violation(&err));
    assert_eq!(casas::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(imagenes_casa::Entity::find().count(&db).await.unwrap(), 0);

    // Re-running the reference checks now names the offending row.
    let errors = casa_db::check_inline_rows(&db, None, &form.imagenes)
        .await
        .unwrap();
    assert_eq!(
        errors.get("imagenes.0.imagen_base").unwrap(),
        ["Select a valid choice. That choice is not one of the available choices."]
    );
}

#[tokio::test]
async fn test_link_list_filters_by_casa_and_image_category() {
    let db = setup_db().await;
    let azul = casa_db::insert_casa(&db, casa_form("Casa Azul", "150000.00"))
        .await
        .unwrap();
    let roja = casa_db::insert_casa(&db, casa_form("Casa Roja", "99000.00"))
        .await
        .unwrap();
    let roof = imagen_db::insert_imagen_base(
        &db,
        upload_form("roof.jpg", "image/jpeg", JPEG_BYTES, None, Some("exterior")),
    )
    .await
    .unwrap();
    let sala = imagen_db::insert_imagen_base(
        &db,
        upload_form("sala.jpg", "image/jpeg", JPEG_BYTES, None, Some("interior")),
    )
    .await
    .unwrap();

    imagen_casa_db::insert_imagen_casa(&db, link(azul.id_casa, Some(roof.id_imagen), 0))
        .await
        .unwrap();
    imagen_casa_db::insert_imagen_casa(&db, link(azul.id_casa, Some(sala.id_imagen), 1))
        .await
        .unwrap();
    imagen_casa_db::insert_imagen_casa(&db, link(roja.id_casa, Some(roof.id_imagen), 0))
        .await
        .unwrap();
    imagen_casa_db::insert_imagen_casa(&db, link(roja.id_casa, None, 2))
        .await
        .unwrap();

    let de_azul = imagen_casa_db::list_imagenes_casa(
        &db,
        &ImagenCasaListQuery {
            casa: Some(azul.id_casa),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(de_azul.count, 2);

    let exteriores = imagen_casa_db::list_imagenes_casa(
        &db,
        &ImagenCasaListQuery {
            categoria: Some("exterior".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(exteriores.count, 2);
    assert!(exteriores.results.iter().all(|d| d.imagen_base.is_some()));

    let buscados = imagen_casa_db::list_imagenes_casa(
        &db,
        &ImagenCasaListQuery {
            q: Some("Roja".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(buscados.count, 2);
    assert_eq!(
        buscados.results.last().unwrap().to_string(),
        "Imagen de Casa Roja (Sin imagen base)"
    );
}

#[tokio::test]
async fn test_autocomplete_skips_payload_and_flags_more() {
    let db = setup_db().await;
    for i in 0..25 {
        imagen_db::insert_imagen_base(
            &db,
            upload_form(&format!("foto-{i:02}.jpg"), "image/jpeg", JPEG_BYTES, None, None),
        )
        .await
        .unwrap();
    }

    let (opciones, more) = imagen_db::autocomplete_imagenes_base(&db, Some("foto"))
        .await
        .unwrap();
    assert_eq!(opciones.len(), 20);
    assert!(more);
    assert_eq!(opciones[0].nombre, "foto-00.jpg");

    let (opciones, more) = imagen_db::autocomplete_imagenes_base(&db, Some("foto-24"))
        .await
        .unwrap();
    assert_eq!(opciones.len(), 1);
    assert!(!more);
}
