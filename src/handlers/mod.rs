pub mod casas;
pub mod imagenes_base;
pub mod imagenes_casa;

use actix_web::web;

use crate::error::AdminError;

/// Register the admin routes. Mount inside the authenticated `/admin` scope.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // Bodies, query strings and path ids that cannot be read at all still
    // answer with the JSON error shape.
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AdminError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AdminError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AdminError::BadRequest(err.to_string()).into()),
    );

    // ── Casa routes (inline image rows travel with the casa form) ──
    cfg.service(
        web::scope("/casas")
            .route("", web::get().to(casas::get_casas))
            .route("", web::post().to(casas::create_casa))
            .route("/autocomplete", web::get().to(casas::autocomplete_casas))
            .route("/{id}", web::get().to(casas::get_casa))
            .route("/{id}", web::put().to(casas::update_casa))
            .route("/{id}", web::delete().to(casas::delete_casa)),
    );

    // ── Gallery routes (uploads are multipart) ──
    cfg.service(
        web::scope("/imagenes-base")
            .route("", web::get().to(imagenes_base::get_imagenes_base))
            .route("", web::post().to(imagenes_base::create_imagen_base))
            .route(
                "/autocomplete",
                web::get().to(imagenes_base::autocomplete_imagenes_base),
            )
            .route("/{id}", web::get().to(imagenes_base::get_imagen_base))
            .route("/{id}", web::put().to(imagenes_base::update_imagen_base))
            .route("/{id}", web::delete().to(imagenes_base::delete_imagen_base))
            .route(
                "/{id}/preview",
                web::get().to(imagenes_base::preview_imagen_base),
            ),
    );

    // ── Casa ↔ gallery link routes ──
    cfg.service(
        web::scope("/imagenes-casa")
            .route("", web::get().to(imagenes_casa::get_imagenes_casa))
            .route("", web::post().to(imagenes_casa::create_imagen_casa))
            .route("/{id}", web::get().to(imagenes_casa::get_imagen_casa))
            .route("/{id}", web::put().to(imagenes_casa::update_imagen_casa))
            .route("/{id}", web::delete().to(imagenes_casa::delete_imagen_casa))
            .route(
                "/{id}/preview",
                web::get().to(imagenes_casa::preview_imagen_casa),
            ),
    );
}
