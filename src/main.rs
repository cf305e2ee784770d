use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use actix_web_httpauth::middleware::HttpAuthentication;
use dotenv::dotenv;
use casas_admin::auth::middleware::validate_admin;
use casas_admin::config::AppConfig;
use casas_admin::handlers::{self, imagenes_base::UploadLimits};
use casas_admin::{create_pool, run_migrations};
use std::io;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().map_err(|e| io::Error::other(e.to_string()))?;

    let db = create_pool(&config.database_url)
        .await
        .map_err(|e| io::Error::other(format!("Failed to connect to database: {e}")))?;
    if config.run_migrations {
        run_migrations(&db)
            .await
            .map_err(|e| io::Error::other(format!("Failed to run migrations: {e}")))?;
        tracing::info!("Database migrations applied");
    }

    let db_data = web::Data::new(db);
    let admin_data = web::Data::new(config.admin.clone());
    let upload_limits = web::Data::new(UploadLimits {
        max_bytes: config.max_upload_bytes,
    });

    let bind_addr = config.bind_addr();
    tracing::info!("Admin running at http://{bind_addr}/admin");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(admin_data.clone())
            .app_data(upload_limits.clone())
            .service(
                web::scope("/admin")
                    .wrap(HttpAuthentication::basic(validate_admin))
                    .configure(handlers::init_routes),
            )
    })
    .bind(&bind_addr)?
    .run()
    .await
}
