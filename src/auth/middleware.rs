use actix_web::dev::ServiceRequest;
use actix_web::{Error, web};
use actix_web_httpauth::extractors::AuthenticationError;
use actix_web_httpauth::extractors::basic::{BasicAuth, Config};

use crate::config::AdminCredentials;

/// Realm announced in the `WWW-Authenticate` challenge.
pub const ADMIN_REALM: &str = "casas-admin";

/// Basic-auth validator for the `/admin` scope.
///
/// Use with `HttpAuthentication::basic(validate_admin)`; the configured
/// credentials are read from `web::Data<AdminCredentials>`.
pub async fn validate_admin(
    req: ServiceRequest,
    credentials: BasicAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let authorized = req
        .app_data::<web::Data<AdminCredentials>>()
        .is_some_and(|admin| admin.matches(credentials.user_id(), credentials.password()));

    if authorized {
        return Ok(req);
    }

    tracing::warn!(user = credentials.user_id(), path = req.path(), "rejected admin login");
    let config = Config::default().realm(ADMIN_REALM);
    Err((AuthenticationError::from(config).into(), req))
}
