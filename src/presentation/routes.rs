use crate::presentation::handlers::{api_root, create_user, get_user, hello, json_config};
use actix_web::web;

/// Registers every route. Shared by the server and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/", web::get().to(hello))
        .route("/api", web::get().to(api_root))
        .route("/api/user", web::post().to(create_user))
        .route("/api/user/{id}", web::get().to(get_user));
}
