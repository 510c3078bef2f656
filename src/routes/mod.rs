// Route exports
pub mod auth;
pub mod error;
pub mod recommendations;

use actix_web::web;

pub use auth::AuthenticatedUser;
pub use error::{handle_json_payload_error, ApiError};
pub use recommendations::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
        .configure(recommendations::configure);
}
