pub mod chat;
pub mod ingest;
pub mod search;
pub mod system;

use actix_web::error;
use medisearch_common::MediSearchError;

/// Map a domain error onto the actix error carrying its status code
pub(crate) fn http_error(err: MediSearchError) -> actix_web::Error {
    match err.status_code() {
        400 => error::ErrorBadRequest(err),
        404 => error::ErrorNotFound(err),
        502 => error::ErrorBadGateway(err),
        _ => error::ErrorInternalServerError(err),
    }
}
