//! Route-Definitionen fuer die REST-API (/v1/...)

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::{handlers, ApiState};

/// Erstellt den vollstaendigen /v1/-Router
pub fn v1_router() -> Router<ApiState> {
    Router::new()
        // Frische kanonische Topic-ID erzeugen
        .route("/v1/topics/neu", get(handlers::themen::topic_id_erzeugen))
        // Topic aufloesen; implizite Autorisierung fuer kanonische IDs
        .route("/v1/topics/:tid", get(handlers::themen::topic_abrufen))
        // Explizite Key+Secret-Autorisierung
        .route("/v1/topics/:tid/auth", post(handlers::themen::topic_autorisieren))
        // Alias + Secret registrieren (create-once)
        .route("/v1/topics/:tid", patch(handlers::themen::topic_registrieren))
}
