//! treffpunkt-api – REST-Schnittstelle
//!
//! Stellt die Zugriffs-Endpunkte des Rendezvous-Systems bereit:
//! ID-Erzeugung, Topic-Aufloesung mit impliziter Autorisierung,
//! explizite Key+Secret-Autorisierung und Alias-Registrierung.
//!
//! Die Session des Aufrufers wird ueber ein HttpOnly-Cookie gefuehrt;
//! die Session-ID wird genau dann (neu) gesetzt, wenn eine Session
//! ausgestellt oder eine Autorisierung erteilt wurde.

pub mod handlers;
pub mod routes;
pub mod server;

use std::sync::Arc;

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use treffpunkt_core::TreffpunktError;
use treffpunkt_session::SessionStore;
use treffpunkt_topic::TopicDienst;

pub use server::{RestServer, RestServerKonfig};

/// Name des Session-Cookies
pub const COOKIE_NAME: &str = "tp_sid";

/// Axum-State fuer die REST-Schnittstelle
#[derive(Clone)]
pub struct ApiState {
    pub themen: Arc<TopicDienst>,
    pub sitzungen: Arc<SessionStore>,
}

impl ApiState {
    pub fn neu(themen: Arc<TopicDienst>, sitzungen: Arc<SessionStore>) -> Self {
        Self { themen, sitzungen }
    }
}

/// Extrahiert die Session-ID aus dem Cookie-Header
pub fn sid_aus_cookies(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|wert| wert.to_str().ok())
        .flat_map(|zeile| zeile.split(';'))
        .find_map(|teil| {
            teil.trim()
                .strip_prefix(COOKIE_NAME)
                .and_then(|rest| rest.strip_prefix('='))
                .map(str::to_string)
        })
}

/// Baut den Set-Cookie-Wert fuer die Session-ID
pub fn cookie_wert(sid: &str, max_age_sek: i64) -> String {
    format!("{COOKIE_NAME}={sid}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_sek}")
}

/// Baut eine JSON-Fehlerantwort aus einem Kern-Fehler
pub fn fehler_antwort(e: &TreffpunktError) -> Response {
    let status =
        StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({ "error": { "code": e.http_status(), "message": e.to_string() } })),
    )
        .into_response()
}

/// Haengt das Session-Cookie an eine Antwort an
pub fn mit_cookie(mut antwort: Response, sid: &str, max_age_sek: i64) -> Response {
    if let Ok(wert) = cookie_wert(sid, max_age_sek).parse() {
        antwort.headers_mut().insert(header::SET_COOKIE, wert);
    }
    antwort
}
