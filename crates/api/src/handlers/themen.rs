//! REST-Handler fuer Topic-Endpunkte
//!
//! Der Zugriffsfluss: ein Client holt sich eine kanonische ID, loest sie
//! (oder einen Alias) per GET auf und wird dabei implizit autorisiert,
//! wenn er die kanonische ID selbst kennt. Alias-Besucher bekommen 403
//! und liefern Key+Secret per POST nach. PATCH registriert Alias+Secret
//! genau einmal.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;

use treffpunkt_topic::{zugriff, TopicKennung};

use crate::{fehler_antwort, mit_cookie, sid_aus_cookies, ApiState};

/// GET /v1/topics/neu – erzeugt eine frische kanonische Topic-ID
pub async fn topic_id_erzeugen(State(state): State<ApiState>) -> Response {
    let id = state.themen.id_generieren();
    (StatusCode::OK, id).into_response()
}

/// GET /v1/topics/:tid – Topic aufloesen und Zugriff pruefen
///
/// Prueft zuerst die bestehende Freigabe der Session; ohne Freigabe wird
/// eine implizite Autorisierung mit leeren Anmeldedaten versucht. Die
/// gelingt genau dann, wenn der Aufrufer die kanonische ID kannte – fuer
/// Alias-Besucher ist das 403 der erwartete Ausloeser, Key+Secret per
/// POST nachzureichen. Das Session-Cookie wird bei jeder erfolgreichen
/// Antwort aufgefrischt.
pub async fn topic_abrufen(
    State(state): State<ApiState>,
    Path(tid): Path<String>,
    headers: HeaderMap,
) -> Response {
    let kennung = match TopicKennung::parse(&tid) {
        Ok(kennung) => kennung,
        Err(e) => return fehler_antwort(&e),
    };
    let topic = match state.themen.aufloesen(&kennung).await {
        Ok(topic) => topic,
        Err(e) => return fehler_antwort(&e),
    };

    let sid = sid_aus_cookies(&headers);
    let (session, neu_ausgestellt) = state.sitzungen.oeffnen_oder_erstellen(sid.as_deref()).await;
    let ttl = state.sitzungen.ttl_sekunden();

    if zugriff::authentifizieren(&topic, &state.sitzungen, &session.id)
        .await
        .is_err()
    {
        // Keine Freigabe vorhanden – implizite Autorisierung versuchen
        if let Err(e) =
            zugriff::autorisieren(&topic, &state.sitzungen, &session.id, "", "").await
        {
            // Neu ausgestellte Sessions trotzdem propagieren, damit die
            // nachgereichte POST-Autorisierung dieselbe Session trifft
            let antwort = fehler_antwort(&e);
            return if neu_ausgestellt {
                mit_cookie(antwort, &session.id, ttl)
            } else {
                antwort
            };
        }
    }

    let antwort = (StatusCode::OK, Json(topic.oeffentlich())).into_response();
    mit_cookie(antwort, &session.id, ttl)
}

#[derive(Debug, Deserialize)]
pub struct AutorisierenBody {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub secret: String,
}

/// POST /v1/topics/:tid/auth – explizite Key+Secret-Autorisierung
pub async fn topic_autorisieren(
    State(state): State<ApiState>,
    Path(tid): Path<String>,
    headers: HeaderMap,
    Json(body): Json<AutorisierenBody>,
) -> Response {
    let kennung = match TopicKennung::parse(&tid) {
        Ok(kennung) => kennung,
        Err(e) => return fehler_antwort(&e),
    };
    let topic = match state.themen.aufloesen(&kennung).await {
        Ok(topic) => topic,
        Err(e) => return fehler_antwort(&e),
    };

    let sid = sid_aus_cookies(&headers);
    let (session, _) = state.sitzungen.oeffnen_oder_erstellen(sid.as_deref()).await;

    match zugriff::autorisieren(&topic, &state.sitzungen, &session.id, &body.key, &body.secret)
        .await
    {
        Ok(resp_sid) => {
            let antwort = (StatusCode::OK, Json(topic.oeffentlich())).into_response();
            mit_cookie(antwort, &resp_sid, state.sitzungen.ttl_sekunden())
        }
        Err(e) => fehler_antwort(&e),
    }
}

#[derive(Debug, Deserialize)]
pub struct RegistrierenBody {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub secret: String,
}

/// PATCH /v1/topics/:tid – Alias + Secret registrieren (create-once)
///
/// Die Registrierung laeuft immer ueber die kanonische ID; ein Alias als
/// Pfadparameter ist ein Eingabefehler.
pub async fn topic_registrieren(
    State(state): State<ApiState>,
    Path(tid): Path<String>,
    Json(body): Json<RegistrierenBody>,
) -> Response {
    let id = match TopicKennung::parse(&tid) {
        Ok(TopicKennung::Kanonisch(id)) => id,
        Ok(TopicKennung::Alias(_)) => {
            return fehler_antwort(&treffpunkt_core::TreffpunktError::eingabe(
                "Registrierung nur ueber die kanonische Topic-ID",
            ))
        }
        Err(e) => return fehler_antwort(&e),
    };

    match state.themen.registrieren(&id, &body.key, &body.secret).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response(),
        Err(e) => fehler_antwort(&e),
    }
}
