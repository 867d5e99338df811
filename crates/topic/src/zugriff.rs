//! Zugriffskontrolle – Key+Secret-Pruefung und Session-Freigabe
//!
//! Zwei Operationen bilden ein einfaches Zwei-Zustands-Gatter pro
//! (Session, Topic)-Paar:
//!
//! - [`autorisieren`] prueft den Berechtigungsnachweis und setzt bei
//!   Erfolg das Freigabe-Flag in der Session des Aufrufers
//! - [`authentifizieren`] prueft nur das Flag und ist beliebig oft
//!   wiederholbar
//!
//! Wer die kanonische ID kennt, ist vorab autorisiert – die nicht
//! erratbare ID ist selbst der Berechtigungsnachweis. Wer ueber den
//! Alias kommt, muss Key+Secret exakt nachweisen, denn Aliase sind
//! merkbar und damit erratbar.

use serde_json::json;
use treffpunkt_core::{Result, TreffpunktError};
use treffpunkt_session::SessionStore;

use crate::topic::Topic;

/// Session-Schluessel des Freigabe-Flags fuer ein Topic
pub fn freigabe_schluessel(topic_id: &str) -> String {
    format!("freigabe:{topic_id}")
}

/// Prueft das Freigabe-Flag der Session fuer dieses Topic
///
/// `Verboten` wenn das Flag fehlt oder die Session abgelaufen ist.
/// Nur lesend, idempotent.
pub async fn authentifizieren(
    topic: &Topic,
    sitzungen: &SessionStore,
    sid: &str,
) -> Result<()> {
    match sitzungen
        .wert_lesen(sid, &freigabe_schluessel(&topic.id))
        .await
    {
        Some(wert) if wert.as_bool() == Some(true) => Ok(()),
        _ => Err(TreffpunktError::Verboten),
    }
}

/// Prueft den Berechtigungsnachweis und setzt das Freigabe-Flag
///
/// Bei kanonischer Aufloesung genuegt der Besitz der ID; bei Alias-
/// Aufloesung muessen Key und Secret exakt den gespeicherten Werten
/// entsprechen. Gibt bei Erfolg die Session-ID zurueck, damit die
/// Transportschicht sie genau einmal an den Aufrufer propagiert.
pub async fn autorisieren(
    topic: &Topic,
    sitzungen: &SessionStore,
    sid: &str,
    key: &str,
    secret: &str,
) -> Result<String> {
    // Nur wer nicht ueber die kanonische ID kam, muss Key+Secret nachweisen
    if !topic.kanonisch_gefunden
        && (Some(key) != topic.key.as_deref() || Some(secret) != topic.secret.as_deref())
    {
        return Err(TreffpunktError::Verboten);
    }

    if !sitzungen
        .wert_setzen(sid, &freigabe_schluessel(&topic.id), json!(true))
        .await
    {
        return Err(TreffpunktError::intern("Session nicht mehr vorhanden"));
    }

    tracing::debug!(topic = %topic.id, "Session fuer Topic freigegeben");
    Ok(sid.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
