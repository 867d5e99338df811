//! Session-Verwaltung fuer Treffpunkt
//!
//! Jede Transport-Verbindung (HTTP wie Signaling) gehoert zu einer Session:
//! einer rotierenden, nicht erratbaren ID mit einer kleinen Menge benannter
//! Fakten (z.B. dem Freigabe-Flag eines Topics) und eigener Lebensdauer.
//! Sessions werden im Speicher gehalten (HashMap mit TTL); ein Hintergrund-
//! Task bereinigt abgelaufene Sessions automatisch.
//!
//! Die Session-ID wird dem Aufrufer genau einmal beim Neuausstellen
//! zurueckgegeben (Set-Cookie); der Store selbst kennt keine Cookies.

use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use rand::RngCore;
use tokio::sync::RwLock;

/// Standard-Session-Lebensdauer: 30 Minuten
pub const SESSION_TTL_MIN: i64 = 30;

/// Intervall fuer den automatischen Cleanup-Task: 10 Minuten
const CLEANUP_INTERVALL: Duration = Duration::from_secs(10 * 60);

/// Eine aktive Session
#[derive(Debug, Clone)]
pub struct Session {
    /// Die Session-ID (URL-sicheres Base64)
    pub id: String,
    /// Benannte Fakten dieser Session
    pub werte: HashMap<String, serde_json::Value>,
    /// Zeitpunkt der Session-Erstellung
    pub erstellt_am: DateTime<Utc>,
    /// Zeitpunkt des Session-Ablaufs
    pub laeuft_ab_am: DateTime<Utc>,
}

impl Session {
    /// Gibt `true` zurueck wenn die Session noch gueltig ist
    pub fn ist_gueltig(&self) -> bool {
        Utc::now() < self.laeuft_ab_am
    }
}

/// In-Memory Session-Store mit TTL-Unterstuetzung
#[derive(Debug)]
pub struct SessionStore {
    /// id -> Session
    sitzungen: RwLock<HashMap<String, Session>>,
    /// Lebensdauer neuer bzw. beruehrter Sessions
    ttl: chrono::Duration,
}

impl SessionStore {
    /// Erstellt einen neuen leeren Session-Store
    pub fn neu(ttl_minuten: i64) -> Arc<Self> {
        Arc::new(Self {
            sitzungen: RwLock::new(HashMap::new()),
            ttl: chrono::Duration::minutes(ttl_minuten),
        })
    }

    /// Startet den Cleanup-Task fuer einen bestehenden Store
    pub fn neu_mit_cleanup(store: Arc<Self>) -> Arc<Self> {
        let store_klon = Arc::clone(&store);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(CLEANUP_INTERVALL).await;
                let entfernt = store_klon.cleanup_abgelaufene().await;
                if entfernt > 0 {
                    tracing::debug!(anzahl = entfernt, "Abgelaufene Sessions bereinigt");
                }
            }
        });
        store
    }

    /// Erstellt eine neue Session mit frischer ID
    pub async fn erstellen(&self) -> Session {
        let id = sid_generieren();
        let jetzt = Utc::now();
        let session = Session {
            id: id.clone(),
            werte: HashMap::new(),
            erstellt_am: jetzt,
            laeuft_ab_am: jetzt + self.ttl,
        };

        self.sitzungen.write().await.insert(id, session.clone());
        tracing::debug!(sid = %session.id, "Neue Session erstellt");
        session
    }

    /// Oeffnet eine Session anhand ihrer ID und verlaengert dabei die TTL
    ///
    /// Gibt `None` zurueck wenn die ID unbekannt oder abgelaufen ist.
    pub async fn oeffnen(&self, sid: &str) -> Option<Session> {
        let mut sitzungen = self.sitzungen.write().await;
        match sitzungen.get_mut(sid) {
            Some(session) if session.ist_gueltig() => {
                session.laeuft_ab_am = Utc::now() + self.ttl;
                Some(session.clone())
            }
            _ => None,
        }
    }

    /// Oeffnet die Session zur gegebenen ID oder erstellt eine neue
    ///
    /// Gibt zusaetzlich zurueck ob die Session neu ausgestellt wurde –
    /// nur dann muss die ID an den Aufrufer propagiert werden.
    pub async fn oeffnen_oder_erstellen(&self, sid: Option<&str>) -> (Session, bool) {
        if let Some(sid) = sid {
            if let Some(session) = self.oeffnen(sid).await {
                return (session, false);
            }
        }
        (self.erstellen().await, true)
    }

    /// Setzt einen benannten Fakt in der Session
    ///
    /// Gibt `false` zurueck wenn die Session nicht (mehr) existiert.
    pub async fn wert_setzen(&self, sid: &str, schluessel: &str, wert: serde_json::Value) -> bool {
        let mut sitzungen = self.sitzungen.write().await;
        match sitzungen.get_mut(sid) {
            Some(session) if session.ist_gueltig() => {
                session.werte.insert(schluessel.to_string(), wert);
                true
            }
            _ => false,
        }
    }

    /// Liest einen benannten Fakt aus der Session
    pub async fn wert_lesen(&self, sid: &str, schluessel: &str) -> Option<serde_json::Value> {
        let sitzungen = self.sitzungen.read().await;
        match sitzungen.get(sid) {
            Some(session) if session.ist_gueltig() => session.werte.get(schluessel).cloned(),
            _ => None,
        }
    }

    /// Bereinigt abgelaufene Sessions und gibt die Anzahl der entfernten zurueck
    pub async fn cleanup_abgelaufene(&self) -> usize {
        let jetzt = Utc::now();
        let mut sitzungen = self.sitzungen.write().await;
        let vorher = sitzungen.len();
        sitzungen.retain(|_, s| s.laeuft_ab_am > jetzt);
        vorher - sitzungen.len()
    }

    /// Gibt die Anzahl der aktiven (nicht abgelaufenen) Sessions zurueck
    pub async fn anzahl_aktive(&self) -> usize {
        let jetzt = Utc::now();
        let sitzungen = self.sitzungen.read().await;
        sitzungen.values().filter(|s| s.laeuft_ab_am > jetzt).count()
    }

    /// Gibt die konfigurierte TTL in Sekunden zurueck (fuer Cookie-Max-Age)
    pub fn ttl_sekunden(&self) -> i64 {
        self.ttl.num_seconds()
    }
}

/// Generiert eine kryptografisch sichere Session-ID (URL-sicheres Base64)
fn sid_generieren() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE_NO_PAD, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn session_erstellen_und_oeffnen() {
        let store = SessionStore::neu(SESSION_TTL_MIN);
        let session = store.erstellen().await;
        assert!(session.ist_gueltig());

        let geoeffnet = store.oeffnen(&session.id).await.expect("Session erwartet");
        assert_eq!(geoeffnet.id, session.id);
    }

    #[tokio::test]
    async fn unbekannte_sid_gibt_none() {
        let store = SessionStore::neu(SESSION_TTL_MIN);
        assert!(store.oeffnen("keine_gueltige_sid").await.is_none());
    }

    #[tokio::test]
    async fn oeffnen_oder_erstellen_markiert_neuausstellung() {
        let store = SessionStore::neu(SESSION_TTL_MIN);

        let (s1, neu1) = store.oeffnen_oder_erstellen(None).await;
        assert!(neu1, "Ohne SID muss eine neue Session ausgestellt werden");

        let (s2, neu2) = store.oeffnen_oder_erstellen(Some(s1.id.as_str())).await;
        assert!(!neu2);
        assert_eq!(s1.id, s2.id);

        let (_, neu3) = store.oeffnen_oder_erstellen(Some("abgelaufen")).await;
        assert!(neu3, "Unbekannte SID muss eine neue Session ausstellen");
    }

    #[tokio::test]
    async fn werte_setzen_und_lesen() {
        let store = SessionStore::neu(SESSION_TTL_MIN);
        let session = store.erstellen().await;

        assert!(store.wert_setzen(&session.id, "freigabe:abc", json!(true)).await);
        assert_eq!(
            store.wert_lesen(&session.id, "freigabe:abc").await,
            Some(json!(true))
        );
        assert_eq!(store.wert_lesen(&session.id, "fehlt").await, None);
    }

    #[tokio::test]
    async fn wert_setzen_auf_fehlender_session_schlaegt_fehl() {
        let store = SessionStore::neu(SESSION_TTL_MIN);
        assert!(!store.wert_setzen("fehlt", "k", json!(1)).await);
    }

    #[tokio::test]
    async fn abgelaufene_sessions_werden_bereinigt() {
        let store = SessionStore::neu(0);
        let _ = store.erstellen().await;

        tokio::time::sleep(Duration::from_millis(10)).await;
        let entfernt = store.cleanup_abgelaufene().await;
        assert_eq!(entfernt, 1);
        assert_eq!(store.anzahl_aktive().await, 0);
    }

    #[tokio::test]
    async fn sids_sind_eindeutig() {
        let store = SessionStore::neu(SESSION_TTL_MIN);
        let s1 = store.erstellen().await;
        let s2 = store.erstellen().await;
        assert_ne!(s1.id, s2.id, "Session-IDs muessen eindeutig sein");
    }
}
