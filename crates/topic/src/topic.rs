//! Topic-Datensatz, Resolver und Registrierung
//!
//! Ein Topic lebt vollstaendig im geteilten Store, verteilt auf drei
//! unabhaengig ablaufende Datensaetze:
//!
//! - `topic:{id}:datensatz` – Hash mit den Feldern `key` und `secret`
//! - `topickey:{alias}`     – Alias -> kanonische ID
//! - `topic:{id}:adressen`  – Presence-Menge der Verbindungs-Adressen
//!
//! Vor der ersten Registrierung existiert kein Datensatz; eine kanonische
//! ID loest trotzdem erfolgreich auf. Alle Datensaetze laufen nach dem
//! Aufbewahrungsfenster gemeinsam ab, sofern keine Relay-Aktivitaet sie
//! verlaengert.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use treffpunkt_core::{Result, TopicId, TreffpunktError};
use treffpunkt_store::KeyValueStore;

use crate::kennung::{ist_alias_wohlgeformt, TopicKennung};

/// Aufbewahrungsfenster aller Topic-Datensaetze: 2 Tage
pub const TOPIC_ABLAUF: Duration = Duration::from_secs(86_400 * 2);

// ---------------------------------------------------------------------------
// Store-Schluessel
// ---------------------------------------------------------------------------

/// Schluessel des Topic-Datensatzes (Hash: key, secret)
pub fn datensatz_schluessel(id: &str) -> String {
    format!("topic:{id}:datensatz")
}

/// Schluessel der Presence-Menge (Adressen der Verbindungen)
pub fn adressen_schluessel(id: &str) -> String {
    format!("topic:{id}:adressen")
}

/// Schluessel der Alias-Zuordnung (Alias -> kanonische ID)
pub fn alias_schluessel(alias: &str) -> String {
    format!("topickey:{alias}")
}

// ---------------------------------------------------------------------------
// Topic
// ---------------------------------------------------------------------------

/// Ein aufgeloestes Topic
#[derive(Debug, Clone)]
pub struct Topic {
    /// Kanonische ID
    pub id: String,
    /// Registrierter Alias, falls vorhanden
    pub key: Option<String>,
    /// Registriertes Secret, falls vorhanden – verlaesst den Kern nie
    pub secret: Option<String>,
    /// `true` wenn der Aufrufer die kanonische ID selbst kannte,
    /// `false` wenn er ueber den Alias kam
    pub kanonisch_gefunden: bool,
}

impl Topic {
    /// Oeffentliche Felder fuer Antworten an den Client (nie das Secret)
    pub fn oeffentlich(&self) -> TopicInfo {
        TopicInfo {
            id: self.id.clone(),
            key: self.key.clone(),
        }
    }
}

/// Oeffentliche Topic-Felder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

// ---------------------------------------------------------------------------
// TopicDienst
// ---------------------------------------------------------------------------

/// Dienst fuer Aufloesung, Registrierung und Verlaengerung von Topics
///
/// Haelt den geteilten Store; alle Methoden sind nebenlaeufig aufrufbar.
pub struct TopicDienst {
    store: Arc<dyn KeyValueStore>,
    ablauf: Duration,
}

impl TopicDienst {
    /// Erstellt einen neuen TopicDienst
    pub fn neu(store: Arc<dyn KeyValueStore>, ablauf: Duration) -> Self {
        Self { store, ablauf }
    }

    /// Erzeugt eine frische kanonische Topic-ID
    pub fn id_generieren(&self) -> String {
        TopicId::generieren().0
    }

    /// Gibt das konfigurierte Aufbewahrungsfenster zurueck
    pub fn ablauf(&self) -> Duration {
        self.ablauf
    }

    /// Loest eine Kennung zu einem Topic auf
    ///
    /// Ein Alias ohne Zuordnung ist `NichtGefunden`; eine kanonische ID
    /// loest auch ohne bestehenden Datensatz erfolgreich auf (frisches
    /// Topic). Nebenwirkungsfrei, beliebig wiederholbar.
    pub async fn aufloesen(&self, kennung: &TopicKennung) -> Result<Topic> {
        let (id, kanonisch_gefunden) = match kennung {
            TopicKennung::Alias(alias) => {
                match self.store.lesen(&alias_schluessel(alias)).await? {
                    Some(id) => (id, false),
                    None => {
                        return Err(TreffpunktError::NichtGefunden(format!(
                            "Kein Topic mit der ID '{alias}'"
                        )))
                    }
                }
            }
            TopicKennung::Kanonisch(id) => (id.clone(), true),
        };

        let felder = self.store.hash_alle(&datensatz_schluessel(&id)).await?;
        Ok(Topic {
            id,
            key: felder.get("key").cloned(),
            secret: felder.get("secret").cloned(),
            kanonisch_gefunden,
        })
    }

    /// Registriert Alias und Secret fuer ein Topic (create-once)
    ///
    /// Es gibt bewusst keinen Aenderungspfad: ohne Anmeldemechanismus
    /// liesse sich eine Aenderung nicht sicher autorisieren. Ein einmal
    /// gebundener Alias kann nie auf ein anderes Topic zeigen, ein einmal
    /// gesetztes Key+Secret nie ersetzt werden.
    pub async fn registrieren(&self, id: &str, key: &str, secret: &str) -> Result<()> {
        if secret.is_empty() {
            return Err(TreffpunktError::eingabe(
                "Ohne Secret kann kein Alias registriert werden",
            ));
        }
        if !ist_alias_wohlgeformt(key) {
            return Err(TreffpunktError::eingabe(
                "Die ID muss 5-32 Zeichen aus Buchstaben, Ziffern, Bindestrich \
                 oder Unterstrich sein – am besten einfache, gut merkbare Woerter",
            ));
        }

        // Create-once: weder darf der Alias schon vergeben sein, noch das
        // Topic bereits ein Key+Secret tragen
        match self.aufloesen(&TopicKennung::Alias(key.to_string())).await {
            Ok(bestehend) => {
                tracing::debug!(alias = key, topic = %bestehend.id, "Alias bereits gebunden");
                return Err(TreffpunktError::Konflikt(
                    "Diese ID ist bereits vergeben, bitte eine andere waehlen. \
                     (Fuer ein neues Secret bitte ein neues Topic anlegen.)"
                        .into(),
                ));
            }
            Err(TreffpunktError::NichtGefunden(_)) => {}
            Err(e) => return Err(e),
        }
        let bestehend = self.store.hash_alle(&datensatz_schluessel(id)).await?;
        if bestehend.contains_key("key") {
            return Err(TreffpunktError::Konflikt(
                "Dieses Topic traegt bereits einen Alias mit Secret".into(),
            ));
        }

        // Alias-Zuordnung anlegen, dann Key+Secret persistieren.
        // Die beiden Schritte sind nicht transaktional (siehe DESIGN.md).
        self.store
            .schreiben(&alias_schluessel(key), id, Some(self.ablauf))
            .await?;
        self.store
            .hash_schreiben(
                &datensatz_schluessel(id),
                HashMap::from([
                    ("key".to_string(), key.to_string()),
                    ("secret".to_string(), secret.to_string()),
                ]),
            )
            .await?;
        self.store
            .ablauf_setzen(&datensatz_schluessel(id), self.ablauf)
            .await?;

        tracing::info!(topic = id, alias = key, "Alias registriert");
        Ok(())
    }

    /// Setzt das Ablauffenster aller Datensaetze eines Topics zurueck
    ///
    /// Wird ausschliesslich durch Relay-Aktivitaet ausgeloest und ist der
    /// einzige Mechanismus, der die Topic-Lebensdauer verlaengert.
    /// Store-Fehler werden nur geloggt.
    pub async fn erneuern(&self, topic: &Topic) {
        let mut schluessel = vec![
            adressen_schluessel(&topic.id),
            datensatz_schluessel(&topic.id),
        ];
        if let Some(key) = &topic.key {
            schluessel.push(alias_schluessel(key));
        }

        for s in schluessel {
            if let Err(e) = self.store.ablauf_setzen(&s, self.ablauf).await {
                tracing::warn!(schluessel = %s, fehler = %e, "Verlaengerung fehlgeschlagen");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
