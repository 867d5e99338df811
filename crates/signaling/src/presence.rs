//! Presence-Verzeichnis – Wer gehoert gerade zu welchem Topic
//!
//! Pro Topic haelt der Shared Store eine Menge von Verbindungs-Adressen.
//! Eine Adresse kommt beim ersten Rundruf der Verbindung hinzu
//! (join-on-send) und verschwindet erst wieder, wenn ein Zustellversuch
//! keine lebende Verbindung mehr findet (lazy) oder das Topic ablaeuft.
//! Es gibt bewusst kein explizites Verlassen und keinen Aufraeum-Timer.

use std::sync::Arc;

use treffpunkt_core::Result;
use treffpunkt_store::KeyValueStore;
use treffpunkt_topic::topic::{adressen_schluessel, Topic};
use treffpunkt_topic::TopicDienst;

/// Presence-Verzeichnis ueber dem Shared Store
///
/// Clone teilt Store und Dienst.
#[derive(Clone)]
pub struct PresenceDirectory {
    store: Arc<dyn KeyValueStore>,
    themen: Arc<TopicDienst>,
}

impl PresenceDirectory {
    /// Erstellt ein neues Presence-Verzeichnis
    pub fn neu(store: Arc<dyn KeyValueStore>, themen: Arc<TopicDienst>) -> Self {
        Self { store, themen }
    }

    /// Nimmt eine Adresse in die Presence-Menge des Topics auf (idempotent)
    ///
    /// Presence-Aktivitaet ist der einzige Mechanismus, der die Lebensdauer
    /// eines Topics verlaengert – der Beitritt setzt deshalb das
    /// Ablauffenster aller zugehoerigen Datensaetze zurueck.
    pub async fn beitreten(&self, topic: &Topic, adresse: &str) -> Result<()> {
        self.store
            .menge_hinzufuegen(&adressen_schluessel(&topic.id), adresse)
            .await?;
        self.themen.erneuern(topic).await;
        Ok(())
    }

    /// Momentaufnahme der Presence-Menge eines Topics
    pub async fn mitglieder(&self, topic_id: &str) -> Result<Vec<String>> {
        Ok(self
            .store
            .menge_mitglieder(&adressen_schluessel(topic_id))
            .await?)
    }

    /// Entfernt eine Adresse aus der Presence-Menge
    ///
    /// Wird ausschliesslich vom Relay aufgerufen, wenn ein Zustellversuch
    /// keine lebende Verbindung mehr findet.
    pub async fn entfernen(&self, topic_id: &str, adresse: &str) -> Result<()> {
        self.store
            .menge_entfernen(&adressen_schluessel(topic_id), adresse)
            .await?;
        tracing::debug!(topic = topic_id, adresse, "Tote Adresse aus Presence entfernt");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
