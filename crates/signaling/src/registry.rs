//! Connection-Registry – Lebende Verbindungen nach Peer-Adresse
//!
//! Die Registry verwaltet die Send-Queues aller verbundenen Clients,
//! adressiert nach der Peer-Adresse der Verbindung. Das Relay schlaegt
//! hier nach, ob eine Presence-Adresse noch eine lebende Verbindung hat;
//! ein Fehlschlag ist das Signal fuer das lazy Entfernen des Eintrags.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use treffpunkt_protocol::RelayFrame;

// ---------------------------------------------------------------------------
// Konfiguration
// ---------------------------------------------------------------------------

/// Groesse der Send-Queue pro Verbindung
const SEND_QUEUE_GROESSE: usize = 64;

// ---------------------------------------------------------------------------
// ClientSender
// ---------------------------------------------------------------------------

/// Handle auf die Send-Queue einer verbundenen Gegenstelle
#[derive(Clone, Debug)]
pub struct ClientSender {
    pub adresse: String,
    pub tx: mpsc::Sender<RelayFrame>,
}

impl ClientSender {
    /// Reiht einen Frame nicht-blockierend zur Zustellung ein
    ///
    /// Gibt `false` zurueck wenn die Queue voll oder geschlossen ist –
    /// der Frame ist dann verloren (best-effort, at-most-once).
    pub fn senden(&self, frame: RelayFrame) -> bool {
        match self.tx.try_send(frame) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(adresse = %self.adresse, "Send-Queue voll – Frame verworfen");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(adresse = %self.adresse, "Send-Queue geschlossen (Verbindung weg)");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ConnectionRegistry
// ---------------------------------------------------------------------------

/// Registry aller lebenden Signaling-Verbindungen
///
/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand.
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    verbindungen: Arc<DashMap<String, ClientSender>>,
}

impl ConnectionRegistry {
    /// Erstellt eine neue leere Registry
    pub fn neu() -> Self {
        Self::default()
    }

    /// Registriert eine Verbindung und gibt ihre Empfangs-Queue zurueck
    ///
    /// Die `ClientConnection` liest aus dieser Queue und schreibt die
    /// Frames auf den Socket.
    pub fn registrieren(&self, adresse: &str) -> mpsc::Receiver<RelayFrame> {
        let (tx, rx) = mpsc::channel(SEND_QUEUE_GROESSE);
        let sender = ClientSender {
            adresse: adresse.to_string(),
            tx,
        };
        self.verbindungen.insert(adresse.to_string(), sender);
        tracing::debug!(adresse, "Verbindung registriert");
        rx
    }

    /// Entfernt eine Verbindung aus der Registry
    pub fn entfernen(&self, adresse: &str) {
        self.verbindungen.remove(adresse);
        tracing::debug!(adresse, "Verbindung aus Registry entfernt");
    }

    /// Schlaegt die lebende Verbindung zu einer Adresse nach
    pub fn verbindung(&self, adresse: &str) -> Option<ClientSender> {
        self.verbindungen.get(adresse).map(|e| e.clone())
    }

    /// Prueft ob eine Adresse eine lebende Verbindung hat
    pub fn ist_registriert(&self, adresse: &str) -> bool {
        self.verbindungen.contains_key(adresse)
    }

    /// Gibt die Anzahl der registrierten Verbindungen zurueck
    pub fn anzahl(&self) -> usize {
        self.verbindungen.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use treffpunkt_protocol::{SignalKind, SignalMessage};

    fn test_frame() -> RelayFrame {
        RelayFrame::neu("t", SignalKind::Request, "", SignalMessage::neu(json!(1)))
    }

    #[tokio::test]
    async fn registrieren_und_senden() {
        let registry = ConnectionRegistry::neu();
        let mut rx = registry.registrieren("203.0.113.7:40001");
        assert!(registry.ist_registriert("203.0.113.7:40001"));

        let verbindung = registry.verbindung("203.0.113.7:40001").expect("Verbindung erwartet");
        assert!(verbindung.senden(test_frame()));

        let empfangen = rx.try_recv().expect("Frame muss vorhanden sein");
        assert_eq!(empfangen.topic, "t");
    }

    #[tokio::test]
    async fn unbekannte_adresse_hat_keine_verbindung() {
        let registry = ConnectionRegistry::neu();
        assert!(registry.verbindung("198.51.100.1:1").is_none());
    }

    #[tokio::test]
    async fn entfernen_macht_adresse_unbekannt() {
        let registry = ConnectionRegistry::neu();
        let _rx = registry.registrieren("203.0.113.7:40001");
        registry.entfernen("203.0.113.7:40001");

        assert!(!registry.ist_registriert("203.0.113.7:40001"));
        assert_eq!(registry.anzahl(), 0);
    }

    #[tokio::test]
    async fn senden_auf_geschlossener_queue_schlaegt_fehl() {
        let registry = ConnectionRegistry::neu();
        let rx = registry.registrieren("203.0.113.7:40001");
        let verbindung = registry.verbindung("203.0.113.7:40001").unwrap();

        drop(rx);
        assert!(!verbindung.senden(test_frame()));
    }

    #[tokio::test]
    async fn volle_queue_verwirft_frames() {
        let registry = ConnectionRegistry::neu();
        let _rx = registry.registrieren("203.0.113.7:40001");
        let verbindung = registry.verbindung("203.0.113.7:40001").unwrap();

        for _ in 0..SEND_QUEUE_GROESSE {
            assert!(verbindung.senden(test_frame()));
        }
        // Die Queue ist voll – der naechste Frame wird verworfen, kein Fehler
        assert!(!verbindung.senden(test_frame()));
    }

    #[tokio::test]
    async fn clone_teilt_inneren_state() {
        let r1 = ConnectionRegistry::neu();
        let r2 = r1.clone();
        let _rx = r1.registrieren("203.0.113.7:40001");
        assert!(r2.ist_registriert("203.0.113.7:40001"));
    }
}
