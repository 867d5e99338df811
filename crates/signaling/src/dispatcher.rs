//! Signal-Dispatcher – Routet eingehende Frames an das Relay
//!
//! Der Dispatcher empfaengt Frames von einer ClientConnection, loest die
//! Topic-Kennung auf, prueft die Session-Freigabe und waehlt die
//! Relay-Operation:
//!
//! - `request` wird immer rundgesendet
//! - `offer`/`answer`/`ice` gehen gezielt an den Empfaenger-Token und
//!   fallen ohne Empfaenger auf Rundsenden zurueck
//!
//! Der Signaling-Kanal ist ein reiner Push-Pfad: Fehler werden geloggt
//! und der Frame verworfen, es gibt keine Antwort an den Absender.

use std::sync::Arc;

use treffpunkt_protocol::RelayFrame;
use treffpunkt_topic::{zugriff, TopicKennung};

use crate::server_state::SignalingState;

/// Zentraler Dispatcher fuer Signaling-Frames
pub struct SignalDispatcher {
    state: Arc<SignalingState>,
}

impl SignalDispatcher {
    /// Erstellt einen neuen Dispatcher
    pub fn neu(state: Arc<SignalingState>) -> Self {
        Self { state }
    }

    /// Verarbeitet einen eingehenden Frame der Verbindung `peer_adresse`
    pub async fn dispatch(&self, frame: RelayFrame, peer_adresse: &str) {
        let kennung = match TopicKennung::parse(&frame.topic) {
            Ok(kennung) => kennung,
            Err(e) => {
                tracing::warn!(peer = peer_adresse, fehler = %e, "Ungueltige Topic-Kennung");
                return;
            }
        };

        let topic = match self.state.themen.aufloesen(&kennung).await {
            Ok(topic) => topic,
            Err(e) => {
                tracing::warn!(peer = peer_adresse, kennung = %kennung, fehler = %e,
                    "Topic-Aufloesung fehlgeschlagen");
                return;
            }
        };

        // Die Freigabe muss vorab ueber die Zugriffs-Endpunkte erteilt
        // worden sein; das Relay selbst prueft danach nichts mehr
        if let Err(e) =
            zugriff::authentifizieren(&topic, &self.state.sitzungen, &frame.sid).await
        {
            tracing::warn!(peer = peer_adresse, topic = %topic.id, fehler = %e,
                "Frame ohne Freigabe verworfen");
            return;
        }

        let ergebnis = if frame.kind.ist_rundruf() || frame.signal.receiver.is_none() {
            self.state
                .relay
                .rundsenden(&topic, peer_adresse, frame.kind, frame.signal)
                .await
                .map(|_| ())
        } else {
            self.state
                .relay
                .gezielt_senden(&topic, peer_adresse, frame.kind, frame.signal)
                .await
                .map(|_| ())
        };

        if let Err(e) = ergebnis {
            tracing::warn!(peer = peer_adresse, topic = %topic.id, fehler = %e,
                "Relay-Operation fehlgeschlagen");
        }
    }
}
