//! Client-Connection – Verwaltet eine einzelne TCP-Verbindung
//!
//! Jede TCP-Verbindung bekommt eine `ClientConnection` in einem eigenen
//! tokio-Task. Die Verbindung wird unter ihrer Peer-Adresse in der
//! ConnectionRegistry gefuehrt; unter derselben Adresse steht sie in den
//! Presence-Mengen der Topics, in die sie rundgesendet hat.
//!
//! Es gibt bewusst keinen Keepalive: Liveness wird lazy beim naechsten
//! Zustellversuch des Relays entdeckt. Beim Verbindungsende wird nur die
//! Registry bereinigt – Presence-Eintraege bleiben stehen, bis das Relay
//! sie beim naechsten Rundruf entfernt oder das Topic ablaeuft.

use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

use treffpunkt_protocol::FrameCodec;

use crate::dispatcher::SignalDispatcher;
use crate::server_state::SignalingState;

/// Verarbeitet eine einzelne TCP-Verbindung
///
/// Liest Frames via `FrameCodec`, dispatcht an den `SignalDispatcher` und
/// schreibt Frames aus der Send-Queue zurueck. Laeuft in einem eigenen
/// tokio-Task.
pub struct ClientConnection {
    state: Arc<SignalingState>,
    peer_addr: SocketAddr,
}

impl ClientConnection {
    /// Erstellt eine neue ClientConnection
    pub fn neu(state: Arc<SignalingState>, peer_addr: SocketAddr) -> Self {
        Self { state, peer_addr }
    }

    /// Startet die Verbindungs-Verarbeitungsschleife
    ///
    /// Diese Methode laeuft bis die Verbindung getrennt wird oder ein
    /// Shutdown-Signal eingeht.
    pub async fn verarbeiten(
        self,
        stream: TcpStream,
        mut shutdown_rx: tokio::sync::watch::Receiver<bool>,
    ) {
        let adresse = self.peer_addr.to_string();
        tracing::info!(peer = %adresse, "Neue Signaling-Verbindung");

        // Framed-Stream mit FrameCodec einrichten
        let mut framed = Framed::new(stream, FrameCodec::neu());

        // Send-Queue in der Registry anlegen (Relay -> TCP)
        let mut sende_rx = self.state.registry.registrieren(&adresse);

        let dispatcher = SignalDispatcher::neu(Arc::clone(&self.state));

        loop {
            tokio::select! {
                // Eingehender Frame vom Client
                frame = framed.next() => {
                    match frame {
                        Some(Ok(frame)) => {
                            tracing::trace!(peer = %adresse, topic = %frame.topic, "Frame empfangen");
                            dispatcher.dispatch(frame, &adresse).await;
                        }
                        Some(Err(e)) => {
                            tracing::warn!(peer = %adresse, fehler = %e, "Frame-Lesefehler");
                            break;
                        }
                        None => {
                            tracing::info!(peer = %adresse, "Verbindung vom Client getrennt");
                            break;
                        }
                    }
                }

                // Ausgehender Frame aus dem Relay
                Some(ausgehend) = sende_rx.recv() => {
                    if let Err(e) = framed.send(ausgehend).await {
                        tracing::warn!(peer = %adresse, fehler = %e, "Senden fehlgeschlagen");
                        break;
                    }
                }

                // Shutdown-Signal
                Ok(()) = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        tracing::info!(peer = %adresse, "Shutdown-Signal – Verbindung wird getrennt");
                        break;
                    }
                }
            }
        }

        // Nur die Registry bereinigen; Presence-Eintraege werden lazy
        // vom Relay entfernt
        self.state.registry.entfernen(&adresse);
        tracing::info!(peer = %adresse, "Verbindungs-Task beendet");
    }
}
