//! Gemeinsamer Server-Zustand fuer den Signaling-Service
//!
//! Haelt alle geteilten Dienste als Arc-Referenzen, die sicher zwischen
//! tokio-Tasks geteilt werden koennen.

use std::sync::Arc;

use treffpunkt_session::SessionStore;
use treffpunkt_store::KeyValueStore;
use treffpunkt_topic::TopicDienst;

use crate::presence::PresenceDirectory;
use crate::registry::ConnectionRegistry;
use crate::relay::SignalRelay;

/// Konfiguration fuer den Signaling-Service
#[derive(Debug, Clone)]
pub struct SignalingConfig {
    /// Maximale gleichzeitige Signaling-Verbindungen
    pub max_verbindungen: u32,
}

impl Default for SignalingConfig {
    fn default() -> Self {
        Self {
            max_verbindungen: 512,
        }
    }
}

/// Gemeinsamer Server-Zustand (thread-safe, Arc-geteilt)
pub struct SignalingState {
    /// Service-Konfiguration
    pub config: SignalingConfig,
    /// Topic-Dienst (Aufloesung, Registrierung, Verlaengerung)
    pub themen: Arc<TopicDienst>,
    /// Session-Store (Freigabe-Flags der Aufrufer)
    pub sitzungen: Arc<SessionStore>,
    /// Lebende Verbindungen nach Peer-Adresse
    pub registry: ConnectionRegistry,
    /// Relay (Rundsenden + gezielte Zustellung)
    pub relay: SignalRelay,
}

impl SignalingState {
    /// Erstellt einen neuen SignalingState
    pub fn neu(
        config: SignalingConfig,
        store: Arc<dyn KeyValueStore>,
        themen: Arc<TopicDienst>,
        sitzungen: Arc<SessionStore>,
    ) -> Arc<Self> {
        let registry = ConnectionRegistry::neu();
        let presence = PresenceDirectory::neu(store, Arc::clone(&themen));
        let relay = SignalRelay::neu(presence, registry.clone());

        Arc::new(Self {
            config,
            themen,
            sitzungen,
            registry,
            relay,
        })
    }
}
