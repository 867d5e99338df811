//! treffpunkt-server – Bibliotheks-Root
//!
//! Deklariert die Server-Module und verdrahtet alle Subsysteme:
//! Shared Store, Session-Store, Topic-Dienst, Signaling-Server und
//! REST-API.

pub mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use config::ServerConfig;
use treffpunkt_api::{ApiState, RestServer, RestServerKonfig};
use treffpunkt_session::SessionStore;
use treffpunkt_signaling::{SignalingConfig, SignalingServer, SignalingState};
use treffpunkt_store::{KeyValueStore, MemoryStore};
use treffpunkt_topic::TopicDienst;

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet alle Server-Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Shared Store und Session-Store anlegen (mit Cleanup-Tasks)
    /// 2. TCP-Listener fuer den Signaling-Kanal starten
    /// 3. REST-API starten
    /// 4. Auf Ctrl-C warten
    pub async fn starten(self) -> Result<()> {
        tracing::info!(
            server_name = %self.config.server.name,
            signaling = %self.config.signal_bind_adresse(),
            api = %self.config.api_bind_adresse(),
            "Server startet"
        );

        // Geteilte Dienste
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::neu_mit_cleanup());
        let sitzungen =
            SessionStore::neu_mit_cleanup(SessionStore::neu(self.config.sitzung.ttl_min));
        let themen = Arc::new(TopicDienst::neu(
            Arc::clone(&store),
            Duration::from_secs(self.config.themen.ablauf_sek),
        ));

        let state = SignalingState::neu(
            SignalingConfig {
                max_verbindungen: self.config.server.max_verbindungen,
            },
            store,
            Arc::clone(&themen),
            Arc::clone(&sitzungen),
        );

        // Shutdown-Signal fuer alle Verbindungs-Tasks
        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

        // Signaling-Server starten
        let signal_addr = self
            .config
            .signal_bind_adresse()
            .parse()
            .context("Ungueltige Signaling-Bind-Adresse")?;
        let signaling = SignalingServer::neu(Arc::clone(&state), signal_addr);
        tokio::spawn(async move {
            if let Err(e) = signaling.starten(shutdown_rx).await {
                tracing::error!(fehler = %e, "Signaling-Server beendet sich mit Fehler");
            }
        });

        // REST-API starten
        let api_addr = self
            .config
            .api_bind_adresse()
            .parse()
            .context("Ungueltige API-Bind-Adresse")?;
        let rest = RestServer::neu(RestServerKonfig {
            bind_addr: api_addr,
            cors_origins: self.config.api.cors_origins.clone(),
        });
        let api_state = ApiState::neu(themen, sitzungen);
        tokio::spawn(async move {
            if let Err(e) = rest.starten(api_state).await {
                tracing::error!(fehler = %e, "REST-Server beendet sich mit Fehler");
            }
        });

        tracing::info!("Server laeuft. Warte auf Shutdown-Signal (Ctrl-C)...");
        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
        let _ = shutdown_tx.send(true);

        Ok(())
    }
}
