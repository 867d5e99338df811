//! treffpunkt-signaling – Presence-Verzeichnis und Signaling-Relay
//!
//! Dieser Crate implementiert den Signaling-Kanal von Treffpunkt: er
//! verwaltet TCP-Verbindungen, fuehrt das Presence-Verzeichnis pro Topic
//! und leitet Signalisierungs-Nachrichten zwischen den Mitgliedern weiter.
//!
//! ## Architektur
//!
//! ```text
//! TCP Listener (SignalingServer)
//!     |
//!     v
//! ClientConnection (pro Verbindung ein Task)
//!     |
//!     v
//! SignalDispatcher
//!     |  Kennung aufloesen -> Session authentifizieren -> Route waehlen
//!     |
//!     +-- request            -> SignalRelay::rundsenden
//!     +-- offer/answer/ice   -> SignalRelay::gezielt_senden
//!                               (ohne Empfaenger: rundsenden)
//!
//! PresenceDirectory  – Wer gehoert gerade zu welchem Topic (im Shared Store)
//! ConnectionRegistry – Lebende Verbindungen, adressiert nach Peer-Adresse
//! ```
//!
//! Zustellung ist best-effort und fire-and-forget: tote Adressen werden
//! beim naechsten Zustellversuch lazy aus dem Presence-Verzeichnis
//! entfernt, es gibt keinen Heartbeat und keine Zustellgarantie.

pub mod adresse;
pub mod connection;
pub mod dispatcher;
pub mod presence;
pub mod registry;
pub mod relay;
pub mod server_state;
pub mod tcp;

// Bequeme Re-Exporte
pub use connection::ClientConnection;
pub use dispatcher::SignalDispatcher;
pub use presence::PresenceDirectory;
pub use registry::ConnectionRegistry;
pub use relay::SignalRelay;
pub use server_state::{SignalingConfig, SignalingState};
pub use tcp::SignalingServer;
