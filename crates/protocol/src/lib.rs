//! treffpunkt-protocol – Nachrichten- und Wire-Format des Signaling-Kanals
//!
//! Definiert die Signalisierungs-Nachrichten, die zwischen Client und Relay
//! ausgetauscht werden, sowie das frame-basierte Wire-Format fuer die
//! TCP-Verbindung. Das Relay interpretiert die Payload nie – es leitet
//! adressierte Bytes weiter.

pub mod signal;
pub mod wire;

// Bequeme Re-Exporte
pub use signal::{RelayFrame, SignalKind, SignalMessage};
pub use wire::FrameCodec;
