//! Gemeinsame Identifikationstypen fuer Treffpunkt
//!
//! Die kanonische Topic-ID verwendet das Newtype-Pattern um Verwechslungen
//! mit Alias-Strings zur Compilezeit auszuschliessen.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Obere Laengengrenze des Alias-Namensraums.
///
/// Kennungen bis zu dieser Laenge werden als Alias-Kandidaten behandelt,
/// laengere als kanonische IDs. Der Generator unten muss deshalb immer
/// IDs oberhalb dieser Grenze erzeugen.
pub const ALIAS_MAX_LAENGE: usize = 32;

/// Kanonische, nicht erratbare Topic-ID
///
/// 64 Hex-Zeichen aus zwei aneinandergehaengten UUIDv4 – damit liegt die
/// Laenge sicher oberhalb von [`ALIAS_MAX_LAENGE`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicId(pub String);

impl TopicId {
    /// Erzeugt eine neue zufaellige TopicId
    pub fn generieren() -> Self {
        Self(format!(
            "{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        ))
    }

    /// Gibt die ID als String-Slice zurueck
    pub fn als_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TopicId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
