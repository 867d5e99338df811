//! Fehlertypen fuer den Shared Store

use thiserror::Error;
use treffpunkt_core::TreffpunktError;

/// Fehlertyp fuer Store-Operationen
#[derive(Debug, Error)]
pub enum StoreError {
    /// Schluessel existiert, traegt aber einen anderen Werttyp
    #[error("Falscher Werttyp fuer Schluessel '{0}'")]
    FalscherTyp(String),

    /// Backend nicht erreichbar (relevant fuer externe Implementierungen)
    #[error("Store-Verbindung fehlgeschlagen: {0}")]
    Verbindung(String),

    /// Interner Fehler
    #[error("Interner Store-Fehler: {0}")]
    Intern(String),
}

/// Result-Typ fuer Store-Operationen
pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for TreffpunktError {
    fn from(e: StoreError) -> Self {
        TreffpunktError::Speicher(e.to_string())
    }
}
