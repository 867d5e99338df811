//! Fehlertypen fuer Treffpunkt
//!
//! Zentraler Fehler-Enum der alle moeglichen Fehlerzustaende abdeckt.
//! Untermodule koennen eigene Fehler definieren und via `#[from]` konvertieren.

use thiserror::Error;

/// Globaler Result-Alias fuer Treffpunkt
pub type Result<T> = std::result::Result<T, TreffpunktError>;

/// Alle moeglichen Fehler im Treffpunkt-System
#[derive(Debug, Error)]
pub enum TreffpunktError {
    // --- Eingaben ---
    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    // --- Aufloesung ---
    #[error("Nicht gefunden: {0}")]
    NichtGefunden(String),

    // --- Zugriff ---
    #[error("Zugriff verweigert")]
    Verboten,

    // --- Registrierung ---
    #[error("Konflikt: {0}")]
    Konflikt(String),

    // --- Shared Store ---
    #[error("Speicherfehler: {0}")]
    Speicher(String),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl TreffpunktError {
    /// Erstellt einen internen Fehler aus einer beliebigen Nachricht
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    /// Erstellt einen Eingabefehler aus einer beliebigen Nachricht
    pub fn eingabe(msg: impl Into<String>) -> Self {
        Self::UngueltigeEingabe(msg.into())
    }

    /// HTTP-Statuscode fuer die REST-Schicht
    pub fn http_status(&self) -> u16 {
        match self {
            Self::UngueltigeEingabe(_) => 400,
            Self::NichtGefunden(_) => 404,
            Self::Verboten => 403,
            Self::Konflikt(_) => 409,
            Self::Speicher(_) | Self::Intern(_) | Self::Anyhow(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fehler_anzeige() {
        let e = TreffpunktError::UngueltigeEingabe("ID darf nicht leer sein".into());
        assert_eq!(e.to_string(), "Ungueltige Eingabe: ID darf nicht leer sein");
    }

    #[test]
    fn http_status_zuordnung() {
        assert_eq!(TreffpunktError::eingabe("x").http_status(), 400);
        assert_eq!(TreffpunktError::NichtGefunden("x".into()).http_status(), 404);
        assert_eq!(TreffpunktError::Verboten.http_status(), 403);
        assert_eq!(TreffpunktError::Konflikt("x".into()).http_status(), 409);
        assert_eq!(TreffpunktError::intern("x").http_status(), 500);
    }
}
