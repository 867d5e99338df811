//! Topic-Kennungen – Alias oder kanonische ID
//!
//! Die Laenge der Kennung ist das einzige Unterscheidungsmerkmal zwischen
//! dem Alias-Namensraum (kurz, von Menschen getippt) und dem kanonischen
//! Namensraum (lang, maschinell erzeugt). Die Entscheidung faellt genau
//! einmal an der Systemgrenze; danach tragen alle Aufrufer den expliziten
//! Zwei-Varianten-Typ statt die Laenge erneut auszuwerten.

use treffpunkt_core::types::ALIAS_MAX_LAENGE;
use treffpunkt_core::{Result, TreffpunktError};

/// Untere Laengengrenze fuer wohlgeformte Aliase
pub const ALIAS_MIN_LAENGE: usize = 5;

/// Eine vom Client gelieferte Topic-Kennung, einmalig klassifiziert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicKennung {
    /// Kurzer, menschenlesbarer Alias – muss Key+Secret nachweisen
    Alias(String),
    /// Kanonische ID – ihr Besitz ist selbst der Berechtigungsnachweis
    Kanonisch(String),
}

impl TopicKennung {
    /// Klassifiziert eine rohe Kennung
    ///
    /// Umgebender Whitespace wird entfernt; eine leere Kennung ist ein
    /// Eingabefehler. Kennungen bis [`ALIAS_MAX_LAENGE`] Zeichen sind
    /// Alias-Kandidaten, alles Laengere ist eine kanonische ID.
    pub fn parse(roh: &str) -> Result<Self> {
        let kennung = roh.trim();
        if kennung.is_empty() {
            return Err(TreffpunktError::eingabe("Die ID darf nicht leer sein"));
        }
        if kennung.len() <= ALIAS_MAX_LAENGE {
            Ok(Self::Alias(kennung.to_string()))
        } else {
            Ok(Self::Kanonisch(kennung.to_string()))
        }
    }

    /// Gibt die rohe Kennung zurueck
    pub fn als_str(&self) -> &str {
        match self {
            Self::Alias(s) | Self::Kanonisch(s) => s,
        }
    }
}

impl std::fmt::Display for TopicKennung {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.als_str())
    }
}

/// Prueft ob ein Alias wohlgeformt ist: 5-32 Zeichen aus
/// Buchstaben, Ziffern, Unterstrich oder Bindestrich.
pub fn ist_alias_wohlgeformt(alias: &str) -> bool {
    (ALIAS_MIN_LAENGE..=ALIAS_MAX_LAENGE).contains(&alias.len())
        && alias
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
