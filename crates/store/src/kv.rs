//! Key-Value-Store-Trait
//!
//! Die Schnittstelle entkoppelt den Kern von der konkreten Store-
//! Implementierung. Sie umfasst genau die Operationen, die Topic-Datensatz,
//! Alias-Zuordnung und Presence-Menge benoetigen: String-Werte, Hashes und
//! Mengen, jeweils mit Ablauf pro Schluessel.
//!
//! Einzelne Operationen sind atomar; Sequenzen ueber mehrere Schluessel
//! sind es ausdruecklich nicht (siehe Registrierungs-Race in DESIGN.md).

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::StoreResult;

/// Geteilter Key-Value-Store mit Ablauf pro Schluessel
///
/// Objekt-sicher, damit Dienste ein `Arc<dyn KeyValueStore>` halten koennen.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Liest einen String-Wert. `None` wenn der Schluessel fehlt oder abgelaufen ist.
    async fn lesen(&self, schluessel: &str) -> StoreResult<Option<String>>;

    /// Schreibt einen String-Wert, optional mit Ablauf.
    async fn schreiben(
        &self,
        schluessel: &str,
        wert: &str,
        ablauf: Option<Duration>,
    ) -> StoreResult<()>;

    /// Setzt Felder eines Hashes (Merge-Semantik, legt den Hash bei Bedarf an).
    async fn hash_schreiben(
        &self,
        schluessel: &str,
        felder: HashMap<String, String>,
    ) -> StoreResult<()>;

    /// Liest alle Felder eines Hashes. Leer wenn der Schluessel fehlt.
    async fn hash_alle(&self, schluessel: &str) -> StoreResult<HashMap<String, String>>;

    /// Fuegt ein Mitglied einer Menge hinzu (idempotent, legt die Menge bei Bedarf an).
    async fn menge_hinzufuegen(&self, schluessel: &str, mitglied: &str) -> StoreResult<()>;

    /// Entfernt ein Mitglied aus einer Menge. Fehlende Menge/Mitglied ist kein Fehler.
    async fn menge_entfernen(&self, schluessel: &str, mitglied: &str) -> StoreResult<()>;

    /// Gibt alle Mitglieder einer Menge zurueck. Leer wenn der Schluessel fehlt.
    async fn menge_mitglieder(&self, schluessel: &str) -> StoreResult<Vec<String>>;

    /// Setzt den Ablauf eines bestehenden Schluessels neu.
    /// Fehlende Schluessel werden still ignoriert.
    async fn ablauf_setzen(&self, schluessel: &str, ablauf: Duration) -> StoreResult<()>;
}
