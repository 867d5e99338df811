//! In-Memory-Store mit Ablauf pro Schluessel
//!
//! Standard-Backend fuer Single-Instance-Betrieb. Eintraege werden in einer
//! DashMap gehalten; abgelaufene Eintraege werden beim Zugriff entfernt,
//! zusaetzlich raeumt ein Hintergrund-Task periodisch auf.
//!
//! Thread-safe via Arc + DashMap. Jede Operation haelt genau einen
//! Eintrags-Lock – das ist die Atomaritaetsgarantie, auf die sich der Kern
//! verlaesst.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::kv::KeyValueStore;

/// Intervall fuer den automatischen Cleanup-Task: 5 Minuten
const CLEANUP_INTERVALL: Duration = Duration::from_secs(5 * 60);

/// Werttyp eines Eintrags
#[derive(Debug, Clone)]
enum Wert {
    Text(String),
    Hash(HashMap<String, String>),
    Menge(HashSet<String>),
}

impl Wert {
    fn typ_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Hash(_) => "hash",
            Self::Menge(_) => "menge",
        }
    }
}

/// Ein gespeicherter Eintrag mit optionalem Ablaufzeitpunkt
#[derive(Debug, Clone)]
struct Eintrag {
    wert: Wert,
    ablauf_um: Option<DateTime<Utc>>,
}

impl Eintrag {
    fn ist_abgelaufen(&self) -> bool {
        matches!(self.ablauf_um, Some(t) if t <= Utc::now())
    }
}

/// Rechnet eine std-Duration in einen absoluten Ablaufzeitpunkt um.
/// Nicht darstellbare Dauern gelten als "kein Ablauf".
fn ablauf_um(ablauf: Duration) -> Option<DateTime<Utc>> {
    chrono::Duration::from_std(ablauf)
        .ok()
        .map(|d| Utc::now() + d)
}

/// In-Memory Key-Value-Store
///
/// Clone teilt den inneren Zustand.
#[derive(Clone, Default)]
pub struct MemoryStore {
    eintraege: Arc<DashMap<String, Eintrag>>,
}

impl MemoryStore {
    /// Erstellt einen neuen leeren Store
    pub fn neu() -> Self {
        Self::default()
    }

    /// Erstellt einen neuen Store und startet den Cleanup-Task
    pub fn neu_mit_cleanup() -> Self {
        let store = Self::neu();
        let store_klon = store.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(CLEANUP_INTERVALL).await;
                let entfernt = store_klon.cleanup_abgelaufene();
                if entfernt > 0 {
                    tracing::debug!(anzahl = entfernt, "Abgelaufene Store-Eintraege bereinigt");
                }
            }
        });
        store
    }

    /// Entfernt alle abgelaufenen Eintraege und gibt deren Anzahl zurueck
    pub fn cleanup_abgelaufene(&self) -> usize {
        let vorher = self.eintraege.len();
        self.eintraege.retain(|_, e| !e.ist_abgelaufen());
        vorher - self.eintraege.len()
    }

    /// Gibt die Anzahl der (nicht bereinigten) Eintraege zurueck
    pub fn anzahl(&self) -> usize {
        self.eintraege.len()
    }

    /// Entfernt einen abgelaufenen Eintrag beim Zugriff und meldet ob der
    /// Schluessel danach noch existiert.
    fn lebendig(&self, schluessel: &str) -> bool {
        if let Some(e) = self.eintraege.get(schluessel) {
            if !e.ist_abgelaufen() {
                return true;
            }
        } else {
            return false;
        }
        self.eintraege.remove(schluessel);
        false
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn lesen(&self, schluessel: &str) -> StoreResult<Option<String>> {
        if !self.lebendig(schluessel) {
            return Ok(None);
        }
        match self.eintraege.get(schluessel) {
            Some(e) => match &e.wert {
                Wert::Text(s) => Ok(Some(s.clone())),
                andere => Err(StoreError::FalscherTyp(format!(
                    "{schluessel} ({})",
                    andere.typ_name()
                ))),
            },
            None => Ok(None),
        }
    }

    async fn schreiben(
        &self,
        schluessel: &str,
        wert: &str,
        ablauf: Option<Duration>,
    ) -> StoreResult<()> {
        self.eintraege.insert(
            schluessel.to_string(),
            Eintrag {
                wert: Wert::Text(wert.to_string()),
                ablauf_um: ablauf.and_then(ablauf_um),
            },
        );
        Ok(())
    }

    async fn hash_schreiben(
        &self,
        schluessel: &str,
        felder: HashMap<String, String>,
    ) -> StoreResult<()> {
        // Abgelaufene Eintraege vor dem Merge entfernen
        self.lebendig(schluessel);
        let mut eintrag = self
            .eintraege
            .entry(schluessel.to_string())
            .or_insert_with(|| Eintrag {
                wert: Wert::Hash(HashMap::new()),
                ablauf_um: None,
            });
        match &mut eintrag.wert {
            Wert::Hash(map) => {
                map.extend(felder);
                Ok(())
            }
            andere => Err(StoreError::FalscherTyp(format!(
                "{schluessel} ({})",
                andere.typ_name()
            ))),
        }
    }

    async fn hash_alle(&self, schluessel: &str) -> StoreResult<HashMap<String, String>> {
        if !self.lebendig(schluessel) {
            return Ok(HashMap::new());
        }
        match self.eintraege.get(schluessel) {
            Some(e) => match &e.wert {
                Wert::Hash(map) => Ok(map.clone()),
                andere => Err(StoreError::FalscherTyp(format!(
                    "{schluessel} ({})",
                    andere.typ_name()
                ))),
            },
            None => Ok(HashMap::new()),
        }
    }

    async fn menge_hinzufuegen(&self, schluessel: &str, mitglied: &str) -> StoreResult<()> {
        // Abgelaufene Eintraege vor dem Einfuegen entfernen
        self.lebendig(schluessel);
        let mut eintrag = self
            .eintraege
            .entry(schluessel.to_string())
            .or_insert_with(|| Eintrag {
                wert: Wert::Menge(HashSet::new()),
                ablauf_um: None,
            });
        match &mut eintrag.wert {
            Wert::Menge(menge) => {
                menge.insert(mitglied.to_string());
                Ok(())
            }
            andere => Err(StoreError::FalscherTyp(format!(
                "{schluessel} ({})",
                andere.typ_name()
            ))),
        }
    }

    async fn menge_entfernen(&self, schluessel: &str, mitglied: &str) -> StoreResult<()> {
        if !self.lebendig(schluessel) {
            return Ok(());
        }
        if let Some(mut e) = self.eintraege.get_mut(schluessel) {
            match &mut e.wert {
                Wert::Menge(menge) => {
                    menge.remove(mitglied);
                }
                andere => {
                    return Err(StoreError::FalscherTyp(format!(
                        "{schluessel} ({})",
                        andere.typ_name()
                    )))
                }
            }
        }
        Ok(())
    }

    async fn menge_mitglieder(&self, schluessel: &str) -> StoreResult<Vec<String>> {
        if !self.lebendig(schluessel) {
            return Ok(Vec::new());
        }
        match self.eintraege.get(schluessel) {
            Some(e) => match &e.wert {
                Wert::Menge(menge) => Ok(menge.iter().cloned().collect()),
                andere => Err(StoreError::FalscherTyp(format!(
                    "{schluessel} ({})",
                    andere.typ_name()
                ))),
            },
            None => Ok(Vec::new()),
        }
    }

    async fn ablauf_setzen(&self, schluessel: &str, ablauf: Duration) -> StoreResult<()> {
        if !self.lebendig(schluessel) {
            return Ok(());
        }
        if let Some(mut e) = self.eintraege.get_mut(schluessel) {
            e.ablauf_um = ablauf_um(ablauf);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn text_schreiben_und_lesen() {
        let store = MemoryStore::neu();
        store.schreiben("k", "wert", None).await.unwrap();
        assert_eq!(store.lesen("k").await.unwrap(), Some("wert".into()));
        assert_eq!(store.lesen("fehlt").await.unwrap(), None);
    }

    #[tokio::test]
    async fn text_laeuft_ab() {
        let store = MemoryStore::neu();
        store
            .schreiben("k", "wert", Some(Duration::from_millis(20)))
            .await
            .unwrap();
        assert!(store.lesen("k").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(store.lesen("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn hash_merge_semantik() {
        let store = MemoryStore::neu();
        store
            .hash_schreiben("h", HashMap::from([("a".into(), "1".into())]))
            .await
            .unwrap();
        store
            .hash_schreiben("h", HashMap::from([("b".into(), "2".into())]))
            .await
            .unwrap();

        let alle = store.hash_alle("h").await.unwrap();
        assert_eq!(alle.len(), 2);
        assert_eq!(alle.get("a"), Some(&"1".to_string()));
        assert_eq!(alle.get("b"), Some(&"2".to_string()));
    }

    #[tokio::test]
    async fn hash_fehlender_schluessel_ist_leer() {
        let store = MemoryStore::neu();
        assert!(store.hash_alle("fehlt").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn menge_hinzufuegen_ist_idempotent() {
        let store = MemoryStore::neu();
        store.menge_hinzufuegen("m", "a").await.unwrap();
        store.menge_hinzufuegen("m", "a").await.unwrap();
        store.menge_hinzufuegen("m", "b").await.unwrap();

        let mut mitglieder = store.menge_mitglieder("m").await.unwrap();
        mitglieder.sort();
        assert_eq!(mitglieder, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn menge_entfernen() {
        let store = MemoryStore::neu();
        store.menge_hinzufuegen("m", "a").await.unwrap();
        store.menge_entfernen("m", "a").await.unwrap();
        assert!(store.menge_mitglieder("m").await.unwrap().is_empty());

        // Fehlende Menge/Mitglied ist kein Fehler
        store.menge_entfernen("fehlt", "x").await.unwrap();
    }

    #[tokio::test]
    async fn ablauf_setzen_verlaengert() {
        let store = MemoryStore::neu();
        store
            .schreiben("k", "wert", Some(Duration::from_millis(20)))
            .await
            .unwrap();
        store
            .ablauf_setzen("k", Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(store.lesen("k").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn ablauf_setzen_auf_fehlendem_schluessel_ist_noop() {
        let store = MemoryStore::neu();
        store
            .ablauf_setzen("fehlt", Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(store.anzahl(), 0);
    }

    #[tokio::test]
    async fn falscher_typ_wird_gemeldet() {
        let store = MemoryStore::neu();
        store.schreiben("k", "text", None).await.unwrap();

        let ergebnis = store.menge_mitglieder("k").await;
        assert!(matches!(ergebnis, Err(StoreError::FalscherTyp(_))));
    }

    #[tokio::test]
    async fn cleanup_entfernt_abgelaufene() {
        let store = MemoryStore::neu();
        store
            .schreiben("a", "1", Some(Duration::from_millis(10)))
            .await
            .unwrap();
        store.schreiben("b", "2", None).await.unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(store.cleanup_abgelaufene(), 1);
        assert_eq!(store.anzahl(), 1);
    }

    #[tokio::test]
    async fn clone_teilt_inneren_state() {
        let s1 = MemoryStore::neu();
        let s2 = s1.clone();
        s1.schreiben("k", "wert", None).await.unwrap();
        assert_eq!(s2.lesen("k").await.unwrap(), Some("wert".into()));
    }
}
