//! treffpunkt-store – Shared-Store-Abstraktion
//!
//! Alle Topic-, Alias- und Presence-Daten liegen in einem geteilten
//! Key-Value-Store mit Ablauf pro Schluessel. Der Kern bleibt dadurch ein
//! duenner Orchestrator ueber dieser Schnittstelle statt eigene Maps mit
//! eigenem Lebenszyklus zu verwalten.
//!
//! [`KeyValueStore`] definiert genau die Operationen, die der Kern
//! konsumiert; [`MemoryStore`] ist die mitgelieferte In-Memory-
//! Implementierung fuer Single-Instance-Betrieb.

pub mod error;
pub mod kv;
pub mod memory;

// Bequeme Re-Exporte
pub use error::{StoreError, StoreResult};
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
