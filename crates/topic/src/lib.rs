//! treffpunkt-topic – Topic-Identitaet, Registrierung und Zugriffskontrolle
//!
//! Ein Topic ist der Treffpunkt zweier (oder mehrerer) Parteien: eine
//! kanonische, nicht erratbare ID, optional ein kurzer menschenlesbarer
//! Alias mit Secret. Dieser Crate buendelt:
//!
//! - [`kennung`] – Aufloesung "Alias vs. kanonische ID", einmal an der
//!   Systemgrenze entschieden
//! - [`topic`] – Topic-Datensatz, Resolver, Registrierung (create-once)
//!   und Verlaengerung des Ablauffensters
//! - [`zugriff`] – Key+Secret-Pruefung und das sessiongebundene
//!   Freigabe-Flag

pub mod kennung;
pub mod topic;
pub mod zugriff;

// Bequeme Re-Exporte
pub use kennung::TopicKennung;
pub use topic::{Topic, TopicDienst, TopicInfo};
