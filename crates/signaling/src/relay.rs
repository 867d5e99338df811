//! Signaling-Relay – Rundsenden und gezielte Zustellung
//!
//! Das Relay leitet Signalisierungs-Nachrichten ueber das Presence-
//! Verzeichnis weiter. Zustellung ist pro Ziel unabhaengig und
//! fire-and-forget: ein Fehlschlag bei einem Peer blockiert die anderen
//! nicht, und es gibt keine Zustellgarantie ueber "best-effort,
//! at-most-once pro Ziel und Aufruf" hinaus.
//!
//! Der Aufrufer (die Transportschicht) hat die Session bereits
//! authentifiziert – das Relay prueft keine Berechtigungen mehr.

use treffpunkt_core::Result;
use treffpunkt_protocol::{RelayFrame, SignalKind, SignalMessage};
use treffpunkt_topic::Topic;

use crate::adresse::desensibilisieren;
use crate::presence::PresenceDirectory;
use crate::registry::ConnectionRegistry;

/// Relay ueber Presence-Verzeichnis und Connection-Registry
///
/// Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct SignalRelay {
    presence: PresenceDirectory,
    registry: ConnectionRegistry,
}

impl SignalRelay {
    /// Erstellt ein neues Relay
    pub fn neu(presence: PresenceDirectory, registry: ConnectionRegistry) -> Self {
        Self { presence, registry }
    }

    /// Gibt das Presence-Verzeichnis zurueck
    pub fn presence(&self) -> &PresenceDirectory {
        &self.presence
    }

    /// Verteilt eine Nachricht an alle anderen Topic-Mitglieder
    ///
    /// Der Absender tritt dabei implizit der Presence-Menge bei
    /// (join-on-send, verlaengert das Topic). Adressen ohne lebende
    /// Verbindung werden lazy entfernt und uebersprungen. Null erreichte
    /// Peers sind kein Fehler. Gibt die Anzahl eingereihter Zustellungen
    /// zurueck.
    pub async fn rundsenden(
        &self,
        topic: &Topic,
        absender: &str,
        kind: SignalKind,
        mut signal: SignalMessage,
    ) -> Result<usize> {
        self.presence.beitreten(topic, absender).await?;
        let mitglieder = self.presence.mitglieder(&topic.id).await?;

        signal.sender = Some(desensibilisieren(absender));

        let mut eingereiht = 0;
        for adresse in mitglieder {
            if adresse == absender {
                continue;
            }

            let Some(verbindung) = self.registry.verbindung(&adresse) else {
                // Keine lebende Verbindung mehr – Eintrag lazy entfernen
                if let Err(e) = self.presence.entfernen(&topic.id, &adresse).await {
                    tracing::warn!(topic = %topic.id, adresse = %adresse, fehler = %e,
                        "Entfernen der toten Adresse fehlgeschlagen");
                }
                continue;
            };

            // Jeder Empfaenger bekommt seinen eigenen Token eingesetzt
            let mut kopie = signal.clone();
            kopie.receiver = Some(desensibilisieren(&adresse));
            if verbindung.senden(RelayFrame::neu(topic.id.as_str(), kind, "", kopie)) {
                eingereiht += 1;
            }
        }

        tracing::debug!(topic = %topic.id, anzahl = eingereiht, "Rundruf eingereiht");
        Ok(eingereiht)
    }

    /// Stellt eine Nachricht gezielt dem Mitglied mit passendem Token zu
    ///
    /// Durchsucht die Presence-Menge nach der Adresse, deren
    /// desensibilisierte Form dem Empfaenger-Token entspricht; die erste
    /// Uebereinstimmung zaehlt. Kein Treffer ist ein stilles No-op – der
    /// Peer kann sich schlicht getrennt haben. Gibt zurueck ob ein Frame
    /// eingereiht wurde.
    pub async fn gezielt_senden(
        &self,
        topic: &Topic,
        absender: &str,
        kind: SignalKind,
        mut signal: SignalMessage,
    ) -> Result<bool> {
        let Some(empfaenger) = signal.receiver.clone() else {
            return Ok(false);
        };

        signal.sender = Some(desensibilisieren(absender));

        let mitglieder = self.presence.mitglieder(&topic.id).await?;
        for adresse in mitglieder {
            if desensibilisieren(&adresse) != empfaenger {
                continue;
            }
            if let Some(verbindung) = self.registry.verbindung(&adresse) {
                let zugestellt = verbindung.senden(RelayFrame::neu(topic.id.as_str(), kind, "", signal));
                return Ok(zugestellt);
            }
            break;
        }

        tracing::debug!(topic = %topic.id, empfaenger = %empfaenger, "Gezielte Zustellung ohne Ziel");
        Ok(false)
    }
}
