//! Signalisierungs-Nachrichten
//!
//! Eine Signalisierungs-Nachricht ist eine fluechtige Einheit Relay-Verkehr:
//! ein Typ-Tag, eine opake Payload und desensibilisierte Absender-/
//! Empfaenger-Tokens. Sie wird nie persistiert.
//!
//! ## Design
//! - JSON-Serialisierung via serde (Signaling ist nicht zeitkritisch)
//! - Die Payload bleibt `serde_json::Value` – das Relay inspiziert sie nie
//! - `sid` traegt die Session-ID des Absenders im Frame-Umschlag
//!   (Client -> Server); auf weitergeleiteten Frames ist sie leer

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Nachrichten-Arten
// ---------------------------------------------------------------------------

/// Art einer Signalisierungs-Nachricht
///
/// `Request` wird immer an alle anderen Topic-Mitglieder verteilt;
/// `Offer`/`Answer`/`Ice` gehen gezielt an den angegebenen Empfaenger
/// und fallen ohne Empfaenger auf Rundsenden zurueck. Das Relay
/// interpretiert die Arten nicht weiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Request,
    Offer,
    Answer,
    Ice,
}

impl SignalKind {
    /// Gibt `true` zurueck wenn diese Art immer rundgesendet wird
    pub fn ist_rundruf(&self) -> bool {
        matches!(self, Self::Request)
    }
}

// ---------------------------------------------------------------------------
// SignalMessage
// ---------------------------------------------------------------------------

/// Eine Signalisierungs-Nachricht
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalMessage {
    /// Opake Payload – wird unveraendert weitergereicht
    pub payload: serde_json::Value,
    /// Desensibilisierte Absender-Adresse (setzt das Relay)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    /// Desensibilisierte Empfaenger-Adresse (fuer gezielte Zustellung)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
}

impl SignalMessage {
    /// Erstellt eine Nachricht ohne Adress-Tokens
    pub fn neu(payload: serde_json::Value) -> Self {
        Self {
            payload,
            sender: None,
            receiver: None,
        }
    }

    /// Erstellt eine gezielte Nachricht an den gegebenen Empfaenger-Token
    pub fn an(payload: serde_json::Value, receiver: impl Into<String>) -> Self {
        Self {
            payload,
            sender: None,
            receiver: Some(receiver.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// RelayFrame
// ---------------------------------------------------------------------------

/// Frame-Umschlag des Signaling-Kanals
///
/// Traegt neben der eigentlichen Nachricht die Topic-Kennung (kanonische ID
/// oder Alias) und die Session-ID des Absenders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayFrame {
    /// Topic-Kennung, zu der die Nachricht gehoert
    pub topic: String,
    /// Art der Nachricht
    pub kind: SignalKind,
    /// Session-ID des Absenders; leer auf weitergeleiteten Frames
    #[serde(default)]
    pub sid: String,
    /// Die Signalisierungs-Nachricht selbst
    pub signal: SignalMessage,
}

impl RelayFrame {
    /// Erstellt einen neuen Frame
    pub fn neu(
        topic: impl Into<String>,
        kind: SignalKind,
        sid: impl Into<String>,
        signal: SignalMessage,
    ) -> Self {
        Self {
            topic: topic.into(),
            kind,
            sid: sid.into(),
            signal,
        }
    }

}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_tags_sind_kleingeschrieben() {
        assert_eq!(serde_json::to_string(&SignalKind::Request).unwrap(), "\"request\"");
        assert_eq!(serde_json::to_string(&SignalKind::Offer).unwrap(), "\"offer\"");
        assert_eq!(serde_json::to_string(&SignalKind::Answer).unwrap(), "\"answer\"");
        assert_eq!(serde_json::to_string(&SignalKind::Ice).unwrap(), "\"ice\"");
    }

    #[test]
    fn nur_request_ist_rundruf() {
        assert!(SignalKind::Request.ist_rundruf());
        assert!(!SignalKind::Offer.ist_rundruf());
        assert!(!SignalKind::Answer.ist_rundruf());
        assert!(!SignalKind::Ice.ist_rundruf());
    }

    #[test]
    fn frame_serde_round_trip() {
        let frame = RelayFrame::neu(
            "myroom",
            SignalKind::Offer,
            "sid-123",
            SignalMessage::an(json!({"sdp": "v=0"}), "203-abcdef1234"),
        );

        let json = serde_json::to_string(&frame).unwrap();
        let decoded: RelayFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.topic, "myroom");
        assert_eq!(decoded.kind, SignalKind::Offer);
        assert_eq!(decoded.sid, "sid-123");
        assert_eq!(decoded.signal.receiver.as_deref(), Some("203-abcdef1234"));
    }

    #[test]
    fn sid_ist_optional_im_wire_format() {
        let json = r#"{"topic":"t","kind":"request","signal":{"payload":null}}"#;
        let frame: RelayFrame = serde_json::from_str(json).unwrap();
        assert!(frame.sid.is_empty());
        assert!(frame.signal.sender.is_none());
    }
}
