//! Integrationstests fuer den kompletten Rendezvous-Ablauf
//!
//! Faehrt den Signaling-Pfad ohne TCP: Verbindungen werden direkt in der
//! Registry angelegt, Frames laufen durch den Dispatcher wie von einer
//! ClientConnection angeliefert.

use std::sync::Arc;

use serde_json::json;
use treffpunkt_protocol::{RelayFrame, SignalKind, SignalMessage};
use treffpunkt_session::{SessionStore, SESSION_TTL_MIN};
use treffpunkt_signaling::adresse::desensibilisieren;
use treffpunkt_signaling::{SignalDispatcher, SignalingConfig, SignalingState};
use treffpunkt_store::{KeyValueStore, MemoryStore};
use treffpunkt_topic::topic::TOPIC_ABLAUF;
use treffpunkt_topic::{zugriff, TopicDienst, TopicKennung};

const ADRESSE_X: &str = "203.0.113.7:40001";
const ADRESSE_Y: &str = "198.51.100.9:40002";
const ADRESSE_TOT: &str = "192.0.2.55:40003";

fn aufbau() -> Arc<SignalingState> {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::neu());
    let themen = Arc::new(TopicDienst::neu(Arc::clone(&store), TOPIC_ABLAUF));
    let sitzungen = SessionStore::neu(SESSION_TTL_MIN);
    SignalingState::neu(SignalingConfig::default(), store, themen, sitzungen)
}

/// Loest eine Kennung auf und autorisiert die Session dafuer
async fn autorisieren(
    state: &Arc<SignalingState>,
    kennung: &str,
    sid: &str,
    key: &str,
    secret: &str,
) -> treffpunkt_topic::Topic {
    let topic = state
        .themen
        .aufloesen(&TopicKennung::parse(kennung).unwrap())
        .await
        .unwrap();
    zugriff::autorisieren(&topic, &state.sitzungen, sid, key, secret)
        .await
        .unwrap();
    topic
}

#[tokio::test]
async fn kompletter_rendezvous_ablauf() {
    let state = aufbau();
    let dispatcher = SignalDispatcher::neu(Arc::clone(&state));

    let mut rx_x = state.registry.registrieren(ADRESSE_X);
    let mut rx_y = state.registry.registrieren(ADRESSE_Y);

    // Topic anlegen und Alias registrieren
    let id = state.themen.id_generieren();
    state.themen.registrieren(&id, "myroom", "s3cret").await.unwrap();

    // Client X kommt ueber den Alias und weist Key+Secret nach
    let session_x = state.sitzungen.erstellen().await;
    let topic_x = autorisieren(&state, "myroom", &session_x.id, "myroom", "s3cret").await;
    assert_eq!(topic_x.id, id);
    assert!(!topic_x.kanonisch_gefunden);

    // X sendet einen Rundruf in den noch leeren Raum: keine Zustellung,
    // kein Fehler – aber X ist jetzt Mitglied
    dispatcher
        .dispatch(
            RelayFrame::neu(
                "myroom",
                SignalKind::Request,
                session_x.id.clone(),
                SignalMessage::neu(json!({"will": "reden"})),
            ),
            ADRESSE_X,
        )
        .await;
    assert!(rx_x.try_recv().is_err(), "X darf den eigenen Rundruf nicht erhalten");
    assert!(rx_y.try_recv().is_err());

    let mitglieder = state.relay.presence().mitglieder(&id).await.unwrap();
    assert_eq!(mitglieder, vec![ADRESSE_X.to_string()]);

    // Client Y kennt die kanonische ID – Autorisierung gelingt trivial
    let session_y = state.sitzungen.erstellen().await;
    let topic_y = autorisieren(&state, &id, &session_y.id, "", "").await;
    assert!(topic_y.kanonisch_gefunden);

    // Y schickt ein Offer gezielt an Xs Token
    dispatcher
        .dispatch(
            RelayFrame::neu(
                id.clone(),
                SignalKind::Offer,
                session_y.id.clone(),
                SignalMessage::an(json!({"sdp": "v=0"}), desensibilisieren(ADRESSE_X)),
            ),
            ADRESSE_Y,
        )
        .await;

    let offer = rx_x.try_recv().expect("X muss das Offer erhalten");
    assert_eq!(offer.kind, SignalKind::Offer);
    assert_eq!(offer.signal.payload, json!({"sdp": "v=0"}));
    assert_eq!(offer.signal.sender.as_deref(), Some(desensibilisieren(ADRESSE_Y).as_str()));
    assert!(offer.sid.is_empty(), "Weitergeleitete Frames tragen keine Session-ID");
    assert!(rx_y.try_recv().is_err(), "Das Offer geht nur an X");
}

#[tokio::test]
async fn rundruf_erreicht_alle_anderen_und_entfernt_tote() {
    let state = aufbau();
    let dispatcher = SignalDispatcher::neu(Arc::clone(&state));

    let mut rx_x = state.registry.registrieren(ADRESSE_X);
    let mut rx_y = state.registry.registrieren(ADRESSE_Y);

    let id = state.themen.id_generieren();
    let session_x = state.sitzungen.erstellen().await;
    let session_y = state.sitzungen.erstellen().await;
    let topic = autorisieren(&state, &id, &session_x.id, "", "").await;
    autorisieren(&state, &id, &session_y.id, "", "").await;

    // Y tritt per Rundruf bei; ausserdem steht eine tote Adresse im
    // Verzeichnis (Verbindung laengst weg)
    dispatcher
        .dispatch(
            RelayFrame::neu(id.clone(), SignalKind::Request, session_y.id.clone(),
                SignalMessage::neu(json!(1))),
            ADRESSE_Y,
        )
        .await;
    state.relay.presence().beitreten(&topic, ADRESSE_TOT).await.unwrap();

    // Rundruf von X: erreicht genau Y, die tote Adresse wird entfernt
    dispatcher
        .dispatch(
            RelayFrame::neu(id.clone(), SignalKind::Request, session_x.id.clone(),
                SignalMessage::neu(json!(2))),
            ADRESSE_X,
        )
        .await;

    let bei_y = rx_y.try_recv().expect("Y muss den Rundruf erhalten");
    assert_eq!(bei_y.signal.payload, json!(2));
    assert_eq!(bei_y.signal.receiver.as_deref(), Some(desensibilisieren(ADRESSE_Y).as_str()));
    assert!(rx_x.try_recv().is_err(), "X darf den eigenen Rundruf nicht erhalten");

    let mut mitglieder = state.relay.presence().mitglieder(&id).await.unwrap();
    mitglieder.sort();
    assert_eq!(mitglieder, vec![ADRESSE_Y.to_string(), ADRESSE_X.to_string()]);
    assert!(
        !mitglieder.contains(&ADRESSE_TOT.to_string()),
        "Tote Adressen bleiben nach dem Rundruf nicht im Verzeichnis"
    );
}

#[tokio::test]
async fn gezielte_zustellung_ohne_treffer_ist_stilles_noop() {
    let state = aufbau();
    let dispatcher = SignalDispatcher::neu(Arc::clone(&state));

    let mut rx_x = state.registry.registrieren(ADRESSE_X);

    let id = state.themen.id_generieren();
    let session = state.sitzungen.erstellen().await;
    autorisieren(&state, &id, &session.id, "", "").await;

    // Niemand traegt diesen Token – der Frame verschwindet kommentarlos
    dispatcher
        .dispatch(
            RelayFrame::neu(id, SignalKind::Answer, session.id.clone(),
                SignalMessage::an(json!({"sdp": "v=0"}), "203-0000000000")),
            ADRESSE_X,
        )
        .await;
    assert!(rx_x.try_recv().is_err());
}

#[tokio::test]
async fn offer_ohne_empfaenger_wird_rundgesendet() {
    let state = aufbau();
    let dispatcher = SignalDispatcher::neu(Arc::clone(&state));

    let mut rx_y = state.registry.registrieren(ADRESSE_Y);

    let id = state.themen.id_generieren();
    let session_x = state.sitzungen.erstellen().await;
    let session_y = state.sitzungen.erstellen().await;
    let topic = autorisieren(&state, &id, &session_x.id, "", "").await;
    autorisieren(&state, &id, &session_y.id, "", "").await;
    state.relay.presence().beitreten(&topic, ADRESSE_Y).await.unwrap();

    dispatcher
        .dispatch(
            RelayFrame::neu(id, SignalKind::Offer, session_x.id.clone(),
                SignalMessage::neu(json!({"sdp": "v=0"}))),
            ADRESSE_X,
        )
        .await;

    let bei_y = rx_y.try_recv().expect("Offer ohne Empfaenger geht an alle anderen");
    assert_eq!(bei_y.kind, SignalKind::Offer);
}

#[tokio::test]
async fn frame_ohne_freigabe_wird_verworfen() {
    let state = aufbau();
    let dispatcher = SignalDispatcher::neu(Arc::clone(&state));

    let mut rx_y = state.registry.registrieren(ADRESSE_Y);

    let id = state.themen.id_generieren();
    let session_y = state.sitzungen.erstellen().await;
    let topic = autorisieren(&state, &id, &session_y.id, "", "").await;
    state.relay.presence().beitreten(&topic, ADRESSE_Y).await.unwrap();

    // X hat nie autorisiert – der Rundruf darf Y nicht erreichen
    let session_x = state.sitzungen.erstellen().await;
    dispatcher
        .dispatch(
            RelayFrame::neu(id.clone(), SignalKind::Request, session_x.id.clone(),
                SignalMessage::neu(json!(1))),
            ADRESSE_X,
        )
        .await;

    assert!(rx_y.try_recv().is_err());
    let mitglieder = state.relay.presence().mitglieder(&id).await.unwrap();
    assert!(
        !mitglieder.contains(&ADRESSE_X.to_string()),
        "Ohne Freigabe auch kein Presence-Beitritt"
    );
}
