//! Adress-Desensibilisierung
//!
//! Peer-Adressen werden nie im Klartext an andere Clients weitergegeben.
//! Stattdessen wird die Adresse am ersten Punkt in Netz-Praefix und
//! Host-Anteil zerlegt, der Host-Anteil gehasht und auf einen kurzen
//! Token gekuerzt: `praefix-token`. Empfaenger koennen damit "ist das der
//! Peer, dem ich antworte?" abgleichen, ohne die echte Adresse zu lernen.
//!
//! Die Abbildung ist deterministisch (gleiche Adresse -> gleicher Token,
//! sonst funktioniert die Korrelation ueber Nachrichten hinweg nicht)
//! und nicht umkehrbar.

use sha2::{Digest, Sha256};

/// Laenge des gekuerzten Hash-Tokens in Hex-Zeichen
const TOKEN_LAENGE: usize = 10;

/// Desensibilisiert eine Peer-Adresse zu einem stabilen opaken Token
///
/// Adressen ohne Punkt (z.B. IPv6-Literale) werden vollstaendig als
/// Host-Anteil behandelt; der Praefix bleibt dann leer.
pub fn desensibilisieren(adresse: &str) -> String {
    let (praefix, host) = match adresse.split_once('.') {
        Some((praefix, host)) => (praefix, host),
        None => ("", adresse),
    };

    let digest = Sha256::digest(host.as_bytes());
    let hex = hex::encode(digest);
    format!("{praefix}-{}", &hex[..TOKEN_LAENGE])
}
