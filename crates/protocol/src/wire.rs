//! Wire-Format des Signaling-Kanals
//!
//! Ein Frame besteht aus einem u32-Laengenfeld (big-endian) gefolgt von
//! der JSON-kodierten Nachricht. Das Laengenfeld zaehlt nur die
//! Payload-Bytes. Der Codec begrenzt die Payload-Groesse, damit ein
//! einzelner Client den Server nicht zum Puffern beliebiger Datenmengen
//! zwingen kann.

use bytes::{Buf, BufMut, BytesMut};
use std::io;
use tokio_util::codec::{Decoder, Encoder};

use crate::signal::RelayFrame;

/// Maximale Payload-Groesse eines Frames: 1 MB
pub const MAX_FRAME_BYTES: usize = 1024 * 1024;

/// Groesse des Laengenfelds in Bytes
const LAENGE_BYTES: usize = 4;

/// Length-prefixed JSON-Codec fuer [`RelayFrame`]s
///
/// Wird mit `tokio_util::codec::Framed` auf den TCP-Stream gelegt.
#[derive(Debug, Clone)]
pub struct FrameCodec {
    limit: usize,
}

impl FrameCodec {
    /// Codec mit dem Standard-Limit von [`MAX_FRAME_BYTES`]
    pub fn neu() -> Self {
        Self {
            limit: MAX_FRAME_BYTES,
        }
    }

    /// Codec mit eigenem Payload-Limit
    pub fn mit_limit(limit: usize) -> Self {
        Self { limit }
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::neu()
    }
}

/// Liest das Laengenfeld, ohne den Puffer zu verbrauchen
fn laenge_lesen(src: &BytesMut) -> Option<usize> {
    if src.len() < LAENGE_BYTES {
        return None;
    }
    let mut kopf = &src[..LAENGE_BYTES];
    Some(kopf.get_u32() as usize)
}

fn protokoll_fehler(nachricht: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, nachricht)
}

impl Decoder for FrameCodec {
    type Item = RelayFrame;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> io::Result<Option<RelayFrame>> {
        let Some(laenge) = laenge_lesen(src) else {
            return Ok(None);
        };
        if laenge > self.limit {
            return Err(protokoll_fehler(format!(
                "Frame mit {laenge} Bytes ueberschreitet das Limit von {} Bytes",
                self.limit
            )));
        }

        let gesamt = LAENGE_BYTES + laenge;
        if src.len() < gesamt {
            src.reserve(gesamt - src.len());
            return Ok(None);
        }

        src.advance(LAENGE_BYTES);
        let payload = src.split_to(laenge);
        serde_json::from_slice(&payload)
            .map(Some)
            .map_err(|e| protokoll_fehler(format!("Unlesbarer Frame: {e}")))
    }
}

impl Encoder<RelayFrame> for FrameCodec {
    type Error = io::Error;

    fn encode(&mut self, frame: RelayFrame, dst: &mut BytesMut) -> io::Result<()> {
        let json = serde_json::to_vec(&frame)
            .map_err(|e| protokoll_fehler(format!("Frame nicht serialisierbar: {e}")))?;
        if json.len() > self.limit {
            return Err(protokoll_fehler(format!(
                "Frame mit {} Bytes ueberschreitet das Limit von {} Bytes",
                json.len(),
                self.limit
            )));
        }

        dst.reserve(LAENGE_BYTES + json.len());
        dst.put_u32(json.len() as u32);
        dst.extend_from_slice(&json);
        Ok(())
    }
}
