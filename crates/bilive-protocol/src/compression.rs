//! Compression codec registry.
//!
//! Every frame header carries a 2-byte protocol tag naming how its body
//! is encoded. [`Protocol`] is the closed set of tags this client
//! understands and [`Protocol::codec`] looks up the [`Compression`]
//! strategy for a tag. `PlainText` and `PlainBinary` are both identity
//! transforms; they stay distinct because downstream they mark JSON text
//! versus a fixed-width big-endian integer.

use std::fmt;
use std::io::{Read, Write};

use serde::{Serialize, Serializer};

use crate::ProtocolError;

/// An encode/decode capability pair for one protocol tag.
///
/// `decode` must be pure: the same input always yields the same output
/// or the same error.
pub trait Compression: Send + Sync + 'static {
    /// Compresses `data`.
    fn encode(&self, data: &[u8]) -> std::io::Result<Vec<u8>>;

    /// Decompresses `data`. Malformed streams are an `Err`.
    fn decode(&self, data: &[u8]) -> std::io::Result<Vec<u8>>;
}

/// Pass-through codec for the two plain tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Compression for Identity {
    fn encode(&self, data: &[u8]) -> std::io::Result<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn decode(&self, data: &[u8]) -> std::io::Result<Vec<u8>> {
        Ok(data.to_vec())
    }
}

/// zlib-wrapped deflate (RFC 1950 container around RFC 1951 data).
#[derive(Debug, Clone, Copy, Default)]
pub struct Zlib;

impl Compression for Zlib {
    fn encode(&self, data: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data)?;
        encoder.finish()
    }

    fn decode(&self, data: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut out = Vec::with_capacity(data.len() * 4);
        flate2::read::ZlibDecoder::new(data).read_to_end(&mut out)?;
        Ok(out)
    }
}

/// Brotli stream codec.
#[derive(Debug, Clone, Copy)]
pub struct Brotli {
    /// Encoder quality, 0–11.
    pub quality: u32,
    /// Base-2 log of the sliding window, 10–24.
    pub lgwin: u32,
}

impl Brotli {
    const BUFFER_SIZE: usize = 4096;
}

impl Default for Brotli {
    fn default() -> Self {
        Self {
            quality: 5,
            lgwin: 22,
        }
    }
}

impl Compression for Brotli {
    fn encode(&self, data: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut writer = brotli::CompressorWriter::new(
            Vec::new(),
            Self::BUFFER_SIZE,
            self.quality,
            self.lgwin,
        );
        writer.write_all(data)?;
        Ok(writer.into_inner())
    }

    fn decode(&self, data: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut out = Vec::with_capacity(data.len() * 4);
        brotli::Decompressor::new(data, Self::BUFFER_SIZE).read_to_end(&mut out)?;
        Ok(out)
    }
}

static IDENTITY: Identity = Identity;
static ZLIB: Zlib = Zlib;
static BROTLI: Brotli = Brotli {
    quality: 5,
    lgwin: 22,
};

/// The protocol (compression) tag of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Uncompressed JSON text.
    PlainText,
    /// Uncompressed fixed-width binary (heartbeat-reply popularity).
    PlainBinary,
    /// zlib-compressed body, possibly a batch of frames.
    Deflate,
    /// Brotli-compressed body, possibly a batch of frames.
    Brotli,
}

impl Protocol {
    /// Every tag, in wire order.
    pub const ALL: [Protocol; 4] = [
        Protocol::PlainText,
        Protocol::PlainBinary,
        Protocol::Deflate,
        Protocol::Brotli,
    ];

    /// Looks up a tag by its wire value.
    ///
    /// # Errors
    /// [`ProtocolError::UnknownProtocol`] for anything but 0–3.
    pub fn from_u16(version: u16) -> Result<Self, ProtocolError> {
        match version {
            0 => Ok(Self::PlainText),
            1 => Ok(Self::PlainBinary),
            2 => Ok(Self::Deflate),
            3 => Ok(Self::Brotli),
            other => Err(ProtocolError::UnknownProtocol(other)),
        }
    }

    /// The wire value of this tag.
    pub fn as_u16(self) -> u16 {
        match self {
            Self::PlainText => 0,
            Self::PlainBinary => 1,
            Self::Deflate => 2,
            Self::Brotli => 3,
        }
    }

    /// The codec registered for this tag.
    pub fn codec(self) -> &'static dyn Compression {
        match self {
            Self::PlainText | Self::PlainBinary => &IDENTITY,
            Self::Deflate => &ZLIB,
            Self::Brotli => &BROTLI,
        }
    }

    /// Compresses `data` with this tag's codec.
    pub fn encode(self, data: &[u8]) -> Result<Vec<u8>, ProtocolError> {
        self.codec()
            .encode(data)
            .map_err(|source| ProtocolError::EncodeFailed {
                protocol: self,
                source,
            })
    }

    /// Decompresses `data` with this tag's codec.
    ///
    /// # Errors
    /// [`ProtocolError::DecodeFailed`] when the stream is malformed.
    pub fn decode(self, data: &[u8]) -> Result<Vec<u8>, ProtocolError> {
        self.codec()
            .decode(data)
            .map_err(|source| ProtocolError::DecodeFailed {
                protocol: self,
                source,
            })
    }
}

impl TryFrom<u16> for Protocol {
    type Error = ProtocolError;

    fn try_from(version: u16) -> Result<Self, Self::Error> {
        Self::from_u16(version)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PlainText => "plain-text",
            Self::PlainBinary => "plain-binary",
            Self::Deflate => "deflate",
            Self::Brotli => "brotli",
        };
        f.write_str(name)
    }
}

/// Serialized as its wire number (the `protover` field of the auth JSON).
impl Serialize for Protocol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = br#"{"cmd":"DANMU_MSG","info":[[0,1,25,16777215],"hello"]}"#;

    #[test]
    fn test_wire_values_round_trip() {
        for protocol in Protocol::ALL {
            assert_eq!(Protocol::from_u16(protocol.as_u16()).unwrap(), protocol);
        }
        assert_eq!(Protocol::Brotli.as_u16(), 3);
    }

    #[test]
    fn test_unknown_tag_is_an_error() {
        let err = Protocol::from_u16(4).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownProtocol(4)));
        assert!(Protocol::try_from(0xffff).is_err());
    }

    #[test]
    fn test_plain_tags_are_identity() {
        for protocol in [Protocol::PlainText, Protocol::PlainBinary] {
            assert_eq!(protocol.encode(SAMPLE).unwrap(), SAMPLE);
            assert_eq!(protocol.decode(SAMPLE).unwrap(), SAMPLE);
        }
    }

    #[test]
    fn test_deflate_is_zlib_wrapped() {
        let compressed = Protocol::Deflate.encode(SAMPLE).unwrap();
        // zlib header: CM = 8 (deflate), header checksum divisible by 31.
        assert_eq!(compressed[0] & 0x0f, 8);
        assert_eq!((u16::from(compressed[0]) * 256 + u16::from(compressed[1])) % 31, 0);
        assert_eq!(Protocol::Deflate.decode(&compressed).unwrap(), SAMPLE);
    }

    #[test]
    fn test_brotli_compresses_and_restores() {
        let compressed = Protocol::Brotli.encode(SAMPLE).unwrap();
        assert_ne!(compressed, SAMPLE);
        assert_eq!(Protocol::Brotli.decode(&compressed).unwrap(), SAMPLE);
    }

    #[test]
    fn test_corrupt_deflate_reports_decode_failed() {
        let err = Protocol::Deflate.decode(b"this is not a zlib stream").unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::DecodeFailed {
                protocol: Protocol::Deflate,
                ..
            }
        ));
    }

    #[test]
    fn test_protocol_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Protocol::Deflate).unwrap(), "2");
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Protocol::PlainText.to_string(), "plain-text");
        assert_eq!(Protocol::Brotli.to_string(), "brotli");
    }
}
