//! Frame layer: the 16-byte header, body decompression and de-batching.
//!
//! Wire layout, all integers big-endian:
//!
//! ```text
//! 0        4      6      8          12         16
//! +--------+------+------+----------+----------+----------------+
//! | total  | hlen | ver  | opcode   | sequence | body ...       |
//! | u32    | u16  | u16  | u32      | u32      | total - hlen   |
//! +--------+------+------+----------+----------+----------------+
//! ```
//!
//! A server push may carry a compressed body that is itself a run of
//! complete frames. [`debatch`] speculatively re-parses every decompressed
//! body as such a run and keeps the outer frame when that fails.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::{Operation, Protocol, ProtocolError};

/// Size of the fixed frame header.
pub const HEADER_LENGTH: u16 = 16;

/// Sequence number written on every outbound frame.
pub const SEQUENCE: u32 = 1;

/// One protocol frame.
///
/// `total_length` is the value read from the wire (the compressed size
/// for compressed frames). It is recomputed by [`Frame::encode`], so a
/// frame built with [`Frame::new`] never needs it to be right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub total_length: u32,
    pub header_length: u16,
    pub protocol: Protocol,
    pub operation: Operation,
    pub sequence: u32,
    /// The body, decompressed when decoding succeeded.
    pub body: Bytes,
}

impl Frame {
    /// Builds an outbound frame with the default header fields.
    pub fn new(protocol: Protocol, operation: Operation, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        Self {
            total_length: total_length(body.len()).unwrap_or(u32::MAX),
            header_length: HEADER_LENGTH,
            protocol,
            operation,
            sequence: SEQUENCE,
            body,
        }
    }

    /// Reads one frame from `src` without touching its body.
    ///
    /// Consumes exactly `total_length` bytes on success.
    ///
    /// # Errors
    /// - [`ProtocolError::MalformedHeader`] with fewer than 16 bytes.
    /// - [`ProtocolError::InvalidLength`] when `total < hlen`.
    /// - [`ProtocolError::Truncated`] when the body runs past the buffer.
    /// - [`ProtocolError::UnknownProtocol`] / [`ProtocolError::UnknownOperation`]
    ///   for tags outside their registries.
    pub fn decode_raw<B: Buf>(src: &mut B) -> Result<Self, ProtocolError> {
        let received = src.remaining();
        if received < usize::from(HEADER_LENGTH) {
            return Err(ProtocolError::MalformedHeader { received });
        }

        let total_length = src.get_u32();
        let header_length = src.get_u16();
        let version = src.get_u16();
        let opcode = src.get_u32();
        let sequence = src.get_u32();

        if total_length < u32::from(header_length) {
            return Err(ProtocolError::InvalidLength {
                total: total_length,
                header: header_length,
            });
        }
        let declared = (total_length - u32::from(header_length)) as usize;
        if src.remaining() < declared {
            return Err(ProtocolError::Truncated {
                declared,
                available: src.remaining(),
            });
        }

        let protocol = Protocol::from_u16(version)?;
        let operation = Operation::from_u32(opcode)?;
        let body = src.copy_to_bytes(declared);

        Ok(Self {
            total_length,
            header_length,
            protocol,
            operation,
            sequence,
            body,
        })
    }

    /// Reads one frame from `src` and decompresses its body.
    ///
    /// # Errors
    /// Same as [`decode_raw`](Self::decode_raw). Decompression failure is
    /// not an error.
    pub fn decode<B: Buf>(src: &mut B) -> Result<Self, ProtocolError> {
        Self::decode_raw(src).map(Self::decompress)
    }

    /// Replaces the body with its decompressed form.
    ///
    /// If the codec rejects the body the raw bytes are kept.
    pub fn decompress(mut self) -> Self {
        if matches!(self.protocol, Protocol::PlainText | Protocol::PlainBinary) {
            return self;
        }
        match self.protocol.decode(&self.body) {
            Ok(data) => self.body = Bytes::from(data),
            Err(e) => {
                tracing::debug!(
                    operation = %self.operation,
                    len = self.body.len(),
                    error = %e,
                    "keeping raw frame body"
                );
            }
        }
        self
    }

    /// Serializes this frame, compressing the body with its protocol and
    /// recomputing `total_length`.
    ///
    /// # Errors
    /// [`ProtocolError::EncodeFailed`] if compression fails and
    /// [`ProtocolError::TooLarge`] if the result overflows the length field.
    pub fn encode(&self) -> Result<Bytes, ProtocolError> {
        let data = self.protocol.encode(&self.body)?;
        let total_length = total_length(data.len())?;

        let mut buf = BytesMut::with_capacity(usize::from(HEADER_LENGTH) + data.len());
        buf.put_u32(total_length);
        buf.put_u16(HEADER_LENGTH);
        buf.put_u16(self.protocol.as_u16());
        buf.put_u32(self.operation.as_u32());
        buf.put_u32(self.sequence);
        buf.put_slice(&data);
        Ok(buf.freeze())
    }
}

/// Header plus `body_len`, as the wire's 32-bit length field.
fn total_length(body_len: usize) -> Result<u32, ProtocolError> {
    let size = body_len.saturating_add(usize::from(HEADER_LENGTH));
    u32::try_from(size).map_err(|_| ProtocolError::TooLarge { size })
}

/// Decodes one transport chunk into its frames.
///
/// Each top-level frame in the chunk is decoded and its body is tried as a
/// run of nested frames. When every nested frame parses, they replace the
/// outer one; any failure discards the partial run and the outer frame is
/// emitted on its own.
///
/// # Errors
/// Only top-level header errors (see [`Frame::decode_raw`]).
pub fn debatch(chunk: &[u8]) -> Result<Vec<Frame>, ProtocolError> {
    let mut src = chunk;
    let mut frames = Vec::new();
    while src.has_remaining() {
        let outer = Frame::decode(&mut src)?;
        match split_batch(&outer.body) {
            Some(inner) => {
                tracing::trace!(count = inner.len(), "split batched frame");
                frames.extend(inner);
            }
            None => frames.push(outer),
        }
    }
    Ok(frames)
}

/// Parses `body` as back-to-back frames, all or nothing.
fn split_batch(body: &Bytes) -> Option<Vec<Frame>> {
    if body.is_empty() {
        return None;
    }
    let mut src = body.clone();
    let mut frames = Vec::new();
    while src.has_remaining() {
        match Frame::decode(&mut src) {
            Ok(frame) => frames.push(frame),
            Err(e) => {
                tracing::trace!(error = %e, parsed = frames.len(), "body is not a frame batch");
                return None;
            }
        }
    }
    Some(frames)
}
