// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Binary codec primitives and frame transport.
//!
//! Integers are big-endian. Strings are a u32 byte length followed by
//! UTF-8 bytes. Sequences are a u32 element count followed by the
//! elements. Enums travel as u32 ordinals. Decoding never panics on
//! malformed input; every failure is a [`ProtocolError`].

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::Command;

/// Upper bound on a single frame payload, checked before allocation.
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

// Echo payloads nest; a crafted frame must not recurse the decoder off
// the stack.
pub(crate) const MAX_NESTING: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Connection closed")]
    ConnectionClosed,
    #[error("Unknown command tag: {0:#04x}")]
    UnknownCommandTag(u8),
    #[error("Unknown {type_name} ordinal: {value}")]
    UnknownOrdinal { type_name: &'static str, value: u32 },
    #[error("Invalid bool byte: {0:#04x}")]
    InvalidBool(u8),
    #[error("Message counter mismatch: expected {expected}, got {got}")]
    CounterMismatch { expected: u64, got: u64 },
    #[error("Frame too large: {0} bytes")]
    FrameTooLarge(u64),
    #[error("Truncated frame")]
    Truncated,
    #[error("Trailing bytes after command")]
    TrailingBytes,
    #[error("Invalid UTF-8 in string field")]
    InvalidUtf8,
    #[error("Command nesting too deep")]
    NestingTooDeep,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Append a value's wire representation to `buf`. Field order is fixed
/// by each implementation and is the protocol contract.
pub(crate) trait Encode {
    fn encode_into(&self, buf: &mut Vec<u8>);
}

/// Read a value back from its wire representation.
pub(crate) trait Decode: Sized {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, ProtocolError>;
}

impl Encode for u32 {
    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_be_bytes());
    }
}

impl Decode for u32 {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, ProtocolError> {
        let bytes = reader.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

impl Encode for u64 {
    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.to_be_bytes());
    }
}

impl Decode for u64 {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, ProtocolError> {
        let bytes = reader.take(8)?;
        Ok(u64::from_be_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }
}

impl Encode for bool {
    fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.push(u8::from(*self));
    }
}

impl Decode for bool {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, ProtocolError> {
        match reader.take(1)?[0] {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(ProtocolError::InvalidBool(other)),
        }
    }
}

impl Encode for String {
    fn encode_into(&self, buf: &mut Vec<u8>) {
        (self.len() as u32).encode_into(buf);
        buf.extend_from_slice(self.as_bytes());
    }
}

impl Decode for String {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, ProtocolError> {
        let len = u32::decode_from(reader)? as usize;
        let bytes = reader.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| ProtocolError::InvalidUtf8)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode_into(&self, buf: &mut Vec<u8>) {
        (self.len() as u32).encode_into(buf);
        for item in self {
            item.encode_into(buf);
        }
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, ProtocolError> {
        let count = u32::decode_from(reader)? as usize;
        // No up-front reservation: a hostile count hits Truncated long
        // before it could exhaust memory.
        let mut items = Vec::new();
        for _ in 0..count {
            items.push(T::decode_from(reader)?);
        }
        Ok(items)
    }
}

/// Bounds-checked cursor over a frame payload.
pub(crate) struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0, depth: 0 }
    }

    pub(crate) fn take(&mut self, n: usize) -> Result<&'a [u8], ProtocolError> {
        let end = self.pos.checked_add(n).ok_or(ProtocolError::Truncated)?;
        if end > self.buf.len() {
            return Err(ProtocolError::Truncated);
        }
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn enter_nested(&mut self) -> Result<(), ProtocolError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(ProtocolError::NestingTooDeep);
        }
        Ok(())
    }

    pub(crate) fn exit_nested(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn finish(self) -> Result<(), ProtocolError> {
        if self.pos == self.buf.len() {
            Ok(())
        } else {
            Err(ProtocolError::TrailingBytes)
        }
    }
}

/// Encode a command to its payload bytes (no counter, no length prefix).
pub fn encode(command: &Command) -> Vec<u8> {
    let mut buf = Vec::with_capacity(64);
    command.encode_into(&mut buf);
    buf
}

/// Decode a command from payload bytes, requiring full consumption.
pub fn decode(bytes: &[u8]) -> Result<Command, ProtocolError> {
    let mut reader = Reader::new(bytes);
    let command = Command::decode_from(&mut reader)?;
    reader.finish()?;
    Ok(command)
}

/// Write one length-prefixed frame.
pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    if payload.len() > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge(payload.len() as u64));
    }
    writer.write_all(&(payload.len() as u32).to_be_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one length-prefixed frame. EOF at any point means the peer went
/// away and maps to [`ProtocolError::ConnectionClosed`].
pub async fn read_frame<R>(reader: &mut R) -> Result<Vec<u8>, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    read_exact_or_closed(reader, &mut len_buf).await?;
    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge(len as u64));
    }
    let mut payload = vec![0u8; len];
    read_exact_or_closed(reader, &mut payload).await?;
    Ok(payload)
}

async fn read_exact_or_closed<R>(reader: &mut R, buf: &mut [u8]) -> Result<(), ProtocolError>
where
    R: AsyncRead + Unpin,
{
    match reader.read_exact(buf).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            Err(ProtocolError::ConnectionClosed)
        }
        Err(e) => Err(ProtocolError::Io(e)),
    }
}

/// Write a command as a framed, counted message. The counter advances
/// only once the frame is fully written.
pub async fn write_command<W>(
    writer: &mut W,
    counter: &mut u64,
    command: &Command,
) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    let next = *counter + 1;
    let mut payload = Vec::with_capacity(64);
    next.encode_into(&mut payload);
    command.encode_into(&mut payload);
    write_frame(writer, &payload).await?;
    *counter = next;
    Ok(())
}

/// Read a framed, counted message and validate its sequence number
/// against the receive counter.
pub async fn read_command<R>(reader: &mut R, counter: &mut u64) -> Result<Command, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let payload = read_frame(reader).await?;
    let mut r = Reader::new(&payload);
    let seq = u64::decode_from(&mut r)?;
    let expected = *counter + 1;
    if seq != expected {
        return Err(ProtocolError::CounterMismatch { expected, got: seq });
    }
    *counter = expected;
    let command = Command::decode_from(&mut r)?;
    r.finish()?;
    Ok(command)
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
