//! Field type descriptors: the byte-level codec for each logical type.
//!
//! A [`FieldType`] describes how one field of a record maps to bytes,
//! independent of any particular record shape. Each variant knows its
//! declared byte length (zero for data-dependent, self-advancing types) and
//! how to decode from / encode to a [`RecordBuffer`] at its cursor.
//!
//! Strings transcode through the code page 437 table in [`crate::charset`];
//! the variable-length integer is the MIDI-style encoding in
//! [`crate::varint`].

use crate::{buffer::RecordBuffer, charset, error::Error, record::Value, varint};
use bytes::Bytes;

/// Null-termination policy for string field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// No terminator: reads include embedded null bytes, writes never force
    /// a trailing null (zero padding still fills short fixed fields).
    None,
    /// Mandatory terminator: reads stop at the first null byte; writes
    /// guarantee a trailing null, truncating the input to make room.
    Required,
    /// Optional terminator: reads stop at the first null byte; writes add a
    /// trailing null only if the field has room for one.
    Optional,
}

/// A field type descriptor.
///
/// Fixed-width integers exist in every permutation of width (1, 2, 3 or 4
/// bytes), signedness, and byte order. Writes do not range-check: values are
/// truncated to the field width with natural wrapping.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    U8,
    I8,
    U16Le,
    U16Be,
    I16Le,
    I16Be,
    U24Le,
    U24Be,
    I24Le,
    I24Be,
    U32Le,
    U32Be,
    I32Le,
    I32Be,
    /// Variable-length integer: big-endian, 7 data bits per byte,
    /// continuation flag in the high bit, at most 4 bytes. Declared length
    /// is zero; read and write advance the cursor themselves.
    Midi,
    /// Fixed-length cp437 string occupying exactly `len` bytes.
    FixedStr { len: usize, term: Terminator },
    /// Variable-length, null-terminated cp437 string with a byte budget of
    /// `max`. Declared length is zero. `Terminator::None` is not meaningful
    /// here and behaves like `Optional`.
    VarStr { max: usize, term: Terminator },
    /// Unused bytes for padding and alignment: reads return the raw bytes,
    /// writes fill the field with `fill` regardless of any supplied value.
    Padding { len: usize, fill: u8 },
    /// Fixed-length raw byte block: writes copy the supplied bytes, padding
    /// short input with `fill` and truncating long input; reads return the
    /// raw bytes.
    Block { len: usize, fill: u8 },
}

/// How a string write treats null characters, mirroring the three
/// termination policies.
#[derive(Clone, Copy, PartialEq)]
enum NullPolicy {
    /// Encode nulls like any other character.
    Include,
    /// Stop at the first null character in the input.
    Terminate,
    /// Stop at the first null character and reserve the last field byte for
    /// a terminator.
    Reserve,
}

impl FieldType {
    /// The fixed byte footprint of this type, or zero if data-dependent.
    pub fn declared_len(&self) -> usize {
        match self {
            FieldType::U8 | FieldType::I8 => 1,
            FieldType::U16Le | FieldType::U16Be | FieldType::I16Le | FieldType::I16Be => 2,
            FieldType::U24Le | FieldType::U24Be | FieldType::I24Le | FieldType::I24Be => 3,
            FieldType::U32Le | FieldType::U32Be | FieldType::I32Le | FieldType::I32Be => 4,
            FieldType::Midi | FieldType::VarStr { .. } => 0,
            FieldType::FixedStr { len, .. }
            | FieldType::Padding { len, .. }
            | FieldType::Block { len, .. } => *len,
        }
    }

    /// Whether a write through this type requires a value.
    ///
    /// Padding is write-only filler and ignores any supplied value.
    pub fn needs_value(&self) -> bool {
        !matches!(self, FieldType::Padding { .. })
    }

    /// Decodes one value at the buffer's cursor.
    ///
    /// Types with a nonzero declared length leave the cursor alone (the
    /// buffer's typed-read wrapper advances it); self-advancing types move
    /// it past the bytes they consumed.
    pub(crate) fn read(&self, rb: &mut RecordBuffer) -> Result<Value, Error> {
        let value = match self {
            FieldType::U8 => Value::Int(i64::from(rb.peek_array::<1>()?[0])),
            FieldType::I8 => Value::Int(i64::from(rb.peek_array::<1>()?[0] as i8)),
            FieldType::U16Le => Value::Int(i64::from(u16::from_le_bytes(rb.peek_array()?))),
            FieldType::U16Be => Value::Int(i64::from(u16::from_be_bytes(rb.peek_array()?))),
            FieldType::I16Le => Value::Int(i64::from(i16::from_le_bytes(rb.peek_array()?))),
            FieldType::I16Be => Value::Int(i64::from(i16::from_be_bytes(rb.peek_array()?))),
            FieldType::U24Le => Value::Int(i64::from(read_u24(rb.peek_array()?, false))),
            FieldType::U24Be => Value::Int(i64::from(read_u24(rb.peek_array()?, true))),
            FieldType::I24Le => Value::Int(i64::from(sign_extend_24(read_u24(
                rb.peek_array()?,
                false,
            )))),
            FieldType::I24Be => Value::Int(i64::from(sign_extend_24(read_u24(
                rb.peek_array()?,
                true,
            )))),
            FieldType::U32Le => Value::Int(i64::from(u32::from_le_bytes(rb.peek_array()?))),
            FieldType::U32Be => Value::Int(i64::from(u32::from_be_bytes(rb.peek_array()?))),
            FieldType::I32Le => Value::Int(i64::from(i32::from_le_bytes(rb.peek_array()?))),
            FieldType::I32Be => Value::Int(i64::from(i32::from_be_bytes(rb.peek_array()?))),
            FieldType::Midi => {
                let (value, consumed) = varint::read(rb.peek_up_to(varint::MAX_LEN));
                if consumed == 0 {
                    return Err(Error::EndOfBuffer);
                }
                rb.advance(consumed);
                Value::Int(i64::from(value))
            }
            FieldType::FixedStr { len, term } => {
                let stop_at_null = !matches!(term, Terminator::None);
                Value::Str(decode_field(rb.peek(*len)?, stop_at_null))
            }
            FieldType::VarStr { max, .. } => {
                let window = rb.peek_up_to(*max);
                let terminated = window.iter().position(|&b| b == 0);
                let decoded = decode_field(window, true);
                // Consume the terminator when one was found; otherwise the
                // advance is bounded by what was actually scanned.
                let consumed = match terminated {
                    Some(at) => at + 1,
                    None => window.len(),
                };
                rb.advance(consumed);
                Value::Str(decoded)
            }
            FieldType::Padding { len, .. } | FieldType::Block { len, .. } => {
                Value::Bytes(Bytes::copy_from_slice(rb.peek(*len)?))
            }
        };
        Ok(value)
    }

    /// Encodes one value at the buffer's cursor.
    ///
    /// The buffer's typed-write wrapper has already ensured free space and
    /// advances the cursor by the declared length afterwards; self-advancing
    /// types write through [`RecordBuffer::put`] instead, which advances as
    /// it goes.
    pub(crate) fn write(&self, rb: &mut RecordBuffer, value: Option<&Value>) -> Result<(), Error> {
        match self {
            FieldType::U8 | FieldType::I8 => {
                rb.poke(&[expect_int(value)? as u8]);
            }
            FieldType::U16Le | FieldType::I16Le => {
                rb.poke(&(expect_int(value)? as u16).to_le_bytes());
            }
            FieldType::U16Be | FieldType::I16Be => {
                rb.poke(&(expect_int(value)? as u16).to_be_bytes());
            }
            FieldType::U24Le | FieldType::I24Le => {
                rb.poke(&(expect_int(value)? as u32).to_le_bytes()[..3]);
            }
            FieldType::U24Be | FieldType::I24Be => {
                rb.poke(&(expect_int(value)? as u32).to_be_bytes()[1..]);
            }
            FieldType::U32Le | FieldType::I32Le => {
                rb.poke(&(expect_int(value)? as u32).to_le_bytes());
            }
            FieldType::U32Be | FieldType::I32Be => {
                rb.poke(&(expect_int(value)? as u32).to_be_bytes());
            }
            FieldType::Midi => {
                let raw = expect_int(value)?;
                let raw = u32::try_from(raw).map_err(|_| Error::ValueTooLarge(raw))?;
                let mut scratch = [0u8; varint::MAX_LEN];
                let encoded = varint::write(raw, &mut scratch)?;
                rb.put(encoded);
            }
            FieldType::FixedStr { len, term } => {
                let policy = match term {
                    // An optional terminator writes like no terminator: pad
                    // with nulls only if room remains.
                    Terminator::None | Terminator::Optional => NullPolicy::Include,
                    Terminator::Required => NullPolicy::Reserve,
                };
                let encoded = encode_field(expect_str(value)?.chars(), *len, policy, true)?;
                rb.poke(&encoded);
            }
            FieldType::VarStr { max, term } => {
                let s = expect_str(value)?;
                let encoded = match term {
                    Terminator::Required => {
                        encode_field(s.chars(), *max, NullPolicy::Reserve, false)?
                    }
                    // The terminator is appended to the input and competes
                    // for the budget like any other character, so it may be
                    // the byte truncation drops.
                    Terminator::None | Terminator::Optional => encode_field(
                        s.chars().chain(std::iter::once('\u{0000}')),
                        *max,
                        NullPolicy::Terminate,
                        false,
                    )?,
                };
                rb.put(encoded);
            }
            FieldType::Padding { len, fill } => {
                rb.poke(&vec![*fill; *len]);
            }
            FieldType::Block { len, fill } => {
                let bytes = expect_bytes(value)?;
                let mut out = vec![*fill; *len];
                let copy = usize::min(*len, bytes.len());
                out[..copy].copy_from_slice(&bytes[..copy]);
                rb.poke(&out);
            }
        }
        Ok(())
    }
}

fn expect_int(value: Option<&Value>) -> Result<i64, Error> {
    match value {
        Some(Value::Int(v)) => Ok(*v),
        other => Err(mismatch("integer", other)),
    }
}

fn expect_str(value: Option<&Value>) -> Result<&str, Error> {
    match value {
        Some(Value::Str(s)) => Ok(s),
        other => Err(mismatch("string", other)),
    }
}

fn expect_bytes(value: Option<&Value>) -> Result<&Bytes, Error> {
    match value {
        Some(Value::Bytes(b)) => Ok(b),
        other => Err(mismatch("bytes", other)),
    }
}

fn mismatch(expected: &'static str, found: Option<&Value>) -> Error {
    Error::TypeMismatch {
        expected,
        found: found.map_or("no value", Value::kind),
    }
}

/// Assembles a 24-bit value from an 8-bit and a 16-bit part at the given
/// byte order.
fn read_u24(bytes: [u8; 3], big_endian: bool) -> u32 {
    if big_endian {
        (u32::from(u16::from_be_bytes([bytes[0], bytes[1]])) << 8) | u32::from(bytes[2])
    } else {
        u32::from(bytes[0]) | (u32::from(u16::from_le_bytes([bytes[1], bytes[2]])) << 8)
    }
}

/// Sign-extends a raw 24-bit value into an `i32`.
fn sign_extend_24(raw: u32) -> i32 {
    ((raw << 8) as i32) >> 8
}

/// Decodes a field's bytes as a cp437 string.
///
/// With `stop_at_null`, decoding ends at the first null byte, which is
/// excluded from the result; otherwise nulls decode like any other byte.
fn decode_field(bytes: &[u8], stop_at_null: bool) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &byte in bytes {
        if byte == 0 && stop_at_null {
            break;
        }
        out.push(charset::decode(byte));
    }
    out
}

/// Encodes characters into a field of `len` bytes.
///
/// Encoding stops at the field length, at the input's end, at a null
/// character (unless the policy includes them), or one byte early when the
/// policy reserves room for a terminator. With `pad`, the remainder of the
/// field is zero-filled; without it, a single trailing null is appended if
/// (and only if) it still fits within `len`.
fn encode_field(
    chars: impl Iterator<Item = char>,
    len: usize,
    policy: NullPolicy,
    pad: bool,
) -> Result<Vec<u8>, Error> {
    let mut out = Vec::with_capacity(len);
    for c in chars {
        let i = out.len();
        if i >= len {
            break;
        }
        if policy == NullPolicy::Reserve && i + 1 == len {
            break;
        }
        let code = charset::encode(c)?;
        if code == 0 && policy != NullPolicy::Include {
            break;
        }
        out.push(code);
    }
    let written = out.len();
    let len_pad = if pad { len - written } else { 1 };
    if len_pad > 0 && written + len_pad <= len {
        out.resize(written + len_pad, 0);
    }
    Ok(out)
}
