//! Growable byte buffer with an explicit read/write cursor.

use crate::{
    error::Error,
    field::FieldType,
    record::{Record, Shape, Value},
};

/// Increment by which storage grows, and the default preallocation.
const GROW_CHUNK: usize = 1 << 20;

/// An owned, growable byte region with a read/write cursor.
///
/// The buffer tracks two indices independently of the allocated capacity:
///
/// - `length`: the logical number of valid bytes written so far (the
///   "high-water mark"). Writes whose end offset exceeds it extend it; reads
///   never do.
/// - `position`: the cursor for sequential reads and writes. It may equal
///   `length` (the append point) and may be moved anywhere within the
///   allocation by seeking.
///
/// Capacity only grows, in increments of at least 1 MiB, and never shrinks
/// in place. Storage is zero-filled on growth, so bytes exposed by a
/// truncate-to-larger read back as zero.
///
/// Views returned by [`bytes`](Self::bytes), [`window`](Self::window) and
/// [`get`](Self::get) borrow the current allocation; any growth-triggering
/// mutation invalidates them, which the borrow checker enforces. Take views
/// only after the writes that could trigger growth are complete.
#[derive(Debug, Clone)]
pub struct RecordBuffer {
    /// Backing storage, kept fully materialized and zero-filled to capacity.
    storage: Vec<u8>,
    /// Number of valid bytes written so far.
    length: usize,
    /// Cursor offset for sequential read/write.
    position: usize,
}

impl RecordBuffer {
    /// Creates an empty buffer with at least `capacity` bytes preallocated.
    ///
    /// A `capacity` of zero preallocates the default 1 MiB chunk. The logical
    /// length starts at zero either way.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = if capacity == 0 { GROW_CHUNK } else { capacity };
        Self {
            storage: vec![0; capacity],
            length: 0,
            position: 0,
        }
    }

    /// Returns the allocated capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Returns the logical length: the number of valid bytes written so far.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns true if no bytes have been written.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the current cursor position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns `length - position`.
    ///
    /// Negative if the cursor has been seeked past the logical length.
    pub fn dist_from_end(&self) -> i64 {
        self.length as i64 - self.position as i64
    }

    /// Grows storage so at least `amount` bytes fit at the current position.
    ///
    /// Growth reallocates to `position + amount + 1 MiB` to amortize repeated
    /// small writes. Existing bytes keep their offsets; new bytes are zero.
    pub fn ensure_free_space(&mut self, amount: usize) {
        if self.position + amount > self.storage.len() {
            self.storage.resize(self.position + amount + GROW_CHUNK, 0);
        }
    }

    /// Returns the whole logical content, `[0, length)`, without moving the
    /// cursor.
    pub fn bytes(&self) -> &[u8] {
        &self.storage[..self.length]
    }

    /// Returns a view of `[offset, offset + len)` without moving the cursor.
    ///
    /// A `len` of zero yields an empty window. Panics if the range extends
    /// past the allocated capacity.
    pub fn window(&self, offset: usize, len: usize) -> &[u8] {
        &self.storage[offset..offset + len]
    }

    /// Returns a view of `[offset, length)` without moving the cursor.
    pub fn window_from(&self, offset: usize) -> &[u8] {
        &self.storage[offset..self.length]
    }

    /// Copies `buf` into storage at the cursor and advances past it.
    ///
    /// Grows storage as needed. Accepts any contiguous byte source: slices,
    /// arrays, `Vec<u8>`, `Bytes`, or another buffer's [`bytes`](Self::bytes).
    /// Raises the logical length if the write ends past it.
    pub fn put(&mut self, buf: impl AsRef<[u8]>) {
        let buf = buf.as_ref();
        self.ensure_free_space(buf.len());
        self.storage[self.position..self.position + buf.len()].copy_from_slice(buf);
        self.position += buf.len();
        self.update_length();
    }

    /// Returns a view of `len` raw bytes at the cursor and advances past them.
    ///
    /// This is a pure read: the logical length never changes, and reading
    /// past it yields whatever the (zero-initialized or previously written)
    /// storage holds. Reading past the allocated capacity fails with
    /// [`Error::EndOfBuffer`].
    ///
    /// See [`window`](Self::window) for reading without moving the cursor.
    pub fn get(&mut self, len: usize) -> Result<&[u8], Error> {
        let end = self.position.checked_add(len).ok_or(Error::EndOfBuffer)?;
        if end > self.storage.len() {
            return Err(Error::EndOfBuffer);
        }
        let start = self.position;
        self.position = end;
        Ok(&self.storage[start..end])
    }

    /// Decodes one value at the cursor using the given field type.
    ///
    /// The cursor advances by the type's declared length; variable-length
    /// types (declared length zero) advance the cursor themselves by however
    /// many bytes they consumed.
    pub fn read(&mut self, ty: &FieldType) -> Result<Value, Error> {
        let value = ty.read(self)?;
        self.position += ty.declared_len();
        Ok(value)
    }

    /// Encodes one value at the cursor using the given field type.
    ///
    /// Ensures at least `max(declared length, 1024)` free bytes first; the
    /// 1024 floor covers worst-case variable-length string fields. The cursor
    /// advances as in [`read`](Self::read), and the logical length is raised
    /// to cover the written bytes.
    pub fn write(&mut self, ty: &FieldType, value: &Value) -> Result<(), Error> {
        self.write_field(ty, Some(value))
    }

    fn write_field(&mut self, ty: &FieldType, value: Option<&Value>) -> Result<(), Error> {
        self.ensure_free_space(usize::max(ty.declared_len(), 1024));
        ty.write(self, value)?;
        self.position += ty.declared_len();
        self.update_length();
        Ok(())
    }

    /// Reads one value per field of `shape`, in shape order.
    ///
    /// Fails fast with [`Error::MissingFieldType`] on a field with no type,
    /// before consuming any bytes for it.
    pub fn read_record(&mut self, shape: &Shape) -> Result<Record, Error> {
        let mut out = Record::new();
        for (name, ty) in shape.iter() {
            let ty = ty.ok_or_else(|| Error::MissingFieldType(name.to_string()))?;
            let value = self.read(ty)?;
            out.insert(name, value);
        }
        Ok(out)
    }

    /// Writes one value per field of `shape`, in shape order.
    ///
    /// Any failure is wrapped in [`Error::FieldWrite`] naming the field.
    /// Fields written before the failure are not rolled back. A field absent
    /// from `values` fails with [`Error::MissingValue`] unless the field type
    /// needs no value (padding).
    pub fn write_record(&mut self, shape: &Shape, values: &Record) -> Result<(), Error> {
        for (name, ty) in shape.iter() {
            self.write_record_field(name, ty, values)
                .map_err(|e| Error::FieldWrite(name.to_string(), Box::new(e)))?;
        }
        Ok(())
    }

    fn write_record_field(
        &mut self,
        name: &str,
        ty: Option<&FieldType>,
        values: &Record,
    ) -> Result<(), Error> {
        let ty = ty.ok_or_else(|| Error::MissingFieldType(name.to_string()))?;
        let value = values.get(name);
        if value.is_none() && ty.needs_value() {
            return Err(Error::MissingValue(name.to_string()));
        }
        self.write_field(ty, value)
    }

    /// Seeks to an absolute offset.
    ///
    /// Negative offsets seek from the end of the allocation
    /// (`position = capacity + offset`). No bounds clamping is applied; a
    /// negative offset reaching before the start of the buffer is a caller
    /// contract violation and panics.
    pub fn seek_abs(&mut self, offset: i64) {
        self.position = if offset < 0 {
            usize::try_from(self.storage.len() as i64 + offset)
                .expect("seek_abs: offset before start of buffer")
        } else {
            offset as usize
        };
    }

    /// Moves the cursor by `delta`, clamped to `[0, capacity]`.
    pub fn seek_rel(&mut self, delta: i64) {
        let target = self.position as i64 + delta;
        self.position = target.clamp(0, self.storage.len() as i64) as usize;
    }

    /// Sets the logical length to the current cursor position.
    ///
    /// Data beyond the cursor is dropped from the logical content; the
    /// allocation itself does not shrink. A cursor seeked past the allocation
    /// grows it, exposing zero-filled bytes, same as
    /// [`truncate_to`](Self::truncate_to).
    pub fn truncate(&mut self) {
        self.truncate_to(self.position);
    }

    /// Sets the logical length to `offset`.
    ///
    /// If the cursor was past the new length it is pulled back to it.
    /// Truncating to a length beyond the current capacity is legal and grows
    /// the allocation, exposing zero-filled bytes.
    pub fn truncate_to(&mut self, offset: usize) {
        self.length = offset;
        self.position = usize::min(self.position, self.length);
        if self.length > self.storage.len() {
            self.storage.resize(self.length, 0);
        }
    }

    /// Raise the logical length to cover everything written so far.
    fn update_length(&mut self) {
        self.length = usize::max(self.length, self.position);
    }

    /// View of exactly `len` bytes at the cursor, without advancing.
    pub(crate) fn peek(&self, len: usize) -> Result<&[u8], Error> {
        let end = self.position.checked_add(len).ok_or(Error::EndOfBuffer)?;
        if end > self.storage.len() {
            return Err(Error::EndOfBuffer);
        }
        Ok(&self.storage[self.position..end])
    }

    /// Fixed-size copy of the bytes at the cursor, without advancing.
    pub(crate) fn peek_array<const N: usize>(&self) -> Result<[u8; N], Error> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.peek(N)?);
        Ok(out)
    }

    /// View of up to `len` bytes at the cursor, bounded by capacity.
    pub(crate) fn peek_up_to(&self, len: usize) -> &[u8] {
        let start = usize::min(self.position, self.storage.len());
        let end = usize::min(start.saturating_add(len), self.storage.len());
        &self.storage[start..end]
    }

    /// Writes `bytes` at the cursor without advancing it.
    ///
    /// Callers must have ensured capacity beforehand.
    pub(crate) fn poke(&mut self, bytes: &[u8]) {
        debug_assert!(self.position + bytes.len() <= self.storage.len());
        self.storage[self.position..self.position + bytes.len()].copy_from_slice(bytes);
    }

    /// Moves the cursor forward without touching the logical length.
    ///
    /// Used by self-advancing (declared length zero) field types during
    /// decode.
    pub(crate) fn advance(&mut self, n: usize) {
        self.position += n;
    }
}

/// Adopts an existing allocation directly, without copying.
///
/// The logical length covers the whole input.
impl From<Vec<u8>> for RecordBuffer {
    fn from(storage: Vec<u8>) -> Self {
        let length = storage.len();
        Self {
            storage,
            length,
            position: 0,
        }
    }
}

/// Copies the input into a newly owned allocation.
impl From<&[u8]> for RecordBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::from(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for RecordBuffer {
    fn from(bytes: &[u8; N]) -> Self {
        Self::from(bytes.to_vec())
    }
}

/// Copies the input into a newly owned allocation.
impl From<bytes::Bytes> for RecordBuffer {
    fn from(bytes: bytes::Bytes) -> Self {
        Self::from(Vec::from(bytes))
    }
}
