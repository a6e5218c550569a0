//! Read and write fixed-layout binary records, as used in legacy file
//! formats, against a growable in-memory byte buffer.
//!
//! # Overview
//!
//! Two pieces work together:
//!
//! - [`RecordBuffer`]: an owned, growable byte region with a read/write
//!   cursor, explicit logical-length tracking, seeking, truncation, and
//!   windowed read-only views.
//! - [`FieldType`]: a closed catalog of field descriptors — fixed-width
//!   integers in both byte orders, a MIDI-style variable-length integer,
//!   code page 437 strings with three null-termination policies, and raw
//!   padding/block fields — each knowing how to decode from and encode to
//!   the buffer at its cursor.
//!
//! A file format's structures are described as a [`Shape`]: an ordered
//! mapping from field name to field type. [`RecordBuffer::read_record`]
//! decodes one [`Record`] per shape; [`RecordBuffer::write_record`] encodes
//! one. File I/O stays with the caller: load bytes into a buffer via the
//! `From` constructors, and persist them by extracting
//! [`RecordBuffer::bytes`] afterwards.
//!
//! # Example
//!
//! ```
//! use record_buffer::{FieldType, Record, RecordBuffer, Shape, Terminator};
//!
//! let header = Shape::new()
//!     .field("signature", FieldType::FixedStr { len: 4, term: Terminator::None })
//!     .field("count", FieldType::U16Le)
//!     .field("title", FieldType::VarStr { max: 16, term: Terminator::Required });
//!
//! let mut values = Record::new();
//! values.insert("signature", "FORM");
//! values.insert("count", 3);
//! values.insert("title", "LEVEL");
//!
//! let mut rb = RecordBuffer::with_capacity(64);
//! rb.write_record(&header, &values)?;
//! assert_eq!(
//!     rb.bytes(),
//!     &[0x46, 0x4F, 0x52, 0x4D, 0x03, 0x00, 0x4C, 0x45, 0x56, 0x45, 0x4C, 0x00],
//! );
//!
//! rb.seek_abs(0);
//! let decoded = rb.read_record(&header)?;
//! assert_eq!(decoded.string("signature"), Some("FORM"));
//! assert_eq!(decoded.int("count"), Some(3));
//! assert_eq!(decoded.string("title"), Some("LEVEL"));
//! # Ok::<(), record_buffer::Error>(())
//! ```

pub mod buffer;
pub mod charset;
pub mod error;
pub mod field;
pub mod record;
pub mod varint;

// Re-export main types
pub use buffer::RecordBuffer;
pub use error::Error;
pub use field::{FieldType, Terminator};
pub use record::{Record, Shape, Value};
