//! Low-level wire primitives for the DOCSIS TLV header: the type byte and the length encoding.
//!
//! Every TLV on the wire starts with a one byte `type`, followed by a length field using one of
//! two encodings:
//!
//!   - **Short form**: a single byte `0..=254` giving the value length directly.
//!   - **Extended form**: the byte `0xFF` followed by a big-endian `u16` giving the value length
//!     (used for lengths `255..=65535`, in practice mostly seen in PacketCable/MTA configs).
//!
//! ```
//! use docsis_tlv::types::TlvLength;
//!
//! let mut buf = Vec::new();
//! TlvLength::Extended(300).write(&mut buf);
//! assert_eq!(buf, vec![0xFF, 0x01, 0x2C]);
//!
//! let (len, consumed) = TlvLength::read(&buf).unwrap();
//! assert_eq!(*len, 300);
//! assert_eq!(consumed, 3);
//! ```

use crate::error::{Error, ErrorKind, ParseErrorDetail};

/// End-of-data marker byte that terminates a top-level TLV stream.
pub const END_OF_DATA: u8 = 0xFF;

/// Largest length representable in the short (single-byte) form.
pub const MAX_SHORT_LENGTH: usize = 254;

/// Largest length representable at all (extended form is a 16 bit field).
pub const MAX_EXTENDED_LENGTH: usize = u16::MAX as usize;

/// A decoded TLV length field, remembering which wire encoding produced it so that re-emission
/// (in the unedited round-trip case) chooses the same encoding back.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TlvLength {
    /// Single length byte, value `0..=254`.
    Short(u8),
    /// `0xFF` marker followed by a big-endian `u16` length.
    Extended(u16),
}

impl TlvLength {
    /// The minimal encoding for a given byte length: short form when it fits, extended otherwise.
    ///
    /// Length exactly 254 uses the short form; length exactly 255 requires the extended form.
    pub fn minimal(len: usize) -> crate::error::Result<Self> {
        if len <= MAX_SHORT_LENGTH {
            Ok(TlvLength::Short(len as u8))
        } else if len <= MAX_EXTENDED_LENGTH {
            Ok(TlvLength::Extended(len as u16))
        } else {
            Err(Error::unlocated(ErrorKind::Parse(
                ParseErrorDetail::InvalidExtendedLength,
            )))
        }
    }

    /// Number of header bytes this encoding occupies (1 for short, 3 for extended: the `0xFF`
    /// marker plus the two length bytes).
    pub fn header_len(&self) -> usize {
        match self {
            TlvLength::Short(_) => 1,
            TlvLength::Extended(_) => 3,
        }
    }

    /// Read a length field starting at `buf[0]`. Returns the decoded length and the number of
    /// bytes consumed (1 or 3).
    pub fn read(buf: &[u8]) -> crate::error::Result<(Self, usize)> {
        let first = *buf.first().ok_or_else(|| {
            Error::unlocated(ErrorKind::Parse(ParseErrorDetail::Truncated { expected: 1 }))
        })?;
        if first == END_OF_DATA {
            if buf.len() < 3 {
                return Err(Error::unlocated(ErrorKind::Parse(
                    ParseErrorDetail::Truncated {
                        expected: 3 - buf.len(),
                    },
                )));
            }
            let len = u16::from_be_bytes([buf[1], buf[2]]);
            Ok((TlvLength::Extended(len), 3))
        } else {
            Ok((TlvLength::Short(first), 1))
        }
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        match self {
            TlvLength::Short(len) => out.push(*len),
            TlvLength::Extended(len) => {
                out.push(END_OF_DATA);
                out.extend_from_slice(&len.to_be_bytes());
            }
        }
    }
}

impl TlvLength {
    /// The decoded length as a plain integer, regardless of which wire form produced it.
    pub fn value(&self) -> usize {
        match self {
            TlvLength::Short(len) => *len as usize,
            TlvLength::Extended(len) => *len as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_254_uses_short_form() {
        assert_eq!(TlvLength::minimal(254).unwrap(), TlvLength::Short(254));
    }

    #[test]
    fn length_255_uses_extended_form() {
        assert_eq!(TlvLength::minimal(255).unwrap(), TlvLength::Extended(255));
    }

    #[test]
    fn length_zero_is_permitted() {
        assert_eq!(TlvLength::minimal(0).unwrap(), TlvLength::Short(0));
    }

    #[test]
    fn roundtrips_short_and_extended() {
        for len in [0usize, 1, 254, 255, 300, 65535] {
            let encoded = TlvLength::minimal(len).unwrap();
            let mut buf = Vec::new();
            encoded.write(&mut buf);
            let (decoded, consumed) = TlvLength::read(&buf).unwrap();
            assert_eq!(consumed, buf.len());
            assert_eq!(decoded.value(), len);
        }
    }

    #[test]
    fn extended_length_requires_three_bytes() {
        let err = TlvLength::read(&[0xFF, 0x01]).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::Parse(ParseErrorDetail::Truncated { .. })
        ));
    }
}
