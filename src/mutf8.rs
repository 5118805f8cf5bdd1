//! Modified UTF-8, the string encoding used inside class files. It differs
//! from standard UTF-8 in two ways: U+0000 is encoded as the two-byte
//! sequence `C0 80` (a raw `0x00` byte is illegal), and code points above
//! U+FFFF appear as two three-byte sequences encoding a UTF-16 surrogate
//! pair instead of a four-byte sequence.

/// Where a decode failed, relative to the start of the byte slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutf8Error {
    pub kind: Mutf8ErrorKind,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutf8ErrorKind {
    /// A continuation sequence ran past the end of the payload.
    Truncated,
    /// A byte pattern the encoding does not define: a raw `0x00`, a stray
    /// continuation byte, or a four-byte UTF-8 lead.
    Invalid,
}

fn invalid(offset: usize) -> Mutf8Error {
    Mutf8Error {
        kind: Mutf8ErrorKind::Invalid,
        offset,
    }
}

fn truncated(offset: usize) -> Mutf8Error {
    Mutf8Error {
        kind: Mutf8ErrorKind::Truncated,
        offset,
    }
}

/// Decodes a Modified UTF-8 payload into a string of UTF-16 code units.
///
/// Surrogate pairs (two three-byte sequences) combine into the supplementary
/// code point they encode, so the serialized output carries the same
/// character the class file did. An unpaired surrogate has no `char`
/// representation and becomes U+FFFD.
pub fn decode(bytes: &[u8]) -> Result<String, Mutf8Error> {
    let mut out = String::with_capacity(bytes.len());
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            0x00 => return Err(invalid(i)),
            0x01..=0x7F => {
                units.push(b as u16);
                i += 1;
            }
            0xC0..=0xDF => {
                let b2 = *bytes.get(i + 1).ok_or_else(|| truncated(i + 1))?;
                if b2 & 0xC0 != 0x80 {
                    return Err(invalid(i + 1));
                }
                units.push((((b as u16) & 0x1F) << 6) | ((b2 as u16) & 0x3F));
                i += 2;
            }
            0xE0..=0xEF => {
                let b2 = *bytes.get(i + 1).ok_or_else(|| truncated(i + 1))?;
                let b3 = *bytes.get(i + 2).ok_or_else(|| truncated(i + 2))?;
                if b2 & 0xC0 != 0x80 {
                    return Err(invalid(i + 1));
                }
                if b3 & 0xC0 != 0x80 {
                    return Err(invalid(i + 2));
                }
                units.push(
                    (((b as u16) & 0x0F) << 12) | (((b2 as u16) & 0x3F) << 6) | ((b3 as u16) & 0x3F),
                );
                i += 3;
            }
            // Stray continuation bytes and 4-byte UTF-8 leads.
            _ => return Err(invalid(i)),
        }
    }

    // The code-unit sequence may contain surrogate pairs; lossy conversion
    // keeps pairs intact and substitutes U+FFFD for anything unpaired.
    out.extend(char::decode_utf16(units.into_iter()).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passthrough() {
        assert_eq!(decode(b"HelloWorld").unwrap(), "HelloWorld");
    }

    #[test]
    fn embedded_nul_two_byte_form() {
        assert_eq!(decode(&[0xC0, 0x80]).unwrap(), "\u{0}");
    }

    #[test]
    fn raw_nul_is_invalid() {
        let err = decode(&[0x41, 0x00]).unwrap_err();
        assert_eq!(err.kind, Mutf8ErrorKind::Invalid);
        assert_eq!(err.offset, 1);
    }

    #[test]
    fn two_byte_range() {
        // U+00E9 LATIN SMALL LETTER E WITH ACUTE
        assert_eq!(decode(&[0xC3, 0xA9]).unwrap(), "é");
    }

    #[test]
    fn three_byte_range() {
        // U+2082 SUBSCRIPT TWO
        assert_eq!(decode(&[0xE2, 0x82, 0x82]).unwrap(), "\u{2082}");
    }

    #[test]
    fn surrogate_pair_combines() {
        // U+1D11E MUSICAL SYMBOL G CLEF as a UTF-16 pair D834 DD1E, each
        // unit in its three-byte encoding.
        let bytes = [0xED, 0xA0, 0xB4, 0xED, 0xB4, 0x9E];
        assert_eq!(decode(&bytes).unwrap(), "\u{1D11E}");
    }

    #[test]
    fn unpaired_surrogate_is_replaced() {
        // Lone high surrogate D800.
        let bytes = [0xED, 0xA0, 0x80];
        assert_eq!(decode(&bytes).unwrap(), "\u{FFFD}");
    }

    #[test]
    fn stray_continuation_is_invalid() {
        let err = decode(&[0x80]).unwrap_err();
        assert_eq!(err.kind, Mutf8ErrorKind::Invalid);
    }

    #[test]
    fn four_byte_lead_is_invalid() {
        let err = decode(&[0xF0, 0x9D, 0x84, 0x9E]).unwrap_err();
        assert_eq!(err.kind, Mutf8ErrorKind::Invalid);
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn truncated_continuation() {
        let err = decode(&[0xE2, 0x82]).unwrap_err();
        assert_eq!(err.kind, Mutf8ErrorKind::Truncated);
        assert_eq!(err.offset, 2);
    }
}
