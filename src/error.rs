use thiserror::Error;

/// Everything that can go wrong while parsing a class file or resolving
/// constant-pool entries. Every failure is fatal to the current parse; there
/// is no recovery or resynchronisation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("bad magic number: 0x{0:08X}")]
    BadMagic(u32),
    #[error("input truncated at offset {0}")]
    Truncated(u64),
    #[error("unknown constant pool tag {tag} at offset {offset}")]
    UnknownConstantTag { tag: u8, offset: u64 },
    #[error("unknown stack map frame type {0}")]
    UnknownFrameType(u8),
    #[error("unknown verification type tag {0}")]
    UnknownVerificationTag(u8),
    #[error("unknown element value tag 0x{0:02X}")]
    UnknownElementValueTag(u8),
    #[error("unknown type annotation target 0x{0:02X}")]
    UnknownTypeAnnotationTarget(u8),
    #[error("attribute name index {0} does not resolve to a Utf8 constant")]
    InvalidAttributeNameIndex(u16),
    #[error("invalid modified UTF-8 at offset {0}")]
    InvalidUtf8(u64),
    #[error("constant pool index {index}: expected {expected}")]
    WrongConstantKind { expected: &'static str, index: u16 },
    #[error("malformed class file near offset {0}")]
    Malformed(u64),
}

impl ParseError {
    /// Lifts a binrw error back into the crate's taxonomy. Typed variants
    /// travel through `binrw::Error::Custom`; an EOF from the reader becomes
    /// `Truncated` at the cursor position the failed read left behind.
    pub(crate) fn from_binrw(err: binrw::Error, pos_hint: u64) -> ParseError {
        match err {
            binrw::Error::Custom { err, pos } => match err.downcast::<ParseError>() {
                Ok(parse_err) => *parse_err,
                Err(_) => ParseError::Malformed(pos),
            },
            binrw::Error::Io(io) if io.kind() == std::io::ErrorKind::UnexpectedEof => {
                ParseError::Truncated(pos_hint)
            }
            binrw::Error::Backtrace(bt) => ParseError::from_binrw(*bt.error, pos_hint),
            binrw::Error::BadMagic { pos, .. }
            | binrw::Error::AssertFail { pos, .. }
            | binrw::Error::NoVariantMatch { pos }
            | binrw::Error::EnumErrors { pos, .. } => ParseError::Malformed(pos),
            _ => ParseError::Malformed(pos_hint),
        }
    }

    /// Wraps a typed error so it can cross binrw's `BinResult` plumbing.
    pub(crate) fn into_binrw(self, pos: u64) -> binrw::Error {
        binrw::Error::Custom {
            pos,
            err: Box::new(self),
        }
    }
}
