//! A parser for [Java class files](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html)
//! and a resolving JSON serializer on top of it.
//!
//! The pipeline is `bytes → ClassFile → serde_json::Value → String`: parse a
//! class file into an immutable model, then render it as a JSON tree in
//! which every constant-pool index carries a `_deref` sibling with the
//! resolved entry inlined, so a reader never has to chase indices by hand.

#[macro_use]
extern crate bitflags;

pub mod attribute_info;
pub mod constant_info;
pub mod error;
pub mod field_info;
pub mod method_info;
pub mod mutf8;
pub mod resolver;
pub mod serializer;
pub mod types;

pub use error::ParseError;
pub use types::*;

use binrw::BinRead;
use std::io::Cursor;

/// Parses a class-file image into the in-memory model.
pub fn parse(bytes: &[u8]) -> Result<ClassFile, ParseError> {
    let mut cursor = Cursor::new(bytes);
    ClassFile::read(&mut cursor).map_err(|e| ParseError::from_binrw(e, cursor.position()))
}

/// Renders a parsed class file as a JSON value with every pool index
/// dereferenced inline.
pub fn to_json(class: &ClassFile) -> serde_json::Value {
    serializer::class_file_to_value(class)
}

/// The facade: class-file bytes in, pretty-printed JSON text out.
pub fn class_file_to_json(bytes: &[u8]) -> Result<String, ParseError> {
    let class = parse(bytes)?;
    let value = to_json(&class);
    Ok(serde_json::to_string_pretty(&value)
        .expect("serializing an in-memory JSON value cannot fail"))
}
