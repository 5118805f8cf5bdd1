use binrw::{BinRead, BinResult, Endian};
use std::io::{Read, Seek};

use crate::attribute_info::types::*;
use crate::error::ParseError;

impl BinRead for VerificationTypeInfo {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        use self::VerificationTypeInfo::*;
        let pos = reader.stream_position()?;
        let tag = u8::read_options(reader, Endian::Big, ())?;
        match tag {
            0 => Ok(Top),
            1 => Ok(Integer),
            2 => Ok(Float),
            3 => Ok(Double),
            4 => Ok(Long),
            5 => Ok(Null),
            6 => Ok(UninitializedThis),
            7 => Ok(Object {
                class: u16::read_options(reader, Endian::Big, ())?,
            }),
            8 => Ok(Uninitialized {
                offset: u16::read_options(reader, Endian::Big, ())?,
            }),
            _ => Err(ParseError::UnknownVerificationTag(tag).into_binrw(pos)),
        }
    }
}

impl BinRead for StackMapFrame {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        use self::StackMapFrameInner::*;
        let pos = reader.stream_position()?;
        let frame_type = u8::read_options(reader, Endian::Big, ())?;
        let inner = match frame_type {
            0..=63 => SameFrame,
            64..=127 => SameLocals1StackItemFrame {
                stack: VerificationTypeInfo::read_options(reader, Endian::Big, ())?,
            },
            247 => SameLocals1StackItemFrameExtended {
                offset_delta: u16::read_options(reader, Endian::Big, ())?,
                stack: VerificationTypeInfo::read_options(reader, Endian::Big, ())?,
            },
            248..=250 => ChopFrame {
                offset_delta: u16::read_options(reader, Endian::Big, ())?,
            },
            251 => SameFrameExtended {
                offset_delta: u16::read_options(reader, Endian::Big, ())?,
            },
            252..=254 => {
                let offset_delta = u16::read_options(reader, Endian::Big, ())?;
                let locals = (0..frame_type - 251)
                    .map(|_| VerificationTypeInfo::read_options(reader, Endian::Big, ()))
                    .collect::<BinResult<Vec<_>>>()?;
                AppendFrame {
                    offset_delta,
                    locals,
                }
            }
            255 => {
                let offset_delta = u16::read_options(reader, Endian::Big, ())?;
                let number_of_locals = u16::read_options(reader, Endian::Big, ())?;
                let locals = (0..number_of_locals)
                    .map(|_| VerificationTypeInfo::read_options(reader, Endian::Big, ()))
                    .collect::<BinResult<Vec<_>>>()?;
                let number_of_stack_items = u16::read_options(reader, Endian::Big, ())?;
                let stack = (0..number_of_stack_items)
                    .map(|_| VerificationTypeInfo::read_options(reader, Endian::Big, ()))
                    .collect::<BinResult<Vec<_>>>()?;
                FullFrame {
                    offset_delta,
                    number_of_locals,
                    locals,
                    number_of_stack_items,
                    stack,
                }
            }
            // 128..=246 are reserved.
            _ => return Err(ParseError::UnknownFrameType(frame_type).into_binrw(pos)),
        };
        Ok(StackMapFrame { frame_type, inner })
    }
}

/// The pre-Java-6 `StackMap` attribute: uncompressed frames of
/// `(offset, locals, stack)`. Frames are normalised into `FullFrame`
/// entries whose `offset_delta` holds the absolute bytecode offset.
pub fn legacy_stack_map<R: Read + Seek>(reader: &mut R) -> BinResult<StackMapTableAttribute> {
    let number_of_entries = u16::read_options(reader, Endian::Big, ())?;
    let mut entries = Vec::with_capacity(number_of_entries as usize);
    for _ in 0..number_of_entries {
        let offset = u16::read_options(reader, Endian::Big, ())?;
        let number_of_locals = u16::read_options(reader, Endian::Big, ())?;
        let locals = (0..number_of_locals)
            .map(|_| VerificationTypeInfo::read_options(reader, Endian::Big, ()))
            .collect::<BinResult<Vec<_>>>()?;
        let number_of_stack_items = u16::read_options(reader, Endian::Big, ())?;
        let stack = (0..number_of_stack_items)
            .map(|_| VerificationTypeInfo::read_options(reader, Endian::Big, ()))
            .collect::<BinResult<Vec<_>>>()?;
        entries.push(StackMapFrame {
            frame_type: 255,
            inner: StackMapFrameInner::FullFrame {
                offset_delta: offset,
                number_of_locals,
                locals,
                number_of_stack_items,
                stack,
            },
        });
    }
    Ok(StackMapTableAttribute {
        number_of_entries,
        entries,
    })
}

impl BinRead for ElementValue {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let pos = reader.stream_position()?;
        let tag = u8::read_options(reader, Endian::Big, ())?;
        match tag as char {
            'B' | 'C' | 'D' | 'F' | 'I' | 'J' | 'S' | 'Z' | 's' => Ok(ElementValue::ConstValueIndex {
                tag: tag as char,
                value: u16::read_options(reader, Endian::Big, ())?,
            }),
            'e' => Ok(ElementValue::EnumConst(EnumConstValue::read_options(
                reader,
                Endian::Big,
                (),
            )?)),
            'c' => Ok(ElementValue::ClassInfoIndex(u16::read_options(
                reader,
                Endian::Big,
                (),
            )?)),
            '@' => Ok(ElementValue::AnnotationValue(RuntimeAnnotation::read_options(
                reader,
                Endian::Big,
                (),
            )?)),
            '[' => Ok(ElementValue::ElementArray(ElementArrayValue::read_options(
                reader,
                Endian::Big,
                (),
            )?)),
            _ => Err(ParseError::UnknownElementValueTag(tag).into_binrw(pos)),
        }
    }
}

impl BinRead for TypeAnnotation {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        _endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let pos = reader.stream_position()?;
        let target_type = u8::read_options(reader, Endian::Big, ())?;
        let target_info = match target_type {
            0x00 | 0x01 => TargetInfo::TypeParameter {
                type_parameter_index: u8::read_options(reader, Endian::Big, ())?,
            },
            0x10 => TargetInfo::SuperType {
                supertype_index: u16::read_options(reader, Endian::Big, ())?,
            },
            0x11 | 0x12 => TargetInfo::TypeParameterBound {
                type_parameter_index: u8::read_options(reader, Endian::Big, ())?,
                bound_index: u8::read_options(reader, Endian::Big, ())?,
            },
            0x13..=0x15 => TargetInfo::Empty,
            0x16 => TargetInfo::FormalParameter {
                formal_parameter_index: u8::read_options(reader, Endian::Big, ())?,
            },
            0x17 => TargetInfo::Throws {
                throws_type_index: u16::read_options(reader, Endian::Big, ())?,
            },
            0x40 | 0x41 => {
                let table_length = u16::read_options(reader, Endian::Big, ())?;
                let tables = (0..table_length)
                    .map(|_| LocalVarTableAnnotation::read_options(reader, Endian::Big, ()))
                    .collect::<BinResult<Vec<_>>>()?;
                TargetInfo::LocalVar {
                    table_length,
                    tables,
                }
            }
            0x42 => TargetInfo::Catch {
                exception_table_index: u16::read_options(reader, Endian::Big, ())?,
            },
            0x43..=0x46 => TargetInfo::Offset {
                offset: u16::read_options(reader, Endian::Big, ())?,
            },
            0x47..=0x4B => TargetInfo::TypeArgument {
                offset: u16::read_options(reader, Endian::Big, ())?,
                type_argument_index: u8::read_options(reader, Endian::Big, ())?,
            },
            _ => return Err(ParseError::UnknownTypeAnnotationTarget(target_type).into_binrw(pos)),
        };
        let target_path = TypePath::read_options(reader, Endian::Big, ())?;
        let type_index = u16::read_options(reader, Endian::Big, ())?;
        let num_element_value_pairs = u16::read_options(reader, Endian::Big, ())?;
        let element_value_pairs = (0..num_element_value_pairs)
            .map(|_| ElementValuePair::read_options(reader, Endian::Big, ()))
            .collect::<BinResult<Vec<_>>>()?;

        Ok(TypeAnnotation {
            target_type,
            target_info,
            target_path,
            type_index,
            num_element_value_pairs,
            element_value_pairs,
        })
    }
}
