use binrw::{BinRead, BinResult, Endian};

use crate::error::ParseError;
use crate::mutf8::{self, Mutf8ErrorKind};

/// A constant-pool entry. The tag byte on disk selects the variant; each
/// variant stores only leaf data and/or 16-bit indices into the pool itself.
/// Cross-references stay as indices; they are resolved at the scope and
/// serializer layers, never during parsing.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstantInfo {
    Utf8(Utf8Constant),
    Integer(IntegerConstant),
    Float(FloatConstant),
    Long(LongConstant),
    Double(DoubleConstant),
    Class(ClassConstant),
    String(StringConstant),
    FieldRef(FieldRefConstant),
    MethodRef(MethodRefConstant),
    InterfaceMethodRef(InterfaceMethodRefConstant),
    NameAndType(NameAndTypeConstant),
    MethodHandle(MethodHandleConstant),
    MethodType(MethodTypeConstant),
    Dynamic(DynamicConstant),
    InvokeDynamic(InvokeDynamicConstant),
    Module(ModuleConstant),
    Package(PackageConstant),
}

impl ConstantInfo {
    /// Long and Double occupy two pool slots; the slot after them is null.
    pub fn is_wide(&self) -> bool {
        matches!(self, ConstantInfo::Long(_) | ConstantInfo::Double(_))
    }

    /// The `CONSTANT_<Name>` tag string used in the JSON output.
    pub fn tag_name(&self) -> &'static str {
        match self {
            ConstantInfo::Utf8(_) => "CONSTANT_Utf8",
            ConstantInfo::Integer(_) => "CONSTANT_Integer",
            ConstantInfo::Float(_) => "CONSTANT_Float",
            ConstantInfo::Long(_) => "CONSTANT_Long",
            ConstantInfo::Double(_) => "CONSTANT_Double",
            ConstantInfo::Class(_) => "CONSTANT_Class",
            ConstantInfo::String(_) => "CONSTANT_String",
            ConstantInfo::FieldRef(_) => "CONSTANT_Fieldref",
            ConstantInfo::MethodRef(_) => "CONSTANT_Methodref",
            ConstantInfo::InterfaceMethodRef(_) => "CONSTANT_InterfaceMethodref",
            ConstantInfo::NameAndType(_) => "CONSTANT_NameAndType",
            ConstantInfo::MethodHandle(_) => "CONSTANT_MethodHandle",
            ConstantInfo::MethodType(_) => "CONSTANT_MethodType",
            ConstantInfo::Dynamic(_) => "CONSTANT_Dynamic",
            ConstantInfo::InvokeDynamic(_) => "CONSTANT_InvokeDynamic",
            ConstantInfo::Module(_) => "CONSTANT_Module",
            ConstantInfo::Package(_) => "CONSTANT_Package",
        }
    }
}

impl BinRead for ConstantInfo {
    type Args<'a> = ();

    fn read_options<R: std::io::Read + std::io::Seek>(
        reader: &mut R,
        _endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let tag_pos = reader.stream_position()?;
        let tag = u8::read_options(reader, Endian::Big, ())?;
        let entry = match tag {
            1 => ConstantInfo::Utf8(Utf8Constant::read_options(reader, Endian::Big, ())?),
            3 => ConstantInfo::Integer(IntegerConstant::read_options(reader, Endian::Big, ())?),
            4 => ConstantInfo::Float(FloatConstant::read_options(reader, Endian::Big, ())?),
            5 => ConstantInfo::Long(LongConstant::read_options(reader, Endian::Big, ())?),
            6 => ConstantInfo::Double(DoubleConstant::read_options(reader, Endian::Big, ())?),
            7 => ConstantInfo::Class(ClassConstant::read_options(reader, Endian::Big, ())?),
            8 => ConstantInfo::String(StringConstant::read_options(reader, Endian::Big, ())?),
            9 => ConstantInfo::FieldRef(FieldRefConstant::read_options(reader, Endian::Big, ())?),
            10 => ConstantInfo::MethodRef(MethodRefConstant::read_options(reader, Endian::Big, ())?),
            11 => ConstantInfo::InterfaceMethodRef(InterfaceMethodRefConstant::read_options(
                reader,
                Endian::Big,
                (),
            )?),
            12 => ConstantInfo::NameAndType(NameAndTypeConstant::read_options(
                reader,
                Endian::Big,
                (),
            )?),
            15 => ConstantInfo::MethodHandle(MethodHandleConstant::read_options(
                reader,
                Endian::Big,
                (),
            )?),
            16 => {
                ConstantInfo::MethodType(MethodTypeConstant::read_options(reader, Endian::Big, ())?)
            }
            17 => ConstantInfo::Dynamic(DynamicConstant::read_options(reader, Endian::Big, ())?),
            18 => ConstantInfo::InvokeDynamic(InvokeDynamicConstant::read_options(
                reader,
                Endian::Big,
                (),
            )?),
            19 => ConstantInfo::Module(ModuleConstant::read_options(reader, Endian::Big, ())?),
            20 => ConstantInfo::Package(PackageConstant::read_options(reader, Endian::Big, ())?),
            _ => {
                return Err(ParseError::UnknownConstantTag {
                    tag,
                    offset: tag_pos,
                }
                .into_binrw(tag_pos))
            }
        };
        Ok(entry)
    }
}

/// Reads a length-prefixed Modified-UTF-8 payload. The prefix counts bytes,
/// not code units. Decode failures carry the absolute offset of the
/// offending byte.
#[binrw::parser(reader)]
pub fn string_reader() -> BinResult<String> {
    let len = u16::read_options(reader, Endian::Big, ())?;
    let data_start = reader.stream_position()?;
    let mut string_bytes = vec![0u8; len as usize];
    reader.read_exact(&mut string_bytes)?;
    mutf8::decode(&string_bytes).map_err(|e| {
        let offset = data_start + e.offset as u64;
        match e.kind {
            Mutf8ErrorKind::Truncated => ParseError::Truncated(offset),
            Mutf8ErrorKind::Invalid => ParseError::InvalidUtf8(offset),
        }
        .into_binrw(offset)
    })
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct Utf8Constant {
    #[br(parse_with = string_reader)]
    pub utf8_string: String,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct IntegerConstant {
    pub value: i32,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct FloatConstant {
    pub value: f32,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct LongConstant {
    pub value: i64,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct DoubleConstant {
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct ClassConstant {
    pub name_index: u16,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct StringConstant {
    pub string_index: u16,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct FieldRefConstant {
    pub class_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct MethodRefConstant {
    pub class_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct InterfaceMethodRefConstant {
    pub class_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct NameAndTypeConstant {
    pub name_index: u16,
    pub descriptor_index: u16,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct MethodHandleConstant {
    pub reference_kind: u8,
    pub reference_index: u16,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct MethodTypeConstant {
    pub descriptor_index: u16,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct DynamicConstant {
    pub bootstrap_method_attr_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct InvokeDynamicConstant {
    pub bootstrap_method_attr_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct ModuleConstant {
    pub name_index: u16,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct PackageConstant {
    pub name_index: u16,
}
