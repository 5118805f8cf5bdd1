//! Typed, read-only views over a parsed class file. Indices stay indices in
//! the model; this module is where they get resolved against the pool, with
//! a `WrongConstantKind` error when the referent has an unexpected tag.

use crate::attribute_info::{AttributeInfoVariant, CodeAttribute};
use crate::constant_info::*;
use crate::error::ParseError;
use crate::field_info::FieldInfo;
use crate::method_info::MethodInfo;
use crate::types::ClassFile;

/// Extracts a typed payload reference out of a [`ConstantInfo`] entry.
/// Implemented for references to each payload struct so lookups can be
/// written as `scope.get::<&Utf8Constant>(index)`.
pub trait FromConstant<'a>: Sized {
    /// Tag name reported in `WrongConstantKind` errors.
    const KIND: &'static str;

    fn from_constant(entry: &'a ConstantInfo) -> Option<Self>;
}

macro_rules! from_constant {
    ($variant:ident, $payload:ty, $kind:literal) => {
        impl<'a> FromConstant<'a> for &'a $payload {
            const KIND: &'static str = $kind;

            fn from_constant(entry: &'a ConstantInfo) -> Option<Self> {
                match entry {
                    ConstantInfo::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

from_constant!(Utf8, Utf8Constant, "CONSTANT_Utf8");
from_constant!(Integer, IntegerConstant, "CONSTANT_Integer");
from_constant!(Float, FloatConstant, "CONSTANT_Float");
from_constant!(Long, LongConstant, "CONSTANT_Long");
from_constant!(Double, DoubleConstant, "CONSTANT_Double");
from_constant!(Class, ClassConstant, "CONSTANT_Class");
from_constant!(String, StringConstant, "CONSTANT_String");
from_constant!(FieldRef, FieldRefConstant, "CONSTANT_Fieldref");
from_constant!(MethodRef, MethodRefConstant, "CONSTANT_Methodref");
from_constant!(
    InterfaceMethodRef,
    InterfaceMethodRefConstant,
    "CONSTANT_InterfaceMethodref"
);
from_constant!(NameAndType, NameAndTypeConstant, "CONSTANT_NameAndType");
from_constant!(MethodHandle, MethodHandleConstant, "CONSTANT_MethodHandle");
from_constant!(MethodType, MethodTypeConstant, "CONSTANT_MethodType");
from_constant!(Dynamic, DynamicConstant, "CONSTANT_Dynamic");
from_constant!(InvokeDynamic, InvokeDynamicConstant, "CONSTANT_InvokeDynamic");
from_constant!(Module, ModuleConstant, "CONSTANT_Module");
from_constant!(Package, PackageConstant, "CONSTANT_Package");

/// The symbolic-reference constants share a `(class, name-and-type)` shape;
/// this trait lets the scope project either side of any of them.
pub trait RefConstant {
    fn class_index(&self) -> u16;
    fn name_and_type_index(&self) -> u16;
}

macro_rules! ref_constant {
    ($payload:ty) => {
        impl RefConstant for $payload {
            fn class_index(&self) -> u16 {
                self.class_index
            }

            fn name_and_type_index(&self) -> u16 {
                self.name_and_type_index
            }
        }
    };
}

ref_constant!(FieldRefConstant);
ref_constant!(MethodRefConstant);
ref_constant!(InterfaceMethodRefConstant);

/// Typed lookups into a constant pool slice.
#[derive(Clone, Copy)]
pub struct ConstPoolScope<'a> {
    pool: &'a [Option<ConstantInfo>],
}

impl<'a> ConstPoolScope<'a> {
    pub fn new(pool: &'a [Option<ConstantInfo>]) -> Self {
        ConstPoolScope { pool }
    }

    /// The entry at a 1-based index; `None` for the reserved slot 0, phantom
    /// slots, and out-of-range indices.
    pub fn entry(&self, index: u16) -> Option<&'a ConstantInfo> {
        self.pool.get(index as usize).and_then(|e| e.as_ref())
    }

    pub fn get<T: FromConstant<'a>>(&self, index: u16) -> Result<T, ParseError> {
        self.entry(index)
            .and_then(T::from_constant)
            .ok_or(ParseError::WrongConstantKind {
                expected: T::KIND,
                index,
            })
    }

    pub fn utf8(&self, index: u16) -> Result<&'a str, ParseError> {
        self.get::<&Utf8Constant>(index)
            .map(|c| c.utf8_string.as_str())
    }

    /// Follows a `CONSTANT_Class` entry through to its name.
    pub fn class_name(&self, index: u16) -> Result<&'a str, ParseError> {
        let class = self.get::<&ClassConstant>(index)?;
        self.utf8(class.name_index)
    }

    pub fn class_info<R: RefConstant>(&self, entry: &R) -> Result<&'a ClassConstant, ParseError> {
        self.get::<&ClassConstant>(entry.class_index())
    }

    pub fn name_and_type<R: RefConstant>(
        &self,
        entry: &R,
    ) -> Result<&'a NameAndTypeConstant, ParseError> {
        self.get::<&NameAndTypeConstant>(entry.name_and_type_index())
    }
}

/// A field or string constant's value, with `CONSTANT_String` already
/// chased through to its Utf8 payload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConstantValue<'a> {
    Int(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Str(&'a str),
}

pub struct ClassScope<'a> {
    class: &'a ClassFile,
    pool: ConstPoolScope<'a>,
}

impl<'a> ClassScope<'a> {
    pub fn new(class: &'a ClassFile) -> Self {
        ClassScope {
            class,
            pool: ConstPoolScope::new(&class.const_pool),
        }
    }

    pub fn pool(&self) -> ConstPoolScope<'a> {
        self.pool
    }

    pub fn this_class_name(&self) -> Result<&'a str, ParseError> {
        self.pool.class_name(self.class.this_class)
    }

    /// `None` when `super_class` is 0, which only `java/lang/Object` may do.
    pub fn super_class_name(&self) -> Result<Option<&'a str>, ParseError> {
        if self.class.super_class == 0 {
            return Ok(None);
        }
        self.pool.class_name(self.class.super_class).map(Some)
    }

    pub fn interface_names(&self) -> Result<Vec<&'a str>, ParseError> {
        self.class
            .interfaces
            .iter()
            .map(|&index| self.pool.class_name(index))
            .collect()
    }

    /// The class-level `SourceFile` attribute, if present.
    pub fn source_file(&self) -> Result<Option<&'a str>, ParseError> {
        for attr in &self.class.attributes {
            if let Some(AttributeInfoVariant::SourceFile(sf)) = &attr.info_parsed {
                return self.pool.utf8(sf.sourcefile_index).map(Some);
            }
        }
        Ok(None)
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldScope<'a>> + '_ {
        let pool = self.pool;
        self.class
            .fields
            .iter()
            .map(move |info| FieldScope { pool, info })
    }

    pub fn methods(&self) -> impl Iterator<Item = MethodScope<'a>> + '_ {
        let pool = self.pool;
        self.class
            .methods
            .iter()
            .map(move |info| MethodScope { pool, info })
    }
}

pub struct FieldScope<'a> {
    pool: ConstPoolScope<'a>,
    pub info: &'a FieldInfo,
}

impl<'a> FieldScope<'a> {
    pub fn name(&self) -> Result<&'a str, ParseError> {
        self.pool.utf8(self.info.name_index)
    }

    pub fn descriptor(&self) -> Result<&'a str, ParseError> {
        self.pool.utf8(self.info.descriptor_index)
    }

    /// The field's `ConstantValue` attribute resolved to its payload.
    pub fn constant_value(&self) -> Result<Option<ConstantValue<'a>>, ParseError> {
        for attr in &self.info.attributes {
            if let Some(AttributeInfoVariant::ConstantValue(cv)) = &attr.info_parsed {
                let index = cv.constant_value_index;
                let value = match self.pool.entry(index) {
                    Some(ConstantInfo::Integer(c)) => ConstantValue::Int(c.value),
                    Some(ConstantInfo::Float(c)) => ConstantValue::Float(c.value),
                    Some(ConstantInfo::Long(c)) => ConstantValue::Long(c.value),
                    Some(ConstantInfo::Double(c)) => ConstantValue::Double(c.value),
                    Some(ConstantInfo::String(c)) => {
                        ConstantValue::Str(self.pool.utf8(c.string_index)?)
                    }
                    _ => {
                        return Err(ParseError::WrongConstantKind {
                            expected: "a loadable constant",
                            index,
                        })
                    }
                };
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

pub struct MethodScope<'a> {
    pool: ConstPoolScope<'a>,
    pub info: &'a MethodInfo,
}

impl<'a> MethodScope<'a> {
    pub fn name(&self) -> Result<&'a str, ParseError> {
        self.pool.utf8(self.info.name_index)
    }

    pub fn descriptor(&self) -> Result<&'a str, ParseError> {
        self.pool.utf8(self.info.descriptor_index)
    }

    pub fn is_constructor(&self) -> bool {
        self.name().map(|n| n == "<init>").unwrap_or(false)
    }

    pub fn is_static_initializer(&self) -> bool {
        self.name().map(|n| n == "<clinit>").unwrap_or(false)
    }

    /// The first `Code` attribute, if the method has one.
    pub fn code(&self) -> Option<&'a CodeAttribute> {
        self.info.attributes.iter().find_map(|attr| match &attr.info_parsed {
            Some(AttributeInfoVariant::Code(code)) => Some(code),
            _ => None,
        })
    }
}
