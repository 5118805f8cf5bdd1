pub mod parser;
pub mod types;

pub use self::parser::legacy_stack_map;
pub use self::types::*;

use binrw::{BinRead, BinResult};
use std::io::Cursor;

use crate::constant_info::ConstantInfo;
use crate::error::ParseError;
use crate::InterpretInner;

/// A raw attribute as it sits in the stream: the name index, the declared
/// payload length and the payload bytes. `info_parsed` is populated by the
/// interpretation pass once the constant pool is available to resolve the
/// attribute name.
#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct AttributeInfo {
    pub attribute_name_index: u16,
    pub attribute_length: u32,
    #[br(count = attribute_length)]
    pub info: Vec<u8>,
    #[br(ignore)]
    pub info_parsed: Option<AttributeInfoVariant>,
}

#[derive(Clone, Debug)]
pub enum AttributeInfoVariant {
    ConstantValue(ConstantValueAttribute),
    Code(CodeAttribute),
    StackMapTable(StackMapTableAttribute),
    /// Pre-Java-6 uncompressed stack maps, normalised to full frames.
    StackMap(StackMapTableAttribute),
    Exceptions(ExceptionsAttribute),
    InnerClasses(InnerClassesAttribute),
    EnclosingMethod(EnclosingMethodAttribute),
    Synthetic(SyntheticAttribute),
    Signature(SignatureAttribute),
    SourceFile(SourceFileAttribute),
    SourceDebugExtension(SourceDebugExtensionAttribute),
    LineNumberTable(LineNumberTableAttribute),
    LocalVariableTable(LocalVariableTableAttribute),
    LocalVariableTypeTable(LocalVariableTypeTableAttribute),
    Deprecated(DeprecatedAttribute),
    RuntimeVisibleAnnotations(AnnotationsAttribute),
    RuntimeInvisibleAnnotations(AnnotationsAttribute),
    RuntimeVisibleParameterAnnotations(ParameterAnnotationsAttribute),
    RuntimeInvisibleParameterAnnotations(ParameterAnnotationsAttribute),
    RuntimeVisibleTypeAnnotations(TypeAnnotationsAttribute),
    RuntimeInvisibleTypeAnnotations(TypeAnnotationsAttribute),
    AnnotationDefault(AnnotationDefaultAttribute),
    BootstrapMethods(BootstrapMethodsAttribute),
    MethodParameters(MethodParametersAttribute),
    Module(ModuleAttribute),
    ModulePackages(ModulePackagesAttribute),
    ModuleMainClass(ModuleMainClassAttribute),
    NestHost(NestHostAttribute),
    NestMembers(NestMembersAttribute),
    Record(RecordAttribute),
    PermittedSubclasses(PermittedSubclassesAttribute),
    /// Any attribute name the parser does not recognise; the raw payload
    /// stays in `AttributeInfo::info`. Carries the resolved name.
    Unknown(String),
}

impl InterpretInner for AttributeInfo {
    fn interpret_inner(&mut self, const_pool: &[Option<ConstantInfo>]) -> BinResult<()> {
        let name = match const_pool
            .get(self.attribute_name_index as usize)
            .and_then(|entry| entry.as_ref())
        {
            Some(ConstantInfo::Utf8(utf8)) => utf8.utf8_string.clone(),
            _ => {
                return Err(
                    ParseError::InvalidAttributeNameIndex(self.attribute_name_index).into_binrw(0),
                )
            }
        };

        let mut cursor = Cursor::new(self.info.as_slice());
        let parsed = match name.as_str() {
            "ConstantValue" => {
                AttributeInfoVariant::ConstantValue(ConstantValueAttribute::read(&mut cursor)?)
            }
            "Code" => {
                let mut code = CodeAttribute::read(&mut cursor)?;
                for attr in &mut code.attributes {
                    attr.interpret_inner(const_pool)?;
                }
                AttributeInfoVariant::Code(code)
            }
            "StackMapTable" => {
                AttributeInfoVariant::StackMapTable(StackMapTableAttribute::read(&mut cursor)?)
            }
            "StackMap" => AttributeInfoVariant::StackMap(legacy_stack_map(&mut cursor)?),
            "Exceptions" => {
                AttributeInfoVariant::Exceptions(ExceptionsAttribute::read(&mut cursor)?)
            }
            "InnerClasses" => {
                AttributeInfoVariant::InnerClasses(InnerClassesAttribute::read(&mut cursor)?)
            }
            "EnclosingMethod" => {
                AttributeInfoVariant::EnclosingMethod(EnclosingMethodAttribute::read(&mut cursor)?)
            }
            "Synthetic" => AttributeInfoVariant::Synthetic(SyntheticAttribute {}),
            "Signature" => AttributeInfoVariant::Signature(SignatureAttribute::read(&mut cursor)?),
            "SourceFile" => {
                AttributeInfoVariant::SourceFile(SourceFileAttribute::read(&mut cursor)?)
            }
            "SourceDebugExtension" => {
                // The whole payload is the extension blob.
                AttributeInfoVariant::SourceDebugExtension(SourceDebugExtensionAttribute {
                    debug_extension: self.info.clone(),
                })
            }
            "LineNumberTable" => {
                AttributeInfoVariant::LineNumberTable(LineNumberTableAttribute::read(&mut cursor)?)
            }
            "LocalVariableTable" => AttributeInfoVariant::LocalVariableTable(
                LocalVariableTableAttribute::read(&mut cursor)?,
            ),
            "LocalVariableTypeTable" => AttributeInfoVariant::LocalVariableTypeTable(
                LocalVariableTypeTableAttribute::read(&mut cursor)?,
            ),
            "Deprecated" => AttributeInfoVariant::Deprecated(DeprecatedAttribute {}),
            "RuntimeVisibleAnnotations" => AttributeInfoVariant::RuntimeVisibleAnnotations(
                AnnotationsAttribute::read(&mut cursor)?,
            ),
            "RuntimeInvisibleAnnotations" => AttributeInfoVariant::RuntimeInvisibleAnnotations(
                AnnotationsAttribute::read(&mut cursor)?,
            ),
            "RuntimeVisibleParameterAnnotations" => {
                AttributeInfoVariant::RuntimeVisibleParameterAnnotations(
                    ParameterAnnotationsAttribute::read(&mut cursor)?,
                )
            }
            "RuntimeInvisibleParameterAnnotations" => {
                AttributeInfoVariant::RuntimeInvisibleParameterAnnotations(
                    ParameterAnnotationsAttribute::read(&mut cursor)?,
                )
            }
            "RuntimeVisibleTypeAnnotations" => AttributeInfoVariant::RuntimeVisibleTypeAnnotations(
                TypeAnnotationsAttribute::read(&mut cursor)?,
            ),
            "RuntimeInvisibleTypeAnnotations" => {
                AttributeInfoVariant::RuntimeInvisibleTypeAnnotations(
                    TypeAnnotationsAttribute::read(&mut cursor)?,
                )
            }
            "AnnotationDefault" => AttributeInfoVariant::AnnotationDefault(
                AnnotationDefaultAttribute::read(&mut cursor)?,
            ),
            "BootstrapMethods" => AttributeInfoVariant::BootstrapMethods(
                BootstrapMethodsAttribute::read(&mut cursor)?,
            ),
            "MethodParameters" => AttributeInfoVariant::MethodParameters(
                MethodParametersAttribute::read(&mut cursor)?,
            ),
            "Module" => AttributeInfoVariant::Module(ModuleAttribute::read(&mut cursor)?),
            "ModulePackages" => {
                AttributeInfoVariant::ModulePackages(ModulePackagesAttribute::read(&mut cursor)?)
            }
            "ModuleMainClass" => {
                AttributeInfoVariant::ModuleMainClass(ModuleMainClassAttribute::read(&mut cursor)?)
            }
            "NestHost" => AttributeInfoVariant::NestHost(NestHostAttribute::read(&mut cursor)?),
            "NestMembers" => {
                AttributeInfoVariant::NestMembers(NestMembersAttribute::read(&mut cursor)?)
            }
            "Record" => {
                let mut record = RecordAttribute::read(&mut cursor)?;
                for component in &mut record.components {
                    for attr in &mut component.attributes {
                        attr.interpret_inner(const_pool)?;
                    }
                }
                AttributeInfoVariant::Record(record)
            }
            "PermittedSubclasses" => AttributeInfoVariant::PermittedSubclasses(
                PermittedSubclassesAttribute::read(&mut cursor)?,
            ),
            _ => {
                tracing::warn!(attribute = %name, "unrecognised attribute, keeping raw payload");
                AttributeInfoVariant::Unknown(name.clone())
            }
        };
        self.info_parsed = Some(parsed);
        Ok(())
    }
}
