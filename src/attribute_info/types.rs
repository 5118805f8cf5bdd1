use binrw::BinRead;

use crate::attribute_info::AttributeInfo;

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct ExceptionEntry {
    pub start_pc: u16,
    pub end_pc: u16,
    pub handler_pc: u16,
    pub catch_type: u16,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct CodeAttribute {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code_length: u32,
    #[br(count = code_length)]
    pub code: Vec<u8>,
    pub exception_table_length: u16,
    #[br(count = exception_table_length)]
    pub exception_table: Vec<ExceptionEntry>,
    pub attributes_count: u16,
    #[br(count = attributes_count)]
    pub attributes: Vec<AttributeInfo>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct ConstantValueAttribute {
    pub constant_value_index: u16,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct ExceptionsAttribute {
    pub exception_table_length: u16,
    #[br(count = exception_table_length)]
    pub exception_table: Vec<u16>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct InnerClassesAttribute {
    pub number_of_classes: u16,
    #[br(count = number_of_classes)]
    pub classes: Vec<InnerClassInfo>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct InnerClassInfo {
    pub inner_class_info_index: u16,
    pub outer_class_info_index: u16,
    pub inner_name_index: u16,
    pub inner_class_access_flags: InnerClassAccessFlags,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, BinRead)]
#[br(big)]
pub struct InnerClassAccessFlags(u16);

bitflags! {
    impl InnerClassAccessFlags: u16 {
        const PUBLIC = 0x0001;     // 	Marked or implicitly public in source.
        const PRIVATE = 0x0002;    // 	Marked private in source.
        const PROTECTED = 0x0004;  // 	Marked protected in source.
        const STATIC = 0x0008;     // 	Marked or implicitly static in source.
        const FINAL = 0x0010;      // 	Marked final in source.
        const INTERFACE = 0x0200;  // 	Was an interface in source.
        const ABSTRACT = 0x0400;   // 	Marked or implicitly abstract in source.
        const SYNTHETIC = 0x1000;  // 	Declared synthetic; not present in the source code.
        const ANNOTATION = 0x2000; // 	Declared as an annotation type.
        const ENUM = 0x4000;       // 	Declared as an enum type.
    }
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct EnclosingMethodAttribute {
    pub class_index: u16,
    pub method_index: u16,
}

// Zero-sized marker attributes.
#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct SyntheticAttribute {}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct DeprecatedAttribute {}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct SignatureAttribute {
    pub signature_index: u16,
}

/// The SourceFile attribute is an optional fixed-length attribute in the
/// attributes table of a ClassFile structure; there may be at most one.
#[derive(Copy, Clone, Debug, Eq, PartialEq, BinRead)]
#[br(big)]
pub struct SourceFileAttribute {
    /// Must index a CONSTANT_Utf8_info entry holding the file name.
    pub sourcefile_index: u16,
}

/// The payload is an opaque Modified-UTF-8 blob meant for debuggers; it is
/// carried as raw bytes.
#[derive(Clone, Debug)]
pub struct SourceDebugExtensionAttribute {
    pub debug_extension: Vec<u8>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct LineNumberTableAttribute {
    pub line_number_table_length: u16,
    #[br(count = line_number_table_length)]
    pub line_number_table: Vec<LineNumberTableEntry>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct LineNumberTableEntry {
    pub start_pc: u16,
    pub line_number: u16,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct LocalVariableTableAttribute {
    pub local_variable_table_length: u16,
    #[br(count = local_variable_table_length)]
    pub local_variable_table: Vec<LocalVariableTableEntry>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct LocalVariableTableEntry {
    pub start_pc: u16,
    pub length: u16,
    pub name_index: u16,
    pub descriptor_index: u16,
    /// Slot in the local variable array, not a constant-pool index.
    pub index: u16,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct LocalVariableTypeTableAttribute {
    pub local_variable_type_table_length: u16,
    #[br(count = local_variable_type_table_length)]
    pub local_variable_type_table: Vec<LocalVariableTypeTableEntry>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct LocalVariableTypeTableEntry {
    pub start_pc: u16,
    pub length: u16,
    pub name_index: u16,
    pub signature_index: u16,
    pub index: u16,
}

#[derive(Clone, Debug)]
pub enum VerificationTypeInfo {
    Top,
    Integer,
    Float,
    Double,
    Long,
    Null,
    UninitializedThis,
    Object {
        /// An index into the constant pool for the class of the object.
        class: u16,
    },
    Uninitialized {
        /// Offset into the associated code array of the new instruction
        /// that created the object being stored here.
        offset: u16,
    },
}

#[derive(Clone, Debug)]
pub struct StackMapFrame {
    pub frame_type: u8,
    pub inner: StackMapFrameInner,
}

#[derive(Clone, Debug)]
pub enum StackMapFrameInner {
    SameFrame,
    SameLocals1StackItemFrame {
        stack: VerificationTypeInfo,
    },
    SameLocals1StackItemFrameExtended {
        offset_delta: u16,
        stack: VerificationTypeInfo,
    },
    ChopFrame {
        offset_delta: u16,
    },
    SameFrameExtended {
        offset_delta: u16,
    },
    AppendFrame {
        offset_delta: u16,
        locals: Vec<VerificationTypeInfo>,
    },
    FullFrame {
        offset_delta: u16,
        number_of_locals: u16,
        locals: Vec<VerificationTypeInfo>,
        number_of_stack_items: u16,
        stack: Vec<VerificationTypeInfo>,
    },
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct StackMapTableAttribute {
    pub number_of_entries: u16,
    #[br(count = number_of_entries)]
    pub entries: Vec<StackMapFrame>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct RuntimeAnnotation {
    pub type_index: u16,
    pub num_element_value_pairs: u16,
    #[br(count = num_element_value_pairs)]
    pub element_value_pairs: Vec<ElementValuePair>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct ElementValuePair {
    pub element_name_index: u16,
    pub value: ElementValue,
}

#[derive(Clone, Debug)]
pub enum ElementValue {
    ConstValueIndex { tag: char, value: u16 },
    EnumConst(EnumConstValue),
    ClassInfoIndex(u16),
    AnnotationValue(RuntimeAnnotation),
    ElementArray(ElementArrayValue),
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct ElementArrayValue {
    pub num_values: u16,
    #[br(count = num_values)]
    pub values: Vec<ElementValue>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct EnumConstValue {
    pub type_name_index: u16,
    pub const_name_index: u16,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct AnnotationsAttribute {
    pub num_annotations: u16,
    #[br(count = num_annotations)]
    pub annotations: Vec<RuntimeAnnotation>,
}

/// The outer count here is a single byte, unlike every other attribute
/// table in the format.
#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct ParameterAnnotationsAttribute {
    pub num_parameters: u8,
    #[br(count = num_parameters)]
    pub parameter_annotations: Vec<ParameterAnnotations>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct ParameterAnnotations {
    pub num_annotations: u16,
    #[br(count = num_annotations)]
    pub annotations: Vec<RuntimeAnnotation>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct TypeAnnotationsAttribute {
    pub num_annotations: u16,
    #[br(count = num_annotations)]
    pub annotations: Vec<TypeAnnotation>,
}

#[derive(Clone, Debug)]
pub struct TypeAnnotation {
    pub target_type: u8,
    pub target_info: TargetInfo,
    pub target_path: TypePath,
    pub type_index: u16,
    pub num_element_value_pairs: u16,
    pub element_value_pairs: Vec<ElementValuePair>,
}

#[derive(Clone, Debug)]
pub enum TargetInfo {
    TypeParameter {
        type_parameter_index: u8,
    },
    SuperType {
        supertype_index: u16,
    },
    TypeParameterBound {
        type_parameter_index: u8,
        bound_index: u8,
    },
    Empty,
    FormalParameter {
        formal_parameter_index: u8,
    },
    Throws {
        throws_type_index: u16,
    },
    LocalVar {
        table_length: u16,
        tables: Vec<LocalVarTableAnnotation>,
    },
    Catch {
        exception_table_index: u16,
    },
    Offset {
        offset: u16,
    },
    TypeArgument {
        offset: u16,
        type_argument_index: u8,
    },
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct LocalVarTableAnnotation {
    pub start_pc: u16,
    pub length: u16,
    pub index: u16,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct TypePath {
    pub path_length: u8,
    #[br(count = path_length)]
    pub paths: Vec<TypePathEntry>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct TypePathEntry {
    pub type_path_kind: u8,
    pub type_argument_index: u8,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct AnnotationDefaultAttribute {
    pub default_value: ElementValue,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct BootstrapMethod {
    pub bootstrap_method_ref: u16,
    pub num_bootstrap_arguments: u16,
    #[br(count = num_bootstrap_arguments)]
    pub bootstrap_arguments: Vec<u16>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct BootstrapMethodsAttribute {
    pub num_bootstrap_methods: u16,
    #[br(count = num_bootstrap_methods)]
    pub bootstrap_methods: Vec<BootstrapMethod>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct MethodParametersAttribute {
    pub parameters_count: u8,
    #[br(count = parameters_count)]
    pub parameters: Vec<ParameterAttribute>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct ParameterAttribute {
    pub name_index: u16,
    pub access_flags: ParameterAccessFlags,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, BinRead)]
#[br(big)]
pub struct ParameterAccessFlags(u16);

bitflags! {
    impl ParameterAccessFlags: u16 {
        const FINAL = 0x0010;     // 	Declared final.
        const SYNTHETIC = 0x1000; // 	Not explicitly or implicitly declared in source.
        const MANDATED = 0x8000;  // 	Implicitly declared in source (e.g. an outer `this`).
    }
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct ModuleAttribute {
    pub module_name_index: u16,
    pub module_flags: u16,
    pub module_version_index: u16,
    pub requires_count: u16,
    #[br(count = requires_count)]
    pub requires: Vec<ModuleRequires>,
    pub exports_count: u16,
    #[br(count = exports_count)]
    pub exports: Vec<ModuleExports>,
    pub opens_count: u16,
    #[br(count = opens_count)]
    pub opens: Vec<ModuleOpens>,
    pub uses_count: u16,
    #[br(count = uses_count)]
    pub uses: Vec<u16>,
    pub provides_count: u16,
    #[br(count = provides_count)]
    pub provides: Vec<ModuleProvides>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct ModuleRequires {
    pub requires_index: u16,
    pub requires_flags: u16,
    pub requires_version_index: u16,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct ModuleExports {
    pub exports_index: u16,
    pub exports_flags: u16,
    pub exports_to_count: u16,
    #[br(count = exports_to_count)]
    pub exports_to_index: Vec<u16>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct ModuleOpens {
    pub opens_index: u16,
    pub opens_flags: u16,
    pub opens_to_count: u16,
    #[br(count = opens_to_count)]
    pub opens_to_index: Vec<u16>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct ModuleProvides {
    pub provides_index: u16,
    pub provides_with_count: u16,
    #[br(count = provides_with_count)]
    pub provides_with_index: Vec<u16>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct ModulePackagesAttribute {
    pub package_count: u16,
    #[br(count = package_count)]
    pub package_index: Vec<u16>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct ModuleMainClassAttribute {
    pub main_class_index: u16,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct NestHostAttribute {
    pub host_class_index: u16,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct NestMembersAttribute {
    pub number_of_classes: u16,
    #[br(count = number_of_classes)]
    pub classes: Vec<u16>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct PermittedSubclassesAttribute {
    pub number_of_classes: u16,
    #[br(count = number_of_classes)]
    pub classes: Vec<u16>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct RecordAttribute {
    pub components_count: u16,
    #[br(count = components_count)]
    pub components: Vec<RecordComponent>,
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct RecordComponent {
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes_count: u16,
    #[br(count = attributes_count)]
    pub attributes: Vec<AttributeInfo>,
}
