use crate::attribute_info::AttributeInfo;
use crate::constant_info::ConstantInfo;
use crate::field_info::FieldInfo;
use crate::method_info::MethodInfo;

use binrw::{
    meta::{EndianKind, ReadEndian},
    BinRead, BinResult, Endian, VecArgs,
};

pub const CLASS_MAGIC: u32 = 0xCAFE_BABE;

/// The parsed class file. Produced once by the parser and never mutated;
/// all cross-references between entries are 16-bit constant-pool indices.
#[derive(Clone, Debug)]
pub struct ClassFile {
    pub magic: u32,
    pub minor_version: u16,
    pub major_version: u16,
    /// The on-disk `constant_pool_count`: one more than the number of slots
    /// occupied by real entries (Long and Double take two).
    pub const_pool_size: u16,
    /// Slot 0 is a reserved null; the slot after every Long/Double entry is
    /// null as well.
    pub const_pool: Vec<Option<ConstantInfo>>,
    pub access_flags: ClassAccessFlags,
    pub this_class: u16,
    pub super_class: u16,
    pub interfaces_count: u16,
    pub interfaces: Vec<u16>,
    pub fields_count: u16,
    pub fields: Vec<FieldInfo>,
    pub methods_count: u16,
    pub methods: Vec<MethodInfo>,
    pub attributes_count: u16,
    pub attributes: Vec<AttributeInfo>,
}

/// Second parsing phase: once the constant pool exists, attribute payloads
/// are interpreted by their resolved names.
pub trait InterpretInner {
    fn interpret_inner(&mut self, const_pool: &[Option<ConstantInfo>]) -> BinResult<()>;
}

impl ReadEndian for ClassFile {
    const ENDIAN: EndianKind = EndianKind::Endian(Endian::Big);
}

impl BinRead for ClassFile {
    type Args<'a> = ();

    fn read_options<R: std::io::Read + std::io::Seek>(
        reader: &mut R,
        _endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let magic = u32::read_options(reader, Endian::Big, ())?;
        if magic != CLASS_MAGIC {
            return Err(crate::error::ParseError::BadMagic(magic).into_binrw(0));
        }

        let minor_version = u16::read_options(reader, Endian::Big, ())?;
        let major_version = u16::read_options(reader, Endian::Big, ())?;

        // Pool slots are 1-based; slot 0 stays reserved. A Long or Double
        // claims its slot and leaves the next one null.
        let const_pool_size = u16::read_options(reader, Endian::Big, ())?;
        let mut const_pool: Vec<Option<ConstantInfo>> =
            Vec::with_capacity(const_pool_size as usize + 1);
        const_pool.push(None);
        let mut slot = 1u32;
        while slot < u32::from(const_pool_size) {
            let entry = ConstantInfo::read_options(reader, Endian::Big, ())?;
            let wide = entry.is_wide();
            const_pool.push(Some(entry));
            if wide {
                const_pool.push(None);
                slot += 2;
            } else {
                slot += 1;
            }
        }

        let access_flags = ClassAccessFlags::read_options(reader, Endian::Big, ())?;
        let this_class = u16::read_options(reader, Endian::Big, ())?;
        let super_class = u16::read_options(reader, Endian::Big, ())?;
        let interfaces_count = u16::read_options(reader, Endian::Big, ())?;
        let interfaces = Vec::<u16>::read_options(
            reader,
            Endian::Big,
            VecArgs {
                count: interfaces_count as usize,
                inner: (),
            },
        )?;
        let fields_count = u16::read_options(reader, Endian::Big, ())?;
        let mut fields = Vec::<FieldInfo>::read_options(
            reader,
            Endian::Big,
            VecArgs {
                count: fields_count as usize,
                inner: (),
            },
        )?;

        let methods_count = u16::read_options(reader, Endian::Big, ())?;
        let mut methods = Vec::<MethodInfo>::read_options(
            reader,
            Endian::Big,
            VecArgs {
                count: methods_count as usize,
                inner: (),
            },
        )?;

        let attributes_count = u16::read_options(reader, Endian::Big, ())?;
        let mut attributes = Vec::<AttributeInfo>::read_options(
            reader,
            Endian::Big,
            VecArgs {
                count: attributes_count as usize,
                inner: (),
            },
        )?;

        for field in &mut fields {
            field.interpret_inner(&const_pool)?;
        }

        for method in &mut methods {
            method.interpret_inner(&const_pool)?;
        }

        for attr in &mut attributes {
            attr.interpret_inner(&const_pool)?;
        }

        tracing::trace!(
            major_version,
            minor_version,
            pool_slots = const_pool.len(),
            methods = methods.len(),
            "parsed class file"
        );

        Ok(ClassFile {
            magic,
            minor_version,
            major_version,
            const_pool_size,
            const_pool,
            access_flags,
            this_class,
            super_class,
            interfaces_count,
            interfaces,
            fields_count,
            fields,
            methods_count,
            methods,
            attributes_count,
            attributes,
        })
    }
}

impl ClassFile {
    /// The entry at a 1-based pool index, or `None` for the reserved slot,
    /// the phantom slot after a Long/Double, and out-of-range indices.
    pub fn constant(&self, index: u16) -> Option<&ConstantInfo> {
        self.const_pool.get(index as usize).and_then(|e| e.as_ref())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, BinRead)]
#[br(big)]
pub struct ClassAccessFlags(u16);

bitflags! {
    impl ClassAccessFlags: u16 {
        const PUBLIC = 0x0001;     // 	Declared public; may be accessed from outside its package.
        const FINAL = 0x0010;      // 	Declared final; no subclasses allowed.
        const SUPER = 0x0020;      // 	Treat superclass methods specially when invoked by the invokespecial instruction.
        const INTERFACE = 0x0200;  // 	Is an interface, not a class.
        const ABSTRACT = 0x0400;   // 	Declared abstract; must not be instantiated.
        const SYNTHETIC = 0x1000;  // 	Declared synthetic; not present in the source code.
        const ANNOTATION = 0x2000; // 	Declared as an annotation type.
        const ENUM = 0x4000;       // 	Declared as an enum type.
        const MODULE = 0x8000;     // 	Declared as a module type.
    }
}
