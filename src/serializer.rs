//! Renders a parsed class file as a JSON tree in which every constant-pool
//! index is accompanied by a `<field>_deref` sibling holding the resolved
//! entry, recursively. The output is aimed at a browser-side tree viewer:
//! strings are HTML-escaped before JSON encoding, and access flags render as
//! `"<decimal> (<NAME | NAME>)"`.

use serde_json::{json, Map, Value};

use crate::attribute_info::{AttributeInfo, AttributeInfoVariant};
use crate::constant_info::ConstantInfo;
use crate::field_info::FieldInfo;
use crate::method_info::MethodInfo;
use crate::types::ClassFile;

type Pool<'a> = &'a [Option<ConstantInfo>];

/// Escapes the five HTML-sensitive characters. Applied to every string that
/// originates in the class file, before JSON encoding.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Uppercase hex, two digits per byte, no separators.
fn hex_upper(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{:02X}", b));
    }
    out
}

/// `"33 (PUBLIC | SUPER)"`-style rendering; only mnemonics from the flag
/// table appear inside the parentheses, unknown bits count toward the
/// decimal value only.
fn flags_display<F>(flags: &F) -> String
where
    F: bitflags::Flags<Bits = u16>,
{
    let names: Vec<&str> = flags.iter_names().map(|(name, _)| name).collect();
    format!("{} ({})", flags.bits(), names.join(" | "))
}

/// The resolved rendering of the pool entry at `index`: JSON null when the
/// index is 0, out of range, or lands on a phantom slot.
fn deref(pool: Pool, index: u16) -> Value {
    match pool.get(index as usize).and_then(|slot| slot.as_ref()) {
        Some(entry) => constant_to_value(pool, index, entry),
        None => Value::Null,
    }
}

/// Inserts `<key>` and `<key>_deref` side by side.
fn index_pair(map: &mut Map<String, Value>, key: &str, index: u16, pool: Pool) {
    map.insert(key.into(), json!(index));
    map.insert(format!("{key}_deref"), deref(pool, index));
}

/// A list element for tables that are plain sequences of pool indices.
fn index_entry(pool: Pool, index: u16) -> Value {
    let mut map = Map::new();
    index_pair(&mut map, "index", index, pool);
    Value::Object(map)
}

fn constant_to_value(pool: Pool, index: u16, entry: &ConstantInfo) -> Value {
    let mut map = Map::new();
    map.insert("index".into(), json!(index));
    map.insert("tag".into(), json!(entry.tag_name()));
    match entry {
        ConstantInfo::Utf8(c) => {
            map.insert("value".into(), json!(escape_html(&c.utf8_string)));
        }
        ConstantInfo::Integer(c) => {
            map.insert("value".into(), json!(c.value));
        }
        ConstantInfo::Float(c) => {
            map.insert("value".into(), json!(c.value));
        }
        ConstantInfo::Long(c) => {
            map.insert("value".into(), json!(c.value));
        }
        ConstantInfo::Double(c) => {
            map.insert("value".into(), json!(c.value));
        }
        ConstantInfo::Class(c) => {
            index_pair(&mut map, "nameIndex", c.name_index, pool);
        }
        ConstantInfo::String(c) => {
            index_pair(&mut map, "stringIndex", c.string_index, pool);
        }
        ConstantInfo::FieldRef(c) => {
            index_pair(&mut map, "classIndex", c.class_index, pool);
            index_pair(&mut map, "nameAndTypeIndex", c.name_and_type_index, pool);
        }
        ConstantInfo::MethodRef(c) => {
            index_pair(&mut map, "classIndex", c.class_index, pool);
            index_pair(&mut map, "nameAndTypeIndex", c.name_and_type_index, pool);
        }
        ConstantInfo::InterfaceMethodRef(c) => {
            index_pair(&mut map, "classIndex", c.class_index, pool);
            index_pair(&mut map, "nameAndTypeIndex", c.name_and_type_index, pool);
        }
        ConstantInfo::NameAndType(c) => {
            index_pair(&mut map, "nameIndex", c.name_index, pool);
            index_pair(&mut map, "descriptorIndex", c.descriptor_index, pool);
        }
        ConstantInfo::MethodHandle(c) => {
            map.insert("referenceKind".into(), json!(c.reference_kind));
            index_pair(&mut map, "referenceIndex", c.reference_index, pool);
        }
        ConstantInfo::MethodType(c) => {
            index_pair(&mut map, "descriptorIndex", c.descriptor_index, pool);
        }
        ConstantInfo::Dynamic(c) => {
            index_pair(
                &mut map,
                "bootstrapMethodAttrIndex",
                c.bootstrap_method_attr_index,
                pool,
            );
            index_pair(&mut map, "nameAndTypeIndex", c.name_and_type_index, pool);
        }
        ConstantInfo::InvokeDynamic(c) => {
            index_pair(
                &mut map,
                "bootstrapMethodAttrIndex",
                c.bootstrap_method_attr_index,
                pool,
            );
            index_pair(&mut map, "nameAndTypeIndex", c.name_and_type_index, pool);
        }
        ConstantInfo::Module(c) => {
            index_pair(&mut map, "nameIndex", c.name_index, pool);
        }
        ConstantInfo::Package(c) => {
            index_pair(&mut map, "nameIndex", c.name_index, pool);
        }
    }
    Value::Object(map)
}

fn field_to_value(pool: Pool, field: &FieldInfo) -> Value {
    let mut map = Map::new();
    map.insert("accessFlags".into(), json!(flags_display(&field.access_flags)));
    index_pair(&mut map, "nameIndex", field.name_index, pool);
    index_pair(&mut map, "descriptorIndex", field.descriptor_index, pool);
    map.insert("attributesCount".into(), json!(field.attributes_count));
    map.insert(
        "attributes".into(),
        Value::Array(
            field
                .attributes
                .iter()
                .map(|a| attribute_to_value(pool, a))
                .collect(),
        ),
    );
    Value::Object(map)
}

fn method_to_value(pool: Pool, method: &MethodInfo) -> Value {
    let mut map = Map::new();
    map.insert(
        "accessFlags".into(),
        json!(flags_display(&method.access_flags)),
    );
    index_pair(&mut map, "nameIndex", method.name_index, pool);
    index_pair(&mut map, "descriptorIndex", method.descriptor_index, pool);
    map.insert("attributesCount".into(), json!(method.attributes_count));
    map.insert(
        "attributes".into(),
        Value::Array(
            method
                .attributes
                .iter()
                .map(|a| attribute_to_value(pool, a))
                .collect(),
        ),
    );
    Value::Object(map)
}

fn placeholders(token: &str, count: usize) -> Value {
    Value::Array((0..count).map(|_| json!(token)).collect())
}

fn attribute_to_value(pool: Pool, attr: &AttributeInfo) -> Value {
    let mut map = Map::new();
    index_pair(&mut map, "attributeNameIndex", attr.attribute_name_index, pool);

    match attr.info_parsed.as_ref() {
        Some(AttributeInfoVariant::ConstantValue(cv)) => {
            map.insert("attributeLength".into(), json!(2));
            index_pair(&mut map, "constantValueIndex", cv.constant_value_index, pool);
        }
        Some(AttributeInfoVariant::Code(code)) => {
            // The reference arithmetic: informational, excludes the
            // exception table and nested attribute sizes.
            map.insert("attributeLength".into(), json!(code.code.len() + 12));
            map.insert("maxStack".into(), json!(code.max_stack));
            map.insert("maxLocals".into(), json!(code.max_locals));
            map.insert("codeLength".into(), json!(code.code.len()));
            map.insert("code".into(), json!(hex_upper(&code.code)));
            map.insert(
                "exceptionTableLength".into(),
                json!(code.exception_table_length),
            );
            map.insert(
                "exceptionTable".into(),
                Value::Array(
                    code.exception_table
                        .iter()
                        .map(|e| {
                            json!({
                                "startPc": e.start_pc,
                                "endPc": e.end_pc,
                                "handlerPc": e.handler_pc,
                                "catchType": e.catch_type,
                            })
                        })
                        .collect(),
                ),
            );
            map.insert("attributesCount".into(), json!(code.attributes_count));
            map.insert(
                "attributes".into(),
                Value::Array(
                    code.attributes
                        .iter()
                        .map(|a| attribute_to_value(pool, a))
                        .collect(),
                ),
            );
        }
        Some(AttributeInfoVariant::StackMapTable(smt))
        | Some(AttributeInfoVariant::StackMap(smt)) => {
            map.insert("numberOfEntries".into(), json!(smt.number_of_entries));
            map.insert(
                "entries".into(),
                placeholders("StackMapFrame", smt.entries.len()),
            );
            map.insert(
                "note".into(),
                json!("Stack map frames are parsed but not expanded in this output"),
            );
        }
        Some(AttributeInfoVariant::Exceptions(ex)) => {
            map.insert(
                "attributeLength".into(),
                json!(2 + 2 * ex.exception_table.len()),
            );
            map.insert(
                "numberOfExceptions".into(),
                json!(ex.exception_table_length),
            );
            map.insert(
                "exceptionIndexTable".into(),
                Value::Array(
                    ex.exception_table
                        .iter()
                        .map(|&i| index_entry(pool, i))
                        .collect(),
                ),
            );
        }
        Some(AttributeInfoVariant::InnerClasses(ic)) => {
            map.insert("attributeLength".into(), json!(2 + 8 * ic.classes.len()));
            map.insert("numberOfClasses".into(), json!(ic.number_of_classes));
            map.insert(
                "classes".into(),
                Value::Array(
                    ic.classes
                        .iter()
                        .map(|c| {
                            let mut entry = Map::new();
                            index_pair(
                                &mut entry,
                                "innerClassInfoIndex",
                                c.inner_class_info_index,
                                pool,
                            );
                            index_pair(
                                &mut entry,
                                "outerClassInfoIndex",
                                c.outer_class_info_index,
                                pool,
                            );
                            index_pair(&mut entry, "innerNameIndex", c.inner_name_index, pool);
                            entry.insert(
                                "innerClassAccessFlags".into(),
                                json!(flags_display(&c.inner_class_access_flags)),
                            );
                            Value::Object(entry)
                        })
                        .collect(),
                ),
            );
        }
        Some(AttributeInfoVariant::EnclosingMethod(em)) => {
            map.insert("attributeLength".into(), json!(4));
            index_pair(&mut map, "classIndex", em.class_index, pool);
            index_pair(&mut map, "methodIndex", em.method_index, pool);
        }
        Some(AttributeInfoVariant::Synthetic(_)) | Some(AttributeInfoVariant::Deprecated(_)) => {
            map.insert("attributeLength".into(), json!(0));
        }
        Some(AttributeInfoVariant::Signature(sig)) => {
            map.insert("attributeLength".into(), json!(2));
            index_pair(&mut map, "signatureIndex", sig.signature_index, pool);
        }
        Some(AttributeInfoVariant::SourceFile(sf)) => {
            map.insert("attributeLength".into(), json!(2));
            index_pair(&mut map, "sourceFileIndex", sf.sourcefile_index, pool);
        }
        Some(AttributeInfoVariant::SourceDebugExtension(sde)) => {
            map.insert(
                "attributeLength".into(),
                json!(sde.debug_extension.len()),
            );
            map.insert(
                "debugExtension".into(),
                json!(escape_html(&String::from_utf8_lossy(&sde.debug_extension))),
            );
        }
        Some(AttributeInfoVariant::LineNumberTable(lnt)) => {
            map.insert(
                "attributeLength".into(),
                json!(2 + 4 * lnt.line_number_table.len()),
            );
            map.insert(
                "lineNumberTableLength".into(),
                json!(lnt.line_number_table_length),
            );
            map.insert(
                "lineNumberTable".into(),
                Value::Array(
                    lnt.line_number_table
                        .iter()
                        .map(|e| json!({"startPc": e.start_pc, "lineNumber": e.line_number}))
                        .collect(),
                ),
            );
        }
        Some(AttributeInfoVariant::LocalVariableTable(lvt)) => {
            map.insert(
                "attributeLength".into(),
                json!(2 + 10 * lvt.local_variable_table.len()),
            );
            map.insert(
                "localVariableTableLength".into(),
                json!(lvt.local_variable_table_length),
            );
            map.insert(
                "localVariableTable".into(),
                Value::Array(
                    lvt.local_variable_table
                        .iter()
                        .map(|e| {
                            let mut entry = Map::new();
                            entry.insert("startPc".into(), json!(e.start_pc));
                            entry.insert("length".into(), json!(e.length));
                            index_pair(&mut entry, "nameIndex", e.name_index, pool);
                            index_pair(&mut entry, "descriptorIndex", e.descriptor_index, pool);
                            // A local-variable slot, not a pool index.
                            entry.insert("index".into(), json!(e.index));
                            Value::Object(entry)
                        })
                        .collect(),
                ),
            );
        }
        Some(AttributeInfoVariant::LocalVariableTypeTable(lvtt)) => {
            map.insert(
                "attributeLength".into(),
                json!(2 + 10 * lvtt.local_variable_type_table.len()),
            );
            map.insert(
                "localVariableTypeTableLength".into(),
                json!(lvtt.local_variable_type_table_length),
            );
            map.insert(
                "localVariableTypeTable".into(),
                Value::Array(
                    lvtt.local_variable_type_table
                        .iter()
                        .map(|e| {
                            let mut entry = Map::new();
                            entry.insert("startPc".into(), json!(e.start_pc));
                            entry.insert("length".into(), json!(e.length));
                            index_pair(&mut entry, "nameIndex", e.name_index, pool);
                            index_pair(&mut entry, "signatureIndex", e.signature_index, pool);
                            entry.insert("index".into(), json!(e.index));
                            Value::Object(entry)
                        })
                        .collect(),
                ),
            );
        }
        Some(AttributeInfoVariant::RuntimeVisibleAnnotations(ann))
        | Some(AttributeInfoVariant::RuntimeInvisibleAnnotations(ann)) => {
            map.insert("numAnnotations".into(), json!(ann.num_annotations));
            map.insert(
                "annotations".into(),
                placeholders("Annotation", ann.annotations.len()),
            );
            map.insert(
                "note".into(),
                json!("Annotations are parsed but not expanded in this output"),
            );
        }
        Some(AttributeInfoVariant::RuntimeVisibleParameterAnnotations(pa))
        | Some(AttributeInfoVariant::RuntimeInvisibleParameterAnnotations(pa)) => {
            map.insert("numParameters".into(), json!(pa.num_parameters));
            map.insert(
                "parameterAnnotations".into(),
                Value::Array(
                    pa.parameter_annotations
                        .iter()
                        .map(|p| json!(format!("{} annotations", p.num_annotations)))
                        .collect(),
                ),
            );
            map.insert(
                "note".into(),
                json!("Parameter annotations are parsed but not expanded in this output"),
            );
        }
        Some(AttributeInfoVariant::RuntimeVisibleTypeAnnotations(ta))
        | Some(AttributeInfoVariant::RuntimeInvisibleTypeAnnotations(ta)) => {
            map.insert("numAnnotations".into(), json!(ta.num_annotations));
            map.insert(
                "annotations".into(),
                placeholders("TypeAnnotation", ta.annotations.len()),
            );
            map.insert(
                "note".into(),
                json!("Type annotations are parsed but not expanded in this output"),
            );
        }
        Some(AttributeInfoVariant::AnnotationDefault(_)) => {
            map.insert("defaultValue".into(), json!("ElementValue"));
            map.insert(
                "note".into(),
                json!("The default value is parsed but not expanded in this output"),
            );
        }
        Some(AttributeInfoVariant::BootstrapMethods(bm)) => {
            let payload: usize = bm
                .bootstrap_methods
                .iter()
                .map(|m| 4 + 2 * m.bootstrap_arguments.len())
                .sum();
            map.insert("attributeLength".into(), json!(2 + payload));
            map.insert(
                "numBootstrapMethods".into(),
                json!(bm.num_bootstrap_methods),
            );
            map.insert(
                "bootstrapMethods".into(),
                Value::Array(
                    bm.bootstrap_methods
                        .iter()
                        .map(|m| {
                            let mut entry = Map::new();
                            index_pair(
                                &mut entry,
                                "bootstrapMethodRef",
                                m.bootstrap_method_ref,
                                pool,
                            );
                            entry.insert(
                                "numBootstrapArguments".into(),
                                json!(m.num_bootstrap_arguments),
                            );
                            entry.insert(
                                "bootstrapArguments".into(),
                                Value::Array(
                                    m.bootstrap_arguments
                                        .iter()
                                        .map(|&i| index_entry(pool, i))
                                        .collect(),
                                ),
                            );
                            Value::Object(entry)
                        })
                        .collect(),
                ),
            );
        }
        Some(AttributeInfoVariant::MethodParameters(mp)) => {
            map.insert("attributeLength".into(), json!(1 + 4 * mp.parameters.len()));
            map.insert("parametersCount".into(), json!(mp.parameters_count));
            map.insert(
                "parameters".into(),
                Value::Array(
                    mp.parameters
                        .iter()
                        .map(|p| {
                            let mut entry = Map::new();
                            index_pair(&mut entry, "nameIndex", p.name_index, pool);
                            entry.insert(
                                "accessFlags".into(),
                                json!(flags_display(&p.access_flags)),
                            );
                            Value::Object(entry)
                        })
                        .collect(),
                ),
            );
        }
        Some(AttributeInfoVariant::Module(m)) => {
            index_pair(&mut map, "moduleNameIndex", m.module_name_index, pool);
            map.insert("moduleFlags".into(), json!(m.module_flags));
            index_pair(&mut map, "moduleVersionIndex", m.module_version_index, pool);
            map.insert("requiresCount".into(), json!(m.requires_count));
            map.insert("exportsCount".into(), json!(m.exports_count));
            map.insert("opensCount".into(), json!(m.opens_count));
            map.insert("usesCount".into(), json!(m.uses_count));
            map.insert("providesCount".into(), json!(m.provides_count));
            map.insert(
                "note".into(),
                json!("Module tables are parsed but summarised to counts in this output"),
            );
        }
        Some(AttributeInfoVariant::ModulePackages(mp)) => {
            map.insert(
                "attributeLength".into(),
                json!(2 + 2 * mp.package_index.len()),
            );
            map.insert("packageCount".into(), json!(mp.package_count));
            map.insert(
                "packages".into(),
                Value::Array(
                    mp.package_index
                        .iter()
                        .map(|&i| index_entry(pool, i))
                        .collect(),
                ),
            );
        }
        Some(AttributeInfoVariant::ModuleMainClass(mc)) => {
            map.insert("attributeLength".into(), json!(2));
            index_pair(&mut map, "mainClassIndex", mc.main_class_index, pool);
        }
        Some(AttributeInfoVariant::NestHost(nh)) => {
            map.insert("attributeLength".into(), json!(2));
            index_pair(&mut map, "hostClassIndex", nh.host_class_index, pool);
        }
        Some(AttributeInfoVariant::NestMembers(nm)) => {
            map.insert("attributeLength".into(), json!(2 + 2 * nm.classes.len()));
            map.insert("numberOfClasses".into(), json!(nm.number_of_classes));
            map.insert(
                "classes".into(),
                Value::Array(nm.classes.iter().map(|&i| index_entry(pool, i)).collect()),
            );
        }
        Some(AttributeInfoVariant::PermittedSubclasses(ps)) => {
            map.insert("attributeLength".into(), json!(2 + 2 * ps.classes.len()));
            map.insert("numberOfClasses".into(), json!(ps.number_of_classes));
            map.insert(
                "classes".into(),
                Value::Array(ps.classes.iter().map(|&i| index_entry(pool, i)).collect()),
            );
        }
        Some(AttributeInfoVariant::Record(rec)) => {
            map.insert("componentsCount".into(), json!(rec.components_count));
            map.insert(
                "components".into(),
                placeholders("RecordComponent", rec.components.len()),
            );
            map.insert(
                "note".into(),
                json!("Record components are parsed but not expanded in this output"),
            );
        }
        // Unknown names and (defensively) attributes that were never
        // interpreted both render the raw payload as an opaque blob.
        Some(AttributeInfoVariant::Unknown(_)) | None => {
            map.insert("attributeLength".into(), json!(attr.info.len()));
            map.insert(
                "info".into(),
                json!(format!("Binary data ({} bytes)", attr.info.len())),
            );
        }
    }

    Value::Object(map)
}

/// The whole class file as a JSON value, fields in the fixed output order.
pub fn class_file_to_value(class: &ClassFile) -> Value {
    let pool: Pool = &class.const_pool;
    let mut map = Map::new();
    map.insert("magic".into(), json!(format!("0x{:08X}", class.magic)));
    map.insert("minorVersion".into(), json!(class.minor_version));
    map.insert("majorVersion".into(), json!(class.major_version));
    map.insert("constantPoolCount".into(), json!(class.const_pool.len()));
    map.insert(
        "constantPool".into(),
        Value::Array(
            class
                .const_pool
                .iter()
                .enumerate()
                .map(|(index, slot)| match slot {
                    Some(entry) => constant_to_value(pool, index as u16, entry),
                    None => Value::Null,
                })
                .collect(),
        ),
    );
    map.insert(
        "accessFlags".into(),
        json!(flags_display(&class.access_flags)),
    );
    index_pair(&mut map, "thisClass", class.this_class, pool);
    index_pair(&mut map, "superClass", class.super_class, pool);
    map.insert("interfacesCount".into(), json!(class.interfaces_count));
    map.insert(
        "interfaces".into(),
        Value::Array(
            class
                .interfaces
                .iter()
                .map(|&i| index_entry(pool, i))
                .collect(),
        ),
    );
    map.insert("fieldsCount".into(), json!(class.fields_count));
    map.insert(
        "fields".into(),
        Value::Array(class.fields.iter().map(|f| field_to_value(pool, f)).collect()),
    );
    map.insert("methodsCount".into(), json!(class.methods_count));
    map.insert(
        "methods".into(),
        Value::Array(
            class
                .methods
                .iter()
                .map(|m| method_to_value(pool, m))
                .collect(),
        ),
    );
    map.insert("attributesCount".into(), json!(class.attributes_count));
    map.insert(
        "attributes".into(),
        Value::Array(
            class
                .attributes
                .iter()
                .map(|a| attribute_to_value(pool, a))
                .collect(),
        ),
    );
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClassAccessFlags;

    #[test]
    fn escape_covers_all_five() {
        assert_eq!(
            escape_html("<init> & \"quotes\" 'single'"),
            "&lt;init&gt; &amp; &quot;quotes&quot; &#39;single&#39;"
        );
    }

    #[test]
    fn escape_leaves_nul_alone() {
        assert_eq!(escape_html("a\u{0}b"), "a\u{0}b");
    }

    #[test]
    fn hex_is_uppercase_without_separators() {
        assert_eq!(hex_upper(&[0x2A, 0xB0, 0x01]), "2AB001");
    }

    #[test]
    fn flags_render_decimal_and_names() {
        let flags = ClassAccessFlags::from_bits_retain(0x0021);
        assert_eq!(flags_display(&flags), "33 (PUBLIC | SUPER)");
    }

    #[test]
    fn zero_flags_render_empty_parens() {
        let flags = ClassAccessFlags::from_bits_retain(0);
        assert_eq!(flags_display(&flags), "0 ()");
    }

    #[test]
    fn unknown_bits_count_only_toward_the_decimal() {
        // 0x0021 plus an undefined bit.
        let flags = ClassAccessFlags::from_bits_retain(0x0023);
        assert_eq!(flags_display(&flags), "35 (PUBLIC | SUPER)");
    }
}
