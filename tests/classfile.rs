extern crate classfile_json;

mod common;

use classfile_json::constant_info::ConstantInfo;
use classfile_json::method_info::MethodAccessFlags;
use classfile_json::resolver::ClassScope;
use classfile_json::{ClassAccessFlags, ParseError};
use common::{code_payload, ClassImage};

#[test]
fn test_minimal_class() {
    let mut image = ClassImage::new();
    image.set_this_class("HelloWorld");
    image.set_super_class("java/lang/Object");

    let init_code = image.attribute("Code", &code_payload(1, 1, &[0xB1], &[], &[]));
    image.add_method(0x0001, "<init>", "()V", &[init_code]);
    let main_code = image.attribute("Code", &code_payload(2, 2, &[0xB2, 0x00, 0x02, 0xB1], &[], &[]));
    image.add_method(0x0009, "main", "([Ljava/lang/String;)V", &[main_code]);

    let source_file_name = image.utf8("HelloWorld.java");
    let source_file = image.attribute("SourceFile", &source_file_name.to_be_bytes());
    image.add_class_attribute(source_file);

    let class = classfile_json::parse(&image.build()).expect("failed to parse class");
    println!(
        "version {}.{}, const_pool({}), this=const[{}], super=const[{}], methods({})",
        class.major_version,
        class.minor_version,
        class.const_pool_size,
        class.this_class,
        class.super_class,
        class.methods_count
    );

    assert_eq!(class.magic, 0xCAFEBABE);
    assert_eq!(class.major_version, 61);
    assert_eq!(class.minor_version, 0);
    assert!(class.access_flags.contains(ClassAccessFlags::PUBLIC));
    assert!(class.access_flags.contains(ClassAccessFlags::SUPER));
    assert_eq!(class.fields_count, 0);
    assert_eq!(class.methods_count, 2);
    assert_eq!(class.methods.len(), 2);

    let scope = ClassScope::new(&class);
    assert_eq!(scope.this_class_name().unwrap(), "HelloWorld");
    assert_eq!(scope.super_class_name().unwrap(), Some("java/lang/Object"));
    assert_eq!(scope.source_file().unwrap(), Some("HelloWorld.java"));

    let methods: Vec<_> = scope.methods().collect();
    assert!(methods[0].is_constructor());
    assert!(!methods[0].is_static_initializer());

    let main = methods
        .iter()
        .find(|m| m.name().unwrap() == "main")
        .expect("main method not found");
    assert_eq!(main.descriptor().unwrap(), "([Ljava/lang/String;)V");
    assert!(main.info.access_flags.contains(MethodAccessFlags::PUBLIC));
    assert!(main.info.access_flags.contains(MethodAccessFlags::STATIC));
    let code = main.code().expect("main has no Code attribute");
    assert!(!code.code.is_empty());
}

#[test]
fn test_bad_magic() {
    let mut bytes = ClassImage::new().build();
    bytes[3] = 0xBF;
    let err = classfile_json::parse(&bytes).unwrap_err();
    assert_eq!(err, ParseError::BadMagic(0xCAFEBABF));
}

#[test]
fn test_magic_only_input_is_truncated() {
    // Magic, version 61.0, constant_pool_count = 0 (tolerated as an empty
    // pool), then too few bytes to finish the fixed-size header.
    let bytes = [
        0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00, 0x3D, 0x00, 0x00, 0x00, 0x21, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00,
    ];
    let err = classfile_json::parse(&bytes).unwrap_err();
    assert!(
        matches!(err, ParseError::Truncated(_)),
        "expected Truncated, got {:?}",
        err
    );
}

#[test]
fn test_truncated_mid_pool() {
    let mut image = ClassImage::new();
    image.set_this_class("Truncated");
    let bytes = image.build();
    let err = classfile_json::parse(&bytes[..bytes.len() / 2]).unwrap_err();
    assert!(
        matches!(err, ParseError::Truncated(_)),
        "expected Truncated, got {:?}",
        err
    );
}

#[test]
fn test_unknown_constant_tag() {
    let mut image = ClassImage::new();
    image.raw_entry(99, &[]);
    let err = classfile_json::parse(&image.build()).unwrap_err();
    // The tag byte sits right after the 10-byte fixed header.
    assert_eq!(err, ParseError::UnknownConstantTag { tag: 99, offset: 10 });
}

#[test]
fn test_embedded_nul_utf8() {
    let mut image = ClassImage::new();
    let nul = image.utf8_raw(&[0xC0, 0x80]);
    image.set_this_class("Nul");

    let class = classfile_json::parse(&image.build()).expect("failed to parse class");
    match class.constant(nul) {
        Some(ConstantInfo::Utf8(utf8)) => {
            assert_eq!(utf8.utf8_string, "\u{0}");
            assert_eq!(utf8.utf8_string.chars().count(), 1);
        }
        other => panic!("expected Utf8 constant, got {:?}", other),
    }
}

#[test]
fn test_invalid_utf8_is_rejected() {
    let mut image = ClassImage::new();
    // A four-byte UTF-8 lead is not Modified UTF-8.
    image.utf8_raw(&[0xF0, 0x90, 0x80, 0x80]);
    let err = classfile_json::parse(&image.build()).unwrap_err();
    // Header (10 bytes) + tag + length prefix = 13.
    assert_eq!(err, ParseError::InvalidUtf8(13));
}

#[test]
fn test_super_class_zero() {
    // Only java/lang/Object may have super_class = 0.
    let mut image = ClassImage::new();
    image.set_this_class("java/lang/Object");
    let class = classfile_json::parse(&image.build()).expect("failed to parse class");
    assert_eq!(class.super_class, 0);
    let scope = ClassScope::new(&class);
    assert_eq!(scope.super_class_name().unwrap(), None);
}

#[test]
fn test_interfaces_are_indices() {
    let mut image = ClassImage::new();
    image.set_this_class("Impl");
    image.set_super_class("java/lang/Object");
    let runnable = image.class_named("java/lang/Runnable");
    image.add_interface(runnable);

    let class = classfile_json::parse(&image.build()).expect("failed to parse class");
    assert_eq!(class.interfaces_count, 1);
    assert_eq!(class.interfaces, vec![runnable]);
    let scope = ClassScope::new(&class);
    assert_eq!(scope.interface_names().unwrap(), vec!["java/lang/Runnable"]);
}
