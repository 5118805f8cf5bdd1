//! Hand-assembled class-file images for the integration tests. The builder
//! tracks constant-pool slots (including the double slot taken by Long and
//! Double) and lays the sections out in class-file order.

#![allow(dead_code)]

pub struct ClassImage {
    minor_version: u16,
    major_version: u16,
    next_slot: u16,
    pool: Vec<u8>,
    pub access_flags: u16,
    pub this_class: u16,
    pub super_class: u16,
    interfaces: Vec<u16>,
    fields_count: u16,
    fields: Vec<u8>,
    methods_count: u16,
    methods: Vec<u8>,
    attributes_count: u16,
    attributes: Vec<u8>,
}

impl ClassImage {
    pub fn new() -> Self {
        ClassImage {
            minor_version: 0,
            major_version: 61,
            next_slot: 1,
            pool: Vec::new(),
            access_flags: 0x0021, // PUBLIC | SUPER
            this_class: 0,
            super_class: 0,
            interfaces: Vec::new(),
            fields_count: 0,
            fields: Vec::new(),
            methods_count: 0,
            methods: Vec::new(),
            attributes_count: 0,
            attributes: Vec::new(),
        }
    }

    pub fn with_version(major: u16, minor: u16) -> Self {
        let mut image = ClassImage::new();
        image.major_version = major;
        image.minor_version = minor;
        image
    }

    fn push_entry(&mut self, tag: u8, payload: &[u8], wide: bool) -> u16 {
        let index = self.next_slot;
        self.pool.push(tag);
        self.pool.extend_from_slice(payload);
        self.next_slot += if wide { 2 } else { 1 };
        index
    }

    pub fn utf8(&mut self, s: &str) -> u16 {
        self.utf8_raw(s.as_bytes())
    }

    /// A Utf8 entry with arbitrary payload bytes, for exercising the
    /// Modified UTF-8 decoder.
    pub fn utf8_raw(&mut self, raw: &[u8]) -> u16 {
        let mut payload = (raw.len() as u16).to_be_bytes().to_vec();
        payload.extend_from_slice(raw);
        self.push_entry(1, &payload, false)
    }

    pub fn integer(&mut self, value: i32) -> u16 {
        self.push_entry(3, &value.to_be_bytes(), false)
    }

    pub fn float(&mut self, value: f32) -> u16 {
        self.push_entry(4, &value.to_be_bytes(), false)
    }

    pub fn long(&mut self, value: i64) -> u16 {
        self.push_entry(5, &value.to_be_bytes(), true)
    }

    pub fn double(&mut self, value: f64) -> u16 {
        self.push_entry(6, &value.to_be_bytes(), true)
    }

    pub fn class_of(&mut self, name_index: u16) -> u16 {
        self.push_entry(7, &name_index.to_be_bytes(), false)
    }

    pub fn class_named(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        self.class_of(name_index)
    }

    pub fn string_of(&mut self, utf8_index: u16) -> u16 {
        self.push_entry(8, &utf8_index.to_be_bytes(), false)
    }

    pub fn name_and_type(&mut self, name_index: u16, descriptor_index: u16) -> u16 {
        let mut payload = name_index.to_be_bytes().to_vec();
        payload.extend_from_slice(&descriptor_index.to_be_bytes());
        self.push_entry(12, &payload, false)
    }

    pub fn method_ref(&mut self, class_index: u16, name_and_type_index: u16) -> u16 {
        let mut payload = class_index.to_be_bytes().to_vec();
        payload.extend_from_slice(&name_and_type_index.to_be_bytes());
        self.push_entry(10, &payload, false)
    }

    pub fn field_ref(&mut self, class_index: u16, name_and_type_index: u16) -> u16 {
        let mut payload = class_index.to_be_bytes().to_vec();
        payload.extend_from_slice(&name_and_type_index.to_be_bytes());
        self.push_entry(9, &payload, false)
    }

    /// Appends an entry with an arbitrary tag byte, for malformed-input tests.
    pub fn raw_entry(&mut self, tag: u8, payload: &[u8]) -> u16 {
        self.push_entry(tag, payload, false)
    }

    pub fn set_this_class(&mut self, name: &str) -> u16 {
        self.this_class = self.class_named(name);
        self.this_class
    }

    pub fn set_super_class(&mut self, name: &str) -> u16 {
        self.super_class = self.class_named(name);
        self.super_class
    }

    pub fn add_interface(&mut self, class_index: u16) {
        self.interfaces.push(class_index);
    }

    /// Encodes an attribute: name index, 32-bit payload length, payload.
    pub fn attribute(&mut self, name: &str, payload: &[u8]) -> Vec<u8> {
        let name_index = self.utf8(name);
        attribute_with_index(name_index, payload)
    }

    fn member_bytes(access_flags: u16, name_index: u16, descriptor_index: u16, attrs: &[Vec<u8>]) -> Vec<u8> {
        let mut out = access_flags.to_be_bytes().to_vec();
        out.extend_from_slice(&name_index.to_be_bytes());
        out.extend_from_slice(&descriptor_index.to_be_bytes());
        out.extend_from_slice(&(attrs.len() as u16).to_be_bytes());
        for attr in attrs {
            out.extend_from_slice(attr);
        }
        out
    }

    pub fn add_field(&mut self, access_flags: u16, name: &str, descriptor: &str, attrs: &[Vec<u8>]) {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(descriptor);
        let bytes = Self::member_bytes(access_flags, name_index, descriptor_index, attrs);
        self.fields.extend_from_slice(&bytes);
        self.fields_count += 1;
    }

    pub fn add_method(&mut self, access_flags: u16, name: &str, descriptor: &str, attrs: &[Vec<u8>]) {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(descriptor);
        let bytes = Self::member_bytes(access_flags, name_index, descriptor_index, attrs);
        self.methods.extend_from_slice(&bytes);
        self.methods_count += 1;
    }

    pub fn add_class_attribute(&mut self, attr: Vec<u8>) {
        self.attributes.extend_from_slice(&attr);
        self.attributes_count += 1;
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFEBABEu32.to_be_bytes());
        out.extend_from_slice(&self.minor_version.to_be_bytes());
        out.extend_from_slice(&self.major_version.to_be_bytes());
        out.extend_from_slice(&self.next_slot.to_be_bytes());
        out.extend_from_slice(&self.pool);
        out.extend_from_slice(&self.access_flags.to_be_bytes());
        out.extend_from_slice(&self.this_class.to_be_bytes());
        out.extend_from_slice(&self.super_class.to_be_bytes());
        out.extend_from_slice(&(self.interfaces.len() as u16).to_be_bytes());
        for interface in &self.interfaces {
            out.extend_from_slice(&interface.to_be_bytes());
        }
        out.extend_from_slice(&self.fields_count.to_be_bytes());
        out.extend_from_slice(&self.fields);
        out.extend_from_slice(&self.methods_count.to_be_bytes());
        out.extend_from_slice(&self.methods);
        out.extend_from_slice(&self.attributes_count.to_be_bytes());
        out.extend_from_slice(&self.attributes);
        out
    }
}

pub fn attribute_with_index(name_index: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = name_index.to_be_bytes().to_vec();
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(payload);
    out
}

/// A `Code` attribute payload: max stack/locals, the raw bytecode, an
/// exception table and nested attributes.
pub fn code_payload(
    max_stack: u16,
    max_locals: u16,
    code: &[u8],
    exceptions: &[(u16, u16, u16, u16)],
    sub_attrs: &[Vec<u8>],
) -> Vec<u8> {
    let mut out = max_stack.to_be_bytes().to_vec();
    out.extend_from_slice(&max_locals.to_be_bytes());
    out.extend_from_slice(&(code.len() as u32).to_be_bytes());
    out.extend_from_slice(code);
    out.extend_from_slice(&(exceptions.len() as u16).to_be_bytes());
    for &(start_pc, end_pc, handler_pc, catch_type) in exceptions {
        out.extend_from_slice(&start_pc.to_be_bytes());
        out.extend_from_slice(&end_pc.to_be_bytes());
        out.extend_from_slice(&handler_pc.to_be_bytes());
        out.extend_from_slice(&catch_type.to_be_bytes());
    }
    out.extend_from_slice(&(sub_attrs.len() as u16).to_be_bytes());
    for attr in sub_attrs {
        out.extend_from_slice(attr);
    }
    out
}
