//! Typed views over decoded descriptor messages.
//!
//! Each descriptor type carries its own field table mirroring the numbering in
//! `google/protobuf/descriptor.proto`. The walker only ever looks fields up in
//! these tables, so supporting a new descriptor field means adding one row.

use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, MethodDescriptorProto, OneofDescriptorProto, ServiceDescriptorProto,
};

/// One element of the schema tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    File(&'a FileDescriptorProto),
    Message(&'a DescriptorProto),
    Field(&'a FieldDescriptorProto),
    Oneof(&'a OneofDescriptorProto),
    Enum(&'a EnumDescriptorProto),
    EnumValue(&'a EnumValueDescriptorProto),
    Service(&'a ServiceDescriptorProto),
    Method(&'a MethodDescriptorProto),
    /// A string attribute. It is its own name.
    Text(&'a str),
    /// A non-string scalar attribute (number, enum tag, flag).
    Scalar(Scalar),
    /// A descriptor sub-message without a `name` attribute: options, ranges,
    /// source info. Only the type name is kept, for diagnostics.
    Opaque(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Int(i64),
    Bool(bool),
}

/// The value found at a field number on a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<'a> {
    /// Singular field; `None` when the optional field is unset.
    Single(Option<Node<'a>>),
    Repeated(Vec<Node<'a>>),
}

/// One row of a descriptor's field table.
pub struct FieldSpec<T> {
    pub number: i32,
    pub label: &'static str,
    pub slot: for<'a> fn(&'a T) -> Slot<'a>,
}

/// Metadata a descriptor type carries about itself.
pub trait Descriptor: Sized + 'static {
    const KIND: &'static str;
    const FIELDS: &'static [FieldSpec<Self>];
}

impl<'a> Node<'a> {
    /// Descriptor type name, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match *self {
            Node::File(_) => FileDescriptorProto::KIND,
            Node::Message(_) => DescriptorProto::KIND,
            Node::Field(_) => FieldDescriptorProto::KIND,
            Node::Oneof(_) => OneofDescriptorProto::KIND,
            Node::Enum(_) => EnumDescriptorProto::KIND,
            Node::EnumValue(_) => EnumValueDescriptorProto::KIND,
            Node::Service(_) => ServiceDescriptorProto::KIND,
            Node::Method(_) => MethodDescriptorProto::KIND,
            Node::Text(_) => "string",
            Node::Scalar(_) => "scalar",
            Node::Opaque(kind) => kind,
        }
    }

    /// Display name of this node, if it has one.
    pub fn name(&self) -> Option<&'a str> {
        match *self {
            Node::File(d) => d.name.as_deref(),
            Node::Message(d) => d.name.as_deref(),
            Node::Field(d) => d.name.as_deref(),
            Node::Oneof(d) => d.name.as_deref(),
            Node::Enum(d) => d.name.as_deref(),
            Node::EnumValue(d) => d.name.as_deref(),
            Node::Service(d) => d.name.as_deref(),
            Node::Method(d) => d.name.as_deref(),
            Node::Text(text) => Some(text),
            Node::Scalar(_) | Node::Opaque(_) => None,
        }
    }
}

// -- Slot constructors --------------------------------------------------------

fn text(value: &Option<String>) -> Slot<'_> {
    Slot::Single(value.as_deref().map(Node::Text))
}

fn texts(values: &[String]) -> Slot<'_> {
    Slot::Repeated(values.iter().map(|v| Node::Text(v)).collect())
}

fn int(value: Option<i32>) -> Slot<'static> {
    Slot::Single(value.map(|v| Node::Scalar(Scalar::Int(v.into()))))
}

fn ints(values: &[i32]) -> Slot<'static> {
    Slot::Repeated(
        values
            .iter()
            .map(|&v| Node::Scalar(Scalar::Int(v.into())))
            .collect(),
    )
}

fn flag(value: Option<bool>) -> Slot<'static> {
    Slot::Single(value.map(|v| Node::Scalar(Scalar::Bool(v))))
}

fn opaque<T>(value: &Option<T>, kind: &'static str) -> Slot<'static> {
    Slot::Single(value.as_ref().map(|_| Node::Opaque(kind)))
}

fn opaques<T>(values: &[T], kind: &'static str) -> Slot<'static> {
    Slot::Repeated(vec![Node::Opaque(kind); values.len()])
}

fn nodes<'a, T>(values: &'a [T], wrap: fn(&'a T) -> Node<'a>) -> Slot<'a> {
    Slot::Repeated(values.iter().map(wrap).collect())
}

// -- Field tables -------------------------------------------------------------

impl Descriptor for FileDescriptorProto {
    const KIND: &'static str = "FileDescriptorProto";
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec {
            number: 1,
            label: "name",
            slot: |d| text(&d.name),
        },
        FieldSpec {
            number: 2,
            label: "package",
            slot: |d| text(&d.package),
        },
        FieldSpec {
            number: 3,
            label: "dependency",
            slot: |d| texts(&d.dependency),
        },
        FieldSpec {
            number: 4,
            label: "message_type",
            slot: |d| nodes(&d.message_type, Node::Message),
        },
        FieldSpec {
            number: 5,
            label: "enum_type",
            slot: |d| nodes(&d.enum_type, Node::Enum),
        },
        FieldSpec {
            number: 6,
            label: "service",
            slot: |d| nodes(&d.service, Node::Service),
        },
        FieldSpec {
            number: 7,
            label: "extension",
            slot: |d| nodes(&d.extension, Node::Field),
        },
        FieldSpec {
            number: 8,
            label: "options",
            slot: |d| opaque(&d.options, "FileOptions"),
        },
        FieldSpec {
            number: 9,
            label: "source_code_info",
            slot: |d| opaque(&d.source_code_info, "SourceCodeInfo"),
        },
        FieldSpec {
            number: 10,
            label: "public_dependency",
            slot: |d| ints(&d.public_dependency),
        },
        FieldSpec {
            number: 11,
            label: "weak_dependency",
            slot: |d| ints(&d.weak_dependency),
        },
        FieldSpec {
            number: 12,
            label: "syntax",
            slot: |d| text(&d.syntax),
        },
    ];
}

impl Descriptor for DescriptorProto {
    const KIND: &'static str = "DescriptorProto";
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec {
            number: 1,
            label: "name",
            slot: |d| text(&d.name),
        },
        FieldSpec {
            number: 2,
            label: "field",
            slot: |d| nodes(&d.field, Node::Field),
        },
        FieldSpec {
            number: 3,
            label: "nested_type",
            slot: |d| nodes(&d.nested_type, Node::Message),
        },
        FieldSpec {
            number: 4,
            label: "enum_type",
            slot: |d| nodes(&d.enum_type, Node::Enum),
        },
        FieldSpec {
            number: 5,
            label: "extension_range",
            slot: |d| opaques(&d.extension_range, "ExtensionRange"),
        },
        FieldSpec {
            number: 6,
            label: "extension",
            slot: |d| nodes(&d.extension, Node::Field),
        },
        FieldSpec {
            number: 7,
            label: "options",
            slot: |d| opaque(&d.options, "MessageOptions"),
        },
        FieldSpec {
            number: 8,
            label: "oneof_decl",
            slot: |d| nodes(&d.oneof_decl, Node::Oneof),
        },
        FieldSpec {
            number: 9,
            label: "reserved_range",
            slot: |d| opaques(&d.reserved_range, "ReservedRange"),
        },
        FieldSpec {
            number: 10,
            label: "reserved_name",
            slot: |d| texts(&d.reserved_name),
        },
    ];
}

impl Descriptor for FieldDescriptorProto {
    const KIND: &'static str = "FieldDescriptorProto";
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec {
            number: 1,
            label: "name",
            slot: |d| text(&d.name),
        },
        FieldSpec {
            number: 2,
            label: "extendee",
            slot: |d| text(&d.extendee),
        },
        FieldSpec {
            number: 3,
            label: "number",
            slot: |d| int(d.number),
        },
        FieldSpec {
            number: 4,
            label: "label",
            slot: |d| int(d.label),
        },
        FieldSpec {
            number: 5,
            label: "type",
            slot: |d| int(d.r#type),
        },
        FieldSpec {
            number: 6,
            label: "type_name",
            slot: |d| text(&d.type_name),
        },
        FieldSpec {
            number: 7,
            label: "default_value",
            slot: |d| text(&d.default_value),
        },
        FieldSpec {
            number: 8,
            label: "options",
            slot: |d| opaque(&d.options, "FieldOptions"),
        },
        FieldSpec {
            number: 9,
            label: "oneof_index",
            slot: |d| int(d.oneof_index),
        },
        FieldSpec {
            number: 10,
            label: "json_name",
            slot: |d| text(&d.json_name),
        },
        FieldSpec {
            number: 17,
            label: "proto3_optional",
            slot: |d| flag(d.proto3_optional),
        },
    ];
}

impl Descriptor for OneofDescriptorProto {
    const KIND: &'static str = "OneofDescriptorProto";
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec {
            number: 1,
            label: "name",
            slot: |d| text(&d.name),
        },
        FieldSpec {
            number: 2,
            label: "options",
            slot: |d| opaque(&d.options, "OneofOptions"),
        },
    ];
}

impl Descriptor for EnumDescriptorProto {
    const KIND: &'static str = "EnumDescriptorProto";
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec {
            number: 1,
            label: "name",
            slot: |d| text(&d.name),
        },
        FieldSpec {
            number: 2,
            label: "value",
            slot: |d| nodes(&d.value, Node::EnumValue),
        },
        FieldSpec {
            number: 3,
            label: "options",
            slot: |d| opaque(&d.options, "EnumOptions"),
        },
        FieldSpec {
            number: 4,
            label: "reserved_range",
            slot: |d| opaques(&d.reserved_range, "EnumReservedRange"),
        },
        FieldSpec {
            number: 5,
            label: "reserved_name",
            slot: |d| texts(&d.reserved_name),
        },
    ];
}

impl Descriptor for EnumValueDescriptorProto {
    const KIND: &'static str = "EnumValueDescriptorProto";
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec {
            number: 1,
            label: "name",
            slot: |d| text(&d.name),
        },
        FieldSpec {
            number: 2,
            label: "number",
            slot: |d| int(d.number),
        },
        FieldSpec {
            number: 3,
            label: "options",
            slot: |d| opaque(&d.options, "EnumValueOptions"),
        },
    ];
}

impl Descriptor for ServiceDescriptorProto {
    const KIND: &'static str = "ServiceDescriptorProto";
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec {
            number: 1,
            label: "name",
            slot: |d| text(&d.name),
        },
        FieldSpec {
            number: 2,
            label: "method",
            slot: |d| nodes(&d.method, Node::Method),
        },
        FieldSpec {
            number: 3,
            label: "options",
            slot: |d| opaque(&d.options, "ServiceOptions"),
        },
    ];
}

impl Descriptor for MethodDescriptorProto {
    const KIND: &'static str = "MethodDescriptorProto";
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec {
            number: 1,
            label: "name",
            slot: |d| text(&d.name),
        },
        FieldSpec {
            number: 2,
            label: "input_type",
            slot: |d| text(&d.input_type),
        },
        FieldSpec {
            number: 3,
            label: "output_type",
            slot: |d| text(&d.output_type),
        },
        FieldSpec {
            number: 4,
            label: "options",
            slot: |d| opaque(&d.options, "MethodOptions"),
        },
        FieldSpec {
            number: 5,
            label: "client_streaming",
            slot: |d| flag(d.client_streaming),
        },
        FieldSpec {
            number: 6,
            label: "server_streaming",
            slot: |d| flag(d.server_streaming),
        },
    ];
}
