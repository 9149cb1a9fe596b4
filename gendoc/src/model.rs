//! Documentation tree: format-agnostic model of the files being documented.
//!
//! Elements are keyed by name the same way the walker names them, so a name
//! chain such as `["order.proto", "Order", "id"]` addresses a field directly.

use gendoc_walker::CommentSink;
use prost_types::compiler::CodeGeneratorRequest;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    MethodDescriptorProto, ServiceDescriptorProto,
};
use serde::Serialize;

/// All documented files of one request.
#[derive(Debug, Default, Serialize)]
pub struct DocTree {
    pub files: Vec<FileDoc>,
}

#[derive(Debug, Default, Serialize)]
pub struct FileDoc {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<ImportDoc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<MessageDoc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<EnumDoc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<ServiceDoc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<FieldDoc>,
}

/// An `import` statement. Comments above it land here.
#[derive(Debug, Default, Serialize)]
pub struct ImportDoc {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct MessageDoc {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDoc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub oneofs: Vec<OneofDoc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<MessageDoc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<EnumDoc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<FieldDoc>,
}

#[derive(Debug, Default, Serialize)]
pub struct FieldDoc {
    pub name: String,
    pub number: i32,
    /// Proto type: a scalar keyword or the message/enum name without the
    /// leading dot.
    #[serde(rename = "type")]
    pub type_name: String,
    /// `repeated`, `required` or `optional`; absent for plain singular fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oneof: Option<String>,
    /// Extended message, for extension fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extendee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct OneofDoc {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct EnumDoc {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub values: Vec<EnumValueDoc>,
}

#[derive(Debug, Default, Serialize)]
pub struct EnumValueDoc {
    pub name: String,
    pub number: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct ServiceDoc {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub methods: Vec<MethodDoc>,
}

#[derive(Debug, Default, Serialize)]
pub struct MethodDoc {
    pub name: String,
    pub request: String,
    pub response: String,
    pub client_streaming: bool,
    pub server_streaming: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// -- Construction -------------------------------------------------------------

impl DocTree {
    /// Build the tree for the files `protoc` asked us to generate, in request
    /// order. Dependencies are left out.
    pub fn new(request: &CodeGeneratorRequest) -> Self {
        let files = request
            .proto_file
            .iter()
            .filter(|file| {
                request
                    .file_to_generate
                    .iter()
                    .any(|g| Some(g.as_str()) == file.name.as_deref())
            })
            .map(FileDoc::from)
            .collect();
        DocTree { files }
    }
}

impl From<&FileDescriptorProto> for FileDoc {
    fn from(file: &FileDescriptorProto) -> Self {
        FileDoc {
            name: file.name().to_string(),
            package: file.package.clone(),
            description: None,
            imports: file
                .dependency
                .iter()
                .map(|path| ImportDoc {
                    path: path.clone(),
                    description: None,
                })
                .collect(),
            messages: file.message_type.iter().map(MessageDoc::from).collect(),
            enums: file.enum_type.iter().map(EnumDoc::from).collect(),
            services: file.service.iter().map(ServiceDoc::from).collect(),
            extensions: file.extension.iter().map(|f| field_doc(f, None)).collect(),
        }
    }
}

impl From<&DescriptorProto> for MessageDoc {
    fn from(message: &DescriptorProto) -> Self {
        // proto3 `optional` fields live in synthetic oneofs; those are not
        // part of the documented shape.
        let synthetic: Vec<i32> = message
            .field
            .iter()
            .filter(|f| f.proto3_optional())
            .filter_map(|f| f.oneof_index)
            .collect();
        let oneof_name = |field: &FieldDescriptorProto| {
            field
                .oneof_index
                .filter(|i| !synthetic.contains(i))
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| message.oneof_decl.get(i))
                .map(|o| o.name().to_string())
        };

        MessageDoc {
            name: message.name().to_string(),
            description: None,
            fields: message
                .field
                .iter()
                .map(|f| field_doc(f, oneof_name(f)))
                .collect(),
            oneofs: message
                .oneof_decl
                .iter()
                .enumerate()
                .filter(|(i, _)| i32::try_from(*i).map_or(true, |i| !synthetic.contains(&i)))
                .map(|(_, o)| OneofDoc {
                    name: o.name().to_string(),
                    description: None,
                })
                .collect(),
            messages: message.nested_type.iter().map(MessageDoc::from).collect(),
            enums: message.enum_type.iter().map(EnumDoc::from).collect(),
            extensions: message
                .extension
                .iter()
                .map(|f| field_doc(f, None))
                .collect(),
        }
    }
}

impl From<&EnumDescriptorProto> for EnumDoc {
    fn from(e: &EnumDescriptorProto) -> Self {
        EnumDoc {
            name: e.name().to_string(),
            description: None,
            values: e
                .value
                .iter()
                .map(|v| EnumValueDoc {
                    name: v.name().to_string(),
                    number: v.number(),
                    description: None,
                })
                .collect(),
        }
    }
}

impl From<&ServiceDescriptorProto> for ServiceDoc {
    fn from(service: &ServiceDescriptorProto) -> Self {
        ServiceDoc {
            name: service.name().to_string(),
            description: None,
            methods: service.method.iter().map(MethodDoc::from).collect(),
        }
    }
}

impl From<&MethodDescriptorProto> for MethodDoc {
    fn from(method: &MethodDescriptorProto) -> Self {
        MethodDoc {
            name: method.name().to_string(),
            request: type_reference(method.input_type()),
            response: type_reference(method.output_type()),
            client_streaming: method.client_streaming(),
            server_streaming: method.server_streaming(),
            description: None,
        }
    }
}

fn field_doc(field: &FieldDescriptorProto, oneof: Option<String>) -> FieldDoc {
    FieldDoc {
        name: field.name().to_string(),
        number: field.number(),
        type_name: match field.type_name.as_deref() {
            Some(name) => type_reference(name),
            None => scalar_keyword(field.r#type()).to_string(),
        },
        label: match field.label() {
            Label::Repeated => Some("repeated"),
            Label::Required => Some("required"),
            Label::Optional if field.proto3_optional() => Some("optional"),
            Label::Optional => None,
        },
        oneof,
        extendee: field.extendee.as_deref().map(type_reference),
        description: None,
    }
}

/// `.shop.Order` → `shop.Order`
fn type_reference(name: &str) -> String {
    name.trim_start_matches('.').to_string()
}

fn scalar_keyword(ty: Type) -> &'static str {
    match ty {
        Type::Double => "double",
        Type::Float => "float",
        Type::Int64 => "int64",
        Type::Uint64 => "uint64",
        Type::Int32 => "int32",
        Type::Fixed64 => "fixed64",
        Type::Fixed32 => "fixed32",
        Type::Bool => "bool",
        Type::String => "string",
        Type::Group => "group",
        Type::Message => "message",
        Type::Bytes => "bytes",
        Type::Uint32 => "uint32",
        Type::Enum => "enum",
        Type::Sfixed32 => "sfixed32",
        Type::Sfixed64 => "sfixed64",
        Type::Sint32 => "sint32",
        Type::Sint64 => "sint64",
    }
}

// -- Comment attachment -------------------------------------------------------

/// A tree element that can carry a description and may have named children.
trait Element {
    fn name(&self) -> &str;
    fn description_mut(&mut self) -> &mut Option<String>;

    fn child_mut(&mut self, _name: &str) -> Option<&mut dyn Element> {
        None
    }
}

fn find_child<'a, T: Element>(items: &'a mut [T], name: &str) -> Option<&'a mut dyn Element> {
    items
        .iter_mut()
        .find(|item| item.name() == name)
        .map(|item| item as &mut dyn Element)
}

fn attach(element: &mut dyn Element, rest: &[String], text: String) -> bool {
    match rest.split_first() {
        None => {
            *element.description_mut() = Some(text);
            true
        }
        Some((head, tail)) => match element.child_mut(head) {
            Some(child) => attach(child, tail, text),
            None => false,
        },
    }
}

impl Element for FileDoc {
    fn name(&self) -> &str {
        &self.name
    }

    fn description_mut(&mut self) -> &mut Option<String> {
        &mut self.description
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut dyn Element> {
        find_child(&mut self.messages, name)
            .or_else(|| find_child(&mut self.enums, name))
            .or_else(|| find_child(&mut self.services, name))
            .or_else(|| find_child(&mut self.extensions, name))
            .or_else(|| find_child(&mut self.imports, name))
    }
}

impl Element for MessageDoc {
    fn name(&self) -> &str {
        &self.name
    }

    fn description_mut(&mut self) -> &mut Option<String> {
        &mut self.description
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut dyn Element> {
        find_child(&mut self.fields, name)
            .or_else(|| find_child(&mut self.messages, name))
            .or_else(|| find_child(&mut self.enums, name))
            .or_else(|| find_child(&mut self.oneofs, name))
            .or_else(|| find_child(&mut self.extensions, name))
    }
}

impl Element for EnumDoc {
    fn name(&self) -> &str {
        &self.name
    }

    fn description_mut(&mut self) -> &mut Option<String> {
        &mut self.description
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut dyn Element> {
        find_child(&mut self.values, name)
    }
}

impl Element for ServiceDoc {
    fn name(&self) -> &str {
        &self.name
    }

    fn description_mut(&mut self) -> &mut Option<String> {
        &mut self.description
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut dyn Element> {
        find_child(&mut self.methods, name)
    }
}

macro_rules! leaf_element {
    ($($ty:ty => $name:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                fn name(&self) -> &str {
                    &self.$name
                }

                fn description_mut(&mut self) -> &mut Option<String> {
                    &mut self.description
                }
            }
        )*
    };
}

leaf_element!(
    FieldDoc => name,
    OneofDoc => name,
    EnumValueDoc => name,
    MethodDoc => name,
    ImportDoc => path,
);

impl CommentSink for DocTree {
    fn attach_comment(&mut self, name_chain: &[String], comment: &str) -> bool {
        let Some((file_name, rest)) = name_chain.split_first() else {
            return false;
        };
        match find_child(&mut self.files, file_name) {
            Some(file) => attach(file, rest, clean_comment(comment)),
            None => false,
        }
    }
}

/// Normalize raw comment text from `protoc`.
///
/// Removes the indentation common to all non-blank lines, trailing
/// whitespace, and blank lines at either end.
pub fn clean_comment(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();

    let min_indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start_matches(' ').len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                ""
            } else {
                l[min_indent..].trim_end()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::{EnumValueDescriptorProto, OneofDescriptorProto};

    fn named_field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
        FieldDescriptorProto {
            name: Some(name.to_string()),
            number: Some(number),
            label: Some(Label::Optional as i32),
            r#type: Some(ty as i32),
            ..Default::default()
        }
    }

    fn order_file() -> FileDescriptorProto {
        FileDescriptorProto {
            name: Some("order.proto".to_string()),
            package: Some("shop".to_string()),
            dependency: vec!["common.proto".to_string()],
            message_type: vec![DescriptorProto {
                name: Some("Order".to_string()),
                field: vec![
                    named_field("id", 1, Type::Int64),
                    FieldDescriptorProto {
                        label: Some(Label::Repeated as i32),
                        type_name: Some(".shop.Order.Line".to_string()),
                        ..named_field("lines", 2, Type::Message)
                    },
                    FieldDescriptorProto {
                        oneof_index: Some(0),
                        ..named_field("card", 3, Type::String)
                    },
                    FieldDescriptorProto {
                        oneof_index: Some(1),
                        proto3_optional: Some(true),
                        ..named_field("note", 4, Type::String)
                    },
                ],
                oneof_decl: vec![
                    OneofDescriptorProto {
                        name: Some("payment".to_string()),
                        ..Default::default()
                    },
                    OneofDescriptorProto {
                        name: Some("_note".to_string()),
                        ..Default::default()
                    },
                ],
                nested_type: vec![DescriptorProto {
                    name: Some("Line".to_string()),
                    field: vec![named_field("sku", 1, Type::String)],
                    ..Default::default()
                }],
                ..Default::default()
            }],
            enum_type: vec![EnumDescriptorProto {
                name: Some("Status".to_string()),
                value: vec![EnumValueDescriptorProto {
                    name: Some("OPEN".to_string()),
                    number: Some(0),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            service: vec![ServiceDescriptorProto {
                name: Some("Orders".to_string()),
                method: vec![MethodDescriptorProto {
                    name: Some("Watch".to_string()),
                    input_type: Some(".shop.Order".to_string()),
                    output_type: Some(".shop.Order".to_string()),
                    server_streaming: Some(true),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn tree() -> DocTree {
        let request = CodeGeneratorRequest {
            file_to_generate: vec!["order.proto".to_string()],
            proto_file: vec![
                FileDescriptorProto {
                    name: Some("common.proto".to_string()),
                    ..Default::default()
                },
                order_file(),
            ],
            ..Default::default()
        };
        DocTree::new(&request)
    }

    fn chain(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn dependencies_are_not_documented() {
        let tree = tree();
        assert_eq!(tree.files.len(), 1);
        assert_eq!(tree.files[0].name, "order.proto");
    }

    #[test]
    fn field_types_and_labels() {
        let tree = tree();
        let fields = &tree.files[0].messages[0].fields;
        assert_eq!(fields[0].type_name, "int64");
        assert_eq!(fields[0].label, None);
        assert_eq!(fields[1].type_name, "shop.Order.Line");
        assert_eq!(fields[1].label, Some("repeated"));
        assert_eq!(fields[2].oneof.as_deref(), Some("payment"));
        assert_eq!(fields[3].label, Some("optional"));
        assert_eq!(fields[3].oneof, None);
    }

    #[test]
    fn synthetic_oneofs_are_dropped() {
        let tree = tree();
        let oneofs: Vec<_> = tree.files[0].messages[0]
            .oneofs
            .iter()
            .map(|o| o.name.as_str())
            .collect();
        assert_eq!(oneofs, vec!["payment"]);
    }

    #[test]
    fn methods_keep_streaming_flags() {
        let tree = tree();
        let method = &tree.files[0].services[0].methods[0];
        assert_eq!(method.request, "shop.Order");
        assert!(method.server_streaming);
        assert!(!method.client_streaming);
    }

    #[test]
    fn attach_by_name_chain() {
        let mut tree = tree();
        assert!(tree.attach_comment(&chain(&["order.proto", "Order"]), " An order.\n"));
        assert!(tree.attach_comment(
            &chain(&["order.proto", "Order", "Line", "sku"]),
            " Stock unit.\n"
        ));
        assert!(tree.attach_comment(&chain(&["order.proto", "Status", "OPEN"]), " Open.\n"));
        assert!(tree.attach_comment(&chain(&["order.proto", "Orders", "Watch"]), " Watch.\n"));
        assert!(tree.attach_comment(&chain(&["order.proto", "common.proto"]), " Shared.\n"));
        assert!(tree.attach_comment(&chain(&["order.proto", "Order", "payment"]), " Pay.\n"));

        let file = &tree.files[0];
        assert_eq!(file.messages[0].description.as_deref(), Some("An order."));
        assert_eq!(
            file.messages[0].messages[0].fields[0].description.as_deref(),
            Some("Stock unit.")
        );
        assert_eq!(file.enums[0].values[0].description.as_deref(), Some("Open."));
        assert_eq!(
            file.services[0].methods[0].description.as_deref(),
            Some("Watch.")
        );
        assert_eq!(file.imports[0].description.as_deref(), Some("Shared."));
        assert_eq!(file.messages[0].oneofs[0].description.as_deref(), Some("Pay."));
    }

    #[test]
    fn unknown_chain_is_rejected() {
        let mut tree = tree();
        assert!(!tree.attach_comment(&chain(&["other.proto", "Order"]), " x\n"));
        assert!(!tree.attach_comment(&chain(&["order.proto", "Missing"]), " x\n"));
        assert!(!tree.attach_comment(&chain(&["order.proto", "Order", "id", "deeper"]), " x\n"));
        assert!(!tree.attach_comment(&[], " x\n"));
    }

    #[test]
    fn clean_comment_unindents() {
        assert_eq!(clean_comment(" Order id.\n"), "Order id.");
        assert_eq!(
            clean_comment(" Line one\n   indented\n\n Line three\n"),
            "Line one\n  indented\n\nLine three"
        );
        assert_eq!(clean_comment("\n\n  padded  \n\n"), "padded");
    }
}
