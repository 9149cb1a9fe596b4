use predicates::prelude::*;
use prost::Message;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::source_code_info::Location;
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, MethodDescriptorProto, ServiceDescriptorProto, SourceCodeInfo,
};
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_protoc-gen-gendoc")))
}

fn comment(path: &[i32], text: &str) -> Location {
    Location {
        path: path.to_vec(),
        leading_comments: Some(text.to_string()),
        ..Default::default()
    }
}

fn field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

/// `order.proto` plus an undocumented dependency, with the given locations.
fn request(locations: Vec<Location>, parameter: Option<&str>) -> CodeGeneratorRequest {
    let order = FileDescriptorProto {
        name: Some("order.proto".to_string()),
        package: Some("shop".to_string()),
        dependency: vec!["common.proto".to_string()],
        message_type: vec![DescriptorProto {
            name: Some("Order".to_string()),
            field: vec![
                field("id", 1, Type::Int64),
                FieldDescriptorProto {
                    label: Some(Label::Repeated as i32),
                    type_name: Some(".shop.Order.Line".to_string()),
                    ..field("lines", 2, Type::Message)
                },
            ],
            nested_type: vec![DescriptorProto {
                name: Some("Line".to_string()),
                field: vec![field("sku", 1, Type::String)],
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
                name: Some("Place".to_string()),
                input_type: Some(".shop.Order".to_string()),
                output_type: Some(".shop.Order".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }],
        source_code_info: Some(SourceCodeInfo {
            location: locations,
        }),
        ..Default::default()
    };
    let common = FileDescriptorProto {
        name: Some("common.proto".to_string()),
        // Would be fatal if dependencies were walked.
        source_code_info: Some(SourceCodeInfo {
            location: vec![comment(&[4, 0, 42], " unrelated\n")],
        }),
        ..Default::default()
    };
    CodeGeneratorRequest {
        file_to_generate: vec!["order.proto".to_string()],
        parameter: parameter.map(str::to_string),
        proto_file: vec![common, order],
        ..Default::default()
    }
}

fn documented() -> Vec<Location> {
    vec![
        comment(&[4, 0], " An order placed by a customer.\n"),
        comment(&[4, 0, 2, 0], " Unique order id.\n"),
        comment(&[4, 0, 3, 0, 2, 0], " Stock keeping unit.\n"),
        comment(&[5, 0, 2, 0], " Not yet shipped.\n"),
        comment(&[6, 0, 2, 0], " Place a new order.\n"),
    ]
}

fn run(request: &CodeGeneratorRequest, args: &[&str]) -> CodeGeneratorResponse {
    let assert = cmd()
        .args(args)
        .write_stdin(request.encode_to_vec())
        .assert()
        .success();
    CodeGeneratorResponse::decode(assert.get_output().stdout.as_slice()).unwrap()
}

fn content(response: &CodeGeneratorResponse, name: &str) -> String {
    response
        .file
        .iter()
        .find(|f| f.name.as_deref() == Some(name))
        .and_then(|f| f.content.clone())
        .unwrap_or_else(|| panic!("no file {name} in response"))
}

// -- plugin mode --

#[test]
fn renders_markdown_by_default() {
    let response = run(&request(documented(), None), &[]);
    assert_eq!(response.error, None);
    assert_eq!(response.file.len(), 1);

    let md = content(&response, "docs.md");
    assert!(md.starts_with("# order.proto\n"));
    assert!(md.contains("### Order\n\nAn order placed by a customer.\n"));
    assert!(md.contains("| id | `int64` | 1 | Unique order id. |"));
    assert!(md.contains("| lines | repeated `shop.Order.Line` | 2 |  |"));
    assert!(md.contains("### Order.Line\n"));
    assert!(md.contains("| sku | `string` | 1 | Stock keeping unit. |"));
    assert!(md.contains("| OPEN | 0 | Not yet shipped. |"));
    assert!(md.contains("| Place | `shop.Order` | `shop.Order` | Place a new order. |"));
    assert!(!md.contains("# common.proto"));
}

#[test]
fn advertises_proto3_optional() {
    let response = run(&request(vec![], None), &[]);
    assert_eq!(response.supported_features, Some(1));
}

#[test]
fn json_via_plugin_parameter() {
    let response = run(&request(documented(), Some("format=json")), &[]);
    let json = content(&response, "docs.json");
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["files"][0]["name"], "order.proto");
    assert_eq!(
        value["files"][0]["messages"][0]["fields"][0]["description"],
        "Unique order id."
    );
    assert_eq!(value["files"][0]["services"][0]["methods"][0]["request"], "shop.Order");
}

#[test]
fn html_with_custom_name_from_flags() {
    let response = run(&request(documented(), None), &["-f", "html", "-o", "api.html"]);
    let html = content(&response, "api.html");
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<h3 id=\"order\">Order</h3>"));
    assert!(html.contains("<p>An order placed by a customer.</p>"));
}

#[test]
fn parameter_overrides_flags() {
    let response = run(&request(documented(), Some("format=markdown")), &["--format", "json"]);
    assert!(response.file.iter().any(|f| f.name.as_deref() == Some("docs.md")));
}

#[test]
fn log_file_records_the_walk() {
    let response = run(&request(documented(), None), &["--log"]);
    assert_eq!(response.file.len(), 2);
    let log = content(&response, "gendoc.log");
    assert!(log.starts_with("Processing the CodeGeneratorRequest\n"));
    assert!(log.contains("file 'order.proto'"));
    assert!(log.contains("leading comment 'Unique order id.' [4, 0, 2, 0]"));
    assert!(log.contains("terminus 'id'"));
    assert!(!log.contains("file 'common.proto'"));
}

#[test]
fn stale_location_is_skipped() {
    let mut locations = documented();
    locations.insert(0, comment(&[4, 0, 2, 9], " From an older revision.\n"));
    let response = run(&request(locations, Some("log")), &[]);
    assert_eq!(response.error, None);

    let md = content(&response, "docs.md");
    assert!(md.contains("| id | `int64` | 1 | Unique order id. |"));
    assert!(!md.contains("older revision"));

    let log = content(&response, "gendoc.log");
    assert!(log.contains("WARNING: 'field' has length 2 but path [4, 0, 2, 9] wants index 9"));
}

#[test]
fn license_header_does_not_fail_the_run() {
    let mut locations = documented();
    locations.insert(
        0,
        Location {
            path: vec![12],
            leading_detached_comments: vec![" Copyright 2024 Acme\n".to_string()],
            ..Default::default()
        },
    );
    let response = run(&request(locations, Some("log")), &[]);
    assert_eq!(response.error, None);
    assert!(content(&response, "docs.md").contains("| id | `int64` | 1 | Unique order id. |"));
    assert!(content(&response, "gendoc.log").contains("detached comment 'Copyright 2024 Acme'"));
}

#[test]
fn structural_mismatch_is_reported_to_protoc() {
    let mut locations = documented();
    locations.push(comment(&[4, 0, 42, 0], " Bad path.\n"));
    let response = run(&request(locations, None), &[]);
    assert!(response.file.is_empty());
    let error = response.error.unwrap();
    assert!(error.contains("order.proto: cannot resolve source location [4, 0, 42, 0]"));
    assert!(error.contains("DescriptorProto has no field numbered 42"));
}

#[test]
fn unknown_parameter_is_reported_to_protoc() {
    let response = run(&request(documented(), Some("colour=blue")), &[]);
    assert!(response.file.is_empty());
    assert_eq!(
        response.error.as_deref(),
        Some("unknown plugin parameter: colour=blue")
    );
}

#[test]
fn unknown_format_is_reported_to_protoc() {
    let response = run(&request(documented(), None), &["-f", "pdf"]);
    assert!(response.error.unwrap().contains("unknown format: pdf"));
}

// -- invocation errors --

#[test]
fn empty_stdin_fails() {
    cmd()
        .write_stdin(Vec::<u8>::new())
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty CodeGeneratorRequest"));
}

#[test]
fn garbage_stdin_fails() {
    cmd()
        .write_stdin(vec![0xff, 0xff, 0xff])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to decode CodeGeneratorRequest"));
}

#[test]
fn request_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&request(documented(), None).encode_to_vec())
        .unwrap();

    let assert = cmd()
        .arg("--request")
        .arg(file.path())
        .assert()
        .success();
    let response =
        CodeGeneratorResponse::decode(assert.get_output().stdout.as_slice()).unwrap();
    assert!(content(&response, "docs.md").contains("Unique order id."));
}

#[test]
fn missing_request_file_fails() {
    cmd()
        .args(["--request", "/nonexistent/request.bin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read /nonexistent/request.bin"));
}

#[test]
fn help_mentions_protoc() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("protoc plugin"));
}
