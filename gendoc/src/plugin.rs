//! protoc plugin protocol: request in, response out.

use crate::model::DocTree;
use crate::render;
use anyhow::{bail, Context, Result};
use gendoc_walker::{collect_comments, Diagnostics};
use prost::Message;
use prost_types::compiler::code_generator_response::{Feature, File};
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};

/// Name of the walk log file emitted with the `log` parameter.
pub const LOG_FILE: &str = "gendoc.log";

/// Generation options, from the command line and the plugin parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub format: String,
    /// Response file name. Defaults to `docs.<ext>` for the chosen format.
    pub output: Option<String>,
    pub include_log: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            format: "markdown".to_string(),
            output: None,
            include_log: false,
        }
    }
}

impl Options {
    /// Merge a protoc plugin parameter (`--gendoc_opt=format=json,log`).
    ///
    /// Entries are comma separated, either `key=value` or a bare flag.
    pub fn apply_parameter(&mut self, parameter: &str) -> Result<()> {
        for entry in parameter.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (key, value) = match entry.split_once('=') {
                Some((k, v)) => (k.trim(), Some(v.trim())),
                None => (entry, None),
            };
            match (key, value) {
                ("format", Some(v)) => self.format = v.to_string(),
                ("out", Some(v)) if !v.is_empty() => self.output = Some(v.to_string()),
                ("log", None) => self.include_log = true,
                ("log", Some(v)) => self.include_log = parse_flag(v)?,
                _ => bail!("unknown plugin parameter: {}", entry),
            }
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => bail!("invalid value for log: {}", value),
    }
}

/// Decode the request `protoc` wrote to our stdin.
pub fn decode_request(input: &[u8]) -> Result<CodeGeneratorRequest> {
    if input.is_empty() {
        bail!("empty CodeGeneratorRequest; this program is meant to be run by protoc");
    }
    CodeGeneratorRequest::decode(input).context("failed to decode CodeGeneratorRequest")
}

/// Decode `input` and produce the response for it.
///
/// Only an unreadable request is an `Err`; everything after decoding is
/// reported inside the response.
pub fn run(input: &[u8], options: Options) -> Result<CodeGeneratorResponse> {
    let request = decode_request(input)?;
    tracing::debug!(
        files = request.file_to_generate.len(),
        parameter = request.parameter.as_deref().unwrap_or(""),
        "request decoded"
    );
    Ok(generate(&request, options))
}

/// Produce the response for a decoded request.
///
/// Failures are reported in the response `error` field, with no files, so
/// `protoc` shows them to the user.
pub fn generate(request: &CodeGeneratorRequest, mut options: Options) -> CodeGeneratorResponse {
    if let Some(parameter) = request.parameter.as_deref() {
        if let Err(err) = options.apply_parameter(parameter) {
            return error_response(format!("{:#}", err));
        }
    }
    match render_docs(request, &options) {
        Ok(files) => CodeGeneratorResponse {
            file: files,
            supported_features: Some(Feature::Proto3Optional as u64),
            ..Default::default()
        },
        Err(err) => error_response(format!("{:#}", err)),
    }
}

fn error_response(message: String) -> CodeGeneratorResponse {
    tracing::error!("{}", message);
    CodeGeneratorResponse {
        error: Some(message),
        supported_features: Some(Feature::Proto3Optional as u64),
        ..Default::default()
    }
}

fn render_docs(request: &CodeGeneratorRequest, options: &Options) -> Result<Vec<File>> {
    let renderer = render::create_renderer(&options.format)?;

    let mut tree = DocTree::new(request);
    let mut diag = Diagnostics::new();
    diag.info(0, "Processing the CodeGeneratorRequest");
    let stats = collect_comments(
        &request.file_to_generate,
        &request.proto_file,
        &mut tree,
        &mut diag,
    )?;
    tracing::info!(
        files = stats.files,
        attached = stats.attached,
        detached = stats.detached,
        unmatched = stats.unmatched,
        stale = stats.stale,
        "comments collected"
    );

    let name = options
        .output
        .clone()
        .unwrap_or_else(|| format!("docs.{}", renderer.file_extension()));
    let mut files = vec![File {
        name: Some(name),
        content: Some(renderer.render(&tree)?),
        ..Default::default()
    }];
    if options.include_log {
        files.push(File {
            name: Some(LOG_FILE.to_string()),
            content: Some(diag.render()),
            ..Default::default()
        });
    }
    Ok(files)
}
