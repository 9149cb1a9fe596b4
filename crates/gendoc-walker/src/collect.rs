//! Comment collection: source locations → (name chain, comment) pairs.

use crate::diagnostics::Diagnostics;
use crate::error::CollectError;
use crate::node::Node;
use crate::walk::resolve_path;
use prost_types::source_code_info::Location;
use prost_types::FileDescriptorProto;

/// Comments this short or shorter are treated as absent.
pub const TRIVIAL_COMMENT_LEN: usize = 1;

/// Receiver of resolved comments, keyed by name chain.
pub trait CommentSink {
    /// Attach `comment` to the element named by `name_chain`.
    ///
    /// Returns `false` if no element has that chain.
    fn attach_comment(&mut self, name_chain: &[String], comment: &str) -> bool;
}

impl CommentSink for Vec<(Vec<String>, String)> {
    fn attach_comment(&mut self, name_chain: &[String], comment: &str) -> bool {
        self.push((name_chain.to_vec(), comment.to_string()));
        true
    }
}

/// Counters for one collection run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollectStats {
    /// Files whose locations were scanned.
    pub files: usize,
    /// Source locations seen in those files.
    pub locations: usize,
    /// Locations that passed the triviality filter and were walked.
    pub walked: usize,
    /// Leading comments handed to the sink and accepted.
    pub attached: usize,
    /// Walked locations carrying only detached comments. These are logged,
    /// never attached, and never fail the run.
    pub detached: usize,
    /// Resolved chains the sink had no element for.
    pub unmatched: usize,
    /// Locations skipped because of an out-of-bounds index.
    pub stale: usize,
}

pub fn is_non_trivial(comment: &str) -> bool {
    comment.len() > TRIVIAL_COMMENT_LEN
}

fn has_detached_comment(location: &Location) -> bool {
    location
        .leading_detached_comments
        .iter()
        .any(|c| is_non_trivial(c))
}

/// Walk every commented source location of the files named in
/// `files_to_generate` and hand the leading comments to `sink`.
///
/// Files in `all_files` that are not being generated are dependencies and are
/// skipped. Stale locations are skipped with a warning; any other walk failure
/// on a location with a leading comment aborts the run.
pub fn collect_comments<S: CommentSink + ?Sized>(
    files_to_generate: &[String],
    all_files: &[FileDescriptorProto],
    sink: &mut S,
    diag: &mut Diagnostics,
) -> Result<CollectStats, CollectError> {
    let mut stats = CollectStats::default();
    for file in all_files {
        let name = file.name.as_deref().unwrap_or_default();
        if !files_to_generate.iter().any(|g| g == name) {
            diag.trace(0, format!("skipping dependency '{name}'"));
            continue;
        }
        collect_file_comments(file, sink, diag, &mut stats)?;
    }
    Ok(stats)
}

/// Collect the comments of a single file into `sink`, accumulating `stats`.
pub fn collect_file_comments<S: CommentSink + ?Sized>(
    file: &FileDescriptorProto,
    sink: &mut S,
    diag: &mut Diagnostics,
    stats: &mut CollectStats,
) -> Result<(), CollectError> {
    let file_name = file.name.as_deref().unwrap_or_default();
    diag.info(0, format!("file '{file_name}'"));
    stats.files += 1;

    let Some(info) = &file.source_code_info else {
        diag.warn(0, format!("'{file_name}' carries no source code info"));
        return Ok(());
    };

    for location in &info.location {
        stats.locations += 1;
        let lead = location.leading_comments.as_deref().unwrap_or_default();
        let leading = is_non_trivial(lead);
        if leading {
            diag.info(1, format!("leading comment '{}' {:?}", lead.trim(), location.path));
        }
        for detached in &location.leading_detached_comments {
            diag.info(1, format!("detached comment '{}'", detached.trim()));
        }
        if !leading && !has_detached_comment(location) {
            continue;
        }

        stats.walked += 1;
        let resolved = resolve_path(&location.path, Node::File(file), diag);
        if !leading {
            // Detached comments only label the log. Paths such as `[12]`
            // (the `syntax` statement under a license header) name no element.
            stats.detached += 1;
            match resolved {
                Ok(chain) => diag.info(1, format!("detached comments precede {chain:?}")),
                Err(err) => diag.warn(
                    1,
                    format!("detached comments at {:?} name no element: {err}", location.path),
                ),
            }
            continue;
        }

        match resolved {
            Ok(chain) => {
                if sink.attach_comment(&chain, lead) {
                    stats.attached += 1;
                } else {
                    stats.unmatched += 1;
                    diag.warn(1, format!("no element for {chain:?}"));
                }
            }
            Err(err) if err.is_recoverable() => {
                stats.stale += 1;
                diag.warn(1, format!("skipping {:?}: {err}", location.path));
            }
            Err(source) => {
                return Err(CollectError {
                    file: file_name.to_string(),
                    path: location.path.clone(),
                    source,
                });
            }
        }
    }
    Ok(())
}
