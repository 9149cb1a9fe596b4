//! Reattach protobuf source comments to the schema elements they document.
//!
//! `protoc` records comments in `SourceCodeInfo` keyed by a coordinate path
//! through the descriptor tree rather than by element name. This crate walks
//! those paths and turns each into the chain of names it addresses, e.g.
//! `[4, 0, 2, 0]` in `order.proto` → `["order.proto", "Order", "id"]`.

pub mod collect;
pub mod diagnostics;
pub mod error;
pub mod node;
pub mod resolve;
pub mod walk;

pub use collect::{collect_comments, collect_file_comments, CollectStats, CommentSink};
pub use diagnostics::{Diagnostic, Diagnostics, Level};
pub use error::{CollectError, ErrorKind, WalkError};
pub use node::{Descriptor, FieldSpec, Node, Scalar, Slot};
pub use resolve::{resolve_field, ResolvedField};
pub use walk::{resolve_path, NameChain};
