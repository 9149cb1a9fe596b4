//! Coordinate path walking.
//!
//! A source location path alternates field numbers and, for repeated fields,
//! element indices: `[4, 0, 2, 1]` is "message_type[0].field[1]" relative to a
//! file. Walking it yields the names of every element passed on the way down,
//! root first.

use crate::diagnostics::Diagnostics;
use crate::error::WalkError;
use crate::node::{Node, Slot};
use crate::resolve::resolve_field;

/// Names of the elements a path passes through, root to leaf.
pub type NameChain = Vec<String>;

/// Resolve `path` starting at `node`.
///
/// Fails with a recoverable [`WalkError::IndexOutOfBounds`] when an index
/// points past the end of its collection; every other error means the path
/// and the tree disagree structurally.
pub fn resolve_path(
    path: &[i32],
    node: Node<'_>,
    diag: &mut Diagnostics,
) -> Result<NameChain, WalkError> {
    walk(path, node, 1, diag)
}

fn walk(
    path: &[i32],
    node: Node<'_>,
    depth: usize,
    diag: &mut Diagnostics,
) -> Result<NameChain, WalkError> {
    let name = node
        .name()
        .ok_or(WalkError::MissingName { kind: node.kind() })?;

    let Some((&number, rest)) = path.split_first() else {
        diag.trace(depth, format!("terminus '{name}'"));
        return Ok(vec![name.to_string()]);
    };
    diag.trace(depth, format!("at '{name}' {path:?}"));

    let field = resolve_field(node, number)?;
    diag.trace(depth + 1, format!("field {number} is '{}'", field.label));

    if rest.is_empty() {
        return Err(WalkError::DanglingFieldNumber {
            number,
            label: field.label,
        });
    }

    let deeper = match field.slot {
        Slot::Single(child) => {
            let child = child.ok_or(WalkError::UnsetField { label: field.label })?;
            walk(rest, child, depth + 1, diag)?
        }
        Slot::Repeated(items) => {
            let index = usize::try_from(rest[0]).map_err(|_| WalkError::NegativeIndex {
                label: field.label,
                index: rest[0],
            })?;
            let Some(&child) = items.get(index) else {
                diag.warn(
                    depth,
                    format!(
                        "'{}' has length {} but path {path:?} wants index {index}",
                        field.label,
                        items.len()
                    ),
                );
                return Err(WalkError::IndexOutOfBounds {
                    label: field.label,
                    index,
                    len: items.len(),
                });
            };
            walk(&rest[1..], child, depth + 1, diag)?
        }
    };

    let mut chain = Vec::with_capacity(deeper.len() + 1);
    chain.push(name.to_string());
    chain.extend(deeper);
    Ok(chain)
}
