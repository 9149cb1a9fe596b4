//! Field lookup by descriptor field number.

use crate::error::WalkError;
use crate::node::{Descriptor, Node, Slot};

/// A field found on a node: its value and the label it is declared under.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField<'a> {
    pub slot: Slot<'a>,
    pub label: &'static str,
}

/// Find the field numbered `number` on `node`.
///
/// The lookup scans the node kind's field table in declaration order. Terminal
/// nodes (strings, scalars, opaque sub-messages) have no table, so every
/// lookup on them fails.
pub fn resolve_field(node: Node<'_>, number: i32) -> Result<ResolvedField<'_>, WalkError> {
    let found = match node {
        Node::File(d) => lookup(d, number),
        Node::Message(d) => lookup(d, number),
        Node::Field(d) => lookup(d, number),
        Node::Oneof(d) => lookup(d, number),
        Node::Enum(d) => lookup(d, number),
        Node::EnumValue(d) => lookup(d, number),
        Node::Service(d) => lookup(d, number),
        Node::Method(d) => lookup(d, number),
        Node::Text(_) | Node::Scalar(_) | Node::Opaque(_) => None,
    };
    found.ok_or(WalkError::FieldNotFound {
        kind: node.kind(),
        number,
    })
}

fn lookup<T: Descriptor>(value: &T, number: i32) -> Option<ResolvedField<'_>> {
    T::FIELDS
        .iter()
        .find(|spec| spec.number == number)
        .map(|spec| ResolvedField {
            slot: (spec.slot)(value),
            label: spec.label,
        })
}
