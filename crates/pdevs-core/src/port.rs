//! Typed port declarations.
//!
//! A port is a named, typed channel on a model's boundary.  The message
//! type is erased at runtime (bags carry `dyn Any` payloads), so each
//! declaration records the `TypeId` of its message type.  Coupling
//! validation compares these `TypeId`s at assembly time, which is the
//! earliest point a dynamically-assembled model tree can catch a
//! mismatched connection.

use std::any::{Any, TypeId, type_name};
use std::fmt;

/// Declaration of one input or output port: a name plus the message type
/// it carries.
///
/// Cheap to clone; `type_label` is kept only so error messages can say
/// *which* types clashed.
#[derive(Clone, PartialEq, Eq)]
pub struct PortSpec {
    name: String,
    message_type: TypeId,
    type_label: &'static str,
}

impl PortSpec {
    /// Declare a port named `name` carrying messages of type `M`.
    pub fn of<M: Any + Send + Sync>(name: &str) -> Self {
        Self {
            name: name.to_string(),
            message_type: TypeId::of::<M>(),
            type_label: type_name::<M>(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn message_type(&self) -> TypeId {
        self.message_type
    }

    /// Human-readable name of the message type, for diagnostics.
    #[inline]
    pub fn type_label(&self) -> &'static str {
        self.type_label
    }

    /// Do two ports carry the same message type?
    #[inline]
    pub fn compatible_with(&self, other: &PortSpec) -> bool {
        self.message_type == other.message_type
    }
}

impl fmt::Debug for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.type_label)
    }
}

/// Find a port by name in a declaration slice.
pub fn find_port<'a>(ports: &'a [PortSpec], name: &str) -> Option<&'a PortSpec> {
    ports.iter().find(|p| p.name() == name)
}
