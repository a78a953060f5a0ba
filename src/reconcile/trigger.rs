//! Change notifications that start a reconciliation pass.

use std::fmt;

/// What happened to the triggering resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Created,
    Updated,
    Deleted,
    /// Periodic timer; no specific resource changed.
    Resync,
}

/// Identity of the resource that caused a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub kind: String,
    pub name: String,
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

/// A change notification delivered by the watch collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub kind: TriggerKind,
    pub resource: ResourceRef,
}

impl Trigger {
    pub fn new(kind: TriggerKind, resource_kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            resource: ResourceRef { kind: resource_kind.into(), name: name.into() },
        }
    }

    pub fn resync() -> Self {
        Self::new(TriggerKind::Resync, "", "")
    }

    /// Deletions are ignored; every other trigger starts a pass.
    pub fn starts_pass(&self) -> bool {
        self.kind != TriggerKind::Deleted
    }
}
