//! Manifest rendering subsystem.
//!
//! # Data Flow
//! ```text
//! Source resources (annotated)
//!     → declaration.rs (parse YAML annotation)
//!     → aggregate.rs (group → host → paths)
//!     → desired.rs (render DesiredResource, add management marker)
//!
//! Target resources (listed)
//!     → observed.rs (keep managed only)
//!     → diff.rs (orphans = observed − desired, by name)
//! ```
//!
//! # Design Decisions
//! - Everything here is pure: no I/O, no logging
//! - Output is sorted so identical inputs render identically
//! - Desired state is recomputed from scratch on every pass

pub mod aggregate;
pub mod declaration;
pub mod desired;
pub mod diff;
pub mod observed;

pub use aggregate::{aggregate, HostGroup, PathRule, RouteGroup};
pub use declaration::{parse, ParseError, RoutingDeclaration};
pub use desired::{build, DesiredResource, MANAGED_VALUE};
pub use diff::orphans;
pub use observed::select;
