//! The concrete checks, each grounded in a specific routine of
//! `original_source/lib/checkstl.cpp` (or, for `uninitMemberVar`,
//! spec.md §4.9's description directly, since no `checkclass.cpp` made it
//! into the retrieved original source).

mod dangling_cstr;
mod iterators;
mod size_checks;
mod stl_out_of_bounds;
mod uninit_member;

use crate::check::CheckRegistry;

pub use dangling_cstr::DanglingTemporaryLifetime;
pub use iterators::{InvalidIterator, Iterators, MismatchingContainers};
pub use size_checks::{RedundantIfRemove, UselessCallsSize};
pub use stl_out_of_bounds::StlOutOfBounds;
pub use uninit_member::UninitMemberVar;

/// Wires every concrete check into `registry`, in the order spec.md §4.9
/// lists them.
pub fn register(registry: &mut CheckRegistry) {
    registry.register(Box::new(Iterators));
    registry.register(Box::new(MismatchingContainers));
    registry.register(Box::new(InvalidIterator));
    registry.register(Box::new(StlOutOfBounds));
    registry.register(Box::new(RedundantIfRemove));
    registry.register(Box::new(UselessCallsSize));
    registry.register(Box::new(DanglingTemporaryLifetime));
    registry.register(Box::new(UninitMemberVar));
}
