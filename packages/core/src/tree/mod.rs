//! Tree Algorithms
//!
//! Pure, synchronous algorithms over a node snapshot. Nothing in this module
//! touches a store or suspends; callers load the snapshot first and pass it in.
//!
//! - [`assembler`] - Nested tree/forest reconstruction
//! - [`subtree`] - Inclusive descendant collection for cascading deletes
//! - [`ancestry`] - Bounded upward walks for cycle checks

pub mod ancestry;
pub mod assembler;
pub mod subtree;

pub use ancestry::{ancestor_chain, is_self_or_ancestor, UnterminatedChain};
pub use assembler::{assemble_forest, assemble_one};
pub use subtree::collect_subtree;
