//! Recursive branch growth for the tree scene

mod branches;

pub use branches::{Branch, BranchGrowth, GrowthParams, GrowthStatus, TickOutcome};
