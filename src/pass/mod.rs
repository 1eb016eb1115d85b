// Copyright (c) 2017-2021 Fabian Schuiki

//! Rewriting passes on the syntax tree.
//!
//! This module implements the passes that simplify a syntax tree, and the
//! infrastructure to run them over a whole project.

pub mod empty_block;
pub mod ternary;

pub use self::empty_block::EmptyBlockElim;
pub use self::ternary::TernaryFolding;

use crate::policy::PolicyStore;
use crate::tree::SourceUnit;
use rayon::prelude::*;
use std::time::Duration;

/// Metadata describing a pass to a host catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassInfo {
    /// Stable identifier of the pass.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// One-line description of what the pass does.
    pub description: &'static str,
    /// Classification tags, e.g. the rule-set standard a pass originates
    /// from.
    pub tags: &'static [&'static str],
    /// Estimated effort to apply the same fix by hand, per occurrence. Used
    /// by host-side reporting only.
    pub effort: Duration,
}

/// Additional context and configuration for passes.
#[derive(Debug, Default)]
pub struct PassContext {
    /// The policy store consulted by the empty-block pass.
    pub policies: PolicyStore,
}

impl PassContext {
    /// Create a context with default policies.
    pub fn new() -> Self {
        Default::default()
    }

    /// Create a context with the given policy store.
    pub fn with_policies(policies: PolicyStore) -> Self {
        PassContext { policies }
    }
}

/// A set of compilation units processed together.
///
/// Units are independent; a pass may rewrite them in parallel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Project {
    pub units: Vec<SourceUnit>,
}

impl Project {
    pub fn new(units: Vec<SourceUnit>) -> Self {
        Project { units }
    }
}

/// A rewriting pass.
///
/// The infrastructure will always call `run_on_project()`. Implementors of
/// the trait override `run_on_unit()`; the trait provides the project-level
/// fan-out, which processes units in parallel.
pub trait Pass {
    /// The catalog metadata of this pass.
    fn info() -> PassInfo;

    /// Run this pass on an entire project.
    fn run_on_project(ctx: &PassContext, project: &mut Project) -> bool {
        project
            .units
            .par_iter_mut()
            .map(|unit| Self::run_on_unit(ctx, unit))
            .reduce(|| false, |a, b| a || b)
    }

    /// Run this pass on a single compilation unit.
    fn run_on_unit(ctx: &PassContext, unit: &mut SourceUnit) -> bool;
}

/// The catalog entries of every pass in this crate.
pub fn registry() -> Vec<PassInfo> {
    vec![TernaryFolding::info(), EmptyBlockElim::info()]
}

/// Apply the full simplification pipeline to a project.
///
/// Ternary folding runs to its fixpoint first, then empty blocks are
/// eliminated in one sweep. The two passes make no assumptions about each
/// other; they compose by sequential application.
pub fn simplify(ctx: &PassContext, project: &mut Project) -> bool {
    let mut modified = TernaryFolding::run_on_project(ctx, project);
    modified |= EmptyBlockElim::run_on_project(ctx, project);
    modified
}

/// Re-exports of commonly used pass infrastructure.
pub mod prelude {
    pub use super::{Pass, PassContext, PassInfo, Project};
}
