// Copyright (c) 2017-2021 Fabian Schuiki

//! Empty-block policies.
//!
//! A policy decides, per block kind, whether an empty block of that kind is
//! preserved or eligible for removal. Policies are resolved once per
//! compilation unit through a [`PolicyStore`], which falls back to the
//! built-in default when a unit has no explicit configuration.

use crate::tree::BlockKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The empty-block policy for one compilation unit.
///
/// Each flag names a block kind; `true` exempts empty blocks of that kind
/// from removal. Method bodies are not addressable here: they are never
/// removal candidates, since there is no statement context to remove them
/// from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmptyBlockPolicy {
    pub loop_body: bool,
    pub if_branch: bool,
    pub else_branch: bool,
    pub try_block: bool,
    pub catch_block: bool,
    pub finally_block: bool,
    pub synchronized_block: bool,
    pub static_init: bool,
    pub instance_init: bool,
    pub switch_arm: bool,
}

impl EmptyBlockPolicy {
    /// Check whether `kind` is exempt from removal under this policy.
    pub fn exempts(&self, kind: BlockKind) -> bool {
        match kind {
            BlockKind::LoopBody => self.loop_body,
            BlockKind::IfBranch => self.if_branch,
            BlockKind::ElseBranch => self.else_branch,
            BlockKind::TryBlock => self.try_block,
            BlockKind::CatchBlock => self.catch_block,
            BlockKind::FinallyBlock => self.finally_block,
            BlockKind::SynchronizedBlock => self.synchronized_block,
            BlockKind::StaticInit => self.static_init,
            BlockKind::InstanceInit => self.instance_init,
            BlockKind::SwitchArm => self.switch_arm,
            BlockKind::MethodBody => true,
        }
    }

    /// A policy that removes empty blocks of every kind.
    pub fn remove_all() -> Self {
        EmptyBlockPolicy {
            loop_body: false,
            if_branch: false,
            else_branch: false,
            try_block: false,
            catch_block: false,
            finally_block: false,
            synchronized_block: false,
            static_init: false,
            instance_init: false,
            switch_arm: false,
        }
    }
}

/// The default policy enumerates every kind explicitly.
///
/// Empty catch blocks often swallow exceptions on purpose, empty
/// synchronized blocks are load-bearing for memory visibility, and removing
/// a switch arm changes which values a switch handles, so those three kinds
/// are exempt. The purely cosmetic kinds are not.
impl Default for EmptyBlockPolicy {
    fn default() -> Self {
        EmptyBlockPolicy {
            loop_body: false,
            if_branch: false,
            else_branch: false,
            try_block: false,
            catch_block: true,
            finally_block: false,
            synchronized_block: true,
            static_init: false,
            instance_init: false,
            switch_arm: true,
        }
    }
}

/// Resolves the active policy for a compilation unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyStore {
    default: EmptyBlockPolicy,
    units: HashMap<String, EmptyBlockPolicy>,
}

impl PolicyStore {
    /// Create a store that answers every lookup with the default policy.
    pub fn new() -> Self {
        Default::default()
    }

    /// Create a store with a custom fallback policy.
    pub fn with_default(default: EmptyBlockPolicy) -> Self {
        PolicyStore {
            default,
            units: HashMap::new(),
        }
    }

    /// Attach an explicit policy to a unit.
    pub fn set_unit_policy(&mut self, unit: impl Into<String>, policy: EmptyBlockPolicy) {
        self.units.insert(unit.into(), policy);
    }

    /// Resolve the policy for a unit. Never fails; units without explicit
    /// configuration get the fallback.
    pub fn resolve(&self, unit: &str) -> &EmptyBlockPolicy {
        self.units.get(unit).unwrap_or(&self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_exemptions() {
        let p = EmptyBlockPolicy::default();
        assert!(p.exempts(BlockKind::CatchBlock));
        assert!(p.exempts(BlockKind::SynchronizedBlock));
        assert!(p.exempts(BlockKind::SwitchArm));
        assert!(p.exempts(BlockKind::MethodBody));
        assert!(!p.exempts(BlockKind::LoopBody));
        assert!(!p.exempts(BlockKind::IfBranch));
        assert!(!p.exempts(BlockKind::ElseBranch));
        assert!(!p.exempts(BlockKind::TryBlock));
        assert!(!p.exempts(BlockKind::FinallyBlock));
        assert!(!p.exempts(BlockKind::StaticInit));
        assert!(!p.exempts(BlockKind::InstanceInit));
    }

    #[test]
    fn method_bodies_always_exempt() {
        // Even a remove-everything policy keeps method bodies.
        assert!(EmptyBlockPolicy::remove_all().exempts(BlockKind::MethodBody));
    }

    #[test]
    fn store_fallback() {
        let mut store = PolicyStore::new();
        store.set_unit_policy("a.java", EmptyBlockPolicy::remove_all());
        assert!(!store.resolve("a.java").exempts(BlockKind::CatchBlock));
        assert!(store.resolve("b.java").exempts(BlockKind::CatchBlock));
    }
}
