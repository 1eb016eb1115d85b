// Copyright (c) 2017 Fabian Schuiki

//! A library of source-rewriting passes that tidy a Java-like syntax tree.
//! This library provides the tree model, the passes, and the policy surface
//! to run them over whole projects.

#[macro_use]
extern crate log;

pub mod eval;
pub mod pass;
pub mod policy;
pub mod tree;
pub mod visit;
pub mod write;

pub use crate::pass::{registry, simplify, Pass, PassContext, PassInfo, Project};
pub use crate::policy::{EmptyBlockPolicy, PolicyStore};
