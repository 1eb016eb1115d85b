// Copyright (c) 2017-2021 Fabian Schuiki

//! Constant Ternary Folding
//!
//! This pass replaces conditional expressions whose condition is a
//! compile-time boolean constant with the selected branch. Folding is
//! bottom-up, so nested ternaries collapse inside-out, and is repeated until
//! a pass over the unit produces no further change.

use crate::eval::{classify, Tri};
use crate::pass::prelude::*;
use crate::tree::prelude::*;
use crate::visit::Visitor;
use std::mem;
use std::time::Duration;

/// Constant Ternary Folding
///
/// Folds `cond ? a : b` into `a` or `b` whenever `cond` classifies as
/// definitely true or definitely false. Indeterminate conditions leave the
/// ternary unchanged, with its possibly simplified children retained.
pub struct TernaryFolding;

impl Pass for TernaryFolding {
    fn info() -> PassInfo {
        PassInfo {
            id: "const-ternary",
            name: "Simplify constant ternary execution",
            description: "Replaces ternary expressions whose condition is always true or always \
                          false with the taken branch.",
            tags: &[],
            effort: Duration::from_secs(15),
        }
    }

    fn run_on_unit(_ctx: &PassContext, unit: &mut SourceUnit) -> bool {
        info!("TF [{}]", unit.name);
        let mut modified = false;
        let mut pass = 0;
        loop {
            let before = count_ternaries(unit);
            if !run_once(unit) {
                break;
            }
            modified = true;
            pass += 1;
            let after = count_ternaries(unit);
            debug_assert!(after < before, "a folding pass must shrink the ternary count");
            debug!(
                "pass {} folded {} ternaries in {}",
                pass,
                before - after,
                unit.name
            );
        }
        modified
    }
}

/// Count the conditional expressions in a unit.
///
/// Each modifying pass strictly reduces this count, which bounds the number
/// of fixpoint iterations.
pub fn count_ternaries(unit: &SourceUnit) -> usize {
    struct Census(usize);
    impl Visitor for Census {
        fn visit_expr(&mut self, expr: &Expr) {
            if let Expr::Ternary { .. } = expr {
                self.0 += 1;
            }
            self.walk_expr(expr);
        }
    }
    let mut census = Census(0);
    census.visit_unit(unit);
    census.0
}

/// Run one folding pass over a unit.
///
/// Returns `true` if the unit was modified.
pub fn run_once(unit: &mut SourceUnit) -> bool {
    let mut modified = false;
    for decl in &mut unit.types {
        for member in &mut decl.members {
            match member {
                Member::Method { body: Some(b), .. } => modified |= fold_block(b),
                Member::Method { .. } => (),
                Member::Field { init: Some(e), .. } => modified |= fold_expr(e),
                Member::Field { .. } => (),
                Member::StaticInit(b) | Member::InstanceInit(b) => modified |= fold_block(b),
            }
        }
    }
    modified
}

fn fold_block(block: &mut Block) -> bool {
    let mut modified = false;
    for stmt in &mut block.stmts {
        modified |= fold_stmt(stmt);
    }
    modified
}

fn fold_stmt(stmt: &mut Stmt) -> bool {
    match stmt {
        Stmt::Expr(e) => fold_expr(e),
        Stmt::Local { init: Some(e), .. } => fold_expr(e),
        Stmt::Local { .. } | Stmt::Empty | Stmt::Comment(_) => false,
        Stmt::Block(b) => fold_block(b),
        Stmt::If {
            cond,
            then_stmt,
            else_stmt,
        } => {
            let mut modified = fold_expr(cond);
            modified |= fold_stmt(then_stmt);
            if let Some(e) = else_stmt {
                modified |= fold_stmt(e);
            }
            modified
        }
        Stmt::While { cond, body } => fold_expr(cond) | fold_stmt(body),
        Stmt::DoWhile { body, cond } => fold_stmt(body) | fold_expr(cond),
        Stmt::For {
            init,
            cond,
            update,
            body,
        } => {
            let mut modified = init.as_mut().map(|i| fold_stmt(i)).unwrap_or(false);
            modified |= cond.as_mut().map(|c| fold_expr(c)).unwrap_or(false);
            for u in update {
                modified |= fold_expr(u);
            }
            modified | fold_stmt(body)
        }
        Stmt::Try {
            body,
            catches,
            finally,
        } => {
            let mut modified = fold_block(body);
            for clause in catches {
                modified |= fold_block(&mut clause.body);
            }
            if let Some(f) = finally {
                modified |= fold_block(f);
            }
            modified
        }
        Stmt::Synchronized { lock, body } => fold_expr(lock) | fold_block(body),
        Stmt::Switch { scrutinee, arms } => {
            let mut modified = fold_expr(scrutinee);
            for arm in arms {
                modified |= fold_block(&mut arm.body);
            }
            modified
        }
        Stmt::Return(Some(e)) => fold_expr(e),
        Stmt::Return(None) => false,
    }
}

/// Fold a single expression subtree, children first.
///
/// Returns `true` if anything changed.
fn fold_expr(expr: &mut Expr) -> bool {
    let mut modified = match expr {
        Expr::Lit(_) | Expr::Name(_) => false,
        Expr::Unary { arg, .. } => fold_expr(arg),
        Expr::Binary { lhs, rhs, .. } => fold_expr(lhs) | fold_expr(rhs),
        Expr::Call { args, .. } => {
            let mut modified = false;
            for arg in args {
                modified |= fold_expr(arg);
            }
            modified
        }
        Expr::Assign { value, .. } => fold_expr(value),
        Expr::Ternary {
            cond,
            then_expr,
            else_expr,
        } => fold_expr(cond) | fold_expr(then_expr) | fold_expr(else_expr),
    };

    // With the children settled, see whether this node is a ternary with a
    // definite condition and replace it wholesale with the taken branch.
    if let Expr::Ternary { cond, .. } = expr {
        let taken = match classify(cond) {
            Tri::True => Some(true),
            Tri::False => Some(false),
            Tri::Indeterminate => None,
        };
        if let Some(take_then) = taken {
            trace!(
                "folding `{}` to its {} branch",
                expr,
                if take_then { "true" } else { "false" }
            );
            let node = mem::replace(expr, Expr::Lit(Lit::Bool(false)));
            if let Expr::Ternary {
                then_expr,
                else_expr,
                ..
            } = node
            {
                *expr = if take_then { *then_expr } else { *else_expr };
                modified = true;
            }
        }
    }
    modified
}
