// Copyright (c) 2017-2021 Fabian Schuiki

//! Condition evaluation.
//!
//! This module classifies boolean conditions as definitely-true,
//! definitely-false, or indeterminate, folding boolean algebra and
//! comparisons over literal operands along the way. It never mutates the
//! tree; callers perform all replacement. It also hosts the conservative
//! side-effect analysis the elimination pass consults before it discards an
//! expression.

use crate::tree::prelude::*;

/// Tri-state classification of a boolean condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tri {
    True,
    False,
    Indeterminate,
}

impl Tri {
    /// Logical negation. Indeterminate stays indeterminate.
    pub fn not(self) -> Tri {
        match self {
            Tri::True => Tri::False,
            Tri::False => Tri::True,
            Tri::Indeterminate => Tri::Indeterminate,
        }
    }

    pub fn is_definite(self) -> bool {
        self != Tri::Indeterminate
    }
}

impl From<bool> for Tri {
    fn from(v: bool) -> Tri {
        if v {
            Tri::True
        } else {
            Tri::False
        }
    }
}

/// Classify a condition.
///
/// A definite classification implies that the whole expression is built from
/// literals and operators over them, so discarding it wholesale drops no
/// observable work. In particular `f() && false` stays indeterminate: the
/// value is known, but the call is not ours to discard. The dual
/// `false && f()` classifies as false, since short-circuiting means the call
/// never runs in the first place.
pub fn classify(expr: &Expr) -> Tri {
    match expr {
        Expr::Lit(Lit::Bool(v)) => Tri::from(*v),
        Expr::Unary {
            op: UnaryOp::Not,
            arg,
        } => classify(arg).not(),
        Expr::Binary { op, lhs, rhs } => match op {
            BinaryOp::And => match classify(lhs) {
                Tri::False => Tri::False,
                Tri::True => classify(rhs),
                Tri::Indeterminate => Tri::Indeterminate,
            },
            BinaryOp::Or => match classify(lhs) {
                Tri::True => Tri::True,
                Tri::False => classify(rhs),
                Tri::Indeterminate => Tri::Indeterminate,
            },
            _ if op.is_comparison() => classify_comparison(*op, lhs, rhs),
            _ => Tri::Indeterminate,
        },
        Expr::Ternary {
            cond,
            then_expr,
            else_expr,
        } => match classify(cond) {
            Tri::True => classify(then_expr),
            Tri::False => classify(else_expr),
            Tri::Indeterminate => Tri::Indeterminate,
        },
        _ => Tri::Indeterminate,
    }
}

/// Classify a comparison between two expressions.
fn classify_comparison(op: BinaryOp, lhs: &Expr, rhs: &Expr) -> Tri {
    // Integer operands fold through constant arithmetic.
    if let (Some(l), Some(r)) = (eval_int(lhs), eval_int(rhs)) {
        let v = match op {
            BinaryOp::Eq => l == r,
            BinaryOp::Ne => l != r,
            BinaryOp::Lt => l < r,
            BinaryOp::Le => l <= r,
            BinaryOp::Gt => l > r,
            BinaryOp::Ge => l >= r,
            _ => return Tri::Indeterminate,
        };
        return Tri::from(v);
    }

    // Equality between non-integer literals of the same kind. Relational
    // operators do not apply to them.
    match (lhs, rhs) {
        (Expr::Lit(Lit::Bool(l)), Expr::Lit(Lit::Bool(r))) => match op {
            BinaryOp::Eq => Tri::from(l == r),
            BinaryOp::Ne => Tri::from(l != r),
            _ => Tri::Indeterminate,
        },
        // String literals are interned, so `==` on two literals is definite
        // even under reference equality semantics.
        (Expr::Lit(Lit::Str(l)), Expr::Lit(Lit::Str(r))) => match op {
            BinaryOp::Eq => Tri::from(l == r),
            BinaryOp::Ne => Tri::from(l != r),
            _ => Tri::Indeterminate,
        },
        _ => Tri::Indeterminate,
    }
}

/// Evaluate a constant integer expression.
///
/// Anything that could overflow, divide by zero, or depend on runtime state
/// yields `None`.
pub fn eval_int(expr: &Expr) -> Option<i64> {
    match expr {
        Expr::Lit(Lit::Int(v)) => Some(*v),
        Expr::Unary {
            op: UnaryOp::Neg,
            arg,
        } => eval_int(arg)?.checked_neg(),
        Expr::Binary { op, lhs, rhs } => {
            let l = eval_int(lhs)?;
            let r = eval_int(rhs)?;
            match op {
                BinaryOp::Add => l.checked_add(r),
                BinaryOp::Sub => l.checked_sub(r),
                BinaryOp::Mul => l.checked_mul(r),
                BinaryOp::Div => l.checked_div(r),
                BinaryOp::Rem => l.checked_rem(r),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Check whether evaluating `expr` can have an observable effect.
///
/// The analysis is conservative: calls and assignments are always impure,
/// and division counts as impure unless the divisor is a provably non-zero
/// constant, since it can throw.
pub fn is_pure(expr: &Expr) -> bool {
    match expr {
        Expr::Lit(_) | Expr::Name(_) => true,
        Expr::Unary { arg, .. } => is_pure(arg),
        Expr::Binary { op, lhs, rhs } => match op {
            BinaryOp::Div | BinaryOp::Rem => {
                is_pure(lhs) && eval_int(rhs).map(|v| v != 0).unwrap_or(false)
            }
            _ => is_pure(lhs) && is_pure(rhs),
        },
        Expr::Ternary {
            cond,
            then_expr,
            else_expr,
        } => is_pure(cond) && is_pure(then_expr) && is_pure(else_expr),
        Expr::Call { .. } | Expr::Assign { .. } => false,
    }
}

/// Build the logical negation of an expression.
///
/// Collapses double negation and flips comparisons instead of wrapping them.
pub fn negated(expr: Expr) -> Expr {
    match expr {
        Expr::Unary {
            op: UnaryOp::Not,
            arg,
        } => *arg,
        Expr::Lit(Lit::Bool(v)) => Expr::Lit(Lit::Bool(!v)),
        Expr::Binary { op, lhs, rhs } => match op.complement() {
            Some(op) => Expr::Binary { op, lhs, rhs },
            None => Expr::not(Expr::Binary { op, lhs, rhs }),
        },
        other => Expr::not(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_algebra() {
        let t = Expr::lit(true);
        let f = Expr::lit(false);
        let x = Expr::name("x");
        assert_eq!(classify(&t), Tri::True);
        assert_eq!(classify(&Expr::not(f.clone())), Tri::True);
        assert_eq!(classify(&x), Tri::Indeterminate);
        assert_eq!(
            classify(&Expr::binary(BinaryOp::And, t.clone(), x.clone())),
            Tri::Indeterminate
        );
        assert_eq!(
            classify(&Expr::binary(BinaryOp::And, f.clone(), x.clone())),
            Tri::False
        );
        assert_eq!(
            classify(&Expr::binary(BinaryOp::Or, t.clone(), x.clone())),
            Tri::True
        );
        assert_eq!(
            classify(&Expr::binary(BinaryOp::Or, f, Expr::not(x))),
            Tri::Indeterminate
        );
    }

    #[test]
    fn impure_operand_blocks_classification() {
        // The value of `f() && false` is known, but the call must still run.
        let e = Expr::binary(
            BinaryOp::And,
            Expr::call("f", vec![]),
            Expr::lit(false),
        );
        assert_eq!(classify(&e), Tri::Indeterminate);
        // Short-circuiting makes the dual definite.
        let e = Expr::binary(
            BinaryOp::And,
            Expr::lit(false),
            Expr::call("f", vec![]),
        );
        assert_eq!(classify(&e), Tri::False);
    }

    #[test]
    fn literal_comparisons() {
        assert_eq!(
            classify(&Expr::binary(BinaryOp::Lt, Expr::lit(1), Expr::lit(2))),
            Tri::True
        );
        assert_eq!(
            classify(&Expr::binary(
                BinaryOp::Eq,
                Expr::binary(BinaryOp::Add, Expr::lit(1), Expr::lit(1)),
                Expr::lit(2),
            )),
            Tri::True
        );
        assert_eq!(
            classify(&Expr::binary(BinaryOp::Eq, Expr::lit("a"), Expr::lit("b"))),
            Tri::False
        );
        assert_eq!(
            classify(&Expr::binary(BinaryOp::Lt, Expr::lit("a"), Expr::lit("b"))),
            Tri::Indeterminate
        );
    }

    #[test]
    fn purity() {
        assert!(is_pure(&Expr::name("x")));
        assert!(!is_pure(&Expr::call("f", vec![])));
        assert!(!is_pure(&Expr::assign("x", Expr::lit(1))));
        // Division by a runtime value can throw.
        assert!(!is_pure(&Expr::binary(
            BinaryOp::Div,
            Expr::lit(1),
            Expr::name("n"),
        )));
        assert!(is_pure(&Expr::binary(
            BinaryOp::Div,
            Expr::name("n"),
            Expr::lit(2),
        )));
    }

    #[test]
    fn negation_shapes() {
        assert_eq!(negated(Expr::not(Expr::name("x"))), Expr::name("x"));
        assert_eq!(
            negated(Expr::binary(BinaryOp::Lt, Expr::name("a"), Expr::name("b"))),
            Expr::binary(BinaryOp::Ge, Expr::name("a"), Expr::name("b"))
        );
        assert_eq!(
            negated(Expr::name("x")),
            Expr::not(Expr::name("x"))
        );
    }
}
