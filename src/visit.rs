// Copyright (c) 2017-2021 Fabian Schuiki

//! The visitor pattern implemented for the syntax tree.
//!
//! Visitors traverse a tree read-only, depth-first. Each `visit_*` method
//! defaults to the corresponding `walk_*` method, which descends into the
//! children of the node. Mutation does not go through this trait; the
//! rewriting passes match on the node enums directly.

use crate::tree::prelude::*;

/// A trait to implement the visitor pattern on a syntax tree.
pub trait Visitor {
    fn visit_unit(&mut self, unit: &SourceUnit) {
        self.walk_unit(unit)
    }

    fn visit_type(&mut self, decl: &TypeDecl) {
        self.walk_type(decl)
    }

    fn visit_member(&mut self, member: &Member) {
        self.walk_member(member)
    }

    fn visit_block(&mut self, block: &Block) {
        self.walk_block(block)
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        self.walk_stmt(stmt)
    }

    fn visit_expr(&mut self, expr: &Expr) {
        self.walk_expr(expr)
    }

    fn walk_unit(&mut self, unit: &SourceUnit) {
        for decl in &unit.types {
            self.visit_type(decl);
        }
    }

    fn walk_type(&mut self, decl: &TypeDecl) {
        for member in &decl.members {
            self.visit_member(member);
        }
    }

    fn walk_member(&mut self, member: &Member) {
        match member {
            Member::Method { body: Some(b), .. } => self.visit_block(b),
            Member::Method { .. } => (),
            Member::Field { init: Some(e), .. } => self.visit_expr(e),
            Member::Field { .. } => (),
            Member::StaticInit(b) | Member::InstanceInit(b) => self.visit_block(b),
        }
    }

    fn walk_block(&mut self, block: &Block) {
        for stmt in &block.stmts {
            self.visit_stmt(stmt);
        }
    }

    fn walk_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(e) => self.visit_expr(e),
            Stmt::Local { init: Some(e), .. } => self.visit_expr(e),
            Stmt::Local { .. } | Stmt::Empty | Stmt::Comment(_) => (),
            Stmt::Block(b) => self.visit_block(b),
            Stmt::If {
                cond,
                then_stmt,
                else_stmt,
            } => {
                self.visit_expr(cond);
                self.visit_stmt(then_stmt);
                if let Some(e) = else_stmt {
                    self.visit_stmt(e);
                }
            }
            Stmt::While { cond, body } => {
                self.visit_expr(cond);
                self.visit_stmt(body);
            }
            Stmt::DoWhile { body, cond } => {
                self.visit_stmt(body);
                self.visit_expr(cond);
            }
            Stmt::For {
                init,
                cond,
                update,
                body,
            } => {
                if let Some(i) = init {
                    self.visit_stmt(i);
                }
                if let Some(c) = cond {
                    self.visit_expr(c);
                }
                for u in update {
                    self.visit_expr(u);
                }
                self.visit_stmt(body);
            }
            Stmt::Try {
                body,
                catches,
                finally,
            } => {
                self.visit_block(body);
                for clause in catches {
                    self.visit_block(&clause.body);
                }
                if let Some(f) = finally {
                    self.visit_block(f);
                }
            }
            Stmt::Synchronized { lock, body } => {
                self.visit_expr(lock);
                self.visit_block(body);
            }
            Stmt::Switch { scrutinee, arms } => {
                self.visit_expr(scrutinee);
                for arm in arms {
                    self.visit_block(&arm.body);
                }
            }
            Stmt::Return(Some(e)) => self.visit_expr(e),
            Stmt::Return(None) => (),
        }
    }

    fn walk_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Lit(_) | Expr::Name(_) => (),
            Expr::Unary { arg, .. } => self.visit_expr(arg),
            Expr::Binary { lhs, rhs, .. } => {
                self.visit_expr(lhs);
                self.visit_expr(rhs);
            }
            Expr::Call { args, .. } => {
                for arg in args {
                    self.visit_expr(arg);
                }
            }
            Expr::Assign { value, .. } => self.visit_expr(value),
            Expr::Ternary {
                cond,
                then_expr,
                else_expr,
            } => {
                self.visit_expr(cond);
                self.visit_expr(then_expr);
                self.visit_expr(else_expr);
            }
        }
    }
}
