// Copyright (c) 2017-2021 Fabian Schuiki

//! Empty Block Elimination
//!
//! This pass removes blocks that effectively do nothing. Which block kinds
//! are eligible is decided by the unit's [`EmptyBlockPolicy`]; removal never
//! produces a syntactically invalid parent, and a controlling expression
//! whose side effects are in doubt is always kept.

use crate::eval::{is_pure, negated};
use crate::pass::prelude::*;
use crate::policy::EmptyBlockPolicy;
use crate::tree::prelude::*;
use std::mem;
use std::time::Duration;

/// Empty Block Elimination
///
/// Statements are processed children-first, so a removal that empties the
/// enclosing block is seen by the enclosing construct within the same sweep;
/// one sweep per unit therefore reaches a fixpoint.
pub struct EmptyBlockElim;

impl Pass for EmptyBlockElim {
    fn info() -> PassInfo {
        PassInfo {
            id: "empty-block",
            name: "Remove empty blocks",
            description: "Removes blocks that effectively do nothing, subject to a per-kind \
                          exemption policy.",
            tags: &["RSPEC-108"],
            effort: Duration::from_secs(5 * 60),
        }
    }

    fn run_on_unit(ctx: &PassContext, unit: &mut SourceUnit) -> bool {
        info!("EBE [{}]", unit.name);
        let policy = ctx.policies.resolve(&unit.name);
        let mut elim = Eliminator {
            policy,
            modified: false,
        };
        for decl in &mut unit.types {
            elim.run_on_type(decl);
        }
        elim.modified
    }
}

/// Structural emptiness: nothing left after ignoring comments and empty
/// statements. Emptiness depends only on the block's own statement list,
/// never on siblings or parents.
pub fn is_empty_block(block: &Block) -> bool {
    block.stmts.iter().all(|stmt| match stmt {
        Stmt::Comment(_) | Stmt::Empty => true,
        _ => false,
    })
}

/// Whether a block in role `kind` may be removed under `policy`.
pub fn is_removable(block: &Block, kind: BlockKind, policy: &EmptyBlockPolicy) -> bool {
    is_empty_block(block) && !policy.exempts(kind)
}

/// What becomes of a statement after processing.
enum Outcome {
    Keep(Stmt),
    Splice(Vec<Stmt>),
    Drop,
}

struct Eliminator<'a> {
    policy: &'a EmptyBlockPolicy,
    modified: bool,
}

impl Eliminator<'_> {
    fn run_on_type(&mut self, decl: &mut TypeDecl) {
        for member in &mut decl.members {
            match member {
                // Method bodies are not removal candidates, but their
                // contents are.
                Member::Method { body: Some(b), .. } => self.process_block(b),
                Member::StaticInit(b) | Member::InstanceInit(b) => self.process_block(b),
                _ => (),
            }
        }
        let policy = self.policy;
        let before = decl.members.len();
        decl.members.retain(|member| match member {
            Member::StaticInit(b) => !is_removable(b, BlockKind::StaticInit, policy),
            Member::InstanceInit(b) => !is_removable(b, BlockKind::InstanceInit, policy),
            _ => true,
        });
        if decl.members.len() != before {
            debug!(
                "dropped {} empty initializers in {}",
                before - decl.members.len(),
                decl.name
            );
            self.modified = true;
        }
    }

    fn process_block(&mut self, block: &mut Block) {
        let stmts = mem::replace(&mut block.stmts, Vec::new());
        let mut out = Vec::with_capacity(stmts.len());
        for stmt in stmts {
            match self.process_stmt(stmt) {
                Outcome::Keep(s) => out.push(s),
                Outcome::Splice(spliced) => out.extend(spliced),
                Outcome::Drop => (),
            }
        }
        block.stmts = out;
    }

    /// Rewrite the statement a loop or branch controls, in place. The shell
    /// of a block body stays; its fate is the parent construct's decision.
    fn process_body(&mut self, body: &mut Stmt) {
        if let Stmt::Block(block) = body {
            self.process_block(block);
        } else {
            let stmt = mem::replace(body, Stmt::Empty);
            *body = match self.process_stmt(stmt) {
                Outcome::Keep(s) => s,
                Outcome::Drop => Stmt::Empty,
                Outcome::Splice(stmts) => Stmt::Block(Block::of(stmts)),
            };
        }
    }

    /// Whether a controlled statement is a block eligible for removal.
    fn body_removable(&self, body: &Stmt, kind: BlockKind) -> bool {
        match body {
            Stmt::Block(b) => is_removable(b, kind, self.policy),
            _ => false,
        }
    }

    fn process_stmt(&mut self, stmt: Stmt) -> Outcome {
        match stmt {
            Stmt::Block(mut block) => {
                self.process_block(&mut block);
                if is_empty_block(&block) {
                    // Redundant braces carry no role and no policy knob.
                    trace!("dropping redundant nested block");
                    self.modified = true;
                    Outcome::Drop
                } else {
                    Outcome::Keep(Stmt::Block(block))
                }
            }

            Stmt::If {
                cond,
                mut then_stmt,
                mut else_stmt,
            } => {
                self.process_body(&mut then_stmt);
                if let Some(e) = else_stmt.as_mut() {
                    self.process_body(e);
                }
                let then_removable = self.body_removable(&then_stmt, BlockKind::IfBranch);
                let else_removable = match else_stmt.as_deref() {
                    Some(e) => self.body_removable(e, BlockKind::ElseBranch),
                    None => false,
                };
                let else_has_content = match else_stmt.as_deref() {
                    Some(Stmt::Block(b)) => !is_empty_block(b),
                    Some(_) => true,
                    None => false,
                };

                if then_removable && else_has_content {
                    // Empty then, meaningful else: invert the condition and
                    // promote the else branch. The condition keeps running.
                    debug!("inverting if with an empty then branch");
                    self.modified = true;
                    let promoted = else_stmt.take().unwrap();
                    Outcome::Keep(Stmt::If {
                        cond: negated(cond),
                        then_stmt: promoted,
                        else_stmt: None,
                    })
                } else if then_removable && (else_stmt.is_none() || else_removable) {
                    self.modified = true;
                    if is_pure(&cond) {
                        debug!("dropping if with empty branches");
                        Outcome::Drop
                    } else {
                        // The condition may have effects; evaluate it bare.
                        debug!("keeping side-effecting condition of an empty if");
                        Outcome::Keep(Stmt::Expr(cond))
                    }
                } else {
                    if else_removable {
                        debug!("dropping empty else branch");
                        self.modified = true;
                        else_stmt = None;
                    }
                    Outcome::Keep(Stmt::If {
                        cond,
                        then_stmt,
                        else_stmt,
                    })
                }
            }

            Stmt::While { cond, mut body } => {
                self.process_body(&mut body);
                if self.body_removable(&body, BlockKind::LoopBody) {
                    // The loop needs a body to stay well-formed, and the
                    // condition still governs control flow.
                    debug!("replacing empty while body with the empty statement");
                    self.modified = true;
                    body = Box::new(Stmt::Empty);
                }
                Outcome::Keep(Stmt::While { cond, body })
            }

            Stmt::DoWhile { mut body, cond } => {
                self.process_body(&mut body);
                if self.body_removable(&body, BlockKind::LoopBody) {
                    debug!("replacing empty do-while body with the empty statement");
                    self.modified = true;
                    body = Box::new(Stmt::Empty);
                }
                Outcome::Keep(Stmt::DoWhile { body, cond })
            }

            Stmt::For {
                init,
                cond,
                update,
                mut body,
            } => {
                self.process_body(&mut body);
                if self.body_removable(&body, BlockKind::LoopBody) {
                    debug!("replacing empty for body with the empty statement");
                    self.modified = true;
                    body = Box::new(Stmt::Empty);
                }
                Outcome::Keep(Stmt::For {
                    init,
                    cond,
                    update,
                    body,
                })
            }

            Stmt::Try {
                mut body,
                mut catches,
                mut finally,
            } => {
                self.process_block(&mut body);
                for clause in &mut catches {
                    self.process_block(&mut clause.body);
                }
                if let Some(f) = finally.as_mut() {
                    self.process_block(f);
                }

                // An empty try body can run nothing, so the catch clauses
                // are vacuous; only the finally statements stay observable.
                // Unwrapping would also delete the catch and finally blocks,
                // so it must not bypass their own exemptions.
                if is_removable(&body, BlockKind::TryBlock, self.policy) {
                    let catches_ok = !self.policy.exempts(BlockKind::CatchBlock)
                        || catches.iter().all(|clause| !is_empty_block(&clause.body));
                    let finally_ok = match finally.as_ref() {
                        Some(f) => {
                            !is_empty_block(f) || !self.policy.exempts(BlockKind::FinallyBlock)
                        }
                        None => true,
                    };
                    if catches_ok && finally_ok {
                        debug!("unwrapping try with an empty body");
                        self.modified = true;
                        return match finally {
                            Some(f) if !is_empty_block(&f) => Outcome::Splice(f.stmts),
                            _ => Outcome::Drop,
                        };
                    }
                }

                let empty_finally = finally
                    .as_ref()
                    .map(|f| is_removable(f, BlockKind::FinallyBlock, self.policy))
                    .unwrap_or(false);
                if empty_finally {
                    debug!("dropping empty finally block");
                    self.modified = true;
                    finally = None;
                }
                if !self.policy.exempts(BlockKind::CatchBlock) {
                    let total = catches.len();
                    let mut kept = Vec::with_capacity(total);
                    for (i, clause) in catches.into_iter().enumerate() {
                        let removable =
                            is_removable(&clause.body, BlockKind::CatchBlock, self.policy);
                        // The last leg of a finally-less try whose body must
                        // stay cannot go; a bare try is invalid.
                        let last_leg = kept.is_empty()
                            && i + 1 == total
                            && finally.is_none()
                            && is_empty_block(&body);
                        if removable && !last_leg {
                            debug!("dropping empty catch clause ({})", clause.param);
                            self.modified = true;
                        } else {
                            kept.push(clause);
                        }
                    }
                    catches = kept;
                }
                if catches.is_empty() && finally.is_none() {
                    // A try without catch or finally is invalid; the wrapper
                    // no longer does anything, so splice the body through.
                    self.modified = true;
                    return Outcome::Splice(body.stmts);
                }
                Outcome::Keep(Stmt::Try {
                    body,
                    catches,
                    finally,
                })
            }

            Stmt::Synchronized { lock, mut body } => {
                self.process_block(&mut body);
                if is_removable(&body, BlockKind::SynchronizedBlock, self.policy) {
                    self.modified = true;
                    if is_pure(&lock) {
                        debug!("dropping empty synchronized block");
                        Outcome::Drop
                    } else {
                        Outcome::Keep(Stmt::Expr(lock))
                    }
                } else {
                    Outcome::Keep(Stmt::Synchronized { lock, body })
                }
            }

            Stmt::Switch {
                scrutinee,
                mut arms,
            } => {
                for arm in &mut arms {
                    self.process_block(&mut arm.body);
                }
                if !self.policy.exempts(BlockKind::SwitchArm) {
                    let policy = self.policy;
                    let before = arms.len();
                    arms.retain(|arm| !is_removable(&arm.body, BlockKind::SwitchArm, policy));
                    if arms.len() != before {
                        debug!("dropped {} empty switch arms", before - arms.len());
                        self.modified = true;
                        if arms.is_empty() {
                            return if is_pure(&scrutinee) {
                                Outcome::Drop
                            } else {
                                Outcome::Keep(Stmt::Expr(scrutinee))
                            };
                        }
                    }
                }
                Outcome::Keep(Stmt::Switch { scrutinee, arms })
            }

            // Nothing below owns a block.
            other => Outcome::Keep(other),
        }
    }
}
