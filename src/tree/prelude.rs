// Copyright (c) 2017-2020 Fabian Schuiki

//! Re-exports of commonly used tree items.

pub use crate::tree::{
    BinaryOp, Block, BlockKind, CatchClause, Expr, Lit, Member, SourceUnit, Stmt, SwitchArm,
    TypeDecl, TypeKind, UnaryOp,
};
