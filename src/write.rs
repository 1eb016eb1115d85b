// Copyright (c) 2017-2021 Fabian Schuiki

//! Rendering of syntax trees as source text.
//!
//! The writer emits a normalized textual form of a tree: two-space
//! indentation, one statement per line, minimal parentheses. Replacement
//! nodes produced by the passes pick up regular formatting simply because
//! the whole tree is rendered uniformly. The `Display` impls on the tree
//! types delegate here.

use crate::tree::prelude::*;
use itertools::Itertools;
use std::fmt;
use std::io::{Result, Write};

/// Emits a syntax tree as source text.
pub struct Writer<W> {
    sink: W,
    indent: usize,
}

impl<W: Write> Writer<W> {
    /// Create a new writer.
    pub fn new(sink: W) -> Writer<W> {
        Writer { sink, indent: 0 }
    }

    /// Write an entire compilation unit.
    pub fn write_unit(&mut self, unit: &SourceUnit) -> Result<()> {
        for decl in &unit.types {
            self.write_type(decl)?;
        }
        Ok(())
    }

    /// Write a type declaration.
    pub fn write_type(&mut self, decl: &TypeDecl) -> Result<()> {
        let kw = match decl.kind {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
        };
        self.pad()?;
        if decl.members.is_empty() {
            return writeln!(self.sink, "{} {} {{}}", kw, decl.name);
        }
        writeln!(self.sink, "{} {} {{", kw, decl.name)?;
        self.indent += 1;
        for member in &decl.members {
            self.write_member(member)?;
        }
        self.indent -= 1;
        self.pad()?;
        writeln!(self.sink, "}}")
    }

    fn write_member(&mut self, member: &Member) -> Result<()> {
        match member {
            Member::Method { name, params, body } => {
                self.pad()?;
                write!(self.sink, "{}({})", name, params.iter().join(", "))?;
                match body {
                    Some(b) => {
                        write!(self.sink, " ")?;
                        self.write_block(b)?;
                        writeln!(self.sink)
                    }
                    None => writeln!(self.sink, ";"),
                }
            }
            Member::Field { name, init } => {
                self.pad()?;
                write!(self.sink, "var {}", name)?;
                if let Some(e) = init {
                    write!(self.sink, " = ")?;
                    self.write_expr(e, 1)?;
                }
                writeln!(self.sink, ";")
            }
            Member::StaticInit(b) => {
                self.pad()?;
                write!(self.sink, "static ")?;
                self.write_block(b)?;
                writeln!(self.sink)
            }
            Member::InstanceInit(b) => {
                self.pad()?;
                self.write_block(b)?;
                writeln!(self.sink)
            }
        }
    }

    /// Write a block. Leaves the cursor after the closing brace.
    pub fn write_block(&mut self, block: &Block) -> Result<()> {
        if block.stmts.is_empty() {
            return write!(self.sink, "{{}}");
        }
        writeln!(self.sink, "{{")?;
        self.indent += 1;
        for stmt in &block.stmts {
            self.write_stmt(stmt)?;
        }
        self.indent -= 1;
        self.pad()?;
        write!(self.sink, "}}")
    }

    /// Write a statement, including indentation and the trailing newline.
    pub fn write_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::Expr(e) => {
                self.pad()?;
                self.write_expr(e, 0)?;
                writeln!(self.sink, ";")
            }
            Stmt::Local { name, init } => {
                self.pad()?;
                write!(self.sink, "var {}", name)?;
                if let Some(e) = init {
                    write!(self.sink, " = ")?;
                    self.write_expr(e, 1)?;
                }
                writeln!(self.sink, ";")
            }
            Stmt::Empty => {
                self.pad()?;
                writeln!(self.sink, ";")
            }
            Stmt::Block(b) => {
                self.pad()?;
                self.write_block(b)?;
                writeln!(self.sink)
            }
            Stmt::If {
                cond,
                then_stmt,
                else_stmt,
            } => {
                self.write_if(cond, then_stmt, else_stmt, true)?;
                writeln!(self.sink)
            }
            Stmt::While { cond, body } => {
                self.pad()?;
                write!(self.sink, "while (")?;
                self.write_expr(cond, 0)?;
                write!(self.sink, ")")?;
                self.write_controlled(body)?;
                writeln!(self.sink)
            }
            Stmt::DoWhile { body, cond } => {
                self.pad()?;
                write!(self.sink, "do")?;
                self.write_controlled(body)?;
                write!(self.sink, " while (")?;
                self.write_expr(cond, 0)?;
                writeln!(self.sink, ");")
            }
            Stmt::For {
                init,
                cond,
                update,
                body,
            } => {
                self.pad()?;
                write!(self.sink, "for (")?;
                if let Some(i) = init {
                    self.write_for_init(i)?;
                }
                write!(self.sink, "; ")?;
                if let Some(c) = cond {
                    self.write_expr(c, 0)?;
                }
                write!(self.sink, "; ")?;
                for (i, u) in update.iter().enumerate() {
                    if i > 0 {
                        write!(self.sink, ", ")?;
                    }
                    self.write_expr(u, 0)?;
                }
                write!(self.sink, ")")?;
                self.write_controlled(body)?;
                writeln!(self.sink)
            }
            Stmt::Try {
                body,
                catches,
                finally,
            } => {
                self.pad()?;
                write!(self.sink, "try ")?;
                self.write_block(body)?;
                for clause in catches {
                    write!(self.sink, " catch ({}) ", clause.param)?;
                    self.write_block(&clause.body)?;
                }
                if let Some(f) = finally {
                    write!(self.sink, " finally ")?;
                    self.write_block(f)?;
                }
                writeln!(self.sink)
            }
            Stmt::Synchronized { lock, body } => {
                self.pad()?;
                write!(self.sink, "synchronized (")?;
                self.write_expr(lock, 0)?;
                write!(self.sink, ") ")?;
                self.write_block(body)?;
                writeln!(self.sink)
            }
            Stmt::Switch { scrutinee, arms } => {
                self.pad()?;
                write!(self.sink, "switch (")?;
                self.write_expr(scrutinee, 0)?;
                writeln!(self.sink, ") {{")?;
                self.indent += 1;
                for arm in arms {
                    self.pad()?;
                    if arm.labels.is_empty() {
                        write!(self.sink, "default: ")?;
                    } else {
                        write!(self.sink, "case {}: ", arm.labels.iter().join(", "))?;
                    }
                    self.write_block(&arm.body)?;
                    writeln!(self.sink)?;
                }
                self.indent -= 1;
                self.pad()?;
                writeln!(self.sink, "}}")
            }
            Stmt::Return(value) => {
                self.pad()?;
                write!(self.sink, "return")?;
                if let Some(e) = value {
                    write!(self.sink, " ")?;
                    self.write_expr(e, 0)?;
                }
                writeln!(self.sink, ";")
            }
            Stmt::Comment(text) => {
                self.pad()?;
                writeln!(self.sink, "// {}", text)
            }
        }
    }

    /// Write an `if` statement without the trailing newline, so `else if`
    /// chains can continue on the same line.
    fn write_if(
        &mut self,
        cond: &Expr,
        then_stmt: &Stmt,
        else_stmt: &Option<Box<Stmt>>,
        pad_first: bool,
    ) -> Result<()> {
        if pad_first {
            self.pad()?;
        }
        write!(self.sink, "if (")?;
        self.write_expr(cond, 0)?;
        write!(self.sink, ")")?;
        self.write_controlled(then_stmt)?;
        if let Some(e) = else_stmt {
            write!(self.sink, " else")?;
            if let Stmt::If {
                cond,
                then_stmt,
                else_stmt,
            } = &**e
            {
                write!(self.sink, " ")?;
                self.write_if(cond, then_stmt, else_stmt, false)?;
            } else {
                self.write_controlled(e)?;
            }
        }
        Ok(())
    }

    /// Write the statement controlled by a loop or branch header. Blocks and
    /// simple statements continue on the same line; anything heavier gets
    /// braces.
    fn write_controlled(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::Block(b) => {
                write!(self.sink, " ")?;
                self.write_block(b)
            }
            Stmt::Empty => write!(self.sink, ";"),
            Stmt::Expr(e) => {
                write!(self.sink, " ")?;
                self.write_expr(e, 0)?;
                write!(self.sink, ";")
            }
            Stmt::Return(value) => {
                write!(self.sink, " return")?;
                if let Some(e) = value {
                    write!(self.sink, " ")?;
                    self.write_expr(e, 0)?;
                }
                write!(self.sink, ";")
            }
            Stmt::If {
                cond,
                then_stmt,
                else_stmt,
            } => {
                write!(self.sink, " ")?;
                self.write_if(cond, then_stmt, else_stmt, false)
            }
            other => {
                writeln!(self.sink, " {{")?;
                self.indent += 1;
                self.write_stmt(other)?;
                self.indent -= 1;
                self.pad()?;
                write!(self.sink, "}}")
            }
        }
    }

    fn write_for_init(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::Local { name, init } => {
                write!(self.sink, "var {}", name)?;
                if let Some(e) = init {
                    write!(self.sink, " = ")?;
                    self.write_expr(e, 1)?;
                }
                Ok(())
            }
            Stmt::Expr(e) => self.write_expr(e, 0),
            _ => Ok(()),
        }
    }

    /// Write an expression, parenthesized if its precedence is below `min`.
    pub fn write_expr(&mut self, expr: &Expr, min: u8) -> Result<()> {
        let p = prec(expr);
        if p < min {
            write!(self.sink, "(")?;
        }
        match expr {
            Expr::Lit(l) => write!(self.sink, "{}", l)?,
            Expr::Name(n) => write!(self.sink, "{}", n)?,
            Expr::Unary { op, arg } => {
                write!(self.sink, "{}", op)?;
                self.write_expr(arg, 9)?;
            }
            Expr::Binary { op, lhs, rhs } => {
                self.write_expr(lhs, p)?;
                write!(self.sink, " {} ", op)?;
                self.write_expr(rhs, p + 1)?;
            }
            Expr::Call { target, args } => {
                write!(self.sink, "{}(", target)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(self.sink, ", ")?;
                    }
                    self.write_expr(arg, 0)?;
                }
                write!(self.sink, ")")?;
            }
            Expr::Assign { target, value } => {
                write!(self.sink, "{} = ", target)?;
                self.write_expr(value, 1)?;
            }
            Expr::Ternary {
                cond,
                then_expr,
                else_expr,
            } => {
                self.write_expr(cond, 3)?;
                write!(self.sink, " ? ")?;
                self.write_expr(then_expr, 3)?;
                write!(self.sink, " : ")?;
                self.write_expr(else_expr, 3)?;
            }
        }
        if p < min {
            write!(self.sink, ")")?;
        }
        Ok(())
    }

    fn pad(&mut self) -> Result<()> {
        write!(self.sink, "{}", "  ".repeat(self.indent))
    }
}

/// Binding strength of an expression, loosest first.
fn prec(expr: &Expr) -> u8 {
    match expr {
        Expr::Assign { .. } => 1,
        Expr::Ternary { .. } => 2,
        Expr::Binary { op, .. } => match op {
            BinaryOp::Or => 3,
            BinaryOp::And => 4,
            BinaryOp::Eq | BinaryOp::Ne => 5,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => 6,
            BinaryOp::Add | BinaryOp::Sub => 7,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 8,
        },
        Expr::Unary { .. } => 9,
        Expr::Lit(_) | Expr::Name(_) | Expr::Call { .. } => 10,
    }
}

impl fmt::Display for SourceUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut buf = Vec::new();
        Writer::new(&mut buf)
            .write_unit(self)
            .map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8(buf).map_err(|_| fmt::Error)?)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut buf = Vec::new();
        Writer::new(&mut buf)
            .write_block(self)
            .map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8(buf).map_err(|_| fmt::Error)?)
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut buf = Vec::new();
        Writer::new(&mut buf)
            .write_stmt(self)
            .map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8(buf).map_err(|_| fmt::Error)?)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut buf = Vec::new();
        Writer::new(&mut buf)
            .write_expr(self, 0)
            .map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8(buf).map_err(|_| fmt::Error)?)
    }
}
