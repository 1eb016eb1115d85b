use recast::pass::EmptyBlockElim;
use recast::tree::prelude::*;
use recast::{EmptyBlockPolicy, Pass, PassContext, PolicyStore};

/// Create a `class Main { run() { ... } }` unit holding the given statements.
fn within_method(stmts: Vec<Stmt>) -> SourceUnit {
    let mut unit = SourceUnit::new("Main.java");
    let mut class = TypeDecl::class("Main");
    class.members.push(Member::Method {
        name: "run".to_string(),
        params: vec![],
        body: Some(Block::of(stmts)),
    });
    unit.types.push(class);
    unit
}

fn eliminate(unit: &mut SourceUnit) -> bool {
    EmptyBlockElim::run_on_unit(&PassContext::new(), unit)
}

fn eliminate_with(unit: &mut SourceUnit, policy: EmptyBlockPolicy) -> bool {
    let ctx = PassContext::with_policies(PolicyStore::with_default(policy));
    EmptyBlockElim::run_on_unit(&ctx, unit)
}

fn block_stmt(stmts: Vec<Stmt>) -> Box<Stmt> {
    Box::new(Stmt::Block(Block::of(stmts)))
}

#[test]
fn empty_while_body_becomes_empty_statement() {
    let mut unit = within_method(vec![Stmt::While {
        cond: Expr::call("ready", vec![]),
        body: block_stmt(vec![]),
    }]);
    assert!(eliminate(&mut unit));
    assert_eq!(
        unit,
        within_method(vec![Stmt::While {
            cond: Expr::call("ready", vec![]),
            body: Box::new(Stmt::Empty),
        }])
    );
}

#[test]
fn empty_if_with_pure_condition_is_dropped() {
    let mut unit = within_method(vec![Stmt::If {
        cond: Expr::name("flag"),
        then_stmt: block_stmt(vec![]),
        else_stmt: None,
    }]);
    assert!(eliminate(&mut unit));
    assert_eq!(unit, within_method(vec![]));
}

#[test]
fn side_effecting_condition_survives_as_statement() {
    let mut unit = within_method(vec![Stmt::If {
        cond: Expr::call("sideEffectingCall", vec![]),
        then_stmt: block_stmt(vec![]),
        else_stmt: None,
    }]);
    assert!(eliminate(&mut unit));
    assert_eq!(
        unit,
        within_method(vec![Stmt::Expr(Expr::call("sideEffectingCall", vec![]))])
    );
}

#[test]
fn empty_then_with_meaningful_else_inverts_the_condition() {
    let mut unit = within_method(vec![Stmt::If {
        cond: Expr::binary(BinaryOp::Eq, Expr::name("n"), Expr::lit(0)),
        then_stmt: block_stmt(vec![]),
        else_stmt: Some(block_stmt(vec![Stmt::Expr(Expr::call("f", vec![]))])),
    }]);
    assert!(eliminate(&mut unit));
    assert_eq!(
        unit,
        within_method(vec![Stmt::If {
            cond: Expr::binary(BinaryOp::Ne, Expr::name("n"), Expr::lit(0)),
            then_stmt: block_stmt(vec![Stmt::Expr(Expr::call("f", vec![]))]),
            else_stmt: None,
        }])
    );
}

#[test]
fn empty_else_branch_is_dropped() {
    let mut unit = within_method(vec![Stmt::If {
        cond: Expr::name("flag"),
        then_stmt: block_stmt(vec![Stmt::Expr(Expr::call("f", vec![]))]),
        else_stmt: Some(block_stmt(vec![])),
    }]);
    assert!(eliminate(&mut unit));
    assert_eq!(
        unit,
        within_method(vec![Stmt::If {
            cond: Expr::name("flag"),
            then_stmt: block_stmt(vec![Stmt::Expr(Expr::call("f", vec![]))]),
            else_stmt: None,
        }])
    );
}

#[test]
fn exempt_catch_block_is_never_touched() {
    let mut unit = within_method(vec![Stmt::Try {
        body: Block::of(vec![Stmt::Expr(Expr::call("work", vec![]))]),
        catches: vec![CatchClause {
            param: "e".to_string(),
            body: Block::new(),
        }],
        finally: None,
    }]);
    let before = unit.clone();
    // The default policy exempts catch blocks, no matter how often we run.
    for _ in 0..3 {
        assert!(!eliminate(&mut unit));
        assert_eq!(unit, before);
    }
}

#[test]
fn empty_catch_removed_when_policy_allows() {
    let mut unit = within_method(vec![Stmt::Try {
        body: Block::of(vec![Stmt::Expr(Expr::call("work", vec![]))]),
        catches: vec![CatchClause {
            param: "e".to_string(),
            body: Block::new(),
        }],
        finally: None,
    }]);
    assert!(eliminate_with(&mut unit, EmptyBlockPolicy::remove_all()));
    // With the last catch gone and no finally, the try wrapper is vacuous.
    assert_eq!(
        unit,
        within_method(vec![Stmt::Expr(Expr::call("work", vec![]))])
    );
}

#[test]
fn empty_try_body_keeps_only_the_finally() {
    let mut unit = within_method(vec![Stmt::Try {
        body: Block::new(),
        catches: vec![CatchClause {
            param: "e".to_string(),
            body: Block::of(vec![Stmt::Expr(Expr::call("handle", vec![]))]),
        }],
        finally: Some(Block::of(vec![Stmt::Expr(Expr::call("release", vec![]))])),
    }]);
    assert!(eliminate(&mut unit));
    assert_eq!(
        unit,
        within_method(vec![Stmt::Expr(Expr::call("release", vec![]))])
    );
}

#[test]
fn empty_finally_is_dropped() {
    let mut unit = within_method(vec![Stmt::Try {
        body: Block::of(vec![Stmt::Expr(Expr::call("work", vec![]))]),
        catches: vec![CatchClause {
            param: "e".to_string(),
            body: Block::of(vec![Stmt::Expr(Expr::call("handle", vec![]))]),
        }],
        finally: Some(Block::new()),
    }]);
    assert!(eliminate(&mut unit));
    assert_eq!(
        unit,
        within_method(vec![Stmt::Try {
            body: Block::of(vec![Stmt::Expr(Expr::call("work", vec![]))]),
            catches: vec![CatchClause {
                param: "e".to_string(),
                body: Block::of(vec![Stmt::Expr(Expr::call("handle", vec![]))]),
            }],
            finally: None,
        }])
    );
}

#[test]
fn synchronized_block_exempt_by_default() {
    let mut unit = within_method(vec![Stmt::Synchronized {
        lock: Expr::name("lock"),
        body: Block::new(),
    }]);
    let before = unit.clone();
    assert!(!eliminate(&mut unit));
    assert_eq!(unit, before);
}

#[test]
fn synchronized_block_removed_when_policy_allows() {
    let mut unit = within_method(vec![Stmt::Synchronized {
        lock: Expr::name("lock"),
        body: Block::new(),
    }]);
    assert!(eliminate_with(&mut unit, EmptyBlockPolicy::remove_all()));
    assert_eq!(unit, within_method(vec![]));

    // A side-effecting lock expression survives as a bare statement.
    let mut unit = within_method(vec![Stmt::Synchronized {
        lock: Expr::call("lockFor", vec![Expr::name("key")]),
        body: Block::new(),
    }]);
    assert!(eliminate_with(&mut unit, EmptyBlockPolicy::remove_all()));
    assert_eq!(
        unit,
        within_method(vec![Stmt::Expr(Expr::call(
            "lockFor",
            vec![Expr::name("key")],
        ))])
    );
}

#[test]
fn empty_initializers_are_removed() {
    let mut unit = SourceUnit::new("Main.java");
    let mut class = TypeDecl::class("Main");
    class.members.push(Member::StaticInit(Block::new()));
    class.members.push(Member::InstanceInit(Block::of(vec![Stmt::Comment(
        "nothing to do".to_string(),
    )])));
    class.members.push(Member::Field {
        name: "x".to_string(),
        init: None,
    });
    unit.types.push(class);
    assert!(eliminate(&mut unit));
    assert_eq!(unit.types[0].members.len(), 1);
    assert_eq!(
        unit.types[0].members[0],
        Member::Field {
            name: "x".to_string(),
            init: None,
        }
    );
}

#[test]
fn method_bodies_are_never_removal_candidates() {
    let mut unit = SourceUnit::new("Shape.java");
    let mut class = TypeDecl::class("Shape");
    class.members.push(Member::Method {
        name: "noop".to_string(),
        params: vec![],
        body: Some(Block::new()),
    });
    unit.types.push(class);
    let mut iface = TypeDecl::interface("Drawable");
    iface.members.push(Member::Method {
        name: "draw".to_string(),
        params: vec![],
        body: None,
    });
    unit.types.push(iface);
    let before = unit.clone();
    assert!(!eliminate_with(&mut unit, EmptyBlockPolicy::remove_all()));
    assert_eq!(unit, before);
}

#[test]
fn comment_only_block_counts_as_empty() {
    let mut unit = within_method(vec![Stmt::If {
        cond: Expr::name("flag"),
        then_stmt: block_stmt(vec![Stmt::Comment("intentionally blank".to_string())]),
        else_stmt: None,
    }]);
    assert!(eliminate(&mut unit));
    assert_eq!(unit, within_method(vec![]));
}

#[test]
fn redundant_nested_block_is_dropped() {
    let mut unit = within_method(vec![
        Stmt::Expr(Expr::call("f", vec![])),
        Stmt::Block(Block::new()),
    ]);
    assert!(eliminate(&mut unit));
    assert_eq!(unit, within_method(vec![Stmt::Expr(Expr::call("f", vec![]))]));
}

#[test]
fn removal_cascades_upward_in_one_sweep() {
    // Dropping the inner if empties the loop body; the same sweep must see
    // that and reduce the body to the empty statement.
    let mut unit = within_method(vec![Stmt::While {
        cond: Expr::name("go"),
        body: block_stmt(vec![Stmt::If {
            cond: Expr::name("flag"),
            then_stmt: block_stmt(vec![]),
            else_stmt: None,
        }]),
    }]);
    assert!(eliminate(&mut unit));
    assert_eq!(
        unit,
        within_method(vec![Stmt::While {
            cond: Expr::name("go"),
            body: Box::new(Stmt::Empty),
        }])
    );
}

#[test]
fn switch_arms_exempt_by_default() {
    let mut unit = within_method(vec![Stmt::Switch {
        scrutinee: Expr::name("code"),
        arms: vec![
            SwitchArm {
                labels: vec![Lit::Int(1)],
                body: Block::new(),
            },
            SwitchArm {
                labels: vec![],
                body: Block::of(vec![Stmt::Expr(Expr::call("other", vec![]))]),
            },
        ],
    }]);
    let before = unit.clone();
    assert!(!eliminate(&mut unit));
    assert_eq!(unit, before);
}

#[test]
fn empty_switch_arms_removed_when_policy_allows() {
    let mut unit = within_method(vec![Stmt::Switch {
        scrutinee: Expr::name("code"),
        arms: vec![
            SwitchArm {
                labels: vec![Lit::Int(1)],
                body: Block::new(),
            },
            SwitchArm {
                labels: vec![],
                body: Block::new(),
            },
        ],
    }]);
    assert!(eliminate_with(&mut unit, EmptyBlockPolicy::remove_all()));
    // All arms were empty and the scrutinee is pure: the switch is gone.
    assert_eq!(unit, within_method(vec![]));
}

#[test]
fn non_empty_blocks_are_left_alone() {
    let mut unit = within_method(vec![Stmt::While {
        cond: Expr::name("go"),
        body: block_stmt(vec![Stmt::Expr(Expr::call("work", vec![]))]),
    }]);
    let before = unit.clone();
    assert!(!eliminate_with(&mut unit, EmptyBlockPolicy::remove_all()));
    assert_eq!(unit, before);
}
