//! the parameter pinner: name references to literal nodes

use std::collections::HashMap;

use crate::error::{Error, ErrorKind};
use crate::parse::{parse_one_def, Expr, ExprKind, Stmt, StmtKind};
use crate::value::{Callable, Literal, Value};

/// Pin arguments of `callable`, returning the body of an equivalent
/// function taking no arguments: every reference to a name keyed in
/// `immutable` becomes the literal embedding of the pinned value, and the
/// body statements are returned alone, detached from the signature.
///
/// With
///
/// ```text
/// def f(a, b) {
///     c = 4
///     print(str(a) + str(c))
///     return b
/// }
/// ```
///
/// pinning `{a: 10, b: 11}` returns the body of
///
/// ```text
/// def pinned_f() {
///     c = 4
///     print(str(10) + str(c))
///     return b
/// }
/// ```
///
/// with `b` replaced by `11`. This is in some ways equivalent to partial
/// application, but the binding cost is paid once, ahead of time.
///
/// Matching is purely lexical: a body-local rebinding of a pinned name is
/// substituted all the same (known scoping limitation, kept as-is). Keys
/// naming no reference in the body are harmless no-ops. `mutable` is
/// accepted as the other partition of the arguments but is not substituted;
/// it currently has no effect.
///
/// The callable's source is parsed fresh on every call; the caller's own
/// trees, if any, are never touched.
pub fn pin(
    callable: &Callable,
    immutable: &HashMap<String, Value>,
    mutable: &HashMap<String, Value>,
) -> Result<Vec<Stmt>, Error> {
    let _ = mutable;

    let mut def = parse_one_def(callable.source())?;
    for stmt in &mut def.body {
        pin_stmt(stmt, immutable)?;
    }
    Ok(def.body)
}

fn pin_stmt(stmt: &mut Stmt, pinned: &HashMap<String, Value>) -> Result<(), Error> {
    match &mut stmt.1 {
        StmtKind::Assign { target, value } => {
            pin_expr(target, pinned)?;
            pin_expr(value, pinned)
        }

        StmtKind::Expr(expr) => pin_expr(expr, pinned),
        StmtKind::Return(Some(expr)) => pin_expr(expr, pinned),
        StmtKind::Return(None) => Ok(()),

        StmtKind::If {
            cond,
            then,
            otherwise,
        } => {
            pin_expr(cond, pinned)?;
            for stmt in then.iter_mut().chain(otherwise) {
                pin_stmt(stmt, pinned)?;
            }
            Ok(())
        }

        StmtKind::While { cond, body } => {
            pin_expr(cond, pinned)?;
            for stmt in body {
                pin_stmt(stmt, pinned)?;
            }
            Ok(())
        }
    }
}

fn pin_expr(expr: &mut Expr, pinned: &HashMap<String, Value>) -> Result<(), Error> {
    match &mut expr.1 {
        ExprKind::Name(name) => {
            if let Some(value) = pinned.get(name) {
                let lit = Literal::of_value(value).ok_or_else(|| {
                    Error(expr.0.clone(), ErrorKind::NotLiteral { name: name.clone() })
                })?;
                // the location stays the one of the replaced reference
                expr.1 = ExprKind::Literal(lit);
            }
            Ok(())
        }

        ExprKind::Literal(_) => Ok(()),

        ExprKind::List(items) => {
            for item in items {
                pin_expr(item, pinned)?;
            }
            Ok(())
        }

        ExprKind::Call { base, args } => {
            pin_expr(base, pinned)?;
            for arg in args {
                pin_expr(arg, pinned)?;
            }
            Ok(())
        }

        ExprKind::Unary { arg, .. } => pin_expr(arg, pinned),

        ExprKind::Binary { lhs, rhs, .. } => {
            pin_expr(lhs, pinned)?;
            pin_expr(rhs, pinned)
        }
    }
}
