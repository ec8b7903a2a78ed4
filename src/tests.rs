use std::collections::HashMap;
use std::rc::Rc;

use crate::error::ErrorKind;
use crate::inline::inline;
use crate::parse::{parse_one_def, Expr, ExprKind, Stmt, StmtKind};
use crate::pin::pin;
use crate::scope::Namespace;
use crate::value::{Callable, Value};

// utils {{{
fn callable(source: &str) -> Rc<Callable> {
    Callable::parse(source, Namespace::new()).unwrap()
}

fn callable_with(source: &str, bindings: &[(&str, Value)]) -> Rc<Callable> {
    let globals = bindings
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();
    Callable::parse(source, globals).unwrap()
}

fn body_of(source: &str) -> Vec<Stmt> {
    parse_one_def(source).unwrap().body
}

fn pins(entries: &[(&str, Value)]) -> HashMap<String, Value> {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

fn compare_stmts(left: &[Stmt], right: &[Stmt]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .all(|(l, r)| compare_stmt(l, r))
}

fn compare_stmt(left: &Stmt, right: &Stmt) -> bool {
    match (&left.1, &right.1) {
        (
            StmtKind::Assign { target: lt, value: lv },
            StmtKind::Assign { target: rt, value: rv },
        ) => compare_expr(lt, rt) && compare_expr(lv, rv),
        (StmtKind::Expr(l), StmtKind::Expr(r)) => compare_expr(l, r),
        (StmtKind::Return(None), StmtKind::Return(None)) => true,
        (StmtKind::Return(Some(l)), StmtKind::Return(Some(r))) => compare_expr(l, r),
        (
            StmtKind::If { cond: lc, then: lt, otherwise: lo },
            StmtKind::If { cond: rc, then: rt, otherwise: ro },
        ) => compare_expr(lc, rc) && compare_stmts(lt, rt) && compare_stmts(lo, ro),
        (
            StmtKind::While { cond: lc, body: lb },
            StmtKind::While { cond: rc, body: rb },
        ) => compare_expr(lc, rc) && compare_stmts(lb, rb),
        _ => false,
    }
}

fn compare_expr(left: &Expr, right: &Expr) -> bool {
    match (&left.1, &right.1) {
        (ExprKind::List(l), ExprKind::List(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(l, r)| compare_expr(l, r))
        }
        (
            ExprKind::Call { base: lb, args: la },
            ExprKind::Call { base: rb, args: ra },
        ) => {
            compare_expr(lb, rb)
                && la.len() == ra.len()
                && la.iter().zip(ra).all(|(l, r)| compare_expr(l, r))
        }
        (
            ExprKind::Unary { op: lo, arg: la },
            ExprKind::Unary { op: ro, arg: ra },
        ) => lo == ro && compare_expr(la, ra),
        (
            ExprKind::Binary { op: lo, lhs: ll, rhs: lr },
            ExprKind::Binary { op: ro, lhs: rl, rhs: rr },
        ) => lo == ro && compare_expr(ll, rl) && compare_expr(lr, rr),
        (l, r) => *l == *r,
    }
}

macro_rules! assert_body {
    ($left:expr, $right:expr) => {
        match (&$left, &$right) {
            (l, r) if !compare_stmts(l, r) => assert_eq!(l, r),
            _ => (),
        }
    };
}
// }}}

// pinning {{{
#[test]
fn substitution_replaces_every_reference() {
    let f = callable("def f(p) {\n    a = p + p\n    return [p, a]\n}");
    let got = pin(&f, &pins(&[("p", Value::Number(7.0))]), &HashMap::new()).unwrap();
    assert_body!(got, body_of("def f() {\n    a = 7 + 7\n    return [7, a]\n}"));
}

#[test]
fn substitution_reaches_nested_blocks() {
    let f = callable(
        "def f(p) {
            if p == 0 { print(p) } else { q = p }
            while p { return p }
        }",
    );
    let got = pin(&f, &pins(&[("p", Value::Bool(false))]), &HashMap::new()).unwrap();
    assert_body!(
        got,
        body_of(
            "def f() {
                if false == 0 { print(false) } else { q = false }
                while false { return false }
            }"
        )
    );
}

#[test]
fn only_matching_names_change() {
    let f = callable("def f(a, b) {\n    return a + b\n}");
    let got = pin(&f, &pins(&[("a", Value::Number(10.0))]), &HashMap::new()).unwrap();
    assert_body!(got, body_of("def g() {\n    return 10 + b\n}"));

    let got = pin(&f, &pins(&[("zz", Value::Number(1.0))]), &HashMap::new()).unwrap();
    assert_body!(got, body_of("def f(a, b) {\n    return a + b\n}"));
}

#[test]
fn mutable_arguments_have_no_effect() {
    let f = callable("def f(a) {\n    return a\n}");
    let got = pin(&f, &HashMap::new(), &pins(&[("a", Value::Number(3.0))])).unwrap();
    assert_body!(got, body_of("def f(a) {\n    return a\n}"));
}

#[test]
fn pinning_a_function_value_fails() {
    let g = callable("def g() {\n    return 1\n}");
    let f = callable("def f(a) {\n    return a\n}");
    let err = pin(&f, &pins(&[("a", Value::Func(g))]), &HashMap::new()).unwrap_err();
    assert_eq!(ErrorKind::NotLiteral { name: "a".into() }, err.1);
}

#[test]
fn pinning_does_not_touch_the_callable() {
    let f = callable("def f(p) {\n    return p\n}");
    pin(&f, &pins(&[("p", Value::Nil)]), &HashMap::new()).unwrap();
    assert_eq!(Ok(Value::Number(2.0)), f.call(vec![Value::Number(2.0)]));
}
// }}}

// inlining {{{
#[test]
fn splices_the_pinned_body_first() {
    let pre = callable("def pre() {\n    x = 1\n}");
    let target = callable("def f(y) {\n    return y * 2\n}");
    let func = inline(&pre, &target, &HashMap::new(), &HashMap::new()).unwrap();
    assert_eq!("def f(y) {\n    x = 1\n    return y * 2\n}\n", func.source());
    assert_eq!(Ok(Value::Number(6.0)), func.call(vec![Value::Number(3.0)]));
}

#[test]
fn keeps_the_target_signature() {
    let pre = callable("def pre() {\n    bias = 10\n}");
    let target = callable("def f(x, scale = 2) {\n    return x * scale + bias\n}");
    let func = inline(&pre, &target, &HashMap::new(), &HashMap::new()).unwrap();
    assert_eq!("f", func.name());
    assert_eq!(Ok(Value::Number(16.0)), func.call(vec![Value::Number(3.0)]));
    assert_eq!(
        Ok(Value::Number(19.0)),
        func.call(vec![Value::Number(3.0), Value::Number(3.0)])
    );
}

#[test]
fn pins_then_splices() {
    let pre = callable(
        "def pre(b, c) {\n    a = \"hello\"\n    greeting = a + \" \" + b + \" \" + c\n}",
    );
    let target = callable("def f(x) {\n    return greeting + str(x)\n}");
    let func = inline(
        &pre,
        &target,
        &pins(&[("b", Value::Str("foo".into())), ("c", Value::Str("bar".into()))]),
        &HashMap::new(),
    )
    .unwrap();
    assert_eq!(
        Ok(Value::Str("hello foo bar!".into())),
        func.call(vec![Value::Str("!".into())])
    );
}

#[test]
fn halves_share_one_scope() {
    let pre = callable("def pre() {\n    y = 1\n}");
    let target = callable("def f(y) {\n    return y\n}");
    let func = inline(&pre, &target, &HashMap::new(), &HashMap::new()).unwrap();
    // the spliced assignment lands on the parameter itself
    assert_eq!(Ok(Value::Number(1.0)), func.call(vec![Value::Number(5.0)]));
}

#[test]
fn target_bindings_are_carried_over() {
    let pre = callable("def pre() {\n    x = 0\n}");
    let target = callable_with(
        "def f(y) {\n    return y + offset\n}",
        &[("offset", Value::Number(5.0))],
    );
    let func = inline(&pre, &target, &HashMap::new(), &HashMap::new()).unwrap();
    assert_eq!(Ok(Value::Number(7.0)), func.call(vec![Value::Number(2.0)]));
}

#[test]
fn target_bindings_win_over_fresh_ones() {
    let pre = callable("def pre() {\n    x = 0\n}");
    let target = callable_with("def f(y) {\n    return y\n}", &[("f", Value::Number(9.0))]);
    let func = inline(&pre, &target, &HashMap::new(), &HashMap::new()).unwrap();
    assert_eq!(Some(Value::Number(9.0)), func.globals().borrow().get("f").cloned());
}

#[test]
fn inlining_twice_gives_independent_callables() {
    let pre = callable("def pre() {\n    x = 1\n}");
    let target = callable("def f(y) {\n    return y + x\n}");
    let a = inline(&pre, &target, &HashMap::new(), &HashMap::new()).unwrap();
    let b = inline(&pre, &target, &HashMap::new(), &HashMap::new()).unwrap();
    assert!(!Rc::ptr_eq(&a, &b));
    assert_eq!(a.source(), b.source());
    assert_eq!(
        a.call(vec![Value::Number(4.0)]),
        b.call(vec![Value::Number(4.0)])
    );
}

#[test]
fn pinning_into_assignment_target_is_rejected() {
    let pre = callable("def pre(a) {\n    a = a + 1\n}");
    let target = callable("def f() {\n    return\n}");
    let err = inline(&pre, &target, &pins(&[("a", Value::Number(1.0))]), &HashMap::new())
        .unwrap_err();
    assert_eq!(ErrorKind::InvalidAssignTarget, err.1);
}
// }}}

// invoking {{{
#[test]
fn loops_and_arithmetic() {
    let fact = callable(
        "def fact(n) {
            r = 1
            while 1 < n {
                r = r * n
                n = n - 1
            }
            return r
        }",
    );
    assert_eq!(Ok(Value::Number(120.0)), fact.call(vec![Value::Number(5.0)]));
    assert_eq!(Ok(Value::Number(1.0)), fact.call(vec![Value::Number(0.0)]));
}

#[test]
fn conditional_chains() {
    let sign = callable(
        "def sign(n) {
            if n < 0 { return -1 } else if 0 < n { return 1 }
            return 0
        }",
    );
    assert_eq!(Ok(Value::Number(-1.0)), sign.call(vec![Value::Number(-3.0)]));
    assert_eq!(Ok(Value::Number(1.0)), sign.call(vec![Value::Number(3.0)]));
    assert_eq!(Ok(Value::Number(0.0)), sign.call(vec![Value::Number(0.0)]));
}

#[test]
fn fundamentals() {
    let f = callable("def f(s) {\n    return len(s + \"!\")\n}");
    assert_eq!(Ok(Value::Number(4.0)), f.call(vec![Value::Str("hey".into())]));

    let g = callable("def g(s) {\n    return num(s) + 1\n}");
    assert_eq!(Ok(Value::Number(42.0)), g.call(vec![Value::Str(" 41 ".into())]));

    let h = callable("def h(x) {\n    return str(x) + \"!\"\n}");
    assert_eq!(Ok(Value::Str("1.5!".into())), h.call(vec![Value::Number(1.5)]));
}

#[test]
fn falls_off_the_end_to_nil() {
    let f = callable("def f() {\n    x = 1\n}");
    assert_eq!(Ok(Value::Nil), f.call(Vec::new()));
}

#[test]
fn invocation_errors() {
    let f = callable("def f() {\n    return wat\n}");
    let err = f.call(Vec::new()).unwrap_err();
    assert_eq!(ErrorKind::UnknownName { name: "wat".into() }, err.1);

    let f = callable("def f() {\n    return 1(2)\n}");
    let err = f.call(Vec::new()).unwrap_err();
    assert_eq!(ErrorKind::NotFunc { actual: "number" }, err.1);

    let f = callable("def f(a, b = 1) {\n    return a\n}");
    let err = f.call(Vec::new()).unwrap_err();
    assert_eq!(
        ErrorKind::WrongArgCount { name: "f".into(), min: 1, max: 2, got: 0 },
        err.1
    );

    let f = callable("def f() {\n    return 1 + \"x\"\n}");
    let err = f.call(Vec::new()).unwrap_err();
    assert_eq!(ErrorKind::TypeMismatch { op: "+", actual: "string" }, err.1);
}

#[test]
fn malformed_definitions() {
    let err = Callable::parse("def f(a, a) { }", Namespace::new()).unwrap_err();
    assert_eq!(ErrorKind::DuplicateParam { name: "a".into() }, err.1);

    let err = Callable::parse("def f(a = 1, b) { }", Namespace::new()).unwrap_err();
    assert_eq!(ErrorKind::ParamAfterDefault { name: "b".into() }, err.1);
}
// }}}
