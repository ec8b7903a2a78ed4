//! the inliner: splicing a pinned body into another function

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{Error, ErrorKind};
use crate::interp::exec_module;
use crate::parse::{parse_one_def, Module};
use crate::pin::pin;
use crate::scope::Namespace;
use crate::value::{Callable, Value};

/// Insert `pre`, with its arguments pinned, at the beginning of `target`
/// and return the combined function.
///
/// With
///
/// ```text
/// def pre(b, c) {
///     a = "hello"
///     print(a + " " + b + " " + c)
/// }
///
/// def func(x, y) {
///     z = x + 2 * y
///     return z * z
/// }
/// ```
///
/// and `{b: "foo", c: "bar"}` pinned, the returned callable corresponds to
///
/// ```text
/// def func(x, y) {
///     a = "hello"
///     print(a + " " + "foo" + " " + "bar")
///     z = x + 2 * y
///     return z * z
/// }
/// ```
///
/// The signature is the target's, untouched; the pinned statements run
/// first, unconditionally, so they must not reference target-only
/// parameters. No scope boundary separates the two halves: their local
/// variables share the one function scope and a shared name silently
/// aliases (the later assignment wins).
///
/// The combined tree is compiled and executed in a fresh, empty namespace,
/// then every external binding the target could see is re-exported into the
/// synthesized callable's own environment, the target's value winning on
/// conflicts.
pub fn inline(
    pre: &Callable,
    target: &Callable,
    immutable: &HashMap<String, Value>,
    mutable: &HashMap<String, Value>,
) -> Result<Rc<Callable>, Error> {
    let pinned = pin(pre, immutable, mutable)?;

    let mut def = parse_one_def(target.source())?;
    let loc = def.loc.clone();
    let name = def.name.clone();
    def.body.splice(0..0, pinned);

    let namespace = Rc::new(RefCell::new(Namespace::new()));
    exec_module(&Module { defs: vec![def] }, &namespace)?;

    let found = namespace.borrow().get(&name).cloned();
    let Some(Value::Func(func)) = found else {
        return Err(Error(loc, ErrorKind::NameNotDefined { name }));
    };

    // compiling from a bare source string started from an empty environment
    func.globals().borrow_mut().absorb(&target.globals().borrow());

    Ok(func)
}
