//! direct execution over the tree

use std::cell::RefCell;
use std::rc::Rc;

use crate::builtin::Builtin;
use crate::check::check_def;
use crate::error::{Error, ErrorKind};
use crate::lex::Location;
use crate::parse::{Binop, Expr, ExprKind, Module, Stmt, StmtKind, Unop};
use crate::scope::Namespace;
use crate::value::{Callable, Value};

/// Compile and execute a module's definitions into `namespace`: each one
/// becomes a callable bound under its own name, seeing `namespace` as its
/// external bindings.
pub(crate) fn exec_module(
    module: &Module,
    namespace: &Rc<RefCell<Namespace>>,
) -> Result<(), Error> {
    for def in &module.defs {
        check_def(def)?;
        let func = Callable::from_def(def.clone(), namespace.clone());
        let name = func.name().to_string();
        namespace.borrow_mut().set(name, Value::Func(Rc::new(func)));
    }
    Ok(())
}

enum Flow {
    Normal,
    Returned(Value),
}

impl Callable {
    /// Invoke with positional arguments; missing trailing ones take their
    /// declared defaults. Falling off the end of the body yields `nil`.
    pub fn call(&self, args: Vec<Value>) -> Result<Value, Error> {
        let def = self.def();
        let required = def.params.iter().filter(|p| p.default.is_none()).count();
        if args.len() < required || def.params.len() < args.len() {
            return Err(Error(
                def.loc.clone(),
                ErrorKind::WrongArgCount {
                    name: def.name.clone(),
                    min: required,
                    max: def.params.len(),
                    got: args.len(),
                },
            ));
        }

        let mut locals = Namespace::new();
        let mut args = args.into_iter();
        for param in &def.params {
            let value = match args.next() {
                Some(value) => value,
                None => param
                    .default
                    .as_ref()
                    .expect("unreachable: arity checked")
                    .to_value(),
            };
            locals.set(param.name.clone(), value);
        }

        match exec_block(&def.body, &mut locals, self)? {
            Flow::Returned(value) => Ok(value),
            Flow::Normal => Ok(Value::Nil),
        }
    }
}

fn exec_block(stmts: &[Stmt], locals: &mut Namespace, me: &Callable) -> Result<Flow, Error> {
    for stmt in stmts {
        match &stmt.1 {
            StmtKind::Assign { target, value } => {
                let value = eval(value, locals, me)?;
                let ExprKind::Name(name) = &target.1 else {
                    return Err(Error(target.0.clone(), ErrorKind::InvalidAssignTarget));
                };
                locals.set(name.clone(), value);
            }

            StmtKind::Expr(expr) => {
                eval(expr, locals, me)?;
            }

            StmtKind::Return(expr) => {
                return Ok(Flow::Returned(match expr {
                    Some(expr) => eval(expr, locals, me)?,
                    None => Value::Nil,
                }))
            }

            StmtKind::If {
                cond,
                then,
                otherwise,
            } => {
                let branch = if truthy(&eval(cond, locals, me)?) {
                    then
                } else {
                    otherwise
                };
                if let Flow::Returned(value) = exec_block(branch, locals, me)? {
                    return Ok(Flow::Returned(value));
                }
            }

            StmtKind::While { cond, body } => {
                while truthy(&eval(cond, locals, me)?) {
                    if let Flow::Returned(value) = exec_block(body, locals, me)? {
                        return Ok(Flow::Returned(value));
                    }
                }
            }
        }
    }
    Ok(Flow::Normal)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Nil => false,
        Value::Number(n) => 0.0 != *n,
        Value::Str(s) => !s.is_empty(),
        Value::List(items) => !items.is_empty(),
        Value::Func(_) | Value::Builtin(_) => true,
    }
}

fn eval(expr: &Expr, locals: &Namespace, me: &Callable) -> Result<Value, Error> {
    match &expr.1 {
        ExprKind::Literal(lit) => Ok(lit.to_value()),

        ExprKind::Name(name) => lookup(&expr.0, name, locals, me),

        ExprKind::List(items) => Ok(Value::List(
            items
                .iter()
                .map(|item| eval(item, locals, me))
                .collect::<Result<_, _>>()?,
        )),

        ExprKind::Call { base, args } => {
            let callee = eval(base, locals, me)?;
            let args = args
                .iter()
                .map(|arg| eval(arg, locals, me))
                .collect::<Result<Vec<_>, _>>()?;
            match callee {
                Value::Func(func) => func.call(args),
                Value::Builtin(fund) => fund.call(expr.0.clone(), args),
                other => Err(Error(
                    base.0.clone(),
                    ErrorKind::NotFunc {
                        actual: other.type_name(),
                    },
                )),
            }
        }

        ExprKind::Unary { op: Unop::Neg, arg } => match eval(arg, locals, me)? {
            Value::Number(n) => Ok(Value::Number(-n)),
            other => Err(Error(
                arg.0.clone(),
                ErrorKind::TypeMismatch {
                    op: "-",
                    actual: other.type_name(),
                },
            )),
        },

        ExprKind::Binary { op, lhs, rhs } => {
            let l = eval(lhs, locals, me)?;
            let r = eval(rhs, locals, me)?;
            binop(&expr.0, *op, l, r)
        }
    }
}

/// lookup order is always:
/// - locals (parameters then anything assigned so far)
/// - the callable's external bindings
/// - fundamentals
fn lookup(loc: &Location, name: &str, locals: &Namespace, me: &Callable) -> Result<Value, Error> {
    if let Some(found) = locals.get(name) {
        return Ok(found.clone());
    }
    if let Some(found) = me.globals().borrow().get(name) {
        return Ok(found.clone());
    }
    if let Some(fund) = Builtin::try_from_name(name) {
        return Ok(Value::Builtin(fund));
    }
    Err(Error(
        loc.clone(),
        ErrorKind::UnknownName {
            name: name.to_string(),
        },
    ))
}

fn binop(loc: &Location, op: Binop, lhs: Value, rhs: Value) -> Result<Value, Error> {
    use Binop::*;
    use Value::*;

    Ok(match (op, lhs, rhs) {
        (Add, Number(l), Number(r)) => Number(l + r),
        (Add, Str(l), Str(r)) => Str(l + &r),
        (Add, List(mut l), List(r)) => {
            l.extend(r);
            List(l)
        }

        (Sub, Number(l), Number(r)) => Number(l - r),
        (Mul, Number(l), Number(r)) => Number(l * r),
        (Div, Number(l), Number(r)) => Number(l / r),
        (Rem, Number(l), Number(r)) => Number(l % r),

        (Eq, l, r) => Bool(l == r),
        (Ne, l, r) => Bool(l != r),

        (Lt, Number(l), Number(r)) => Bool(l < r),
        (Le, Number(l), Number(r)) => Bool(l <= r),
        (Gt, Number(l), Number(r)) => Bool(l > r),
        (Ge, Number(l), Number(r)) => Bool(l >= r),
        (Lt, Str(l), Str(r)) => Bool(l < r),
        (Le, Str(l), Str(r)) => Bool(l <= r),
        (Gt, Str(l), Str(r)) => Bool(l > r),
        (Ge, Str(l), Str(r)) => Bool(l >= r),

        (op, l, r) => {
            let actual = if matches!(l, Number(_)) {
                r.type_name()
            } else {
                l.type_name()
            };
            return Err(Error(
                loc.clone(),
                ErrorKind::TypeMismatch {
                    op: op.symbol(),
                    actual,
                },
            ));
        }
    })
}
