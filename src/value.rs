//! values, literal nodes, and the callable-with-source

use std::cell::RefCell;
use std::rc::Rc;

use crate::builtin::Builtin;
use crate::check::check_def;
use crate::error::Error;
use crate::parse::{parse_one_def, FuncDef};
use crate::scope::Namespace;

/// a tree node for a fixed, self-contained value needing no evaluation
#[derive(PartialEq, Debug, Clone)]
pub enum Literal {
    Number(f64),
    Str(String),
    Bool(bool),
    Nil,
    List(Vec<Literal>),
}

#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    Str(String),
    Bool(bool),
    Nil,
    List(Vec<Value>),
    Func(Rc<Callable>),
    Builtin(Builtin),
}

impl Literal {
    /// the literal embedding of a value, when it has one; functions (and
    /// anything holding one) have no stable, self-describing literal syntax
    pub fn of_value(value: &Value) -> Option<Literal> {
        Some(match value {
            Value::Number(n) => Literal::Number(*n),
            Value::Str(s) => Literal::Str(s.clone()),
            Value::Bool(b) => Literal::Bool(*b),
            Value::Nil => Literal::Nil,
            Value::List(items) => {
                Literal::List(items.iter().map(Literal::of_value).collect::<Option<_>>()?)
            }
            Value::Func(_) | Value::Builtin(_) => return None,
        })
    }

    pub fn to_value(&self) -> Value {
        match self {
            Literal::Number(n) => Value::Number(*n),
            Literal::Str(s) => Value::Str(s.clone()),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Nil => Value::Nil,
            Literal::List(items) => Value::List(items.iter().map(Literal::to_value).collect()),
        }
    }
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Nil => "nil",
            Value::List(_) => "list",
            Value::Func(_) => "function",
            Value::Builtin(_) => "function",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(l), Value::Number(r)) => l == r,
            (Value::Str(l), Value::Str(r)) => l == r,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::Nil, Value::Nil) => true,
            (Value::List(l), Value::List(r)) => l == r,
            (Value::Func(l), Value::Func(r)) => Rc::ptr_eq(l, r),
            (Value::Builtin(l), Value::Builtin(r)) => l == r,
            _ => false,
        }
    }
}

/// An executable unit that can reproduce the source text of its own
/// definition, and exposes the external name bindings its body can see
/// (its `globals`, a mutable side channel shared with whoever created it).
#[derive(Debug)]
pub struct Callable {
    source: String,
    def: FuncDef,
    globals: Rc<RefCell<Namespace>>,
}

impl Callable {
    /// Make a callable out of the source text of a single definition and the
    /// external bindings it should see.
    pub fn parse(source: impl Into<String>, globals: Namespace) -> Result<Rc<Callable>, Error> {
        let source = source.into();
        let def = parse_one_def(&source)?;
        check_def(&def)?;
        Ok(Rc::new(Callable {
            source,
            def,
            globals: Rc::new(RefCell::new(globals)),
        }))
    }

    /// For a synthesized definition the source is the rendered tree.
    pub(crate) fn from_def(def: FuncDef, globals: Rc<RefCell<Namespace>>) -> Callable {
        Callable {
            source: def.to_string(),
            def,
            globals,
        }
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn globals(&self) -> &RefCell<Namespace> {
        &self.globals
    }

    pub(crate) fn def(&self) -> &FuncDef {
        &self.def
    }
}
