//! fundamental operations usable inside any body

use phf::{phf_map, Map};

use crate::error::{Error, ErrorKind};
use crate::lex::Location;
use crate::value::Value;

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Builtin {
    Str,
    Num,
    Len,
    Print,
}

type BuiltinDesc = (Builtin, &'static str);

pub const NAMES: Map<&'static str, BuiltinDesc> = phf_map! {
    "len" => (Builtin::Len, "length of a string or list"),
    "num" => (Builtin::Num, "convert a string into a number"),
    "print" => (Builtin::Print, "write a line to standard output"),
    "str" => (Builtin::Str, "convert any value into its string form"),
};

impl Builtin {
    pub fn try_from_name(name: &str) -> Option<Builtin> {
        NAMES.get(name).map(|desc| desc.0)
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Str => "str",
            Builtin::Num => "num",
            Builtin::Len => "len",
            Builtin::Print => "print",
        }
    }

    pub(crate) fn call(self, loc: Location, mut args: Vec<Value>) -> Result<Value, Error> {
        if 1 != args.len() {
            return Err(Error(
                loc,
                ErrorKind::WrongArgCount {
                    name: self.name().into(),
                    min: 1,
                    max: 1,
                    got: args.len(),
                },
            ));
        }
        let arg = args.pop().expect("unreachable: count checked");

        match self {
            Builtin::Str => Ok(Value::Str(arg.to_string())),

            Builtin::Num => match arg {
                Value::Number(_) => Ok(arg),
                Value::Str(s) => s.trim().parse().map(Value::Number).map_err(|_| {
                    Error(loc, ErrorKind::TypeMismatch { op: "num", actual: "string" })
                }),
                other => Err(Error(
                    loc,
                    ErrorKind::TypeMismatch { op: "num", actual: other.type_name() },
                )),
            },

            Builtin::Len => match arg {
                Value::Str(s) => Ok(Value::Number(s.len() as f64)),
                Value::List(items) => Ok(Value::Number(items.len() as f64)),
                other => Err(Error(
                    loc,
                    ErrorKind::TypeMismatch { op: "len", actual: other.type_name() },
                )),
            },

            Builtin::Print => {
                println!("{arg}");
                Ok(Value::Nil)
            }
        }
    }
}
