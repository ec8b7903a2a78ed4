use std::collections::HashMap;
use std::env;
use std::io::stdin;
use std::process::exit;
use std::rc::Rc;

use pinline::parse::parse_literal;
use pinline::{inline, Callable, Error, Namespace, Value};

fn usage() -> ! {
    eprintln!("Usage: pinline <pre-def> <target-def> [name=literal]...");
    eprintln!("Pins each name=literal into <pre-def>, splices its body before");
    eprintln!("<target-def>'s, then feeds each line of stdin to the result.");
    exit(2)
}

fn run(
    pre: &str,
    target: &str,
    pins: &HashMap<String, Value>,
) -> Result<Rc<Callable>, Error> {
    let pre = Callable::parse(pre, Namespace::new())?;
    let target = Callable::parse(target, Namespace::new())?;
    inline(&pre, &target, pins, &HashMap::new())
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let [pre, target, rest @ ..] = &args[..] else { usage() };

    let mut pins = HashMap::new();
    for pair in rest {
        let Some((name, lit)) = pair.split_once('=') else { usage() };
        match parse_literal(lit) {
            Ok(lit) => pins.insert(name.trim().to_string(), lit.to_value()),
            Err(e) => {
                eprintln!("in pinned value for {name}: {e}");
                exit(1)
            }
        };
    }

    let func = match run(pre, target, &pins) {
        Ok(func) => func,
        Err(e) => {
            eprintln!("{e}");
            exit(1)
        }
    };

    for line in stdin().lines() {
        match line {
            Ok(it) => match func.call(vec![Value::Str(it)]) {
                Ok(res) => println!("{res}"),
                Err(e) => {
                    eprintln!("{e}");
                    exit(1)
                }
            },
            Err(e) => panic!("{e}"),
        }
    }
}
