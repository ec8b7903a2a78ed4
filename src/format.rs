//! rendering trees back into source text

use std::fmt::{Display, Formatter, Result, Write};

use crate::parse::{Binop, Expr, ExprKind, FuncDef, Module, Param, Stmt, StmtKind, Unop};
use crate::value::{Literal, Value};

impl Display for Module {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let mut sep = "";
        for def in &self.defs {
            write!(f, "{sep}{def}")?;
            sep = "\n";
        }
        Ok(())
    }
}

impl Display for FuncDef {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "def {}(", self.name)?;
        let mut sep = "";
        for Param { name, default, .. } in &self.params {
            write!(f, "{sep}{name}")?;
            if let Some(default) = default {
                write!(f, " = {default}")?;
            }
            sep = ", ";
        }
        writeln!(f, ") {{")?;
        write_block(f, &self.body, 1)?;
        writeln!(f, "}}")
    }
}

fn write_block(f: &mut Formatter, stmts: &[Stmt], depth: usize) -> Result {
    for stmt in stmts {
        for _ in 0..depth {
            f.write_str("    ")?;
        }
        write_stmt(f, stmt, depth)?;
        f.write_char('\n')?;
    }
    Ok(())
}

fn write_stmt(f: &mut Formatter, stmt: &Stmt, depth: usize) -> Result {
    match &stmt.1 {
        StmtKind::Assign { target, value } => write!(f, "{target} = {value}"),
        StmtKind::Expr(expr) => write!(f, "{expr}"),
        StmtKind::Return(None) => f.write_str("return"),
        StmtKind::Return(Some(expr)) => write!(f, "return {expr}"),

        StmtKind::If {
            cond,
            then,
            otherwise,
        } => {
            writeln!(f, "if {cond} {{")?;
            write_block(f, then, depth + 1)?;
            if !otherwise.is_empty() {
                for _ in 0..depth {
                    f.write_str("    ")?;
                }
                writeln!(f, "}} else {{")?;
                write_block(f, otherwise, depth + 1)?;
            }
            for _ in 0..depth {
                f.write_str("    ")?;
            }
            f.write_char('}')
        }

        StmtKind::While { cond, body } => {
            writeln!(f, "while {cond} {{")?;
            write_block(f, body, depth + 1)?;
            for _ in 0..depth {
                f.write_str("    ")?;
            }
            f.write_char('}')
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write_expr(f, self, 0)
    }
}

fn prec(op: Binop) -> usize {
    match op {
        Binop::Eq | Binop::Ne | Binop::Lt | Binop::Le | Binop::Gt | Binop::Ge => 1,
        Binop::Add | Binop::Sub => 2,
        Binop::Mul | Binop::Div | Binop::Rem => 3,
    }
}

/// Parenthesizes only where re-parsing would otherwise group differently.
fn write_expr(f: &mut Formatter, expr: &Expr, min: usize) -> Result {
    match &expr.1 {
        ExprKind::Literal(lit) => write!(f, "{lit}"),
        ExprKind::Name(name) => f.write_str(name),

        ExprKind::List(items) => {
            f.write_char('[')?;
            let mut sep = "";
            for item in items {
                f.write_str(sep)?;
                write_expr(f, item, 0)?;
                sep = ", ";
            }
            f.write_char(']')
        }

        ExprKind::Call { base, args } => {
            write_expr(f, base, 4)?;
            f.write_char('(')?;
            let mut sep = "";
            for arg in args {
                f.write_str(sep)?;
                write_expr(f, arg, 0)?;
                sep = ", ";
            }
            f.write_char(')')
        }

        ExprKind::Unary { op: Unop::Neg, arg } => {
            if 4 <= min {
                f.write_char('(')?;
                f.write_char('-')?;
                write_expr(f, arg, 4)?;
                f.write_char(')')
            } else {
                f.write_char('-')?;
                write_expr(f, arg, 4)
            }
        }

        ExprKind::Binary { op, lhs, rhs } => {
            let p = prec(*op);
            if p < min {
                f.write_char('(')?;
            }
            write_expr(f, lhs, p)?;
            write!(f, " {} ", op.symbol())?;
            write_expr(f, rhs, p + 1)?;
            if p < min {
                f.write_char(')')?;
            }
            Ok(())
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Literal::Number(n) => write!(f, "{n}"),
            Literal::Str(s) => write_quoted(f, s),
            Literal::Bool(true) => f.write_str("true"),
            Literal::Bool(false) => f.write_str("false"),
            Literal::Nil => f.write_str("nil"),
            Literal::List(items) => {
                f.write_char('[')?;
                let mut sep = "";
                for item in items {
                    write!(f, "{sep}{item}")?;
                    sep = ", ";
                }
                f.write_char(']')
            }
        }
    }
}

fn write_quoted(f: &mut Formatter, s: &str) -> Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::Bool(true) => f.write_str("true"),
            Value::Bool(false) => f.write_str("false"),
            Value::Nil => f.write_str("nil"),
            Value::List(items) => {
                f.write_char('[')?;
                let mut sep = "";
                for item in items {
                    write!(f, "{sep}{item}")?;
                    sep = ", ";
                }
                f.write_char(']')
            }
            Value::Func(func) => write!(f, "<function {}>", func.name()),
            Value::Builtin(fund) => write!(f, "<builtin {}>", fund.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parse::parse_one_def;

    fn rendered(source: &str) -> String {
        parse_one_def(source).unwrap().to_string()
    }

    #[test]
    fn simple_defs() {
        assert_eq!("def f() {\n}\n", rendered("def f() {}"));
        assert_eq!(
            "def f(a, b = 2) {\n    return a + b\n}\n",
            rendered("def  f( a , b=2 ){ return a+b }"),
        );
    }

    #[test]
    fn parenthesizes_only_where_needed() {
        assert_eq!(
            "def f(a, b) {\n    return (a + b) * 2\n}\n",
            rendered("def f(a, b) { return (a + b) * 2 }"),
        );
        assert_eq!(
            "def f(a, b) {\n    return a + b * 2\n}\n",
            rendered("def f(a, b) { return a + (b * 2) }"),
        );
        assert_eq!(
            "def f(a) {\n    return (-(a + 1))(2)\n}\n",
            rendered("def f(a) { return (-(a+1))(2) }"),
        );
    }

    #[test]
    fn nested_blocks() {
        insta::assert_snapshot!(
            rendered(
                "def count(n) {
                    total = 0
                    while 0 < n {
                        if n % 2 == 0 { total = total + n } else { print(str(n)) }
                        n = n - 1
                    }
                    return total
                }"
            ),
            @r#"
        def count(n) {
            total = 0
            while 0 < n {
                if n % 2 == 0 {
                    total = total + n
                } else {
                    print(str(n))
                }
                n = n - 1
            }
            return total
        }
        "#
        );
    }

    #[test]
    fn round_trips_to_the_same_tree() {
        let source = "def f(x, y = [1, \"two\\n\", nil]) {
            if x != y { return [x, -y, len(\"a\")] }
            return
        }";
        let def = parse_one_def(source).unwrap();
        let again = parse_one_def(&def.to_string()).unwrap();
        assert_eq!(def.name, again.name);
        assert_eq!(def.params, again.params);
        assert_eq!(def.body.len(), again.body.len());
    }
}
