//! parsing into the little language's syntax tree

use std::iter::Peekable;

use crate::error::{unexpected, Error, ErrorKind};
use crate::lex::{loc_span, Lexer, Location, Token, TokenKind};
use crate::value::Literal;

// tree types {{{
#[derive(PartialEq, Debug, Clone)]
pub struct Module {
    pub defs: Vec<FuncDef>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct FuncDef {
    pub loc: Location,
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Param {
    pub loc: Location,
    pub name: String,
    pub default: Option<Literal>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Stmt(pub Location, pub StmtKind);

#[derive(PartialEq, Debug, Clone)]
pub enum StmtKind {
    Assign { target: Expr, value: Expr },
    Expr(Expr),
    Return(Option<Expr>),
    If {
        cond: Expr,
        then: Vec<Stmt>,
        otherwise: Vec<Stmt>,
    },
    While { cond: Expr, body: Vec<Stmt> },
}

#[derive(PartialEq, Debug, Clone)]
pub struct Expr(pub Location, pub ExprKind);

#[derive(PartialEq, Debug, Clone)]
pub enum ExprKind {
    Literal(Literal),
    Name(String),
    List(Vec<Expr>),
    Call { base: Box<Expr>, args: Vec<Expr> },
    Unary { op: Unop, arg: Box<Expr> },
    Binary {
        op: Binop,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Unop {
    Neg,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Binop {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Binop {
    pub fn symbol(self) -> &'static str {
        match self {
            Binop::Add => "+",
            Binop::Sub => "-",
            Binop::Mul => "*",
            Binop::Div => "/",
            Binop::Rem => "%",
            Binop::Eq => "==",
            Binop::Ne => "!=",
            Binop::Lt => "<",
            Binop::Le => "<=",
            Binop::Gt => ">",
            Binop::Ge => ">=",
        }
    }
}
// }}}

fn binary(op: Binop, lhs: Expr, rhs: Expr) -> Expr {
    let loc = loc_span(&lhs.0, &rhs.0);
    Expr(
        loc,
        ExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
    )
}

// parser {{{
pub(crate) struct Parser<'src> {
    tokens: Peekable<Lexer<'src>>,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(source: &'src str) -> Parser<'src> {
        Parser {
            tokens: Lexer::new(source).peekable(),
        }
    }

    fn peek(&mut self) -> &Token {
        self.tokens.peek().expect("unreachable: infinite lexer")
    }

    fn take(&mut self) -> Token {
        self.tokens.next().expect("unreachable: infinite lexer")
    }

    fn expect(&mut self, want: TokenKind, expected: &'static str) -> Result<Token, Error> {
        let token = self.take();
        if want == token.1 {
            Ok(token)
        } else {
            Err(unexpected(token, expected))
        }
    }

    fn skip_newlines(&mut self) {
        while TokenKind::Newline == self.peek().1 {
            self.take();
        }
    }

    fn word(&mut self, expected: &'static str) -> Result<(Location, String), Error> {
        match self.take() {
            Token(loc, TokenKind::Word(word)) => Ok((loc, word)),
            token => Err(unexpected(token, expected)),
        }
    }

    fn module(&mut self) -> Result<Module, Error> {
        let mut defs = Vec::new();
        self.skip_newlines();
        while TokenKind::End != self.peek().1 {
            defs.push(self.def()?);
            self.skip_newlines();
        }
        Ok(Module { defs })
    }

    fn def(&mut self) -> Result<FuncDef, Error> {
        let Token(loc, _) = self.expect(TokenKind::Def, "a function definition")?;
        let (_, name) = self.word("a function name")?;
        self.expect(TokenKind::OpenParen, "'(' then a parameter list")?;

        let mut params = Vec::new();
        if TokenKind::CloseParen == self.peek().1 {
            self.take();
        } else {
            loop {
                let (ploc, pname) = self.word("a parameter name")?;
                let default = if TokenKind::Equal == self.peek().1 {
                    self.take();
                    Some(self.literal()?.1)
                } else {
                    None
                };
                params.push(Param {
                    loc: ploc,
                    name: pname,
                    default,
                });
                match self.take() {
                    Token(_, TokenKind::Comma) => continue,
                    Token(_, TokenKind::CloseParen) => break,
                    token => return Err(unexpected(token, "',' or ')'")),
                }
            }
        }

        let body = self.block()?;
        Ok(FuncDef {
            loc,
            name,
            params,
            body,
        })
    }

    fn block(&mut self) -> Result<Vec<Stmt>, Error> {
        self.expect(TokenKind::OpenBrace, "'{'")?;
        self.skip_newlines();
        let mut stmts = Vec::new();
        while TokenKind::CloseBrace != self.peek().1 {
            stmts.push(self.stmt()?);
            if TokenKind::Newline == self.peek().1 {
                self.skip_newlines();
            } else if TokenKind::CloseBrace != self.peek().1 {
                return Err(unexpected(self.take(), "end of line or '}'"));
            }
        }
        self.take();
        Ok(stmts)
    }

    fn stmt(&mut self) -> Result<Stmt, Error> {
        if TokenKind::Return == self.peek().1 {
            let Token(loc, _) = self.take();
            let ends = TokenKind::Newline == self.peek().1 || TokenKind::CloseBrace == self.peek().1;
            let value = if ends { None } else { Some(self.expr()?) };
            return Ok(Stmt(loc, StmtKind::Return(value)));
        }

        if TokenKind::If == self.peek().1 {
            return self.conditional();
        }

        if TokenKind::While == self.peek().1 {
            let Token(loc, _) = self.take();
            let cond = self.expr()?;
            let body = self.block()?;
            return Ok(Stmt(loc, StmtKind::While { cond, body }));
        }

        let expr = self.expr()?;
        if TokenKind::Equal == self.peek().1 {
            self.take();
            let value = self.expr()?;
            let loc = loc_span(&expr.0, &value.0);
            Ok(Stmt(loc, StmtKind::Assign { target: expr, value }))
        } else {
            Ok(Stmt(expr.0.clone(), StmtKind::Expr(expr)))
        }
    }

    fn conditional(&mut self) -> Result<Stmt, Error> {
        let Token(loc, _) = self.take();
        let cond = self.expr()?;
        let then = self.block()?;
        let otherwise = if TokenKind::Else == self.peek().1 {
            self.take();
            if TokenKind::If == self.peek().1 {
                vec![self.conditional()?]
            } else {
                self.block()?
            }
        } else {
            Vec::new()
        };
        Ok(Stmt(
            loc,
            StmtKind::If {
                cond,
                then,
                otherwise,
            },
        ))
    }

    fn expr(&mut self) -> Result<Expr, Error> {
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr, Error> {
        let mut lhs = self.additive()?;
        loop {
            let op = match self.peek().1 {
                TokenKind::EqualEqual => Binop::Eq,
                TokenKind::BangEqual => Binop::Ne,
                TokenKind::Less => Binop::Lt,
                TokenKind::LessEqual => Binop::Le,
                TokenKind::Greater => Binop::Gt,
                TokenKind::GreaterEqual => Binop::Ge,
                _ => break Ok(lhs),
            };
            self.take();
            let rhs = self.additive()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn additive(&mut self) -> Result<Expr, Error> {
        let mut lhs = self.multiplicative()?;
        loop {
            let op = match self.peek().1 {
                TokenKind::Plus => Binop::Add,
                TokenKind::Minus => Binop::Sub,
                _ => break Ok(lhs),
            };
            self.take();
            let rhs = self.multiplicative()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn multiplicative(&mut self) -> Result<Expr, Error> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek().1 {
                TokenKind::Star => Binop::Mul,
                TokenKind::Slash => Binop::Div,
                TokenKind::Percent => Binop::Rem,
                _ => break Ok(lhs),
            };
            self.take();
            let rhs = self.unary()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn unary(&mut self) -> Result<Expr, Error> {
        if TokenKind::Minus == self.peek().1 {
            let Token(loc, _) = self.take();
            let arg = self.unary()?;
            let loc = loc_span(&loc, &arg.0);
            Ok(Expr(
                loc,
                ExprKind::Unary {
                    op: Unop::Neg,
                    arg: Box::new(arg),
                },
            ))
        } else {
            self.postfix()
        }
    }

    fn postfix(&mut self) -> Result<Expr, Error> {
        let mut base = self.primary()?;
        while TokenKind::OpenParen == self.peek().1 {
            self.take();
            let mut args = Vec::new();
            let close = if TokenKind::CloseParen == self.peek().1 {
                self.take()
            } else {
                loop {
                    args.push(self.expr()?);
                    match self.take() {
                        token @ Token(_, TokenKind::CloseParen) => break token,
                        Token(_, TokenKind::Comma) => continue,
                        token => return Err(unexpected(token, "',' or ')'")),
                    }
                }
            };
            let loc = loc_span(&base.0, &close.0);
            base = Expr(
                loc,
                ExprKind::Call {
                    base: Box::new(base),
                    args,
                },
            );
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, Error> {
        let Token(loc, kind) = self.take();
        Ok(match kind {
            TokenKind::Number(n) => Expr(loc, ExprKind::Literal(Literal::Number(n))),
            TokenKind::Str(s) => Expr(loc, ExprKind::Literal(Literal::Str(s))),
            TokenKind::True => Expr(loc, ExprKind::Literal(Literal::Bool(true))),
            TokenKind::False => Expr(loc, ExprKind::Literal(Literal::Bool(false))),
            TokenKind::Nil => Expr(loc, ExprKind::Literal(Literal::Nil)),
            TokenKind::Word(word) => Expr(loc, ExprKind::Name(word)),

            TokenKind::OpenParen => {
                let expr = self.expr()?;
                self.expect(TokenKind::CloseParen, "')'")?;
                expr
            }

            TokenKind::OpenBracket => {
                let mut items = Vec::new();
                let close = if TokenKind::CloseBracket == self.peek().1 {
                    self.take()
                } else {
                    loop {
                        items.push(self.expr()?);
                        match self.take() {
                            token @ Token(_, TokenKind::CloseBracket) => break token,
                            Token(_, TokenKind::Comma) => continue,
                            token => return Err(unexpected(token, "',' or ']'")),
                        }
                    }
                };
                Expr(loc_span(&loc, &close.0), ExprKind::List(items))
            }

            kind => return Err(unexpected(Token(loc, kind), "an expression")),
        })
    }

    pub(crate) fn literal(&mut self) -> Result<(Location, Literal), Error> {
        let Token(loc, kind) = self.take();
        let lit = match kind {
            TokenKind::Number(n) => Literal::Number(n),
            TokenKind::Str(s) => Literal::Str(s),
            TokenKind::True => Literal::Bool(true),
            TokenKind::False => Literal::Bool(false),
            TokenKind::Nil => Literal::Nil,

            TokenKind::Minus => match self.take() {
                Token(_, TokenKind::Number(n)) => Literal::Number(-n),
                token => return Err(unexpected(token, "a number")),
            },

            TokenKind::OpenBracket => {
                let mut items = Vec::new();
                if TokenKind::CloseBracket == self.peek().1 {
                    self.take();
                } else {
                    loop {
                        items.push(self.literal()?.1);
                        match self.take() {
                            Token(_, TokenKind::CloseBracket) => break,
                            Token(_, TokenKind::Comma) => continue,
                            token => return Err(unexpected(token, "',' or ']'")),
                        }
                    }
                }
                Literal::List(items)
            }

            kind => return Err(unexpected(Token(loc, kind), "a literal value")),
        };
        Ok((loc, lit))
    }
}
// }}}

pub fn parse_module(source: &str) -> Result<Module, Error> {
    Parser::new(source).module()
}

/// the structural invariant of retrieved source: exactly one definition
pub fn parse_one_def(source: &str) -> Result<FuncDef, Error> {
    let mut defs = parse_module(source)?.defs;
    if 1 == defs.len() {
        Ok(defs.pop().expect("unreachable: len checked"))
    } else {
        Err(Error(
            Location(0..source.len()),
            ErrorKind::NotExactlyOneDef { count: defs.len() },
        ))
    }
}

pub fn parse_literal(source: &str) -> Result<Literal, Error> {
    let mut parser = Parser::new(source);
    let (_, lit) = parser.literal()?;
    parser.skip_newlines();
    parser.expect(TokenKind::End, "end of input")?;
    Ok(lit)
}
