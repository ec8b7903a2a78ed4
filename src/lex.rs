//! lexing

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::iter::{self, Peekable};
use std::ops::Range;
use std::str::CharIndices;

#[derive(PartialEq, Debug, Clone)]
pub struct Location(pub Range<usize>);

pub fn loc_span(start: &Location, end: &Location) -> Location {
    Location(start.0.start..end.0.end)
}

#[derive(PartialEq, Debug, Clone)]
pub enum TokenKind {
    Unknown(String),
    Number(f64),
    Str(String),
    Word(String),
    Comma,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Equal,
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Def,
    Return,
    If,
    Else,
    While,
    True,
    False,
    Nil,
    Newline,
    End,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            TokenKind::Unknown(tok) => write!(f, "token '{tok}'"),
            TokenKind::Number(n) => write!(f, "number '{n}'"),
            TokenKind::Str(s) => {
                if s.is_empty() {
                    write!(f, "empty string")
                } else if s.len() < 16 {
                    write!(f, "string '{s}'")
                } else {
                    write!(f, "string of {} bytes", s.len())
                }
            }
            TokenKind::Word(w) => write!(f, "word '{w}'"),
            TokenKind::Comma => write!(f, "operator ','"),
            TokenKind::OpenParen => write!(f, "open '('"),
            TokenKind::CloseParen => write!(f, "close ')'"),
            TokenKind::OpenBrace => write!(f, "open '{{'"),
            TokenKind::CloseBrace => write!(f, "close '}}'"),
            TokenKind::OpenBracket => write!(f, "open '['"),
            TokenKind::CloseBracket => write!(f, "close ']'"),
            TokenKind::Equal => write!(f, "operator '='"),
            TokenKind::EqualEqual => write!(f, "operator '=='"),
            TokenKind::BangEqual => write!(f, "operator '!='"),
            TokenKind::Less => write!(f, "operator '<'"),
            TokenKind::LessEqual => write!(f, "operator '<='"),
            TokenKind::Greater => write!(f, "operator '>'"),
            TokenKind::GreaterEqual => write!(f, "operator '>='"),
            TokenKind::Plus => write!(f, "operator '+'"),
            TokenKind::Minus => write!(f, "operator '-'"),
            TokenKind::Star => write!(f, "operator '*'"),
            TokenKind::Slash => write!(f, "operator '/'"),
            TokenKind::Percent => write!(f, "operator '%'"),
            TokenKind::Def => write!(f, "keyword 'def'"),
            TokenKind::Return => write!(f, "keyword 'return'"),
            TokenKind::If => write!(f, "keyword 'if'"),
            TokenKind::Else => write!(f, "keyword 'else'"),
            TokenKind::While => write!(f, "keyword 'while'"),
            TokenKind::True => write!(f, "keyword 'true'"),
            TokenKind::False => write!(f, "keyword 'false'"),
            TokenKind::Nil => write!(f, "keyword 'nil'"),
            TokenKind::Newline => write!(f, "end of line"),
            TokenKind::End => write!(f, "end of input"),
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Token(pub Location, pub TokenKind);

/// note: this is an infinite iterator (`next()` is never `None`)
pub struct Lexer<'src> {
    stream: Peekable<CharIndices<'src>>,
    len: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Lexer<'src> {
        Lexer {
            stream: source.char_indices().peekable(),
            len: source.len(),
        }
    }

    fn at(&mut self) -> usize {
        self.stream.peek().map_or(self.len, |p| p.0)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        use TokenKind::*;

        let Some((at, c)) = self.stream.find(|p| '\n' == p.1 || !p.1.is_whitespace()) else {
            return Some(Token(Location(self.len..self.len), End));
        };

        let kind = match c {
            '\n' => {
                while self.stream.next_if(|p| p.1.is_whitespace()).is_some() {}
                Newline
            }

            '#' => {
                while self.stream.next_if(|p| '\n' != p.1).is_some() {}
                return self.next();
            }

            '"' => self.string(),

            ',' => Comma,
            '(' => OpenParen,
            ')' => CloseParen,
            '{' => OpenBrace,
            '}' => CloseBrace,
            '[' => OpenBracket,
            ']' => CloseBracket,
            '+' => Plus,
            '-' => Minus,
            '*' => Star,
            '/' => Slash,
            '%' => Percent,

            '=' => match self.stream.next_if(|p| '=' == p.1) {
                Some(_) => EqualEqual,
                None => Equal,
            },
            '<' => match self.stream.next_if(|p| '=' == p.1) {
                Some(_) => LessEqual,
                None => Less,
            },
            '>' => match self.stream.next_if(|p| '=' == p.1) {
                Some(_) => GreaterEqual,
                None => Greater,
            },
            '!' => match self.stream.next_if(|p| '=' == p.1) {
                Some(_) => BangEqual,
                None => Unknown("!".into()),
            },

            c if c.is_ascii_digit() => self.number(c),

            c if c.is_alphabetic() || '_' == c => {
                let word: String = iter::once(c)
                    .chain(iter::from_fn(|| {
                        self.stream
                            .next_if(|p| p.1.is_alphanumeric() || '_' == p.1)
                            .map(|p| p.1)
                    }))
                    .collect();
                match word.as_str() {
                    "def" => Def,
                    "return" => Return,
                    "if" => If,
                    "else" => Else,
                    "while" => While,
                    "true" => True,
                    "false" => False,
                    "nil" => Nil,
                    _ => Word(word),
                }
            }

            c => Unknown(c.to_string()),
        };

        let end = self.at();
        Some(Token(Location(at..end), kind))
    }
}

impl Lexer<'_> {
    fn number(&mut self, first: char) -> TokenKind {
        use TokenKind::*;

        let (radix, mut text) = match (first, self.stream.peek()) {
            ('0', Some(&(_, 'b' | 'B'))) => {
                self.stream.next();
                (2, String::new())
            }
            ('0', Some(&(_, 'o' | 'O'))) => {
                self.stream.next();
                (8, String::new())
            }
            ('0', Some(&(_, 'x' | 'X'))) => {
                self.stream.next();
                (16, String::new())
            }
            _ => (10, first.to_string()),
        };

        while let Some((_, d)) = self.stream.next_if(|p| p.1.is_digit(radix)) {
            text.push(d);
        }

        if 10 != radix {
            return match u64::from_str_radix(&text, radix) {
                Ok(n) => Number(n as f64),
                Err(_) => Unknown(text),
            };
        }

        if self.stream.next_if(|p| '.' == p.1).is_some() {
            text.push('.');
            if !self.stream.peek().is_some_and(|p| p.1.is_ascii_digit()) {
                return Unknown(text);
            }
            while let Some((_, d)) = self.stream.next_if(|p| p.1.is_ascii_digit()) {
                text.push(d);
            }
        }

        Number(text.parse().expect("unreachable: ascii digits"))
    }

    fn string(&mut self) -> TokenKind {
        let mut text = String::new();
        loop {
            match self.stream.next() {
                Some((_, '"')) => break TokenKind::Str(text),
                Some((_, '\\')) => match self.stream.next() {
                    Some((_, 'n')) => text.push('\n'),
                    Some((_, 't')) => text.push('\t'),
                    Some((_, c)) => text.push(c),
                    None => break TokenKind::Unknown(text),
                },
                Some((_, c)) => text.push(c),
                None => break TokenKind::Unknown(text),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        let mut r = Vec::new();
        loop {
            let Token(_, kind) = lexer.next().expect("unreachable: infinite lexer");
            if TokenKind::End == kind {
                break r;
            }
            r.push(kind);
        }
    }

    #[test]
    fn words_and_numbers() {
        use TokenKind::*;

        assert_eq!(vec![Word("offset".into())], kinds("offset"));
        assert_eq!(
            vec![
                Number(42.0),
                Number(42.0),
                Number(42.0),
                Number(42.0),
                Number(0.5),
                Number(2974382.92438732),
            ],
            kinds("42 0x2a 0b101010 0o52 0.5 2974382.92438732")
        );
        assert_eq!(vec![Unknown("1.".into())], kinds("1."));
    }

    #[test]
    fn strings() {
        use TokenKind::*;

        assert_eq!(vec![Str("hay".into())], kinds("\"hay\""));
        assert_eq!(vec![Str(String::new())], kinds("\"\""));
        assert_eq!(vec![Str("a\"b\nc\\".into())], kinds(r#""a\"b\nc\\""#));
        assert_eq!(vec![Unknown("stray".into())], kinds("\"stray"));
    }

    #[test]
    fn keywords_and_operators() {
        use TokenKind::*;

        assert_eq!(
            vec![
                Def,
                Word("f".into()),
                OpenParen,
                Word("a".into()),
                CloseParen,
                OpenBrace,
                Return,
                Word("a".into()),
                Plus,
                Number(1.0),
                CloseBrace,
            ],
            kinds("def f(a) { return a + 1 }")
        );
        assert_eq!(
            vec![EqualEqual, Equal, BangEqual, LessEqual, Less, GreaterEqual, Greater],
            kinds("== = != <= < >= >")
        );
        assert_eq!(
            vec![True, False, Nil, While, If, Else],
            kinds("true false nil while if else")
        );
    }

    #[test]
    fn comments_and_newlines() {
        use TokenKind::*;

        assert_eq!(
            vec![Word("a".into()), Newline, Word("b".into())],
            kinds("a # hey\n\n  b")
        );
        assert_eq!(Vec::<TokenKind>::new(), kinds("# only a comment"));
        assert_eq!(vec![Word("a".into()), Newline], kinds("a\n\n\n"));
    }

    #[test]
    fn locations() {
        assert_eq!(
            vec![
                Token(Location(0..1), TokenKind::Word("a".into())),
                Token(Location(2..3), TokenKind::Equal),
                Token(Location(4..5), TokenKind::Number(1.0)),
                Token(Location(5..5), TokenKind::End),
            ],
            Lexer::new("a = 1").take(4).collect::<Vec<_>>()
        );
    }
}
