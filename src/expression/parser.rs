use crate::error::FormatError;
use crate::expression::Expression;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Name(String),
    Not,
    And,
    Or,
    Open,
    Close,
}

/// Maximum number of nested parentheses and negations in one expression.
///
/// Parsing, evaluation and rendering all recurse over the syntax tree, so the nesting of
/// untrusted input has to be bounded.
pub const MAX_NESTING: usize = 256;

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<(usize, Token)>,
    position: usize,
    depth: usize,
}

pub(super) fn parse(source: &str) -> Result<Expression, FormatError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(error(source, 0, "empty expression"));
    }
    let mut parser = Parser {
        source,
        tokens,
        position: 0,
        depth: 0,
    };
    let result = parser.disjunction()?;
    if let Some((offset, token)) = parser.peek() {
        return Err(error(
            source,
            *offset,
            &format!("unexpected token {token:?}"),
        ));
    }
    Ok(result)
}

fn error(source: &str, position: usize, reason: &str) -> FormatError {
    FormatError::Expression {
        expression: source.to_string(),
        position,
        reason: reason.to_string(),
    }
}

fn tokenize(source: &str) -> Result<Vec<(usize, Token)>, FormatError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();
    while let Some((offset, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '~' | '!' => Token::Not,
            '(' => Token::Open,
            ')' => Token::Close,
            '&' | '|' => {
                // Accept both `&` and `&&` (resp. `|` and `||`).
                if chars.peek().map(|(_, next)| *next) == Some(c) {
                    chars.next();
                }
                if c == '&' { Token::And } else { Token::Or }
            }
            c if c.is_alphanumeric() || c == '_' => {
                let mut name = String::from(c);
                while let Some((_, next)) = chars.peek() {
                    if next.is_alphanumeric() || *next == '_' {
                        name.push(*next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                Token::Name(name)
            }
            _ => return Err(error(source, offset, &format!("unexpected character `{c}`"))),
        };
        tokens.push((offset, token));
    }
    Ok(tokens)
}

impl Parser<'_> {
    fn peek(&self) -> Option<&(usize, Token)> {
        self.tokens.get(self.position)
    }

    fn end_offset(&self) -> usize {
        self.source.len()
    }

    /// Enter one nesting level at `offset`; must be paired with `self.depth -= 1`.
    fn descend(&mut self, offset: usize) -> Result<(), FormatError> {
        if self.depth >= MAX_NESTING {
            return Err(error(self.source, offset, "nesting too deep"));
        }
        self.depth += 1;
        Ok(())
    }

    fn disjunction(&mut self) -> Result<Expression, FormatError> {
        let mut args = vec![self.conjunction()?];
        while let Some((_, Token::Or)) = self.peek() {
            self.position += 1;
            args.push(self.conjunction()?);
        }
        Ok(if args.len() == 1 {
            args.remove(0)
        } else {
            Expression::Or(args)
        })
    }

    fn conjunction(&mut self) -> Result<Expression, FormatError> {
        let mut args = vec![self.negation()?];
        while let Some((_, Token::And)) = self.peek() {
            self.position += 1;
            args.push(self.negation()?);
        }
        Ok(if args.len() == 1 {
            args.remove(0)
        } else {
            Expression::And(args)
        })
    }

    fn negation(&mut self) -> Result<Expression, FormatError> {
        if let Some(&(offset, Token::Not)) = self.peek() {
            self.position += 1;
            self.descend(offset)?;
            let inner = self.negation()?;
            self.depth -= 1;
            return Ok(Expression::Not(Box::new(inner)));
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<Expression, FormatError> {
        let Some((offset, token)) = self.peek().cloned() else {
            return Err(error(
                self.source,
                self.end_offset(),
                "unexpected end of expression",
            ));
        };
        self.position += 1;
        match token {
            Token::Open => {
                self.descend(offset)?;
                let inner = self.disjunction()?;
                self.depth -= 1;
                match self.peek() {
                    Some((_, Token::Close)) => {
                        self.position += 1;
                        Ok(inner)
                    }
                    Some((offset, _)) => Err(error(self.source, *offset, "expected `)`")),
                    None => Err(error(self.source, self.end_offset(), "missing `)`")),
                }
            }
            Token::Name(name) => Ok(match name.as_str() {
                "0" | "false" | "False" => Expression::Constant(false),
                "1" | "true" | "True" => Expression::Constant(true),
                _ if name.chars().all(|c| c.is_ascii_digit()) => {
                    return Err(error(self.source, offset, "numeric literal is not a variable"));
                }
                _ => Expression::Variable(name),
            }),
            other => Err(error(
                self.source,
                offset,
                &format!("unexpected token {other:?}"),
            )),
        }
    }
}
