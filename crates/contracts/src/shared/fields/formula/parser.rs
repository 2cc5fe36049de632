//! Recursive-descent parser producing an explicit AST
//!
//! comparison := additive (('>' | '<' | '>=' | '<=' | '==' | '!=') additive)?
//! additive   := multiplicative (('+' | '-') multiplicative)*
//! multiplicative := unary (('*' | '/') unary)*
//! unary      := '-' unary | primary
//! primary    := number | string | 'true' | 'false'
//!             | func '(' args ')' | ident | '(' comparison ')'

use super::token::Token;
use super::FormulaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

/// The fixed, closed function set. An identifier followed by `(` that is
/// not one of these is a syntax error, never a lookup into anything
/// executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    If,
    Round,
    Abs,
    Min,
    Max,
    Concat,
    FormatNumber,
}

impl Func {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "if" => Self::If,
            "round" => Self::Round,
            "abs" => Self::Abs,
            "min" => Self::Min,
            "max" => Self::Max,
            "concat" => Self::Concat,
            "format_number" => Self::FormatNumber,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Str(String),
    Bool(bool),
    Field(String),
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Call(Func, Vec<Expr>),
}

pub fn parse_tokens(tokens: &[Token]) -> Result<Expr, FormulaError> {
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.comparison()?;
    if parser.pos != tokens.len() {
        return Err(FormulaError::Syntax("trailing input".into()));
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: &Token, what: &str) -> Result<(), FormulaError> {
        match self.bump() {
            Some(t) if t == expected => Ok(()),
            _ => Err(FormulaError::Syntax(format!("expected {}", what))),
        }
    }

    fn comparison(&mut self) -> Result<Expr, FormulaError> {
        let left = self.additive()?;
        let op = match self.peek() {
            Some(Token::Lt) => BinOp::Lt,
            Some(Token::Gt) => BinOp::Gt,
            Some(Token::Le) => BinOp::Le,
            Some(Token::Ge) => BinOp::Ge,
            Some(Token::EqEq) => BinOp::Eq,
            Some(Token::NotEq) => BinOp::Ne,
            _ => return Ok(left),
        };
        self.pos += 1;
        let right = self.additive()?;
        Ok(Expr::Binary(op, Box::new(left), Box::new(right)))
    }

    fn additive(&mut self) -> Result<Expr, FormulaError> {
        let mut left = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.multiplicative()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    fn multiplicative(&mut self) -> Result<Expr, FormulaError> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.unary()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    fn unary(&mut self) -> Result<Expr, FormulaError> {
        if self.peek() == Some(&Token::Minus) {
            self.pos += 1;
            let inner = self.unary()?;
            return Ok(Expr::Neg(Box::new(inner)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, FormulaError> {
        let token = self
            .bump()
            .ok_or_else(|| FormulaError::Syntax("unexpected end of formula".into()))?
            .clone();
        match token {
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::Str(s) => Ok(Expr::Str(s)),
            Token::LParen => {
                let inner = self.comparison()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            Token::Ident(name) => {
                if name == "true" {
                    return Ok(Expr::Bool(true));
                }
                if name == "false" {
                    return Ok(Expr::Bool(false));
                }
                if self.peek() == Some(&Token::LParen) {
                    let func = Func::from_name(&name).ok_or_else(|| {
                        FormulaError::Syntax(format!("unknown function '{}'", name))
                    })?;
                    self.pos += 1;
                    let args = self.arguments()?;
                    return Ok(Expr::Call(func, args));
                }
                Ok(Expr::Field(name))
            }
            other => Err(FormulaError::Syntax(format!("unexpected token {:?}", other))),
        }
    }

    fn arguments(&mut self) -> Result<Vec<Expr>, FormulaError> {
        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.comparison()?);
            match self.bump() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => return Ok(args),
                _ => return Err(FormulaError::Syntax("expected ',' or ')'".into())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::token::tokenize;
    use super::*;

    fn parse(input: &str) -> Result<Expr, FormulaError> {
        parse_tokens(&tokenize(input).unwrap())
    }

    #[test]
    fn test_precedence_shape() {
        let expr = parse("a + b * c").unwrap();
        match expr {
            Expr::Binary(BinOp::Add, _, right) => {
                assert!(matches!(*right, Expr::Binary(BinOp::Mul, _, _)));
            }
            other => panic!("unexpected shape: {:?}", other),
        }
    }

    #[test]
    fn test_call_with_nested_comparison() {
        let expr = parse("if(a >= 10, 'да', 'нет')").unwrap();
        match expr {
            Expr::Call(Func::If, args) => {
                assert_eq!(args.len(), 3);
                assert!(matches!(args[0], Expr::Binary(BinOp::Ge, _, _)));
            }
            other => panic!("unexpected shape: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_function_rejected() {
        assert!(matches!(parse("system('rm')"), Err(FormulaError::Syntax(_))));
    }

    #[test]
    fn test_trailing_input_rejected() {
        assert!(parse("a b").is_err());
        assert!(parse("(a").is_err());
    }

    #[test]
    fn test_bools_and_negation() {
        assert_eq!(parse("true").unwrap(), Expr::Bool(true));
        assert!(matches!(parse("-a").unwrap(), Expr::Neg(_)));
    }
}
