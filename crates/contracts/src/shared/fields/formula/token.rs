//! Tokenizer for the formula grammar

use super::FormulaError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Str(String),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Lt,
    Gt,
    Le,
    Ge,
    EqEq,
    NotEq,
    LParen,
    RParen,
    Comma,
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, FormulaError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\r' | '\n' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            '<' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token::Le);
                    i += 2;
                } else {
                    tokens.push(Token::Lt);
                    i += 1;
                }
            }
            '>' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token::Ge);
                    i += 2;
                } else {
                    tokens.push(Token::Gt);
                    i += 1;
                }
            }
            '=' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token::EqEq);
                    i += 2;
                } else {
                    return Err(FormulaError::Syntax("single '=' not supported".into()));
                }
            }
            '!' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token::NotEq);
                    i += 2;
                } else {
                    return Err(FormulaError::Syntax("unexpected '!'".into()));
                }
            }
            '\'' | '"' => {
                let quote = c;
                let start = i + 1;
                let mut j = start;
                while j < chars.len() && chars[j] != quote {
                    j += 1;
                }
                if j >= chars.len() {
                    return Err(FormulaError::Syntax("unterminated string".into()));
                }
                tokens.push(Token::Str(chars[start..j].iter().collect()));
                i = j + 1;
            }
            '0'..='9' | '.' => {
                let start = i;
                let mut j = i;
                while j < chars.len() && (chars[j].is_ascii_digit() || chars[j] == '.') {
                    j += 1;
                }
                let text: String = chars[start..j].iter().collect();
                let value: f64 = text
                    .parse()
                    .map_err(|_| FormulaError::Syntax(format!("bad number '{}'", text)))?;
                tokens.push(Token::Number(value));
                i = j;
            }
            _ if c.is_alphabetic() || c == '_' => {
                let start = i;
                let mut j = i;
                while j < chars.len() && (chars[j].is_alphanumeric() || chars[j] == '_') {
                    j += 1;
                }
                tokens.push(Token::Ident(chars[start..j].iter().collect()));
                i = j;
            }
            _ => {
                return Err(FormulaError::Syntax(format!("unexpected character '{}'", c)));
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_expression() {
        let tokens = tokenize("round(a + b, 2)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("round".into()),
                Token::LParen,
                Token::Ident("a".into()),
                Token::Plus,
                Token::Ident("b".into()),
                Token::Comma,
                Token::Number(2.0),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_comparisons() {
        assert_eq!(
            tokenize("a >= 1 != b <= 2").unwrap(),
            vec![
                Token::Ident("a".into()),
                Token::Ge,
                Token::Number(1.0),
                Token::NotEq,
                Token::Ident("b".into()),
                Token::Le,
                Token::Number(2.0),
            ]
        );
    }

    #[test]
    fn test_tokenize_strings_both_quotes() {
        assert_eq!(
            tokenize("'по' \"штук\"").unwrap(),
            vec![Token::Str("по".into()), Token::Str("штук".into())]
        );
    }

    #[test]
    fn test_tokenize_rejects_garbage() {
        assert!(tokenize("a # b").is_err());
        assert!(tokenize("'open").is_err());
        assert!(tokenize("a = b").is_err());
        assert!(tokenize("1.2.3").is_err());
    }
}
