use std::{iter::Peekable, str::CharIndices};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Connect,
    Quit,
    Send,
    Help,
    Start,
    Now,
    Ip(String),
    Number(u64),
    Id(String),
    Plus,
    Minus,
    Multiply,
    Divide,
    Mod,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Equals,
    Define,
    GreaterThan,
    LessThan,
}

impl Token {
    fn reserved(word: &str) -> Option<Self> {
        let token = match word {
            "connect" => Self::Connect,
            "quit" => Self::Quit,
            "send" => Self::Send,
            "help" => Self::Help,
            "start" => Self::Start,
            "NOW" => Self::Now,
            _ => return None,
        };
        Some(token)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unexpected character {ch:?} at {position}")]
    Unexpected { ch: char, position: usize },
    #[error("number {0} does not fit in 64 bits")]
    Overflow(String),
}

/// Splits one line of operator input into tokens.
///
/// Rules are tried in a fixed order at every position and the first one that
/// matches wins, so `123.4.5.6` is an address while `1234` is a number and
/// `12ab` is the number `12` followed by the identifier `ab`.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn skip_ignored(&mut self) {
        while let Some(&(_, ch)) = self.chars.peek() {
            match ch {
                ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c' => {
                    self.chars.next();
                }
                // comments run to the end of the line
                '$' => {
                    while let Some(&(_, ch)) = self.chars.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.chars.next();
                    }
                }
                _ => return,
            }
        }
    }

    /// Byte length of an IPv4-shaped literal starting at `start`, if any.
    fn ip_len(&self, start: usize) -> Option<usize> {
        let bytes = &self.input.as_bytes()[start..];
        let digits = |from: usize, max: usize| {
            bytes[from..]
                .iter()
                .take(max)
                .take_while(|b| b.is_ascii_digit())
                .count()
        };

        if digits(0, 3) != 3 {
            return None;
        }
        let mut end = 3;
        for _ in 0..3 {
            if bytes.get(end) != Some(&b'.') {
                return None;
            }
            end += 1;
            let n = digits(end, 3);
            if n == 0 {
                return None;
            }
            end += n;
        }
        Some(end)
    }

    fn eat_while(&mut self, start: usize, accept: impl Fn(char) -> bool) -> &'a str {
        let mut end = start;
        while let Some(&(index, ch)) = self.chars.peek() {
            if !accept(ch) {
                break;
            }
            end = index + ch.len_utf8();
            self.chars.next();
        }
        let input = self.input;
        &input[start..end]
    }

    fn advance_to(&mut self, end: usize) {
        while let Some(&(index, _)) = self.chars.peek() {
            if index >= end {
                break;
            }
            self.chars.next();
        }
    }

    fn operator(&mut self, position: usize, ch: char) -> Result<Token, LexError> {
        let token = match ch {
            ':' => {
                return match self.chars.peek() {
                    Some(&(_, '=')) => {
                        self.chars.next();
                        Ok(Token::Define)
                    }
                    _ => Err(LexError::Unexpected { ch, position }),
                }
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Multiply,
            '/' => Token::Divide,
            '%' => Token::Mod,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '=' => Token::Equals,
            '>' => Token::GreaterThan,
            '<' => Token::LessThan,
            ch => return Err(LexError::Unexpected { ch, position }),
        };
        Ok(token)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_ignored();
        let &(start, ch) = self.chars.peek()?;

        if ch.is_ascii_digit() {
            if let Some(len) = self.ip_len(start) {
                self.advance_to(start + len);
                return Some(Ok(Token::Ip(self.input[start..start + len].to_owned())));
            }
            let digits = self.eat_while(start, |ch| ch.is_ascii_digit());
            return Some(
                digits
                    .parse()
                    .map(Token::Number)
                    .map_err(|_| LexError::Overflow(digits.to_owned())),
            );
        }

        if ch.is_ascii_alphabetic() {
            let word = self.eat_while(start, |ch| ch.is_ascii_alphanumeric());
            let token = Token::reserved(word).unwrap_or_else(|| Token::Id(word.to_owned()));
            return Some(Ok(token));
        }

        self.chars.next();
        Some(self.operator(start, ch))
    }
}

/// Tokenizes the whole line, stopping at the first lexical error.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod literals {
        use super::*;

        #[test]
        fn ip() {
            assert_eq!(
                tokenize("127.0.0.1").unwrap(),
                vec![Token::Ip("127.0.0.1".into())]
            );
        }

        #[test]
        fn ip_without_range_check() {
            assert_eq!(
                tokenize("999.999.999.999").unwrap(),
                vec![Token::Ip("999.999.999.999".into())]
            );
        }

        #[test]
        fn ip_needs_three_leading_digits() {
            assert_eq!(
                tokenize("10.0.0.1"),
                Err(LexError::Unexpected {
                    ch: '.',
                    position: 2
                })
            );
        }

        #[test]
        fn ip_is_greedy() {
            assert_eq!(
                tokenize("123.4.5.6789").unwrap(),
                vec![Token::Ip("123.4.5.678".into()), Token::Number(9)]
            );
        }

        #[test]
        fn number() {
            assert_eq!(
                tokenize("9000 42").unwrap(),
                vec![Token::Number(9000), Token::Number(42)]
            );
        }

        #[test]
        fn number_overflow() {
            assert_eq!(
                tokenize("99999999999999999999999"),
                Err(LexError::Overflow("99999999999999999999999".into()))
            );
        }

        #[test]
        fn number_then_identifier() {
            assert_eq!(
                tokenize("12ab").unwrap(),
                vec![Token::Number(12), Token::Id("ab".into())]
            );
        }
    }

    mod words {
        use super::*;

        #[test]
        fn reserved() {
            assert_eq!(
                tokenize("connect quit send help start NOW").unwrap(),
                vec![
                    Token::Connect,
                    Token::Quit,
                    Token::Send,
                    Token::Help,
                    Token::Start,
                    Token::Now
                ]
            );
        }

        #[test]
        fn reserved_is_case_sensitive() {
            assert_eq!(
                tokenize("Quit now").unwrap(),
                vec![Token::Id("Quit".into()), Token::Id("now".into())]
            );
        }

        #[test]
        fn identifiers_with_digits() {
            assert_eq!(
                tokenize("abc123 x").unwrap(),
                vec![Token::Id("abc123".into()), Token::Id("x".into())]
            );
        }
    }

    mod punctuation {
        use super::*;

        #[test]
        fn operators() {
            assert_eq!(
                tokenize("+-*/%(){}=><:=").unwrap(),
                vec![
                    Token::Plus,
                    Token::Minus,
                    Token::Multiply,
                    Token::Divide,
                    Token::Mod,
                    Token::LParen,
                    Token::RParen,
                    Token::LBrace,
                    Token::RBrace,
                    Token::Equals,
                    Token::GreaterThan,
                    Token::LessThan,
                    Token::Define,
                ]
            );
        }

        #[test]
        fn lone_colon() {
            assert_eq!(
                tokenize("a : b"),
                Err(LexError::Unexpected {
                    ch: ':',
                    position: 2
                })
            );
        }

        #[test]
        fn comment_is_discarded() {
            assert_eq!(
                tokenize("send hi $ not part of it").unwrap(),
                vec![Token::Send, Token::Id("hi".into())]
            );
        }

        #[test]
        fn whitespace_only() {
            assert_eq!(tokenize(" \t\r\n").unwrap(), Vec::<Token>::new());
        }

        #[test]
        fn unknown_character() {
            assert_eq!(
                tokenize("send héllo"),
                Err(LexError::Unexpected {
                    ch: 'é',
                    position: 6
                })
            );
        }
    }
}
