use super::{lexer::Token, Command, Endpoint};

/// Reduces a complete token sequence to a command.
///
/// Every production spans the whole line, so matching on the token slice is
/// all the parsing there is. Anything that does not match is
/// [`Command::Unrecognized`].
pub fn parse_tokens(tokens: &[Token]) -> Command {
    match tokens {
        [Token::Quit, Token::Now] => Command::Quit,
        [Token::Help] => Command::Help,
        [Token::Connect, Token::Ip(address), Token::Number(port)] => {
            Command::Connect(Endpoint::new(address.as_str(), *port))
        }
        [Token::Start, Token::Ip(address), Token::Number(port)] => {
            Command::StartServer(Endpoint::new(address.as_str(), *port))
        }
        [Token::Send, rest @ ..] => {
            words(rest).map_or(Command::Unrecognized, |text| Command::SendWords { text })
        }
        [Token::Number(lhs), Token::Plus, Token::Number(rhs)] => lhs
            .checked_add(*rhs)
            .map_or(Command::Unrecognized, |result| Command::Arithmetic { result }),
        tokens => words(tokens).map_or(Command::Unrecognized, |text| Command::Words { text }),
    }
}

/// One or more identifiers joined with single spaces.
fn words(tokens: &[Token]) -> Option<String> {
    if tokens.is_empty() {
        return None;
    }
    let words = tokens
        .iter()
        .map(|token| match token {
            Token::Id(id) => Some(id.as_str()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    Some(words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(word: &str) -> Token {
        Token::Id(word.to_owned())
    }

    #[test]
    fn words_keep_input_order() {
        assert_eq!(
            parse_tokens(&[Token::Send, id("b"), id("a"), id("c")]),
            Command::SendWords {
                text: "b a c".into()
            }
        );
    }

    #[test]
    fn words_reject_reserved_in_the_middle() {
        assert_eq!(
            parse_tokens(&[Token::Send, id("hello"), Token::Quit]),
            Command::Unrecognized
        );
    }

    #[test]
    fn empty() {
        assert_eq!(parse_tokens(&[]), Command::Unrecognized);
    }

    #[test]
    fn port_out_of_range_still_parses() {
        assert_eq!(
            parse_tokens(&[
                Token::Connect,
                Token::Ip("127.0.0.1".into()),
                Token::Number(65536)
            ]),
            Command::Connect(Endpoint::new("127.0.0.1", 65536))
        );
    }

    #[test]
    fn sum_overflow() {
        assert_eq!(
            parse_tokens(&[Token::Number(u64::MAX), Token::Plus, Token::Number(1)]),
            Command::Unrecognized
        );
    }
}
