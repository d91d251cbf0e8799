//! The operator command language.
//!
//! A line is first split into [`Token`]s by the [`Lexer`] and the token
//! sequence is then reduced to exactly one [`Command`]. Recognition never
//! fails: lexical and grammar errors both come out as
//! [`Command::Unrecognized`] so the caller can tell the operator and carry on.

mod lexer;
mod parser;

pub use lexer::{tokenize, LexError, Lexer, Token};
pub use parser::parse_tokens;

use std::{convert::TryFrom, fmt, io};

/// Address and port typed by the operator.
///
/// The address only has to look like an IPv4 literal and the port only has to
/// be a number; whether they can be bound or reached is found out when the
/// connection is attempted.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Endpoint {
    pub address: String,
    pub port: u64,
}

impl Endpoint {
    pub fn new(address: impl Into<String>, port: u64) -> Self {
        Self {
            address: address.into(),
            port,
        }
    }

    /// Address and port as the socket APIs take them.
    pub fn socket(&self) -> io::Result<(&str, u16)> {
        let port = u16::try_from(self.port).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("port {} is out of range", self.port),
            )
        })?;
        Ok((self.address.as_str(), port))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Command {
    /// `quit NOW`
    Quit,
    /// `start <ip> <port>`
    StartServer(Endpoint),
    /// `connect <ip> <port>`
    Connect(Endpoint),
    /// `send <words>`
    SendWords { text: String },
    /// `<number> + <number>`, kept as a self-test of the grammar.
    Arithmetic { result: u64 },
    /// Bare identifiers with no leading keyword. Echoed, never acted upon.
    Words { text: String },
    /// `help`
    Help,
    Unrecognized,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        parse(line)
    }

    /// Text this command puts on the wire once a connection exists.
    pub fn payload(&self) -> Option<String> {
        match self {
            Command::SendWords { text } | Command::Words { text } => Some(text.clone()),
            Command::Arithmetic { result } => Some(result.to_string()),
            _ => None,
        }
    }
}

/// Recognizes one line of operator input.
pub fn parse(line: &str) -> Command {
    match tokenize(line) {
        Ok(tokens) => {
            let command = parse_tokens(&tokens);
            if command == Command::Unrecognized {
                tracing::debug!(?tokens, "no production matches");
            }
            command
        }
        Err(err) => {
            tracing::debug!(%err, "lexical error");
            Command::Unrecognized
        }
    }
}
