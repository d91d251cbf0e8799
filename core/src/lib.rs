pub mod command;
pub mod config;
pub mod operator;
pub mod resources;
pub mod screen;
pub mod session;
pub mod wire;

pub use command::{Command, Endpoint};
pub use config::Config;
pub use operator::Operator;
pub use screen::Screen;
pub use session::{Role, Session, StateError};

/// Identifies one accepted or established connection.
pub type ConnectionId = uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    IO(#[from] std::io::Error),
    #[error("invalid value {value:?} for `{key}`")]
    Config { key: &'static str, value: String },
    #[error("resource {0} not found")]
    Resource(String),
}
