use crate::Config;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Uninitialized,
    Server,
    Client,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Uninitialized => "uninitialized",
            Role::Server => "server",
            Role::Client => "client",
        };
        f.write_str(name)
    }
}

/// Raised when a process that already has a role is asked to take another.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid state, cannot instantiate: {requested} while current state is: {current}")]
pub struct StateError {
    pub requested: Role,
    pub current: Role,
}

/// Per-process context: the role this process plays and the configuration it
/// was started with.
///
/// The role leaves `Uninitialized` exactly once and never changes again.
#[derive(Debug, Clone)]
pub struct Session {
    role: Role,
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            role: Role::Uninitialized,
            config,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Checks that the role could be taken without taking it.
    pub fn request_role(&self, target: Role) -> Result<(), StateError> {
        if self.role != Role::Uninitialized || target == Role::Uninitialized {
            return Err(StateError {
                requested: target,
                current: self.role,
            });
        }
        Ok(())
    }

    /// Takes the role, checking it first.
    pub fn commit(&mut self, role: Role) -> Result<(), StateError> {
        self.request_role(role)?;
        tracing::info!(%role, "role fixed");
        self.role = role;
        Ok(())
    }

    /// Takes the role before any socket is opened for it, so a failing bind
    /// or connect still leaves the process in that role.
    pub fn assume(&mut self, role: Role) -> Result<(), StateError> {
        self.commit(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Config::default())
    }

    #[test]
    fn starts_uninitialized() {
        assert_eq!(session().role(), Role::Uninitialized);
    }

    #[test]
    fn becomes_server() {
        let mut session = session();
        session.request_role(Role::Server).unwrap();
        session.commit(Role::Server).unwrap();
        assert_eq!(session.role(), Role::Server);
    }

    #[test]
    fn role_is_fixed() {
        for first in &[Role::Server, Role::Client] {
            let mut session = session();
            session.assume(*first).unwrap();
            for second in &[Role::Server, Role::Client, Role::Uninitialized] {
                assert_eq!(
                    session.request_role(*second),
                    Err(StateError {
                        requested: *second,
                        current: *first
                    })
                );
                assert!(session.commit(*second).is_err());
            }
            assert_eq!(session.role(), *first);
        }
    }

    #[test]
    fn assume_once() {
        let mut session = session();
        session.assume(Role::Client).unwrap();
        assert_eq!(
            session.assume(Role::Server),
            Err(StateError {
                requested: Role::Server,
                current: Role::Client
            })
        );
        assert_eq!(session.role(), Role::Client);
    }

    #[test]
    fn cannot_request_uninitialized() {
        assert!(session().request_role(Role::Uninitialized).is_err());
    }

    #[test]
    fn message() {
        let err = StateError {
            requested: Role::Client,
            current: Role::Server,
        };
        assert_eq!(
            err.to_string(),
            "invalid state, cannot instantiate: client while current state is: server"
        );
    }
}
