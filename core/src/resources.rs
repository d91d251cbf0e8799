use crate::{Config, Error};
use std::path::PathBuf;

pub const HELP: &str = "help.txt";

const BUILTIN_HELP: &str = "\
Commands:
  start <ip> <port>     host a session on this address
  connect <ip> <port>   join a session hosted elsewhere
  send <words>          send words to the other side
  <words>               same as send once connected
  help                  show this text
  quit NOW              leave
A process is either a server or a client, never both.
Anything after $ is a comment.";

/// Full contents of the named resource.
///
/// The configured resources directory is searched first, then the XDG data
/// directories under `parley/`.
pub fn load(config: &Config, name: &str) -> Result<String, Error> {
    let path = locate(config, name).ok_or_else(|| Error::Resource(name.to_owned()))?;
    tracing::debug!(path = %path.display(), "loading resource");
    Ok(std::fs::read_to_string(path)?)
}

fn locate(config: &Config, name: &str) -> Option<PathBuf> {
    let local = config.resources.join(name);
    if local.is_file() {
        return Some(local);
    }
    xdg::BaseDirectories::with_prefix("parley")
        .ok()?
        .find_data_file(name)
}

/// Operator help, falling back to the built-in summary.
pub fn help(config: &Config) -> String {
    load(config, HELP).unwrap_or_else(|err| {
        tracing::debug!(%err, "using built-in help");
        BUILTIN_HELP.to_owned()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "parley-resources-{}-{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn loads_from_resources_dir() {
        let dir = scratch("load");
        std::fs::write(dir.join("datafile.txt"), "static contents\n").unwrap();
        let config = Config {
            resources: dir.clone(),
            ..Config::default()
        };
        assert_eq!(load(&config, "datafile.txt").unwrap(), "static contents\n");
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing() {
        let config = Config {
            resources: scratch("missing"),
            ..Config::default()
        };
        assert!(matches!(
            load(&config, "no-such-resource-here.txt"),
            Err(Error::Resource(_))
        ));
    }

    #[test]
    fn help_falls_back() {
        let config = Config {
            resources: scratch("help"),
            ..Config::default()
        };
        let help = help(&config);
        assert!(help.contains("quit NOW"));
    }
}
