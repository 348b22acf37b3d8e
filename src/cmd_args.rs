use std::ffi::OsString;
use std::path::PathBuf;

pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// Run a single command line and exit with its status
    #[clap(short = 'c', long = "command", value_name = "LINE")]
    command: Option<String>,

    /// Configuration file. Default is '~/.conshell/config'.
    #[clap(long, value_name = "PATH", help = "configuration file")]
    config: Option<String>,

    /// Append diagnostics to this file; nothing is logged without it
    #[clap(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Keep kill/yank text inside the shell instead of the system clipboard
    #[clap(long, help = "do not use the system clipboard")]
    no_clipboard: bool,
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    command: Option<String>,
    config: Option<String>,
    log_file: Option<PathBuf>,
    no_clipboard: bool,
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        Self::from(ClapArgs::parse())
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from(ClapArgs::parse_from(itr))
    }

    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    /// Configuration path from `--config`, else the environment, else the default
    pub fn config_path(&self) -> String {
        self.config
            .clone()
            .unwrap_or_else(crate::config::get_config_path)
    }

    /// Log file from `--log-file`, else from the environment
    pub fn log_file(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(|| {
            std::env::var_os(crate::config::LOG_FILE_ENV_VAR)
                .filter(|val| !val.is_empty())
                .map(PathBuf::from)
        })
    }

    pub fn use_system_clipboard(&self) -> bool {
        !self.no_clipboard
    }
}

impl From<ClapArgs> for CommandLineArgs {
    fn from(args: ClapArgs) -> Self {
        Self {
            command: args.command,
            config: args.config,
            log_file: args.log_file,
            no_clipboard: args.no_clipboard,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_args_command() {
        let args = CommandLineArgs::parse_from(["conshell", "-c", "echo hi"]);
        assert_eq!(args.command(), Some("echo hi"));

        let args = CommandLineArgs::parse_from(["conshell", "--command", "pwd"]);
        assert_eq!(args.command(), Some("pwd"));
    }

    #[test]
    fn test_parse_args_config_and_clipboard() {
        let args = CommandLineArgs::parse_from([
            "conshell",
            "--config",
            "/tmp/conshell.ini",
            "--no-clipboard",
        ]);
        assert_eq!(args.config_path(), "/tmp/conshell.ini");
        assert!(!args.use_system_clipboard());
    }

    #[test]
    fn test_parse_args_log_file() {
        let args = CommandLineArgs::parse_from(["conshell", "--log-file", "/tmp/conshell.log"]);
        assert_eq!(args.log_file(), Some(PathBuf::from("/tmp/conshell.log")));
    }

    #[test]
    fn test_default_values() {
        let args = CommandLineArgs::parse_from(["conshell"]);
        assert_eq!(args.command(), None);
        assert!(args.use_system_clipboard());
    }
}
