use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rusty-agenda", version, about = "Console address book")]
pub struct Cli {
    /// Storage choice (mem, json, sqlite) are available
    #[arg(long, env = "STORAGE_CHOICE", default_value_t = String::from("json"))]
    pub storage_choice: String,

    /// Document file used by the json storage
    #[arg(long, env = "JSON_STORAGE_PATH", default_value = "./.instance/contacts.json")]
    pub json_path: PathBuf,

    /// Database file used by the sqlite storage
    #[arg(long, env = "SQLITE_STORAGE_PATH", default_value = "./.instance/contacts.db")]
    pub sqlite_path: PathBuf,

    /// Log filter written to stderr (error, warn, info, debug, trace)
    #[arg(long, env = "AGENDA_LOG", default_value_t = String::from("warn"))]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_win() {
        let cli = Cli::try_parse_from([
            "rusty-agenda",
            "--storage-choice",
            "sqlite",
            "--sqlite-path",
            "/tmp/agenda.db",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.storage_choice, "sqlite");
        assert_eq!(cli.sqlite_path, PathBuf::from("/tmp/agenda.db"));
        assert_eq!(cli.log_level, "debug");
    }

    #[test]
    fn rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["rusty-agenda", "--storage", "txt"]).is_err());
    }
}
