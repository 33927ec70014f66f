use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wallet-explorer")]
#[command(about = "Blockchain wallet explorer backend", long_about = None)]
pub struct Args {
    /// Path to configuration file (optional, uses defaults if not provided)
    #[arg(short, long)]
    pub config_path: Option<PathBuf>,

    /// PostgreSQL connection URL
    #[arg(long)]
    pub database_url: Option<String>,

    /// HTTP server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Apply the bundled schema before serving
    #[arg(long)]
    pub migrate: bool,
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "wallet-explorer",
            "--config-path",
            "explorer.toml",
            "-p",
            "8080",
            "--migrate",
        ])
        .unwrap();
        assert_eq!(args.config_path, Some(PathBuf::from("explorer.toml")));
        assert_eq!(args.port, Some(8080));
        assert!(args.migrate);
        assert!(!args.json_logs);
    }
}
