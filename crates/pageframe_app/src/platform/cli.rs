use std::path::PathBuf;

use clap::Parser;

use super::config::AppConfig;
use super::logging::LogDestination;

/// Submit URLs and view their content in a sandboxed surface.
#[derive(Debug, Parser)]
#[command(name = "pageframe")]
#[command(about = "Fetch pages through a retrieval service and render them sandboxed", long_about = None)]
pub struct Cli {
    /// RON configuration file. Defaults are used when it does not exist.
    #[arg(long, value_name = "PATH", default_value = "pageframe.ron")]
    pub config: PathBuf,

    /// Base URL of the retrieval service, overriding the configuration.
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Where log output goes, overriding the configuration.
    #[arg(long, value_enum)]
    pub log: Option<LogDestination>,

    /// URLs submitted in order before interactive input is read.
    pub urls: Vec<String>,
}

impl Cli {
    /// Command-line flags win over the configuration file.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(log) = self.log {
            config.log = log;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_urls_and_overrides_parse() {
        let cli = Cli::try_parse_from([
            "pageframe",
            "--endpoint",
            "http://fetcher.local:8080",
            "--log",
            "both",
            "https://a.example",
            "https://b.example",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("pageframe.ron"));
        assert_eq!(cli.urls, vec!["https://a.example", "https://b.example"]);

        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.endpoint, "http://fetcher.local:8080");
        assert_eq!(config.log, LogDestination::Both);
    }

    #[test]
    fn without_flags_config_is_untouched() {
        let cli = Cli::try_parse_from(["pageframe"]).unwrap();
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config, AppConfig::default());
    }
}
