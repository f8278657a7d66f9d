//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

use gemgate_types::config::ProxyConfig;

/// Proxy prompts and linked documents to Gemini.
#[derive(Debug, Parser)]
#[command(name = "gemgate", version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML config file.
    #[arg(long, env = "GEMGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Port to listen on.
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Interface to bind.
    #[arg(long)]
    pub host: Option<String>,

    /// Gemini model name.
    #[arg(long, env = "GEMINI_MODEL")]
    pub model: Option<String>,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Export spans to stdout via OpenTelemetry.
    #[arg(long)]
    pub otel: bool,
}

impl Cli {
    /// Overlay flags and environment onto a loaded config.
    pub fn apply(&self, config: &mut ProxyConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(model) = &self.model {
            config.gemini.model = model.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "gemgate", "--port", "8081", "--host", "127.0.0.1", "--model", "gemini-2.0-flash",
        ])
        .unwrap();

        let mut config = ProxyConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_unset_flags_keep_config() {
        let cli = Cli {
            config: None,
            port: None,
            host: None,
            model: None,
            verbose: 0,
            quiet: false,
            otel: false,
        };

        let mut config = ProxyConfig::default();
        config.server.port = 7000;
        cli.apply(&mut config);

        assert_eq!(config.server.port, 7000);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_verbosity_flags() {
        let cli = Cli::try_parse_from(["gemgate", "-vv", "--otel"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.otel);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(Cli::try_parse_from(["gemgate", "--port", "70000"]).is_err());
    }
}
