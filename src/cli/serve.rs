//! Serve command implementation
//!
//! Launches the JSON API over the catalog file.

use clap::Args;
use std::path::PathBuf;

use crate::core::config::Config;
use crate::core::error::Result;

/// Arguments for the serve command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    leasehub serve                      Start the API on localhost:3000
    leasehub serve --port 8080          Use custom port
    leasehub serve --open               Auto-open browser
    leasehub serve --catalog ./cat.json Serve a specific catalog file

Set LEASEHUB_ADMIN_TOKEN (or admin.token in config.toml) to enable
the /api/admin routes.")]
pub struct ServeArgs {
    /// Port to serve on (default: server.port from config, 3000)
    #[arg(long)]
    pub port: Option<u16>,

    /// Address to bind (default: server.host from config)
    #[arg(long)]
    pub host: Option<String>,

    /// Catalog file (default: $LEASEHUB_HOME/catalog.json)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Auto-open browser
    #[arg(long)]
    pub open: bool,
}

impl ServeArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(path) = &self.catalog {
            config.catalog.path = Some(path.clone());
        }
    }
}

/// Run the serve command
pub async fn run(args: ServeArgs, mut config: Config) -> Result<()> {
    args.apply(&mut config);
    if config.catalog.path.is_none() {
        Config::ensure_home()?;
    }
    crate::web::run(config, args.open).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = ServeArgs {
            port: Some(8080),
            host: None,
            catalog: Some(PathBuf::from("cat.json")),
            open: false,
        };
        let mut config = Config::default();
        let host = config.server.host.clone();
        args.apply(&mut config);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, host);
        assert_eq!(config.catalog.path, Some(PathBuf::from("cat.json")));
    }
}
