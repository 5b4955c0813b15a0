//! Command line and environment configuration.

use std::path::PathBuf;

use clap::Parser;

/// A JSONPlaceholder-style mock REST and GraphQL server.
#[derive(Parser, Debug, Clone)]
#[command(name = "jsonstead", version, about)]
pub struct Cli {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Path to the JSON fixture holding the six resource collections.
    #[arg(long, env = "JSONSTEAD_FIXTURE", default_value = "data/fixture.json")]
    pub fixture: PathBuf,

    /// Path to the visit counter file. Must exist and hold a decimal integer.
    #[arg(long, env = "JSONSTEAD_COUNTER_FILE", default_value = "visits.txt")]
    pub counter_file: PathBuf,

    /// Deployment environment; `production` disables the access log.
    #[arg(long, env = "APP_ENV", default_value = "development")]
    pub app_env: String,
}

impl Cli {
    #[must_use]
    pub fn access_log_enabled(&self) -> bool {
        self.app_env != "production"
    }
}
