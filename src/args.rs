use std::path::PathBuf;

#[derive(clap::Parser)]
#[command(rename_all = "snake_case")]
pub struct Arguments {
    /// YAML config file; every setting has a default when omitted.
    #[arg(long = "config.file", env = "BOOTSTRAPPER_CONFIG_PATH")]
    pub config_path: Option<PathBuf>,
}
