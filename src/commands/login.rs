//! Login: store credentials in the config file.

use crate::config::Config;
use crate::error::Result;
use std::path::Path;

pub fn login(
    config_path: Option<&Path>,
    username: String,
    apikey: String,
    host: Option<String>,
) -> Result<()> {
    let mut config = Config::load(config_path)?;
    config.user = Some(username);
    config.apikey = Some(apikey);
    if host.is_some() {
        config.host = host;
    }

    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::default_path);
    config.save(&path)?;
    println!("Login credentials stored in {}", path.display());
    Ok(())
}
