//! Config command handlers: show effective configuration.

use crate::app::Settings;
use crate::app_config::LoadedConfig;

pub(crate) fn run_config_show_command(settings: &Settings, loaded_config: &LoadedConfig) {
    let resolved_path = loaded_config.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    println!("config_path = {resolved_path}");
    println!(
        "config_file = {}",
        if loaded_config.loaded_from_file() {
            "loaded"
        } else {
            "not found (using defaults)"
        }
    );
    println!("base_url = {}", settings.base_url);
    println!("db_path = {}", settings.db_path.display());
    println!("request_delay_ms = {}", settings.request_delay.as_millis());
    println!("connect_timeout_secs = {}", settings.connect_timeout_secs);
    println!("read_timeout_secs = {}", settings.read_timeout_secs);
    println!("verbosity = {}", settings.verbosity_label());
}
