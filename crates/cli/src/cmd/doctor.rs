use notesieve_core::config::loader::{default_config_path, ConfigLoader};
use std::path::Path;

use crate::logging;

pub fn run(config: Option<&Path>, profile: Option<&str>) {
    match ConfigLoader::load(config, profile) {
        Ok(rc) => {
            let _log = logging::init(&rc.logging);
            tracing::debug!("configuration resolved");

            println!("OK   nsv doctor");
            println!(
                "path: {}",
                config.map_or_else(
                    || default_config_path().display().to_string(),
                    |p| p.display().to_string()
                )
            );
            println!("profile: {}", rc.active_profile);
            println!("vault_root: {}", rc.vault_root.display());
            if !rc.vault_root.is_dir() {
                println!("  warning: vault_root is not a directory");
            }
            let excluded: Vec<_> =
                rc.excluded_folders.iter().map(|p| p.display().to_string()).collect();
            println!("excluded_folders: [{}]", excluded.join(", "));
            println!("extensions: [{}]", rc.extensions.join(", "));
            println!("search.default_date_field: {}", rc.dates.default_field.as_str());
            println!("search.date_order: {:?}", rc.dates.order);
            println!("search.week_start: {}", rc.dates.week_start);
            println!("logging.level: {}", rc.logging.level);
            if let Some(file) = &rc.logging.file {
                println!("logging.file: {}", file.display());
            }
        }
        Err(e) => {
            println!("FAIL nsv doctor");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    }
}
