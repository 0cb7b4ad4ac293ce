use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use eduassist_core::config::{API_BASE_URL_ENV, ClientConfig};
use eduassist_infrastructure::{ConfigService, EduPaths};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Set the backend base URL
    SetUrl { url: String },
}

pub fn run(paths: &EduPaths, action: &ConfigAction) -> Result<()> {
    let service = ConfigService::new(paths);
    match action {
        ConfigAction::Show => {
            let config = service.get_config()?;
            println!("api_base_url = {}", config.api_base_url);
            if std::env::var(API_BASE_URL_ENV).is_ok() {
                println!("{}", format!("(overridden by {API_BASE_URL_ENV})").bright_black());
            }
        }
        ConfigAction::SetUrl { url } => {
            service.save(&ClientConfig::new(url.trim()))?;
            println!("{}", format!("api_base_url set to {}", url.trim()).green());
        }
    }
    Ok(())
}
