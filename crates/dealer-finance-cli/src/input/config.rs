use dealer_finance_core::quote::InMemoryCatalog;
use dealer_finance_core::schedule::DealerConfig;

use super::file;

/// Dealer fee/loan configuration, or the built-in regional defaults.
pub fn load_config(path: Option<&str>) -> Result<DealerConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            let config = DealerConfig::from_yaml_str(&file::read_text(p)?)?;
            tracing::info!(path = p, "using dealer config");
            Ok(config)
        }
        None => Ok(DealerConfig::default()),
    }
}

pub fn load_catalog(path: &str) -> Result<InMemoryCatalog, Box<dyn std::error::Error>> {
    Ok(InMemoryCatalog::from_yaml_str(&file::read_text(path)?)?)
}
