use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tracing::info;

use aws_cost_report::config::{self, Config};

/// Execute the config show command
///
/// Displays the effective configuration (defaults, file and environment merged)
pub fn show(path: &Path) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());
    info!(path = %path.display(), "Loading configuration for display");

    let cfg = config::load_config(path)?;

    println!("{}", "Current Configuration:".green().bold());
    println!();

    let toml_string = toml::to_string_pretty(&cfg)?;
    println!("{}", toml_string);

    Ok(())
}

/// Execute the config validate command
pub fn validate(path: &Path) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());
    info!(path = %path.display(), "Validating configuration file");

    let cfg = config::load_config(path)?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    for line in summary(path, &cfg) {
        println!("{}", line);
    }

    Ok(())
}

fn summary(path: &Path, cfg: &Config) -> Vec<String> {
    let source = if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found, using defaults)", path.display())
    };
    let defaults = &cfg.pricing.defaults;

    vec![
        "Summary:".bold().to_string(),
        format!("  Config File: {}", source),
        format!("  Pricing URL: {}", cfg.pricing.base_url),
        format!("  Timeout: {}s", cfg.pricing.timeout_seconds),
        format!("  Strict Catalog: {}", cfg.pricing.strict_catalog),
        format!(
            "  Defaults: {} / {} / {}",
            defaults.term, defaults.payment_option, defaults.region
        ),
        format!("  Logging: {} ({})", cfg.logging.level, cfg.logging.format),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let lines = summary(&path, &Config::default());

        assert!(lines[1].ends_with("(not found, using defaults)"));
        assert_eq!(lines[3], "  Timeout: 30s");
        assert_eq!(lines[5], "  Defaults: 1 year / Partial Upfront / Asia Pacific (Tokyo)");
    }
}
