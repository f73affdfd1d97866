//! Config command implementation.
//!
//! Generates configuration files in various formats.

use anyhow::{anyhow, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{config_to_string, Config};

/// Generates configuration files.
pub fn command_config(output: Option<PathBuf>, format: ConfigFormat, commented: bool) -> Result<()> {
    let config = Config::default();
    let output = match output {
        Some(path) => path,
        None => PathBuf::from("pcstat.yaml"),
    };

    let mut content = config_to_string(&config, &format).map_err(|e| anyhow!("{}", e))?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# pcstat Configuration
# =====================
#
# Presentation
# ------------
# format: text                 # text, unicode, plain, terse, json, histogram
# no_header: false             # Omit header lines (--nohdr)
# basename: false              # Show file basenames only (--bname)
# sort: false                  # Sort by cached pages, descending (--sort)
# per_page_status: false       # Include pp_stat bitmap in JSON (--pps)
# columns: null                # Histogram width (null = query the terminal)
#
# Probing
# -------
# parallelism: null            # Threads for probing (null/1 = sequential, 0 = auto)
# require_namespace: false     # Abort if the mount namespace of --pid cannot be entered
#
# Logging
# -------
# log_level: "warn"            # off, error, warn, info, debug, trace (stderr)
"#;

    format!("{comments}\n{yaml}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commented_yaml_still_parses() {
        let yaml = config_to_string(&Config::default(), &ConfigFormat::Yaml).unwrap();
        let commented = add_config_comments(yaml);
        assert!(commented.starts_with("# pcstat Configuration"));

        let back: Config = serde_yaml::from_str(&commented).unwrap();
        assert_eq!(back, Config::default());
    }

    #[test]
    fn test_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.toml");
        command_config(Some(path.clone()), ConfigFormat::Toml, false).unwrap();

        let back: Config = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, Config::default());
    }
}
