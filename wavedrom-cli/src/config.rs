//! Configuration loading and parsing

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use wavedrom_recorder::{ProtocolSpec, RecorderConfig};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub protocol: ProtocolSpec,
    #[serde(default)]
    pub recorder: RecorderConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    /// Trace file, used when `--trace` is not given
    pub trace: Option<PathBuf>,
    /// Stop after this many cycles
    pub max_cycles: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Output file, stdout when unset
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub pretty: bool,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wavedrom_recorder::{ClockPolicy, HexCase, ValidityCondition};

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [protocol]
            name = "apb"
            clock = "PCLK"
            controls = ["PSEL", "PENABLE", "PWRITE"]

            [[protocol.data]]
            name = "PWDATA"
            valid = { equals = { signal = "PWRITE", value = 1 } }

            [[protocol.data]]
            name = "PRDATA"
            valid = { all = [{ equals = { signal = "PREADY", value = 1 } }, { not_equals = { signal = "PWRITE", value = 1 } }] }

            [recorder]
            clock_policy = "alternating"
            hex_case = "upper"

            [output]
            pretty = true
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.protocol.clock, "PCLK");
        assert_eq!(config.protocol.controls.len(), 3);
        assert_eq!(config.protocol.data.len(), 2);
        assert_eq!(
            config.protocol.data[0].valid,
            ValidityCondition::Equals { signal: "PWRITE".to_string(), value: 1 }
        );
        assert!(matches!(config.protocol.data[1].valid, ValidityCondition::All(ref c) if c.len() == 2));
        assert_eq!(config.recorder.clock_policy, ClockPolicy::Alternating);
        assert_eq!(config.recorder.hex_case, HexCase::Upper);
        assert!(config.output.pretty);
        assert!(config.input.trace.is_none());
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let toml_content = r#"
            [protocol]
            clock = "CLK"
            data = [{ name = "D", valid = "always" }]
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.recorder, RecorderConfig::default());
        assert!(!config.output.pretty);
        assert_eq!(config.protocol.data[0].valid, ValidityCondition::Always);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[protocol]\nclock = \"HCLK\"\ncontrols = [\"HTRANS\"]").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.protocol.clock, "HCLK");
        assert_eq!(config.protocol.controls, vec!["HTRANS"]);
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("does-not-exist.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
