//! Core types for the WaveDrom recorder library
//!
//! This module defines the per-cycle input (`Snapshot`), the emitted
//! WaveDrom document (`Waveform`) and the error type shared by the crate.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier of a bus signal (e.g. "PCLK", "HRDATA")
pub type SignalId = String;

/// Result type for recorder operations
pub type Result<T> = std::result::Result<T, RecorderError>;

/// Errors that can occur while setting up or driving a recorder
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("Invalid signal configuration: {0}")]
    ConfigError(String),

    #[error("Signal '{signal}' missing from snapshot at cycle {cycle}")]
    UnknownSignal { signal: SignalId, cycle: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Signal values for one simulated clock cycle
///
/// Lookups of signals that are not present yield 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    values: HashMap<SignalId, u64>,
}

impl Snapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set a signal value
    pub fn with(mut self, signal: impl Into<SignalId>, value: u64) -> Self {
        self.insert(signal, value);
        self
    }

    /// Set a signal value, replacing any previous one
    pub fn insert(&mut self, signal: impl Into<SignalId>, value: u64) {
        self.values.insert(signal.into(), value);
    }

    /// Value of `signal`, or 0 when the snapshot does not carry it
    pub fn get(&self, signal: &str) -> u64 {
        self.values.get(signal).copied().unwrap_or(0)
    }

    /// True if the snapshot explicitly carries `signal`
    pub fn contains(&self, signal: &str) -> bool {
        self.values.contains_key(signal)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<SignalId>> FromIterator<(K, u64)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (K, u64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// One lane of a WaveDrom diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveEntry {
    /// Signal name shown on the diagram
    pub name: SignalId,
    /// Encoded wave, one character per cycle
    pub wave: String,
    /// Labels for the `=` tokens of a data lane (absent for clock/control lanes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<String>>,
}

impl WaveEntry {
    /// Clock or control lane
    pub fn new(name: impl Into<SignalId>, wave: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wave: wave.into(),
            data: None,
        }
    }

    /// Data lane with value labels
    pub fn with_data(name: impl Into<SignalId>, wave: impl Into<String>, data: Vec<String>) -> Self {
        Self {
            name: name.into(),
            wave: wave.into(),
            data: Some(data),
        }
    }

    pub fn is_data(&self) -> bool {
        self.data.is_some()
    }
}

/// A WaveDrom document: `{"signal": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waveform {
    pub signal: Vec<WaveEntry>,
}

impl Waveform {
    /// Look up a lane by signal name
    pub fn entry(&self, name: &str) -> Option<&WaveEntry> {
        self.signal.iter().find(|e| e.name == name)
    }

    /// Render as compact JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Render as indented JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.signal {
            write!(f, "{:<12} {}", entry.name, entry.wave)?;
            if let Some(data) = &entry.data {
                write!(f, "  [{}]", data.join(", "))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_defaults_to_zero() {
        let snapshot = Snapshot::new().with("PSEL", 1);
        assert_eq!(snapshot.get("PSEL"), 1);
        assert_eq!(snapshot.get("PENABLE"), 0);
        assert!(snapshot.contains("PSEL"));
        assert!(!snapshot.contains("PENABLE"));
    }

    #[test]
    fn test_snapshot_from_json_object() {
        let snapshot: Snapshot = serde_json::from_str(r#"{"EN": 1, "D": 10}"#).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("D"), 10);
    }

    #[test]
    fn test_waveform_serialization() {
        let waveform = Waveform {
            signal: vec![
                WaveEntry::new("CLK", "PP"),
                WaveEntry::with_data("D", "=x", vec!["0x1".to_string()]),
            ],
        };

        let value = serde_json::to_value(&waveform).unwrap();
        assert_eq!(
            value,
            json!({
                "signal": [
                    {"name": "CLK", "wave": "PP"},
                    {"name": "D", "wave": "=x", "data": ["0x1"]}
                ]
            })
        );
    }

    #[test]
    fn test_waveform_display() {
        let waveform = Waveform {
            signal: vec![WaveEntry::with_data("D", "=.", vec!["0xa".to_string()])],
        };
        assert_eq!(format!("{}", waveform), "D            =.  [0xa]\n");
    }
}
