//! Protocol capability interface
//!
//! A protocol tells the recorder which signals make up a bus and when each
//! data signal carries a meaningful value. Concrete protocols live outside
//! this crate; `ProtocolSpec` lets users describe one declaratively (e.g. in
//! a TOML file) without writing Rust.

use crate::signals::ValidityPredicate;
use crate::types::{SignalId, Snapshot};
use serde::{Deserialize, Serialize};

/// Source of signal declarations for a recorder
pub trait Protocol {
    /// Human-readable protocol name, used in diagnostics
    fn name(&self) -> &str {
        "protocol"
    }

    /// Name of the clock signal
    fn clock_signal(&self) -> &str;

    /// Control signals, in diagram order
    fn control_signals(&self) -> Vec<SignalId>;

    /// Data signals, in diagram order
    fn data_signals(&self) -> Vec<SignalId>;

    /// Validity predicate for a data signal, `None` if the signal is unknown
    fn validity_predicate(&self, signal: &str) -> Option<ValidityPredicate>;
}

/// Condition over a snapshot deciding data validity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidityCondition {
    /// Always valid
    #[default]
    Always,
    /// Never valid
    Never,
    /// Valid while `signal == value`
    Equals { signal: SignalId, value: u64 },
    /// Valid while `signal != value`
    NotEquals { signal: SignalId, value: u64 },
    /// Valid while every nested condition holds
    All(Vec<ValidityCondition>),
    /// Valid while at least one nested condition holds
    Any(Vec<ValidityCondition>),
}

impl ValidityCondition {
    /// Evaluate the condition against one snapshot
    pub fn evaluate(&self, snapshot: &Snapshot) -> bool {
        match self {
            ValidityCondition::Always => true,
            ValidityCondition::Never => false,
            ValidityCondition::Equals { signal, value } => snapshot.get(signal) == *value,
            ValidityCondition::NotEquals { signal, value } => snapshot.get(signal) != *value,
            ValidityCondition::All(conditions) => conditions.iter().all(|c| c.evaluate(snapshot)),
            ValidityCondition::Any(conditions) => conditions.iter().any(|c| c.evaluate(snapshot)),
        }
    }

    /// Turn the condition into an owned predicate
    pub fn into_predicate(self) -> ValidityPredicate {
        Box::new(move |snapshot| self.evaluate(snapshot))
    }
}

/// A data signal together with its validity condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSignalSpec {
    pub name: SignalId,
    #[serde(default)]
    pub valid: ValidityCondition,
}

/// Declarative protocol description
///
/// ```
/// use wavedrom_recorder::ProtocolSpec;
///
/// let spec: ProtocolSpec = serde_json::from_str(r#"{
///     "name": "apb",
///     "clock": "PCLK",
///     "controls": ["PSEL", "PENABLE"],
///     "data": [{"name": "PRDATA", "valid": {"equals": {"signal": "PREADY", "value": 1}}}]
/// }"#).unwrap();
/// assert_eq!(spec.data[0].name, "PRDATA");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolSpec {
    #[serde(default = "default_name")]
    pub name: String,
    pub clock: SignalId,
    #[serde(default)]
    pub controls: Vec<SignalId>,
    #[serde(default)]
    pub data: Vec<DataSignalSpec>,
}

fn default_name() -> String {
    "custom".to_string()
}

impl ProtocolSpec {
    /// Create a protocol with only a clock
    pub fn new(name: impl Into<String>, clock: impl Into<SignalId>) -> Self {
        Self {
            name: name.into(),
            clock: clock.into(),
            controls: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Builder method: add a control signal
    pub fn add_control(mut self, signal: impl Into<SignalId>) -> Self {
        self.controls.push(signal.into());
        self
    }

    /// Builder method: add a data signal with its validity condition
    pub fn add_data(mut self, signal: impl Into<SignalId>, valid: ValidityCondition) -> Self {
        self.data.push(DataSignalSpec {
            name: signal.into(),
            valid,
        });
        self
    }
}

impl Protocol for ProtocolSpec {
    fn name(&self) -> &str {
        &self.name
    }

    fn clock_signal(&self) -> &str {
        &self.clock
    }

    fn control_signals(&self) -> Vec<SignalId> {
        self.controls.clone()
    }

    fn data_signals(&self) -> Vec<SignalId> {
        self.data.iter().map(|d| d.name.clone()).collect()
    }

    fn validity_predicate(&self, signal: &str) -> Option<ValidityPredicate> {
        self.data
            .iter()
            .find(|d| d.name == signal)
            .map(|d| d.valid.clone().into_predicate())
    }
}
