//! Signal declarations consumed by the recorder
//!
//! A `SignalSet` names the clock, the control signals and the data signals of
//! a bus, and carries one validity predicate per data signal.

use crate::protocol::Protocol;
use crate::types::{RecorderError, Result, SignalId, Snapshot};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Decides whether a data signal carries a meaningful value in a snapshot
pub type ValidityPredicate = Box<dyn Fn(&Snapshot) -> bool + Send + Sync>;

/// Validity predicate that accepts every snapshot
pub fn always_valid() -> ValidityPredicate {
    Box::new(|_| true)
}

/// Validity predicate that holds while `strobe` equals `value`
pub fn strobe(signal: impl Into<SignalId>, value: u64) -> ValidityPredicate {
    let signal = signal.into();
    Box::new(move |snapshot| snapshot.get(&signal) == value)
}

/// Clock, control and data signals of one bus
pub struct SignalSet {
    clock: SignalId,
    controls: Vec<SignalId>,
    data: Vec<SignalId>,
    validity: HashMap<SignalId, ValidityPredicate>,
}

impl SignalSet {
    /// Declare a signal set with no data signals yet
    pub fn new(clock: impl Into<SignalId>) -> Self {
        Self {
            clock: clock.into(),
            controls: Vec::new(),
            data: Vec::new(),
            validity: HashMap::new(),
        }
    }

    /// Builder method: add a control signal
    pub fn with_control(mut self, signal: impl Into<SignalId>) -> Self {
        self.controls.push(signal.into());
        self
    }

    /// Builder method: add several control signals in order
    pub fn with_controls<I, S>(mut self, signals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SignalId>,
    {
        self.controls.extend(signals.into_iter().map(Into::into));
        self
    }

    /// Builder method: add a data signal with its validity predicate
    pub fn with_data(mut self, signal: impl Into<SignalId>, predicate: ValidityPredicate) -> Self {
        let signal = signal.into();
        self.validity.insert(signal.clone(), predicate);
        self.data.push(signal);
        self
    }

    /// Collect the signal declarations offered by a protocol
    pub fn from_protocol(protocol: &dyn Protocol) -> Result<Self> {
        let mut set = Self::new(protocol.clock_signal()).with_controls(protocol.control_signals());

        for signal in protocol.data_signals() {
            let predicate = protocol.validity_predicate(&signal).ok_or_else(|| {
                RecorderError::ConfigError(format!(
                    "protocol '{}' has no validity predicate for data signal '{}'",
                    protocol.name(),
                    signal
                ))
            })?;
            set = set.with_data(signal, predicate);
        }

        Ok(set)
    }

    pub fn clock(&self) -> &str {
        &self.clock
    }

    pub fn controls(&self) -> &[SignalId] {
        &self.controls
    }

    pub fn data(&self) -> &[SignalId] {
        &self.data
    }

    /// Evaluate the validity predicate of a data signal
    ///
    /// Signals without a predicate are reported invalid; `validate` rejects
    /// such sets before they reach a recorder.
    pub fn is_valid(&self, signal: &str, snapshot: &Snapshot) -> bool {
        self.validity
            .get(signal)
            .map(|predicate| predicate(snapshot))
            .unwrap_or(false)
    }

    /// Check that the declarations are usable
    ///
    /// Names must be non-empty and unique across clock, controls and data, and
    /// every data signal needs a validity predicate.
    pub fn validate(&self) -> Result<()> {
        if self.clock.is_empty() {
            return Err(RecorderError::ConfigError("clock signal name is empty".to_string()));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(&self.clock);

        let categories = [("control", &self.controls), ("data", &self.data)];
        for (category, signals) in categories {
            for signal in signals.iter() {
                if signal.is_empty() {
                    return Err(RecorderError::ConfigError(format!(
                        "empty {} signal name",
                        category
                    )));
                }
                if !seen.insert(signal) {
                    return Err(RecorderError::ConfigError(format!(
                        "{} signal '{}' is declared more than once",
                        category, signal
                    )));
                }
            }
        }

        if let Some(missing) = self.data.iter().find(|s| !self.validity.contains_key(*s)) {
            return Err(RecorderError::ConfigError(format!(
                "data signal '{}' has no validity predicate",
                missing
            )));
        }

        Ok(())
    }
}

impl fmt::Debug for SignalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalSet")
            .field("clock", &self.clock)
            .field("controls", &self.controls)
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apb() -> SignalSet {
        SignalSet::new("PCLK")
            .with_controls(["PSEL", "PENABLE", "PWRITE"])
            .with_data("PWDATA", strobe("PWRITE", 1))
            .with_data("PRDATA", strobe("PREADY", 1))
    }

    #[test]
    fn test_builder_keeps_order() {
        let set = apb();
        assert_eq!(set.clock(), "PCLK");
        assert_eq!(set.controls(), ["PSEL", "PENABLE", "PWRITE"]);
        assert_eq!(set.data(), ["PWDATA", "PRDATA"]);
        assert!(set.validate().is_ok());
    }

    #[test]
    fn test_predicates() {
        let set = apb();
        let snapshot = Snapshot::new().with("PWRITE", 1);
        assert!(set.is_valid("PWDATA", &snapshot));
        assert!(!set.is_valid("PRDATA", &snapshot));
        assert!(!set.is_valid("UNKNOWN", &snapshot));
    }

    #[test]
    fn test_duplicate_control_rejected() {
        let set = SignalSet::new("CLK").with_controls(["EN", "EN"]);
        let err = set.validate().unwrap_err();
        assert!(matches!(err, RecorderError::ConfigError(_)));
        assert!(err.to_string().contains("'EN'"));
    }

    #[test]
    fn test_duplicate_data_rejected() {
        let set = SignalSet::new("CLK")
            .with_data("D", always_valid())
            .with_data("D", always_valid());
        assert!(set.validate().is_err());
    }

    #[test]
    fn test_cross_category_and_clock_clash_rejected() {
        let set = SignalSet::new("CLK").with_control("D").with_data("D", always_valid());
        assert!(set.validate().is_err());

        let set = SignalSet::new("CLK").with_control("CLK");
        assert!(set.validate().is_err());
    }

    #[test]
    fn test_empty_names_rejected() {
        assert!(SignalSet::new("").validate().is_err());
        assert!(SignalSet::new("CLK").with_control("").validate().is_err());
    }
}
