//! Waveform recorder
//!
//! Turns one snapshot per clock cycle into WaveDrom wave strings. Each call to
//! `record` appends exactly one token to every lane:
//!
//! - clock: `P` (or `P`/`.` with `ClockPolicy::Alternating`)
//! - control: the decimal value when it changed, `.` otherwise
//! - data: `=` for a new valid value (its label goes to the `data` list),
//!   `x` when the value becomes invalid, `.` while nothing changes

use crate::config::RecorderConfig;
use crate::protocol::Protocol;
use crate::signals::SignalSet;
use crate::types::{RecorderError, Result, SignalId, Snapshot, WaveEntry, Waveform};

/// Data signal whose value is treated as a "no data" placeholder
pub const PLACEHOLDER_SIGNAL: &str = "HRDATA";

/// Placeholder value of `PLACEHOLDER_SIGNAL`, always recorded as invalid
pub const PLACEHOLDER_VALUE: u64 = 0xDEAD;

/// Last committed state of a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prev {
    Value(u64),
    Invalid,
}

#[derive(Debug)]
struct ControlLane {
    wave: String,
    prev: Option<Prev>,
}

#[derive(Debug)]
struct DataLane {
    wave: String,
    labels: Vec<String>,
    prev: Option<Prev>,
}

/// Records bus snapshots into WaveDrom lanes
///
/// ```
/// use wavedrom_recorder::{always_valid, RecorderConfig, SignalSet, Snapshot, WaveformRecorder};
///
/// let signals = SignalSet::new("CLK").with_control("EN").with_data("D", always_valid());
/// let mut recorder = WaveformRecorder::new(signals, RecorderConfig::new()).unwrap();
///
/// recorder.record(&Snapshot::new().with("EN", 1).with("D", 10)).unwrap();
/// recorder.record(&Snapshot::new().with("EN", 1).with("D", 10)).unwrap();
/// recorder.record(&Snapshot::new().with("EN", 0).with("D", 20)).unwrap();
///
/// let waveform = recorder.to_waveform();
/// assert_eq!(waveform.entry("CLK").unwrap().wave, "PPP");
/// assert_eq!(waveform.entry("EN").unwrap().wave, "1.0");
/// assert_eq!(waveform.entry("D").unwrap().wave, "=.=");
/// ```
#[derive(Debug)]
pub struct WaveformRecorder {
    signals: SignalSet,
    config: RecorderConfig,
    clock_wave: String,
    controls: Vec<ControlLane>,
    data: Vec<DataLane>,
    cycle: usize,
}

impl WaveformRecorder {
    /// Create a recorder for a validated signal set
    pub fn new(signals: SignalSet, config: RecorderConfig) -> Result<Self> {
        signals.validate()?;

        log::debug!(
            "Recorder for clock '{}': {} control, {} data signals ({} clock, {} hex)",
            signals.clock(),
            signals.controls().len(),
            signals.data().len(),
            config.clock_policy,
            config.hex_case
        );

        let controls = signals
            .controls()
            .iter()
            .map(|_| ControlLane {
                wave: String::new(),
                prev: None,
            })
            .collect();
        let data = signals
            .data()
            .iter()
            .map(|_| DataLane {
                wave: String::new(),
                labels: Vec::new(),
                prev: None,
            })
            .collect();

        Ok(Self {
            signals,
            config,
            clock_wave: String::new(),
            controls,
            data,
            cycle: 0,
        })
    }

    /// Create a recorder for the signals a protocol declares
    pub fn from_protocol(protocol: &dyn Protocol, config: RecorderConfig) -> Result<Self> {
        log::debug!("Building recorder for protocol '{}'", protocol.name());
        Self::new(SignalSet::from_protocol(protocol)?, config)
    }

    /// Append one cycle to every lane
    ///
    /// Must be called once per clock cycle, in cycle order. Without strict
    /// mode this never fails; signals missing from the snapshot read as 0.
    pub fn record(&mut self, snapshot: &Snapshot) -> Result<()> {
        if self.config.strict {
            self.check_snapshot(snapshot)?;
        }

        self.clock_wave.push(self.config.clock_policy.token(self.cycle));

        for (signal, lane) in self.signals.controls().iter().zip(self.controls.iter_mut()) {
            let value = snapshot.get(signal);
            if lane.prev == Some(Prev::Value(value)) {
                lane.wave.push('.');
            } else {
                lane.wave.push_str(&value.to_string());
                lane.prev = Some(Prev::Value(value));
            }
        }

        for (signal, lane) in self.signals.data().iter().zip(self.data.iter_mut()) {
            let value = snapshot.get(signal);
            let mut is_valid = self.signals.is_valid(signal, snapshot);

            if is_valid && signal == PLACEHOLDER_SIGNAL && value == PLACEHOLDER_VALUE {
                log::debug!(
                    "{} carries placeholder {:#x} at cycle {}, recording as invalid",
                    signal,
                    value,
                    self.cycle
                );
                is_valid = false;
            }

            if !is_valid {
                if lane.prev == Some(Prev::Invalid) {
                    lane.wave.push('.');
                } else {
                    lane.wave.push('x');
                    lane.prev = Some(Prev::Invalid);
                }
            } else if lane.prev == Some(Prev::Value(value)) {
                lane.wave.push('.');
            } else {
                lane.wave.push('=');
                lane.labels.push(self.config.hex_case.format(value));
                lane.prev = Some(Prev::Value(value));
            }
        }

        log::trace!("Recorded cycle {}", self.cycle);
        self.cycle += 1;
        Ok(())
    }

    /// Record a sequence of snapshots, stopping at the first error
    pub fn record_all<'a, I>(&mut self, snapshots: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Snapshot>,
    {
        for snapshot in snapshots {
            self.record(snapshot)?;
        }
        Ok(())
    }

    /// Assemble the WaveDrom document: clock, then controls, then data lanes
    pub fn to_waveform(&self) -> Waveform {
        let mut signal = Vec::with_capacity(1 + self.controls.len() + self.data.len());

        signal.push(WaveEntry::new(self.signals.clock(), self.clock_wave.clone()));

        for (name, lane) in self.signals.controls().iter().zip(&self.controls) {
            signal.push(WaveEntry::new(name.clone(), lane.wave.clone()));
        }

        for (name, lane) in self.signals.data().iter().zip(&self.data) {
            signal.push(WaveEntry::with_data(
                name.clone(),
                lane.wave.clone(),
                lane.labels.clone(),
            ));
        }

        Waveform { signal }
    }

    /// `to_waveform()` rendered as compact JSON
    pub fn to_json(&self) -> Result<String> {
        self.to_waveform().to_json()
    }

    /// `to_waveform()` rendered as indented JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        self.to_waveform().to_json_pretty()
    }

    /// Number of cycles recorded so far
    pub fn cycles(&self) -> usize {
        self.cycle
    }

    pub fn signal_set(&self) -> &SignalSet {
        &self.signals
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Strict mode: every control and data signal must be present
    fn check_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        let missing = self
            .signals
            .controls()
            .iter()
            .chain(self.signals.data())
            .find(|signal| !snapshot.contains(signal));

        match missing {
            Some(signal) => Err(RecorderError::UnknownSignal {
                signal: SignalId::clone(signal),
                cycle: self.cycle,
            }),
            None => Ok(()),
        }
    }
}
