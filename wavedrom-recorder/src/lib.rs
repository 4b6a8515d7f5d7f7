//! WaveDrom Recorder Library
//!
//! Converts per-cycle bus signal snapshots into a run-length encoded
//! waveform description following the WaveDrom timing-diagram JSON schema.
//!
//! # Architecture
//!
//! - A `SignalSet` (or any `Protocol`) names the clock, the control signals
//!   and the data signals, with one validity predicate per data signal
//! - `WaveformRecorder::record` is fed one `Snapshot` per clock cycle
//! - `WaveformRecorder::to_waveform` emits the `{"signal": [...]}` document
//!
//! The library does NOT:
//! - Parse simulator trace files (VCD, FST)
//! - Render diagrams
//! - Ship definitions of concrete bus protocols
//!
//! Loading traces and writing JSON files is done by the application layer
//! (wavedrom-cli).
//!
//! # Example Usage
//!
//! ```
//! use wavedrom_recorder::{
//!     ProtocolSpec, RecorderConfig, Snapshot, ValidityCondition, WaveformRecorder,
//! };
//!
//! let apb = ProtocolSpec::new("apb", "PCLK")
//!     .add_control("PSEL")
//!     .add_control("PENABLE")
//!     .add_data(
//!         "PRDATA",
//!         ValidityCondition::Equals { signal: "PREADY".to_string(), value: 1 },
//!     );
//!
//! let mut recorder = WaveformRecorder::from_protocol(&apb, RecorderConfig::new()).unwrap();
//! recorder.record(&Snapshot::new().with("PSEL", 1)).unwrap();
//! recorder
//!     .record(&Snapshot::new().with("PSEL", 1).with("PENABLE", 1).with("PREADY", 1).with("PRDATA", 0x42))
//!     .unwrap();
//!
//! println!("{}", recorder.to_json().unwrap());
//! ```

// Public modules
pub mod config;
pub mod protocol;
pub mod recorder;
pub mod signals;
pub mod types;

// Re-export main types for convenience
pub use config::{ClockPolicy, HexCase, RecorderConfig};
pub use protocol::{DataSignalSpec, Protocol, ProtocolSpec, ValidityCondition};
pub use recorder::{WaveformRecorder, PLACEHOLDER_SIGNAL, PLACEHOLDER_VALUE};
pub use signals::{always_valid, strobe, SignalSet, ValidityPredicate};
pub use types::{RecorderError, Result, SignalId, Snapshot, WaveEntry, Waveform};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
