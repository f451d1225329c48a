//! # fft-oracle - single-tone correctness oracle for FFT engines
//!
//! The crate does not compute transforms itself. It drives an engine through
//! the [`engine::TransformEngine`] boundary and judges the results with
//! known single-tone signals.
//!
//! ## How a case is judged
//!
//! For every transform length (powers of two), input domain (real or
//! complex) and spectrum path (ordered output, or packed output followed by
//! a reorder) the harness places pure tones on a coarse grid of bins and
//! checks:
//!
//! - **Dynamic range**: the tone bin stands at least 140 dB above every other bin.
//! - **Phase**: the tone bin's phase matches the injected start phase within 1e-4°.
//! - **Magnitude**: the normalized tone magnitude matches within 1e-6.
//! - **Round trip**: `inverse(forward(x)) / N` reproduces `x` within `N·1e-7`.
//! - **Layout consistency**: the packed path agrees with the ordered one.
//!
//! ## Example
//!
//! ```no_run
//! use fft_oracle::{Harness, RustFftEngine, SweepConfig};
//!
//! let config = SweepConfig {
//!     max_len: 1024,
//!     ..SweepConfig::default()
//! };
//! let mut harness = Harness::new(RustFftEngine::new(), config, std::io::stdout());
//! let outcome = harness.run()?;
//! assert!(!outcome.failed());
//! # Ok::<(), fft_oracle::OracleError>(())
//! ```
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or https://www.apache.org/licenses/LICENSE-2.0)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or https://opensource.org/licenses/MIT)
//!
//! at your option.

/// Transform adapter normalizing the engine's operations.
pub mod adapter;

/// Per-bin power extraction and decibel conversion.
pub mod analyze;

/// Dynamic range, phase, magnitude, round-trip and layout checks.
pub mod checks;

/// Sweep bounds and acceptance thresholds.
pub mod config;

/// Transform engine boundary and the bundled `rustfft` engine.
pub mod engine;

/// Crate error type.
pub mod error;

/// Domains, layouts and the spectrum buffer type.
pub mod layout;

/// Tone synthesis and tone schedules.
pub mod signal;

/// Sweep driver and result aggregation.
pub mod sweep;

pub use adapter::TransformAdapter;
pub use config::{SweepConfig, Thresholds};
pub use engine::{RustFftEngine, TransformEngine, TransformPlan};
pub use error::OracleError;
pub use layout::{Direction, Domain, Layout, Spectrum};
pub use sweep::{CaseOutcome, ConfigOutcome, Harness, SizeOutcome, SweepOutcome};
