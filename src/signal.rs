//! Single-tone test signals and the tone schedule of a sweep.

use core::f64::consts::PI;

use crate::layout::{Domain, Layout};

/// One test case: a plan geometry, the spectrum path under test and the tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestCase {
    pub len: usize,
    pub domain: Domain,
    pub path: Layout,
    /// Bin the tone is placed on.
    pub bin: usize,
    /// Position of the tone in the schedule; selects amplitude and phase.
    pub iteration: usize,
}

impl TestCase {
    pub fn tone(&self) -> Tone {
        Tone::new(self.len, self.bin, self.iteration)
    }

    /// Whether the tone sits on bin 0 or bin `len / 2`. In the real domain
    /// these bins carry no imaginary part; in both domains their phase is
    /// not checked.
    pub fn is_edge_bin(&self) -> bool {
        self.bin == 0 || self.bin == self.len / 2
    }
}

impl core::fmt::Display for TestCase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} fft {} ({}) bin {}",
            self.domain.tag(),
            self.len,
            self.path,
            self.bin
        )
    }
}

/// Parameters of a pure sinusoid placed exactly on a bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Peak amplitude, alternating between unity and a non-unity gain.
    pub amplitude: f32,
    /// Normalized frequency in cycles per sample, in `[-0.5, 0.5)`.
    pub frequency: f64,
    /// Phase advance per sample, folded into `[0, 2π)`.
    pub phase_step: f64,
    /// Phase of the first sample in radians.
    pub phase0: f64,
}

impl Tone {
    /// Tone for `bin` of an `len` point transform at schedule position
    /// `iteration`.
    ///
    /// Every third tone has unit amplitude, the rest 1.1. The start phase
    /// cycles through 0°, 22.5°, 45° and 67.5°; it stays below 90° so the
    /// expected phase needs no unwrapping.
    pub fn new(len: usize, bin: usize, iteration: usize) -> Self {
        let amplitude = if iteration % 3 == 0 { 1.0 } else { 1.1 };
        let n = len as f64;
        let frequency = if bin < len / 2 {
            bin as f64 / n
        } else {
            (bin as f64 - n) / n
        };
        let mut phase_step = 2.0 * PI * frequency;
        if phase_step < 0.0 {
            phase_step += 2.0 * PI;
        }
        let phase0 = (iteration % 4) as f64 * 0.125 * PI;
        Self {
            amplitude,
            frequency,
            phase_step,
            phase0,
        }
    }
}

/// Fill `out` with `tone` for a transform of `len` points over `domain`.
///
/// The running phase is wrapped back into `[-π, π)` after every step so it
/// keeps full precision over long signals.
///
/// # Panics
/// Panics if `out` is shorter than `domain.float_len(len)`.
pub fn synthesize(tone: &Tone, len: usize, domain: Domain, out: &mut [f32]) {
    let out = &mut out[..domain.float_len(len)];
    let mut phase = tone.phase0;
    for j in 0..len {
        match domain {
            Domain::Complex => {
                out[2 * j] = tone.amplitude * libm::cos(phase) as f32;
                out[2 * j + 1] = tone.amplitude * libm::sin(phase) as f32;
            }
            Domain::Real => out[j] = tone.amplitude * libm::cos(phase) as f32,
        }
        phase += tone.phase_step;
        if phase >= PI {
            phase -= 2.0 * PI;
        }
    }
}

/// Tone bins visited for one configuration: `0, step, 2*step, ...` over the
/// independent bins of the domain (`0..len` complex, `0..=len/2` real).
pub fn tone_bins(len: usize, domain: Domain, step: usize) -> impl Iterator<Item = usize> {
    (0..domain.bin_count(len)).step_by(step.max(1))
}

/// All test cases of one configuration, in schedule order.
pub fn schedule(
    len: usize,
    domain: Domain,
    path: Layout,
    step: usize,
) -> impl Iterator<Item = TestCase> {
    tone_bins(len, domain, step)
        .enumerate()
        .map(move |(iteration, bin)| TestCase {
            len,
            domain,
            path,
            bin,
            iteration,
        })
}
