use fft_oracle::signal::{schedule, synthesize, tone_bins, Tone};
use fft_oracle::{Domain, Layout};

/// Exact phase of sample `j` computed with integer bin arithmetic, so it
/// never accumulates error.
fn exact_phase(len: usize, bin: usize, j: usize, phase0: f64) -> f64 {
    let cycles = (bin * j) % len;
    phase0 + 2.0 * std::f64::consts::PI * cycles as f64 / len as f64
}

#[test]
fn synthesis_is_deterministic() {
    let tone = Tone::new(256, 48, 5);
    let mut a = vec![0.0f32; 512];
    let mut b = vec![0.0f32; 512];
    synthesize(&tone, 256, Domain::Complex, &mut a);
    synthesize(&tone, 256, Domain::Complex, &mut b);
    assert_eq!(a, b);
}

#[test]
fn complex_samples_lie_on_a_circle() {
    let tone = Tone::new(128, 24, 1);
    let mut x = vec![0.0f32; 256];
    synthesize(&tone, 128, Domain::Complex, &mut x);
    for pair in x.chunks_exact(2) {
        let mag = (pair[0] * pair[0] + pair[1] * pair[1]).sqrt();
        assert!((mag - 1.1).abs() < 1e-6, "mag = {mag}");
    }
}

#[test]
fn first_sample_starts_at_phase0() {
    for m in 0..4 {
        let tone = Tone::new(64, 8, m);
        let mut x = vec![0.0f32; 64];
        synthesize(&tone, 64, Domain::Real, &mut x);
        let want = tone.amplitude * tone.phase0.cos() as f32;
        assert!((x[0] - want).abs() < 1e-6);
    }
}

#[test]
fn wrapped_phase_tracks_exact_phase_over_long_signals() {
    let len = 65536;
    let bin = 15 * len / 16;
    let tone = Tone::new(len, bin, 3);
    let mut x = vec![0.0f32; 2 * len];
    synthesize(&tone, len, Domain::Complex, &mut x);
    for j in (0..len).step_by(997) {
        let phase = exact_phase(len, bin, j, tone.phase0);
        let re = f64::from(tone.amplitude) * phase.cos();
        let im = f64::from(tone.amplitude) * phase.sin();
        assert!((f64::from(x[2 * j]) - re).abs() < 1e-6, "re at {j}");
        assert!((f64::from(x[2 * j + 1]) - im).abs() < 1e-6, "im at {j}");
    }
}

#[test]
fn nyquist_tone_alternates_sign() {
    let tone = Tone::new(32, 16, 8);
    assert_eq!(tone.amplitude, 1.1);
    assert_eq!(tone.phase0, 0.0);
    let mut x = vec![0.0f32; 32];
    synthesize(&tone, 32, Domain::Real, &mut x);
    for (j, v) in x.iter().enumerate() {
        let want = if j % 2 == 0 { 1.1 } else { -1.1 };
        assert!((v - want).abs() < 1e-6, "x[{j}] = {v}");
    }
}

#[test]
fn schedule_numbers_tones_in_order() {
    let cases: Vec<_> = schedule(64, Domain::Real, Layout::Packed, 4).collect();
    assert_eq!(cases.len(), 9);
    for (m, case) in cases.iter().enumerate() {
        assert_eq!(case.iteration, m);
        assert_eq!(case.bin, 4 * m);
        assert_eq!(case.path, Layout::Packed);
    }
    assert_eq!(tone_bins(64, Domain::Complex, 4).count(), 16);
}

#[test]
fn edge_bins_always_start_at_zero_phase() {
    for len in [32usize, 1024, 65536] {
        for domain in Domain::ALL {
            for case in schedule(len, domain, Layout::Ordered, len / 16) {
                if case.is_edge_bin() {
                    assert_eq!(case.tone().phase0, 0.0, "{case}");
                }
            }
        }
    }
}
