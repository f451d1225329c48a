use fft_oracle::analyze::{bin_power, power_to_db, scan_powers, spectrum_bin};
use fft_oracle::signal::{synthesize, Tone};
use fft_oracle::{Domain, Layout, OracleError, RustFftEngine, TransformAdapter, TransformEngine};

/// Ordered spectrum of the tone at `bin`/`iteration`.
fn tone_spectrum(len: usize, domain: Domain, bin: usize, iteration: usize) -> fft_oracle::Spectrum {
    let mut engine = RustFftEngine::new();
    let plan = engine.plan(len, domain).unwrap();
    let adapter = TransformAdapter::new(&engine, plan);
    let mut work = adapter.make_work();
    let mut signal = vec![0.0f32; domain.float_len(len)];
    synthesize(&Tone::new(len, bin, iteration), len, domain, &mut signal);
    let mut ordered = adapter.spectrum(Layout::Ordered);
    adapter
        .forward_ordered(&signal, &mut ordered, &mut work)
        .unwrap();
    ordered
}

#[test]
fn complex_tone_concentrates_at_its_bin() {
    let spectrum = tone_spectrum(64, Domain::Complex, 4, 0);
    let scan = scan_powers(&spectrum, 4, |_, _| Ok(())).unwrap();
    assert!((scan.carrier_power.sqrt() / 64.0 - 1.0).abs() < 1e-6);
    assert!(scan.dynamic_range_db() >= 140.0);
    let (other, _) = scan.loudest_other.unwrap();
    assert_ne!(other, 4);
}

#[test]
fn negative_frequency_lands_in_upper_half() {
    let spectrum = tone_spectrum(64, Domain::Complex, 48, 12);
    let scan = scan_powers(&spectrum, 48, |_, _| Ok(())).unwrap();
    assert!((scan.carrier_power.sqrt() / 64.0 - 1.0).abs() < 1e-6);
    assert!(bin_power(&spectrum, 16).unwrap() < 1e-9);
}

#[test]
fn real_nyquist_is_read_from_cell_one() {
    let spectrum = tone_spectrum(32, Domain::Real, 16, 8);
    let cells = spectrum.as_slice();
    assert_eq!(cells.len(), 32);
    assert!((f64::from(cells[1]) / 32.0 - 1.1).abs() < 1e-6);
    let nyquist = spectrum_bin(&spectrum, 16).unwrap();
    assert_eq!(nyquist.im, 0.0);
    assert_eq!(nyquist.re, f64::from(cells[1]));
    assert!((bin_power(&spectrum, 16).unwrap().sqrt() / 32.0 - 1.1).abs() < 1e-6);
}

#[test]
fn real_dc_is_read_from_cell_zero() {
    let spectrum = tone_spectrum(32, Domain::Real, 0, 0);
    let dc = spectrum_bin(&spectrum, 0).unwrap();
    assert!((dc.re / 32.0 - 1.0).abs() < 1e-6);
    assert_eq!(dc.im, 0.0);
}

#[test]
fn real_interior_tone_has_half_amplitude() {
    let spectrum = tone_spectrum(128, Domain::Real, 24, 3);
    let value = spectrum_bin(&spectrum, 24).unwrap();
    let mag = value.power().sqrt() / 128.0;
    assert!((mag - 0.5).abs() < 1e-6, "mag = {mag}");
    let phase_deg = value.phase().to_degrees();
    assert!((phase_deg - 67.5).abs() < 1e-4, "phase = {phase_deg}");
}

#[test]
fn scan_visits_every_bin_once() {
    let spectrum = tone_spectrum(64, Domain::Real, 8, 2);
    let mut seen = Vec::new();
    scan_powers(&spectrum, 8, |bin, power| {
        seen.push(bin);
        assert!(power >= 0.0);
        Ok(())
    })
    .unwrap();
    assert_eq!(seen, (0..33).collect::<Vec<_>>());
}

#[test]
fn scan_stops_on_callback_error() {
    let spectrum = tone_spectrum(32, Domain::Complex, 2, 1);
    let mut visited = 0;
    let err = scan_powers(&spectrum, 2, |_, _| {
        visited += 1;
        Err(OracleError::Engine("stop".into()))
    })
    .unwrap_err();
    assert_eq!(visited, 1);
    assert!(matches!(err, OracleError::Engine(_)));
}

#[test]
fn decibels_are_monotonic_above_the_floor() {
    let levels = [1e-30, 1e-20, 1e-3, 1.0, 4096.0];
    let db: Vec<f64> = levels.iter().map(|&p| power_to_db(p)).collect();
    assert!(db.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(power_to_db(1e-40), power_to_db(0.0));
}
