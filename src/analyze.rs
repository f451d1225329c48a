//! Per-bin power extraction from ordered spectra.

use crate::error::OracleError;
use crate::layout::{Domain, Layout, Spectrum};

/// Floor applied before converting power to decibels.
pub const POWER_FLOOR: f64 = 1e-30;

/// Complex value of one bin, widened to `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinValue {
    pub re: f64,
    pub im: f64,
}

impl BinValue {
    pub fn power(&self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    pub fn phase(&self) -> f64 {
        libm::atan2(self.im, self.re)
    }
}

/// Read bin `bin` from ordered cells of a `len` point transform.
///
/// Real-domain spectra store DC in cell 0 and Nyquist in cell 1, both
/// without an imaginary part; bin `k` otherwise occupies cells `2k, 2k+1`.
pub fn bin_value(
    cells: &[f32],
    len: usize,
    domain: Domain,
    bin: usize,
) -> Result<BinValue, OracleError> {
    let bins = domain.bin_count(len);
    if bin >= bins {
        return Err(OracleError::BinOutOfRange { bin, bins });
    }
    let expected = domain.float_len(len);
    if cells.len() != expected {
        return Err(OracleError::BufferLength {
            expected,
            actual: cells.len(),
        });
    }
    let value = match domain {
        Domain::Real if bin == 0 => BinValue {
            re: f64::from(cells[0]),
            im: 0.0,
        },
        Domain::Real if bin == len / 2 => BinValue {
            re: f64::from(cells[1]),
            im: 0.0,
        },
        _ => BinValue {
            re: f64::from(cells[2 * bin]),
            im: f64::from(cells[2 * bin + 1]),
        },
    };
    Ok(value)
}

/// Power `re² + im²` of one bin of an ordered spectrum.
pub fn bin_power(spectrum: &Spectrum, bin: usize) -> Result<f64, OracleError> {
    Ok(spectrum_bin(spectrum, bin)?.power())
}

/// Value of one bin of an ordered spectrum.
pub fn spectrum_bin(spectrum: &Spectrum, bin: usize) -> Result<BinValue, OracleError> {
    spectrum.expect_layout(Layout::Ordered)?;
    bin_value(spectrum.as_slice(), spectrum.len(), spectrum.domain(), bin)
}

/// `10·log10(power)` with a floor so silent bins stay finite.
pub fn power_to_db(power: f64) -> f64 {
    10.0 * libm::log10(power.max(POWER_FLOOR))
}

/// Carrier power and the strongest competitor found by [`scan_powers`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerScan {
    pub carrier_bin: usize,
    pub carrier_power: f64,
    /// Loudest bin other than the carrier with its power.
    pub loudest_other: Option<(usize, f64)>,
}

impl PowerScan {
    /// Carrier level minus the loudest other bin, in dB.
    pub fn dynamic_range_db(&self) -> f64 {
        let other = self.loudest_other.map_or(0.0, |(_, p)| p);
        power_to_db(self.carrier_power) - power_to_db(other)
    }
}

/// Visit every bin of an ordered spectrum once.
///
/// `on_bin` sees each `(bin, power)` in ascending order, which the harness
/// uses for the per-bin dump.
pub fn scan_powers<F>(
    spectrum: &Spectrum,
    carrier_bin: usize,
    mut on_bin: F,
) -> Result<PowerScan, OracleError>
where
    F: FnMut(usize, f64) -> Result<(), OracleError>,
{
    let mut carrier_power = 0.0;
    let mut loudest_other: Option<(usize, f64)> = None;
    for bin in 0..spectrum.bin_count() {
        let power = bin_power(spectrum, bin)?;
        on_bin(bin, power)?;
        if bin == carrier_bin {
            carrier_power = power;
        } else if loudest_other.map_or(true, |(_, p)| power > p) {
            loudest_other = Some((bin, power));
        }
    }
    Ok(PowerScan {
        carrier_bin,
        carrier_power,
        loudest_other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_floor_avoids_negative_infinity() {
        assert!((power_to_db(0.0) + 300.0).abs() < 1e-9);
        assert!(power_to_db(-1.0).is_finite());
        assert!((power_to_db(100.0) - 20.0).abs() < 1e-12);
    }

    #[test]
    fn real_edge_bins_use_their_reserved_cells() {
        let mut cells = vec![0.0f32; 8];
        cells[0] = 3.0;
        cells[1] = -2.0;
        cells[2] = 1.0;
        cells[3] = 1.0;
        assert_eq!(bin_value(&cells, 8, Domain::Real, 0).unwrap().power(), 9.0);
        assert_eq!(bin_value(&cells, 8, Domain::Real, 4).unwrap().power(), 4.0);
        assert_eq!(bin_value(&cells, 8, Domain::Real, 1).unwrap().power(), 2.0);
        assert!(bin_value(&cells, 8, Domain::Real, 5).is_err());
    }

    #[test]
    fn packed_spectra_cannot_be_read() {
        let spectrum = Spectrum::zeroed(16, Domain::Complex, Layout::Packed);
        assert!(matches!(
            bin_power(&spectrum, 1),
            Err(OracleError::LayoutMismatch { .. })
        ));
    }
}
