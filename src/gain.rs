// Copyright (C) 2026 Patrick Stephansen
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Decibel/linear gain conversion with a fixed noise floor.
//!
//! Everything at or below -90 dB is treated as silence: `db_to_coefficient`
//! clamps to a coefficient of zero and `coefficient_to_db` clamps to -90 dB.

/// The noise floor. Levels at or below this are considered silence.
pub const MINIMUM_DB: f32 = -90.0;

/// Linear amplitude corresponding to the -90 dB noise floor.
pub const MINIMUM_AMPLITUDE: f32 = 3.1623e-5;

/// Converts a gain in decibels to a linear coefficient.
/// Returns 0.0 at or below the noise floor.
pub fn db_to_coefficient(db: f32) -> f32 {
    if db <= MINIMUM_DB {
        0.0
    } else {
        10.0f32.powf(db / 20.0)
    }
}

/// Converts a linear amplitude to decibels, using the absolute value so
/// negative-going samples measure the same as positive-going ones.
/// Returns -90.0 at or below the noise floor, including for 0.0.
pub fn coefficient_to_db(amplitude: f32) -> f32 {
    let amplitude = amplitude.abs();
    if amplitude <= MINIMUM_AMPLITUDE {
        MINIMUM_DB
    } else {
        20.0 * amplitude.log10()
    }
}
