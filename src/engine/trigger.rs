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

//! Amplitude threshold detection with cool-down debouncing.

use tracing::debug;

use crate::gain;

/// An accepted hit within a block. At most one is produced per block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEvent {
    /// The first output frame affected by the hit.
    pub offset: usize,
}

/// Scans input blocks for threshold crossings and debounces them.
///
/// The only state carried across blocks is the time since the last accepted
/// hit; threshold and cool-down are supplied fresh on every scan so the host
/// can change them between blocks.
pub struct TriggerDetector {
    /// Milliseconds elapsed since the last accepted hit.
    time_since_last_hit_ms: f32,
    /// Milliseconds represented by one input sample.
    millis_per_sample: f32,
}

impl TriggerDetector {
    /// Creates a detector for the given sample rate in Hz.
    pub fn new(sample_rate: f64) -> Self {
        Self {
            // Start past any plausible cool-down so the first hit is eligible.
            time_since_last_hit_ms: f32::MAX,
            millis_per_sample: (1000.0 / sample_rate) as f32,
        }
    }

    /// Scans one block of input, returning the first accepted hit if any.
    ///
    /// Every sample advances the cool-down timer, including samples inside
    /// the cool-down window and samples after an accepted hit is found in a
    /// previous block. Within the window the level is not even measured.
    /// The timer resets only on an accepted hit; a loud sample during
    /// cool-down does not extend the window. Scanning stops at the first
    /// accepted hit so a block can cause at most one state transition.
    pub fn scan(
        &mut self,
        input: &[f32],
        threshold_db: f32,
        cool_down_ms: f32,
    ) -> Option<TriggerEvent> {
        for (position, &sample) in input.iter().enumerate() {
            self.time_since_last_hit_ms =
                saturating_add(self.time_since_last_hit_ms, self.millis_per_sample);

            if self.time_since_last_hit_ms <= cool_down_ms {
                continue;
            }

            let level_db = gain::coefficient_to_db(sample);
            if level_db > threshold_db {
                self.time_since_last_hit_ms = 0.0;
                debug!(offset = position, level_db, threshold_db, "Hit detected");
                return Some(TriggerEvent { offset: position });
            }
        }

        None
    }
}

/// Adds without overflowing to infinity once the timer has maxed out.
fn saturating_add(value: f32, increment: f32) -> f32 {
    let sum = value + increment;
    if sum.is_finite() {
        sum
    } else {
        f32::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f64 = 1000.0; // 1 sample == 1 ms, keeps timing obvious.

    #[test]
    fn test_first_hit_is_detected_at_offset() {
        let mut detector = TriggerDetector::new(SAMPLE_RATE);

        let mut input = vec![0.0f32; 64];
        input[10] = 1.0;

        let event = detector.scan(&input, -20.0, 0.0);
        assert_eq!(event, Some(TriggerEvent { offset: 10 }));
    }

    #[test]
    fn test_at_most_one_event_per_block() {
        let mut detector = TriggerDetector::new(SAMPLE_RATE);

        // Sustained loud input: every sample crosses the threshold.
        let input = vec![1.0f32; 64];
        let event = detector.scan(&input, -20.0, 0.0);
        assert_eq!(event, Some(TriggerEvent { offset: 0 }));
    }

    #[test]
    fn test_quiet_input_produces_no_event() {
        let mut detector = TriggerDetector::new(SAMPLE_RATE);

        let input = vec![0.001f32; 64]; // -60 dB
        assert_eq!(detector.scan(&input, -20.0, 0.0), None);
    }

    #[test]
    fn test_cool_down_spans_blocks() {
        let mut detector = TriggerDetector::new(SAMPLE_RATE);
        let loud = vec![1.0f32; 100]; // 100 ms per block at this rate

        // First block: hit at offset 0, timer resets.
        assert_eq!(detector.scan(&loud, -20.0, 250.0), Some(TriggerEvent { offset: 0 }));

        // 100 ms and 200 ms elapsed: still inside the 250 ms window.
        assert_eq!(detector.scan(&loud, -20.0, 250.0), None);
        assert_eq!(detector.scan(&loud, -20.0, 250.0), None);

        // Third block crosses 250 ms part-way through: the hit lands at the
        // first eligible sample, not at the block boundary.
        let event = detector.scan(&loud, -20.0, 250.0).unwrap();
        assert_eq!(event.offset, 50);
    }

    #[test]
    fn test_threshold_at_boundary_is_not_a_hit() {
        let mut detector = TriggerDetector::new(SAMPLE_RATE);

        // Exactly -20 dB: strictly-greater comparison means no hit.
        let input = vec![0.1f32; 16];
        assert_eq!(detector.scan(&input, -20.0, 0.0), None);
        // Just above the threshold is a hit.
        let input = vec![0.11f32; 16];
        assert!(detector.scan(&input, -20.0, 0.0).is_some());
    }

    #[test]
    fn test_negative_samples_trigger() {
        let mut detector = TriggerDetector::new(SAMPLE_RATE);

        let mut input = vec![0.0f32; 16];
        input[3] = -1.0;
        assert_eq!(detector.scan(&input, -20.0, 0.0), Some(TriggerEvent { offset: 3 }));
    }

    #[test]
    fn test_parameters_read_fresh_each_block() {
        let mut detector = TriggerDetector::new(SAMPLE_RATE);
        let input = vec![0.1f32; 16]; // -20 dB

        // Too quiet for a -10 dB threshold.
        assert_eq!(detector.scan(&input, -10.0, 0.0), None);
        // Lowering the threshold between blocks takes effect immediately.
        assert!(detector.scan(&input, -30.0, 0.0).is_some());
    }

    #[test]
    fn test_rejected_hits_do_not_reset_timer() {
        let mut detector = TriggerDetector::new(SAMPLE_RATE);
        let loud = vec![1.0f32; 10];

        assert!(detector.scan(&loud, -20.0, 25.0).is_some());
        // Continuous loud input inside the window is rejected but must not
        // push the window out.
        assert_eq!(detector.scan(&loud, -20.0, 25.0), None);
        assert_eq!(detector.scan(&loud, -20.0, 25.0), None);
        // The window expires 25 ms after the accepted hit: sample 5 of the
        // fourth block, not later.
        assert_eq!(detector.scan(&loud, -20.0, 25.0), Some(TriggerEvent { offset: 5 }));
    }
}
