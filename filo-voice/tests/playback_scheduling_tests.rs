//! Property-based tests for playback scheduling.
//!
//! For any sequence of packet durations delivered at arbitrary clock times,
//! computed start times must be non-decreasing, packets must never overlap,
//! and a packet must start the moment the previous one ends unless it
//! arrived later than that.

use filo_voice::PlaybackScheduler;
use proptest::prelude::*;

/// Generator for (duration, arrival) sequences.
///
/// Durations span sub-frame blips to multi-second chunks; arrivals are
/// unconstrained within the window, so bursts, gaps, and stale clock reads
/// all occur.
fn arb_deliveries() -> impl Strategy<Value = Vec<(f64, f64)>> {
    proptest::collection::vec((0.001f64..5.0, 0.0f64..120.0), 1..64)
}

proptest! {
    #[test]
    fn prop_starts_never_overlap(deliveries in arb_deliveries()) {
        let mut scheduler = PlaybackScheduler::new();
        let mut prev_end = 0.0f64;
        for (duration, arrival) in deliveries {
            let unit = scheduler.schedule(duration, arrival);
            prop_assert!(unit.start >= prev_end);
            prev_end = unit.end();
        }
    }

    #[test]
    fn prop_no_unnecessary_gap(deliveries in arb_deliveries()) {
        let mut scheduler = PlaybackScheduler::new();
        let mut prev_end = 0.0f64;
        for (duration, arrival) in deliveries {
            let unit = scheduler.schedule(duration, arrival);
            // Exactly max(prev_end, arrival): late packets start on arrival,
            // early packets queue behind the previous one.
            prop_assert_eq!(unit.start, prev_end.max(arrival));
            prev_end = unit.end();
        }
    }

    #[test]
    fn prop_next_start_is_monotonic(deliveries in arb_deliveries()) {
        let mut scheduler = PlaybackScheduler::new();
        let mut last = scheduler.next_start();
        for (duration, arrival) in deliveries {
            scheduler.schedule(duration, arrival);
            prop_assert!(scheduler.next_start() >= last);
            last = scheduler.next_start();
        }
    }

    #[test]
    fn prop_retiring_everything_signals_idle_once(deliveries in arb_deliveries()) {
        let mut scheduler = PlaybackScheduler::new();
        let handles: Vec<u64> = deliveries
            .iter()
            .map(|&(duration, arrival)| scheduler.schedule(duration, arrival).handle)
            .collect();

        let mut idle_signals = 0;
        for handle in handles {
            if scheduler.retire(handle) {
                idle_signals += 1;
            }
        }
        prop_assert_eq!(idle_signals, 1);
        prop_assert!(scheduler.is_idle());
    }
}
