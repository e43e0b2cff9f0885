//! Unit tests for sp-core primitives.

#[cfg(test)]
mod ids {
    use crate::{CardId, CheckpointId, EdgeIdx, NodeIdx};

    #[test]
    fn index_roundtrip() {
        let id = NodeIdx(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeIdx::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeIdx::INVALID.0, u32::MAX);
        assert_eq!(EdgeIdx::default(), EdgeIdx::INVALID);
    }

    #[test]
    fn labels_display_bare() {
        assert_eq!(CheckpointId::from("B").to_string(), "B");
        assert_eq!(CardId::new("04A1").as_str(), "04A1");
    }

    #[test]
    fn labels_serialize_as_strings() {
        let json = serde_json::to_string(&CardId::from("X")).unwrap();
        assert_eq!(json, "\"X\"");
        let back: CheckpointId = serde_json::from_str("\"C\"").unwrap();
        assert_eq!(back, CheckpointId::from("C"));
    }

    #[test]
    fn labels_borrow_as_str_for_set_lookup() {
        let mut set = std::collections::HashSet::new();
        set.insert(CardId::from("X"));
        assert!(set.contains("X"));
    }
}

#[cfg(test)]
mod time {
    use crate::{Clock, Epoch, ManualClock, ShiftWindow};

    #[test]
    fn window_is_inclusive_on_both_ends() {
        let expected = Epoch(1_000);
        assert!(Epoch(970).within(expected, 30));
        assert!(Epoch(1_030).within(expected, 30));
        assert!(!Epoch(969).within(expected, 30));
        assert!(!Epoch(1_031).within(expected, 30));
    }

    #[test]
    fn past_and_before_window() {
        let expected = Epoch(1_000);
        assert!(!Epoch(1_030).is_past_window(expected, 30));
        assert!(Epoch(1_031).is_past_window(expected, 30));
        assert!(Epoch(969).is_before_window(expected, 30));
        assert!(!Epoch(970).is_before_window(expected, 30));
    }

    #[test]
    fn shift_window_from_hours_and_minutes() {
        let secs = ShiftWindow::duration_from_hm(2, 30);
        assert_eq!(secs, 9_000);
        let w = ShiftWindow::new(Epoch(100), secs);
        assert_eq!(w.end, Epoch(9_100));
        assert_eq!(w.duration_secs(), 9_000);
        assert!(w.contains(Epoch(100)));
        assert!(!w.contains(Epoch(9_100)));
    }

    #[test]
    fn manual_clock_moves_only_when_told() {
        let clock = ManualClock::new(Epoch(10));
        assert_eq!(clock.now(), Epoch(10));
        clock.advance(5);
        assert_eq!(clock.now(), Epoch(15));
        clock.set(Epoch(3));
        assert_eq!(clock.now(), Epoch(3));
    }
}

#[cfg(test)]
mod rng {
    use crate::AttemptRng;

    #[test]
    fn same_seed_and_attempt_is_reproducible() {
        let mut a = AttemptRng::new(7, 3);
        let mut b = AttemptRng::new(7, 3);
        for _ in 0..32 {
            assert_eq!(a.gen_range(0..1_000u32), b.gen_range(0..1_000u32));
        }
    }

    #[test]
    fn attempts_diverge() {
        let mut a = AttemptRng::new(7, 0);
        let mut b = AttemptRng::new(7, 1);
        let xs: Vec<u32> = (0..16).map(|_| a.gen_range(0..u32::MAX)).collect();
        let ys: Vec<u32> = (0..16).map(|_| b.gen_range(0..u32::MAX)).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn weighted_index_respects_zero_weights() {
        let mut rng = AttemptRng::new(1, 0);
        for _ in 0..100 {
            assert_eq!(rng.weighted_index(&[0.0, 5.0, 0.0]), Some(1));
        }
    }

    #[test]
    fn weighted_index_rejects_degenerate_input() {
        let mut rng = AttemptRng::new(1, 0);
        assert_eq!(rng.weighted_index(&[]), None);
        assert_eq!(rng.weighted_index(&[0.0, 0.0]), None);
    }

    #[test]
    fn weighted_index_handles_huge_weights() {
        let mut rng = AttemptRng::new(9, 0);
        let big = i64::MAX as f64;
        let pick = rng.weighted_index(&[big, big, big]).unwrap();
        assert!(pick < 3);
    }
}
