use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_new_clock_starts_at_zero() {
    let clock = ModificationClock::new();
    assert_eq!(clock.current_stamp(), Stamp::ZERO);
}

#[test]
fn test_advance_returns_new_stamp() {
    let clock = ModificationClock::starting_at(Stamp::new(10));
    assert_eq!(clock.advance(), Stamp::new(11));
    assert_eq!(clock.advance(), Stamp::new(12));
    assert_eq!(clock.current_stamp(), Stamp::new(12));
}

#[test]
fn test_reads_do_not_advance() {
    let clock = ModificationClock::starting_at(Stamp::new(3));
    for _ in 0..5 {
        assert_eq!(clock.current_stamp(), Stamp::new(3));
    }
}

#[test]
fn test_shared_clock_clones_observe_same_counter() {
    let clock = SharedClock::starting_at(Stamp::new(5));
    let other = clock.clone();
    clock.advance();
    assert_eq!(other.current_stamp(), Stamp::new(6));
    assert!(clock.same_clock(&other));
    assert!(!clock.same_clock(&SharedClock::starting_at(Stamp::new(6))));
}

#[test]
fn test_stamp_ordering_and_next() {
    assert!(Stamp::new(1) < Stamp::new(2));
    assert_eq!(Stamp::new(41).next(), Stamp::new(42));
    assert_eq!(Stamp::new(7).raw(), 7);
}

#[test]
fn test_stamp_formatting() {
    assert_eq!(format!("{:?}", Stamp::new(9)), "Stamp(9)");
    assert_eq!(format!("{}", Stamp::new(9)), "#9");
}

#[test]
fn test_concurrent_advances_are_not_lost() {
    let clock = SharedClock::new();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            let clock = clock.clone();
            scope.spawn(move || {
                for _ in 0..250 {
                    clock.advance();
                }
            });
        }
    });
    assert_eq!(clock.current_stamp(), Stamp::new(1000));
}
