use super::*;

#[test]
fn default_timing_matches_initial_delays() {
    let timing = Timing::default();
    assert_eq!(timing.compare, Duration::from_millis(400));
    assert_eq!(timing.animation, Duration::from_millis(1600));
    assert_eq!(timing.settle_gap, Duration::from_millis(200));
}

#[test]
fn slider_maps_to_compare_and_animation_delays() {
    let timing = Timing::from_slider(3200);
    assert_eq!(timing.compare, Duration::from_millis(480));
    assert_eq!(timing.animation, Duration::from_millis(1400));

    let slow = Timing::from_slider(800);
    assert_eq!(slow.compare, Duration::from_millis(1020));
    assert_eq!(slow.animation, Duration::from_millis(3800));
}

#[test]
fn slider_is_clamped_to_its_maximum() {
    let timing = Timing::from_slider(10_000);
    assert_eq!(timing.animation, Duration::ZERO);
    assert_eq!(timing.compare, Duration::from_micros(1_200_000 - 225 * 4600));
}

#[test]
fn speed_label_shows_multiplier_and_animation_length() {
    assert_eq!(speed_label(3200), "4x (1400 ms)");
    assert_eq!(speed_label(2800), "3.5x (1800 ms)");
}
