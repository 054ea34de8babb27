mod common;

use std::time::Duration;

use printer_engine::{await_quiescence, MemoryElement, SettledBy, StabilitySettings};
use pretty_assertions::assert_eq;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Touches `element` at each of the given offsets from now.
fn mutate_at(element: &MemoryElement, offsets: &[u64]) {
    let element = element.clone();
    let offsets = offsets.to_vec();
    tokio::spawn(async move {
        let start = tokio::time::Instant::now();
        for (i, offset) in offsets.into_iter().enumerate() {
            tokio::time::sleep_until(start + ms(offset)).await;
            element.set_attribute("data-step", &i.to_string());
        }
    });
}

#[tokio::test(start_paused = true)]
async fn idle_subtree_settles_after_one_quiet_window() {
    common::init_logging();
    let root = MemoryElement::with_class("div", "markdown-preview-view");

    let outcome = await_quiescence(&root, StabilitySettings::default()).await;

    assert_eq!(outcome.settled_by, SettledBy::Quiescence);
    assert_eq!(outcome.mutation_count, 0);
    // 500ms initial delay, then the first poll tick after a strictly longer than 1000ms gap.
    assert_eq!(outcome.elapsed, ms(1600));
}

#[tokio::test(start_paused = true)]
async fn mutations_before_observation_starts_are_not_counted() {
    common::init_logging();
    let root = MemoryElement::new("div");
    mutate_at(&root, &[100, 200, 300]);

    let outcome = await_quiescence(&root, StabilitySettings::default()).await;

    assert_eq!(outcome.settled_by, SettledBy::Quiescence);
    assert_eq!(outcome.mutation_count, 0);
    assert_eq!(outcome.elapsed, ms(1600));
}

#[tokio::test(start_paused = true)]
async fn quiet_window_restarts_after_each_mutation() {
    common::init_logging();
    let root = MemoryElement::new("div");
    let child = MemoryElement::new("p");
    root.append_child(&child);
    mutate_at(&child, &[650, 750, 850]);

    let outcome = await_quiescence(&root, StabilitySettings::default()).await;

    assert_eq!(outcome.settled_by, SettledBy::Quiescence);
    assert_eq!(outcome.mutation_count, 3);
    assert_eq!(outcome.elapsed, ms(1900));
}

#[tokio::test(start_paused = true)]
async fn continuous_mutation_is_cut_off_by_the_hard_timeout() {
    common::init_logging();
    let root = MemoryElement::new("div");
    let offsets: Vec<u64> = (1..=20).map(|i| i * 400).collect();
    mutate_at(&root, &offsets);

    let outcome = await_quiescence(&root, StabilitySettings::default()).await;

    assert_eq!(outcome.settled_by, SettledBy::Timeout);
    assert_eq!(outcome.elapsed, ms(5500));
    // Mutations at 800ms through 5200ms fall inside the observation window.
    assert_eq!(outcome.mutation_count, 12);
}

#[tokio::test(start_paused = true)]
async fn concurrent_waits_on_disjoint_subtrees_are_independent() {
    common::init_logging();
    let busy = MemoryElement::new("div");
    let idle = MemoryElement::new("div");
    let offsets: Vec<u64> = (1..=30).map(|i| i * 300).collect();
    mutate_at(&busy, &offsets);

    let settings = StabilitySettings::default();
    let (busy_outcome, idle_outcome) = tokio::join!(
        await_quiescence(&busy, settings),
        await_quiescence(&idle, settings)
    );

    assert_eq!(idle_outcome.settled_by, SettledBy::Quiescence);
    assert_eq!(idle_outcome.mutation_count, 0);
    assert_eq!(idle_outcome.elapsed, ms(1600));
    assert_eq!(busy_outcome.settled_by, SettledBy::Timeout);
    assert_eq!(busy_outcome.elapsed, ms(5500));
}

#[tokio::test(start_paused = true)]
async fn custom_timings_are_honoured() {
    common::init_logging();
    let root = MemoryElement::new("div");
    let settings = StabilitySettings {
        initial_delay: ms(0),
        quiet_window: ms(200),
        poll_interval: ms(50),
        hard_timeout: ms(1000),
    };

    let outcome = await_quiescence(&root, settings).await;

    assert_eq!(outcome.settled_by, SettledBy::Quiescence);
    assert_eq!(outcome.elapsed, ms(250));
}

#[tokio::test(start_paused = true)]
async fn zero_poll_interval_falls_back_to_millisecond_polling() {
    common::init_logging();
    let root = MemoryElement::new("div");
    let settings = StabilitySettings {
        initial_delay: ms(0),
        quiet_window: ms(10),
        poll_interval: ms(0),
        hard_timeout: ms(1000),
    };

    let outcome = await_quiescence(&root, settings).await;

    assert_eq!(outcome.settled_by, SettledBy::Quiescence);
    assert_eq!(outcome.elapsed, ms(11));
}
