use std::{cell::RefCell, rc::Rc};

use anyhow::Result;
use approx::assert_relative_eq;
use kinema_animation::{
    Animation, Concurrent, Limit, PlaybackOptions, Plugin, Sequential, State, Status, Timeline,
    ValueTween, interpolate,
};

/// Records the hooks fired by the animations it is registered on.
#[derive(Clone, Default)]
struct Journal(Rc<RefCell<Vec<(String, &'static str)>>>);

impl Journal {
    fn watch(&self, name: &str) -> Box<dyn Plugin> {
        Box::new(Entry {
            name: name.into(),
            journal: self.clone(),
        })
    }

    fn count(&self, name: &str, hook: &str) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|(n, h)| n == name && *h == hook)
            .count()
    }
}

struct Entry {
    name: String,
    journal: Journal,
}

impl Entry {
    fn record(&self, hook: &'static str) {
        self.journal.0.borrow_mut().push((self.name.clone(), hook));
    }
}

impl Plugin for Entry {
    fn begin(&mut self, _status: &Status<'_>) {
        self.record("begin");
    }
    fn update(&mut self, _status: &Status<'_>) {
        self.record("update");
    }
    fn end(&mut self, _status: &Status<'_>) {
        self.record("end");
    }
}

fn leaf(duration: f64) -> ValueTween<f64, impl FnMut(f64)> {
    interpolate::from(0.0)
        .to(1.0, PlaybackOptions::with_duration(duration))
        .apply(|_| {})
}

fn watched(journal: &Journal, name: &str, duration: f64) -> Box<dyn Animation> {
    let mut animation = leaf(duration).named(name);
    animation.add_plugin(journal.watch(name));
    Box::new(animation)
}

const STEP: f64 = 0.5;

#[test]
fn sequential_children_begin_one_after_another() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let journal = Journal::default();
    let names = ["a", "b", "c"];
    let mut sequence = Sequential::new(
        names
            .iter()
            .zip([1.0, 2.0, 3.0])
            .map(|(name, duration)| watched(&journal, name, duration))
            .collect(),
    );
    assert_eq!(sequence.total_duration(), Limit::Finite(6.0));

    let mut begins = Vec::new();
    let record_begins = |elapsed: f64, begins: &mut Vec<(&'static str, f64)>| {
        for name in names {
            if journal.count(name, "begin") == 1 && !begins.iter().any(|(n, _)| *n == name) {
                begins.push((name, elapsed));
            }
        }
    };

    sequence.start()?;
    record_begins(0.0, &mut begins);

    let mut elapsed = 0.0;
    while !sequence.is_completed() {
        sequence.update(STEP)?;
        elapsed += STEP;
        record_begins(elapsed, &mut begins);
        assert!(elapsed <= 6.0);
    }

    assert_relative_eq!(elapsed, 6.0);
    assert_eq!(begins, [("a", 0.0), ("b", 1.0), ("c", 3.0)]);
    for name in names {
        assert_eq!(journal.count(name, "begin"), 1);
        assert_eq!(journal.count(name, "end"), 1);
    }
    Ok(())
}

#[test]
fn concurrent_completes_with_the_longest_child() -> Result<()> {
    let mut concurrent = Concurrent::default().with(leaf(1.0)).with(leaf(5.0));
    concurrent.start()?;

    let mut elapsed = 0.0;
    while !concurrent.is_completed() {
        concurrent.update(STEP)?;
        elapsed += STEP;
        if elapsed >= 1.0 {
            assert!(concurrent.children()[0].is_completed());
        }
    }
    assert_relative_eq!(elapsed, 5.0);
    assert!(concurrent.children()[1].is_completed());
    Ok(())
}

#[test]
fn concurrent_children_keep_their_own_delay() -> Result<()> {
    let mut concurrent = Concurrent::default()
        .with(leaf(1.0))
        .with(
            interpolate::from(0.0)
                .to(1.0, PlaybackOptions::with_duration(1.0).delay(2.0))
                .apply(|_| {}),
        );
    concurrent.start()?;
    concurrent.update(1.5)?;
    assert_eq!(concurrent.children()[1].state(), State::Pending);
    concurrent.update(1.0)?;
    assert_eq!(concurrent.children()[1].state(), State::Active);
    assert_relative_eq!(concurrent.update(1.0)?, 0.5);
    assert!(concurrent.is_completed());
    Ok(())
}

#[test]
fn timeline_respects_offsets() -> Result<()> {
    let journal = Journal::default();
    let mut timeline = Timeline::new();
    timeline.insert(0.0, watched(&journal, "first", 3.0));
    timeline.insert(2.0, watched(&journal, "second", 3.0));
    assert_eq!(timeline.total_duration(), Limit::Finite(5.0));

    timeline.start()?;
    let mut elapsed = 0.0;
    while !timeline.is_completed() {
        timeline.update(STEP)?;
        elapsed += STEP;
        if elapsed < 2.0 {
            assert_eq!(journal.count("second", "update"), 0);
            assert_eq!(timeline.child(1).map(|c| c.state()), Some(State::Idle));
        }
    }
    assert_relative_eq!(elapsed, 5.0);
    assert_eq!(journal.count("second", "begin"), 1);
    assert_eq!(journal.count("first", "end"), 1);
    assert_eq!(journal.count("second", "end"), 1);
    Ok(())
}

#[test]
fn nested_composites() -> Result<()> {
    let inner = Concurrent::default().with(leaf(1.0)).with(leaf(2.0));
    let mut outer = Sequential::default().with(inner).with(leaf(1.0));
    assert_eq!(outer.total_duration(), Limit::Finite(3.0));

    outer.start()?;
    assert_eq!(outer.update(2.5)?, 0.0);
    assert_eq!(outer.current(), Some(1));
    assert_relative_eq!(outer.update(1.0)?, 0.5);
    assert!(outer.is_completed());
    Ok(())
}

#[test]
fn stop_fires_end_once_and_skips_pending_children() -> Result<()> {
    let journal = Journal::default();
    let mut sequence = Sequential::new(vec![
        watched(&journal, "a", 1.0),
        watched(&journal, "b", 1.0),
    ]);
    sequence.add_plugin(journal.watch("sequence"));
    sequence.start()?;
    sequence.update(0.5)?;
    sequence.stop();
    sequence.stop();

    assert_eq!(journal.count("sequence", "end"), 1);
    assert_eq!(journal.count("a", "end"), 1);
    assert_eq!(journal.count("b", "begin"), 0);
    assert_eq!(sequence.update(1.0)?, 1.0);
    Ok(())
}
