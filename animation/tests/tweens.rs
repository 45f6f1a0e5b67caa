use anyhow::Result;
use approx::assert_relative_eq;
use kinema_animation::{
    Accessor, AccessorRegistry, Animation, AnimationSession, Easing, Error, PlayMode,
    PlaybackOptions, Sequential, SessionConfig, Tickery, Timeline, Tweenable, shared,
};

const TRANSLATION: u32 = 1;
const SCALE: u32 = 2;

#[derive(Debug, Default)]
struct Transform {
    x: f32,
    y: f32,
    scale: f32,
}

#[derive(Debug, Default)]
struct Sprite {
    transform: Transform,
    visible: bool,
}

#[derive(Debug, Default)]
struct Widget {
    opacity: f32,
}

impl Tweenable for Widget {
    fn get_values(&self, _tag: u32, out: &mut [f32]) -> usize {
        out[0] = self.opacity;
        1
    }

    fn set_values(&mut self, _tag: u32, values: &[f32]) {
        self.opacity = values[0];
    }
}

struct TransformAccessor;

impl Accessor<Transform> for TransformAccessor {
    fn get(&self, target: &Transform, tag: u32, out: &mut [f32]) -> usize {
        match tag {
            TRANSLATION => {
                out[..2].copy_from_slice(&[target.x, target.y]);
                2
            }
            SCALE => {
                out[0] = target.scale;
                1
            }
            _ => 0,
        }
    }

    fn set(&self, target: &mut Transform, tag: u32, values: &[f32]) {
        match tag {
            TRANSLATION => {
                target.x = values[0];
                target.y = values[1];
            }
            SCALE => target.scale = values[0],
            _ => {}
        }
    }
}

fn session() -> AnimationSession {
    let mut registry = AccessorRegistry::new();
    registry.register::<Transform>(TransformAccessor);
    registry.register_parent::<Sprite, Transform>(|s| &s.transform, |s| &mut s.transform);
    AnimationSession::new(registry, SessionConfig::default())
}

#[test]
fn targets_resolve_through_their_parent() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let session = session();
    let sprite = shared(Sprite {
        visible: true,
        ..Sprite::default()
    });
    let mut tween = session.tween(
        sprite.clone(),
        TRANSLATION,
        &[100.0, 50.0],
        PlaybackOptions::with_duration(1.0),
    )?;
    tween.start()?;
    tween.update(0.5)?;
    {
        let sprite = sprite.lock();
        assert_relative_eq!(sprite.transform.x, 50.0);
        assert_relative_eq!(sprite.transform.y, 25.0);
        assert!(sprite.visible);
    }
    Ok(())
}

#[test]
fn missing_accessor_is_reported_at_start() -> Result<()> {
    let session = session();
    let mut tween = session.tween(
        shared(Widget::default()),
        0,
        &[1.0],
        PlaybackOptions::default(),
    )?;
    let error = tween.start().unwrap_err();
    assert!(matches!(error, Error::AccessorNotFound { .. }));
    assert!(error.to_string().contains("Widget"));
    Ok(())
}

#[test]
fn composites_stop_when_a_child_fails_to_start() -> Result<()> {
    let session = session();
    let transform = shared(Transform::default());
    let unresolved = || {
        session.tween(
            shared(Widget::default()),
            0,
            &[1.0],
            PlaybackOptions::with_duration(1.0),
        )
    };

    let mut sequence = Sequential::default()
        .with(session.tween(
            transform.clone(),
            SCALE,
            &[1.0],
            PlaybackOptions::with_duration(1.0),
        )?)
        .with(unresolved()?);
    sequence.start()?;
    assert!(matches!(
        sequence.update(1.5),
        Err(Error::AccessorNotFound { .. })
    ));
    assert!(sequence.is_completed());
    assert_eq!(sequence.update(1.0)?, 1.0);
    assert_relative_eq!(transform.lock().scale, 1.0);

    let mut timeline = Timeline::new().at(1.0, unresolved()?);
    timeline.start()?;
    assert!(timeline.update(2.0).is_err());
    assert!(timeline.is_completed());
    Ok(())
}

#[test]
fn registration_wins_over_self_access() -> Result<()> {
    struct Halving;
    impl Accessor<Widget> for Halving {
        fn get(&self, target: &Widget, _tag: u32, out: &mut [f32]) -> usize {
            out[0] = target.opacity * 2.0;
            1
        }
        fn set(&self, target: &mut Widget, _tag: u32, values: &[f32]) {
            target.opacity = values[0] / 2.0;
        }
    }

    let mut registry = AccessorRegistry::new();
    registry.register::<Widget>(Halving);
    let session = AnimationSession::new(registry, SessionConfig::default());

    let widget = shared(Widget::default());
    let mut tween = session
        .tween(widget.clone(), 0, &[1.0], PlaybackOptions::with_duration(1.0))?
        .self_accessing();
    tween.start()?;
    tween.update(1.0)?;
    assert_relative_eq!(widget.lock().opacity, 0.5);
    Ok(())
}

#[test]
fn yoyo_returns_to_the_start() -> Result<()> {
    let session = session();
    let transform = shared(Transform {
        scale: 1.0,
        ..Transform::default()
    });
    let mut tween = session.tween(
        transform.clone(),
        SCALE,
        &[2.0],
        PlaybackOptions::with_duration(1.0)
            .repeat(1)
            .play_mode(PlayMode::Yoyo)
            .easing(Easing::Linear),
    )?;
    tween.start()?;
    tween.update(1.0)?;
    assert_relative_eq!(transform.lock().scale, 2.0);
    tween.update(0.5)?;
    assert_relative_eq!(transform.lock().scale, 1.5);
    tween.update(0.5)?;
    assert_relative_eq!(transform.lock().scale, 1.0);
    assert!(tween.is_completed());
    Ok(())
}

#[test]
fn tickery_drives_tweens_to_completion() -> Result<()> {
    let session = session();
    let transform = shared(Transform::default());
    let mut tickery = Tickery::new();
    tickery.add(session.tween(
        transform.clone(),
        TRANSLATION,
        &[10.0, 10.0],
        PlaybackOptions::with_duration(2.0),
    )?)?;

    for _ in 0..4 {
        tickery.tick(0.5);
    }
    assert!(!tickery.wants_ticks());
    assert_relative_eq!(transform.lock().x, 10.0);
    assert_relative_eq!(transform.lock().y, 10.0);
    Ok(())
}
