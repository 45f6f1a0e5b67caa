use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{AccessorRegistry, Error, PlaybackOptions, PropertyTween, Result, Shared};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    /// The maximum number of float channels a single tween animates.
    pub combined_attrs_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            combined_attrs_limit: 4,
        }
    }
}

/// Owns the accessor registry and the configuration every tween is built against.
///
/// The registry is complete once the session is created. Tweens keep it alive for as long as they
/// need it, so dropping the session does not invalidate running tweens.
#[derive(Debug)]
pub struct AnimationSession {
    registry: Arc<AccessorRegistry>,
    config: SessionConfig,
}

impl AnimationSession {
    pub fn new(registry: AccessorRegistry, config: SessionConfig) -> Self {
        debug!(
            "Session created, combined attribute limit: {}",
            config.combined_attrs_limit
        );
        Self {
            registry: Arc::new(registry),
            config,
        }
    }

    pub fn registry(&self) -> &AccessorRegistry {
        &self.registry
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Create a tween that animates the channels `tag` of `target` to `to`.
    ///
    /// The accessor is resolved when the tween starts, not here.
    pub fn tween<T: 'static>(
        &self,
        target: Shared<T>,
        tag: u32,
        to: &[f32],
        options: PlaybackOptions,
    ) -> Result<PropertyTween<T>> {
        let limit = self.config.combined_attrs_limit;
        if to.is_empty() {
            return Err(Error::NoChannels);
        }
        if to.len() > limit {
            return Err(Error::TooManyChannels {
                count: to.len(),
                limit,
            });
        }
        Ok(PropertyTween::new(
            self.registry.clone(),
            limit,
            target,
            tag,
            to.to_vec(),
            options,
        ))
    }
}

impl Default for AnimationSession {
    fn default() -> Self {
        Self::new(AccessorRegistry::default(), SessionConfig::default())
    }
}
