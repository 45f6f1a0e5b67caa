use std::path::{Path, PathBuf};

use kinema_geometry::{Affine2, Vector2};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// An image placed on bones by skin patches.
///
/// `P` holds the backend's pixels. They are never persisted and are filled in by
/// [`Textures::load_pixels`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(serialize = "", deserialize = ""))]
pub struct Texture<P = ()> {
    pub name: String,
    /// Relative to the folder of the [`Textures`] it belongs to.
    pub path: PathBuf,
    pub width: f64,
    pub height: f64,
    /// Applied right before the texture is drawn.
    #[serde(default, with = "affine_columns", skip_serializing_if = "Option::is_none")]
    pub transform: Option<Affine2>,
    #[serde(skip)]
    pub pixels: Option<P>,
}

impl<P> Texture<P> {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            width,
            height,
            transform: None,
            pixels: None,
        }
    }

    pub fn with_transform(mut self, transform: Affine2) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn size(&self) -> Vector2 {
        Vector2::new(self.width, self.height)
    }
}

/// Loads the pixels of a texture file for a specific backend.
pub trait PixelLoader {
    type Pixels;

    /// `None` if the file could not be loaded.
    fn load(&mut self, path: &Path) -> Option<Self::Pixels>;
}

/// The textures of one rig, resolved by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "", deserialize = ""))]
pub struct Textures<P = ()> {
    pub folder: PathBuf,
    pub textures: Vec<Texture<P>>,
}

impl<P> Default for Textures<P> {
    fn default() -> Self {
        Self {
            folder: PathBuf::new(),
            textures: Vec::new(),
        }
    }
}

impl<P> Textures<P> {
    pub fn new(folder: impl Into<PathBuf>, textures: Vec<Texture<P>>) -> Self {
        Self {
            folder: folder.into(),
            textures,
        }
    }

    /// The first texture named `name`.
    pub fn texture(&self, name: &str) -> Option<&Texture<P>> {
        self.textures.iter().find(|texture| texture.name == name)
    }

    pub fn texture_mut(&mut self, name: &str) -> Option<&mut Texture<P>> {
        self.textures.iter_mut().find(|texture| texture.name == name)
    }

    pub fn path_of(&self, texture: &Texture<P>) -> PathBuf {
        self.folder.join(&texture.path)
    }

    /// Load the pixels of every texture that has none yet and return how many were loaded.
    ///
    /// Textures that fail to load keep `None` and are skipped when rendering.
    pub fn load_pixels<L>(&mut self, loader: &mut L) -> usize
    where
        L: PixelLoader<Pixels = P>,
    {
        let mut loaded = 0;
        for texture in &mut self.textures {
            if texture.pixels.is_some() {
                continue;
            }
            let path = self.folder.join(&texture.path);
            match loader.load(&path) {
                Some(pixels) => {
                    debug!("Loaded texture `{}` from {}", texture.name, path.display());
                    texture.pixels = Some(pixels);
                    loaded += 1;
                }
                None => warn!(
                    "Failed to load texture `{}` from {}",
                    texture.name,
                    path.display()
                ),
            }
        }
        loaded
    }
}

/// `Option<Affine2>` as its six column-major values.
mod affine_columns {
    use kinema_geometry::Affine2;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        transform: &Option<Affine2>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        transform
            .map(|transform| transform.to_cols_array())
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Affine2>, D::Error> {
        let columns = Option::<[f64; 6]>::deserialize(deserializer)?;
        Ok(columns.map(|columns| Affine2::from_cols_array(&columns)))
    }
}
