//! Name-keyed image and audio registry
//!
//! Assets registered from a path are loaded lazily, on first lookup.
//! Lookups never fail: unknown names and broken files resolve to a
//! placeholder image or a silent clip, so the frame loop keeps running.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Decoded RGBA8 pixels
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

pub type ImageHandle = Rc<ImageData>;

/// Name the fallback image is reported under
pub const PLACEHOLDER_NAME: &str = "placeholder";

impl ImageData {
    pub fn new(name: impl Into<String>, width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            rgba,
        }
    }

    /// 2x2 magenta/black checker
    pub fn placeholder() -> Self {
        const M: [u8; 4] = [255, 0, 255, 255];
        const K: [u8; 4] = [0, 0, 0, 255];
        Self::new(PLACEHOLDER_NAME, 2, 2, [M, K, K, M].concat())
    }

    fn load(name: &str, path: &Path) -> Result<Self, AssetError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self::new(name, width, height, img.into_raw()))
    }
}

/// Raw encoded audio, played by the host
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub name: Rc<str>,
    bytes: Rc<[u8]>,
}

impl AudioClip {
    pub fn new(name: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: Rc::from(name),
            bytes: Rc::from(bytes),
        }
    }

    pub fn silent(name: &str) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_silent(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Error type for asset registration and loading
#[derive(Debug)]
pub enum AssetError {
    /// Name already registered; the existing asset is kept
    DuplicateName(String),
    /// File I/O error
    Io(String),
    /// Undecodable image data
    Decode(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::DuplicateName(name) => {
                write!(f, "Asset with name {} already exists", name)
            }
            AssetError::Io(msg) => write!(f, "I/O error: {}", msg),
            AssetError::Decode(msg) => write!(f, "Decode error: {}", msg),
        }
    }
}

impl std::error::Error for AssetError {}

impl From<std::io::Error> for AssetError {
    fn from(e: std::io::Error) -> Self {
        AssetError::Io(e.to_string())
    }
}

impl From<image::ImageError> for AssetError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(io) => AssetError::Io(io.to_string()),
            other => AssetError::Decode(other.to_string()),
        }
    }
}

enum Entry<T> {
    Loaded(T),
    File(PathBuf),
}

pub struct AssetRegistry {
    images: HashMap<String, Entry<ImageHandle>>,
    audio: HashMap<String, Entry<AudioClip>>,
    placeholder: ImageHandle,
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self {
            images: HashMap::new(),
            audio: HashMap::new(),
            placeholder: Rc::new(ImageData::placeholder()),
        }
    }

    pub fn placeholder(&self) -> ImageHandle {
        self.placeholder.clone()
    }

    fn claim<T>(
        map: &HashMap<String, Entry<T>>,
        kind: &str,
        name: &str,
    ) -> Result<(), AssetError> {
        if map.contains_key(name) {
            log::error!("{} with name {} already exists!", kind, name);
            return Err(AssetError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    /// Register decoded pixels under `name`
    pub fn register_image(
        &mut self,
        name: &str,
        image: ImageData,
    ) -> Result<ImageHandle, AssetError> {
        Self::claim(&self.images, "Image", name)?;
        let handle = Rc::new(image);
        self.images
            .insert(name.to_string(), Entry::Loaded(handle.clone()));
        Ok(handle)
    }

    /// Register an image file; it is decoded on first `get_image`
    pub fn register_image_from_path(
        &mut self,
        name: &str,
        path: impl AsRef<Path>,
    ) -> Result<(), AssetError> {
        Self::claim(&self.images, "Image", name)?;
        self.images
            .insert(name.to_string(), Entry::File(path.as_ref().to_path_buf()));
        Ok(())
    }

    pub fn contains_image(&self, name: &str) -> bool {
        self.images.contains_key(name)
    }

    /// Already-loaded image, without triggering a load
    pub fn image(&self, name: &str) -> Option<ImageHandle> {
        match self.images.get(name)? {
            Entry::Loaded(handle) => Some(handle.clone()),
            Entry::File(_) => None,
        }
    }

    /// Image registered as `name`, loading it if needed.
    /// Unknown names and failed loads yield the placeholder.
    pub fn get_image(&mut self, name: &str) -> ImageHandle {
        let path = match self.images.get(name) {
            Some(Entry::Loaded(handle)) => return handle.clone(),
            Some(Entry::File(path)) => path.clone(),
            None => {
                log::debug!("Image {} not registered, using placeholder", name);
                return self.placeholder();
            }
        };

        let handle = match ImageData::load(name, &path) {
            Ok(image) => {
                log::debug!(
                    "Loaded image {} from {} ({}x{})",
                    name,
                    path.display(),
                    image.width,
                    image.height
                );
                Rc::new(image)
            }
            Err(e) => {
                log::warn!("Failed to load image {} from {}: {}", name, path.display(), e);
                self.placeholder()
            }
        };
        self.images
            .insert(name.to_string(), Entry::Loaded(handle.clone()));
        handle
    }

    pub fn register_audio(
        &mut self,
        name: &str,
        bytes: Vec<u8>,
    ) -> Result<AudioClip, AssetError> {
        Self::claim(&self.audio, "Sound", name)?;
        let clip = AudioClip::new(name, bytes);
        self.audio.insert(name.to_string(), Entry::Loaded(clip.clone()));
        Ok(clip)
    }

    /// Register an audio file; it is read on first `get_audio`
    pub fn register_audio_from_path(
        &mut self,
        name: &str,
        path: impl AsRef<Path>,
    ) -> Result<(), AssetError> {
        Self::claim(&self.audio, "Sound", name)?;
        self.audio
            .insert(name.to_string(), Entry::File(path.as_ref().to_path_buf()));
        Ok(())
    }

    pub fn contains_audio(&self, name: &str) -> bool {
        self.audio.contains_key(name)
    }

    /// Clip registered as `name`, reading it if needed.
    /// Unknown names and unreadable files yield a silent clip.
    pub fn get_audio(&mut self, name: &str) -> AudioClip {
        let path = match self.audio.get(name) {
            Some(Entry::Loaded(clip)) => return clip.clone(),
            Some(Entry::File(path)) => path.clone(),
            None => {
                log::debug!("Sound {} not registered, using silence", name);
                return AudioClip::silent(name);
            }
        };

        let clip = match std::fs::read(&path) {
            Ok(bytes) => AudioClip::new(name, bytes),
            Err(e) => {
                log::warn!("Failed to load sound {} from {}: {}", name, path.display(), e);
                AudioClip::silent(name)
            }
        };
        self.audio.insert(name.to_string(), Entry::Loaded(clip.clone()));
        clip
    }
}
