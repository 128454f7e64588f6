//! One-time, process-wide registration of the document typeface.
//!
//! A single variable-weight font file is registered under one family with a
//! regular and a semibold variant, both backed by the same bytes. The first
//! successful call wins; later calls return the same library.

use crate::config::EngineConfig;
use dossier_layout::FontLibrary;
use dossier_style::{FontStyle, FontWeight};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to load font '{}': {reason}", path.display())]
pub struct FontLoadError {
    pub path: PathBuf,
    pub reason: String,
}

/// Builds a library with `family` registered at 400 and 600 from one font program.
pub fn font_library_from_bytes(bytes: Vec<u8>, family: &str, path: &Path) -> Result<FontLibrary, FontLoadError> {
    let mut library = FontLibrary::new();
    let face = library.load_face(bytes).map_err(|e| FontLoadError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    if !face.is_variable() {
        log::warn!(
            "Font '{}' has no weight axis; semibold text will be emboldened synthetically",
            path.display()
        );
    }
    library.register(family, FontWeight::Regular, FontStyle::Normal, &face);
    library.register(family, FontWeight::SemiBold, FontStyle::Normal, &face);
    Ok(library)
}

pub fn load_font_library(path: &Path, family: &str) -> Result<FontLibrary, FontLoadError> {
    let bytes = std::fs::read(path).map_err(|e| FontLoadError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    font_library_from_bytes(bytes, family, path)
}

/// Guard around a lazily registered font library.
///
/// Concurrent first calls block on one initialisation; a failed attempt
/// leaves the guard empty so a later call can retry.
pub struct FontBootstrap {
    library: OnceCell<Arc<FontLibrary>>,
    /// Font file and family of the winning registration.
    source: OnceCell<(PathBuf, String)>,
    registrations: AtomicUsize,
}

impl Default for FontBootstrap {
    fn default() -> Self {
        Self::new()
    }
}

impl FontBootstrap {
    pub const fn new() -> Self {
        Self {
            library: OnceCell::new(),
            source: OnceCell::new(),
            registrations: AtomicUsize::new(0),
        }
    }

    /// Registers the font named by `config` unless a library is already in
    /// place. A later call naming a different file or family gets the first
    /// library unchanged.
    pub fn ensure(&self, config: &EngineConfig) -> Result<&Arc<FontLibrary>, FontLoadError> {
        self.ensure_for(config, || load_font_library(&config.font_path, &config.font_family))
    }

    /// Like [`FontBootstrap::ensure`], with a custom loader standing in for the font file.
    pub fn ensure_for(
        &self,
        config: &EngineConfig,
        load: impl FnOnce() -> Result<FontLibrary, FontLoadError>,
    ) -> Result<&Arc<FontLibrary>, FontLoadError> {
        if let Some((path, family)) = self.source.get() {
            if path != &config.font_path || family != &config.font_family {
                log::debug!(
                    "Fonts already registered from '{}' as '{}'; ignoring '{}' as '{}'",
                    path.display(),
                    family,
                    config.font_path.display(),
                    config.font_family
                );
            }
        }
        self.ensure_with(|| {
            let library = load()?;
            let _ = self.source.set((config.font_path.clone(), config.font_family.clone()));
            Ok(library)
        })
    }

    /// Like [`FontBootstrap::ensure`], with a custom loader for the first call.
    pub fn ensure_with(
        &self,
        load: impl FnOnce() -> Result<FontLibrary, FontLoadError>,
    ) -> Result<&Arc<FontLibrary>, FontLoadError> {
        self.library.get_or_try_init(|| {
            let library = load()?;
            let count = self.registrations.fetch_add(1, Ordering::SeqCst) + 1;
            log::info!(
                "Registered {} font variant(s) (registration #{})",
                library.registrations().len(),
                count
            );
            Ok(Arc::new(library))
        })
    }

    pub fn get(&self) -> Option<&Arc<FontLibrary>> {
        self.library.get()
    }

    /// Font file and family the library was registered from, when it came from a config.
    pub fn registered_source(&self) -> Option<(&Path, &str)> {
        self.source.get().map(|(path, family)| (path.as_path(), family.as_str()))
    }

    /// How many times a library was actually registered.
    pub fn registration_count(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }
}

static FONTS: FontBootstrap = FontBootstrap::new();

/// Registers the configured typeface once per process and returns it.
pub fn ensure_fonts_registered() -> Result<&'static Arc<FontLibrary>, FontLoadError> {
    ensure_fonts_registered_with(&EngineConfig::from_env())
}

/// Registers the typeface named by `config` once per process. Only the first
/// successful call's settings take effect.
pub fn ensure_fonts_registered_with(config: &EngineConfig) -> Result<&'static Arc<FontLibrary>, FontLoadError> {
    FONTS.ensure(config)
}

pub fn registration_count() -> usize {
    FONTS.registration_count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;

    #[test]
    fn concurrent_callers_register_once() {
        let bootstrap = FontBootstrap::new();
        let loads = AtomicUsize::new(0);
        let barrier = Barrier::new(8);

        let pointers: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        let library = bootstrap
                            .ensure_with(|| {
                                loads.fetch_add(1, Ordering::SeqCst);
                                Ok(FontLibrary::new())
                            })
                            .unwrap();
                        Arc::as_ptr(library) as usize
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(bootstrap.registration_count(), 1);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(pointers.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn missing_file_is_a_font_load_error_and_can_be_retried() {
        let bootstrap = FontBootstrap::new();
        let config = EngineConfig {
            font_path: PathBuf::from("/definitely/missing/font.ttf"),
            ..EngineConfig::default()
        };
        let err = bootstrap.ensure(&config).unwrap_err();
        assert_eq!(err.path, PathBuf::from("/definitely/missing/font.ttf"));
        assert!(err.to_string().contains("/definitely/missing/font.ttf"));
        assert!(bootstrap.get().is_none());
        assert_eq!(bootstrap.registration_count(), 0);

        assert!(bootstrap.ensure_with(|| Ok(FontLibrary::new())).is_ok());
        assert_eq!(bootstrap.registration_count(), 1);
    }

    #[test]
    fn later_configs_get_the_first_library() {
        let bootstrap = FontBootstrap::new();
        let first = EngineConfig {
            font_path: PathBuf::from("/fonts/first.ttf"),
            ..EngineConfig::default()
        };
        let second = EngineConfig {
            font_path: PathBuf::from("/fonts/second.ttf"),
            font_family: "Other".to_string(),
            ..EngineConfig::default()
        };

        let a = bootstrap.ensure_for(&first, || Ok(FontLibrary::new())).unwrap();
        let b = bootstrap
            .ensure_for(&second, || panic!("the library must not be loaded twice"))
            .unwrap();
        assert!(Arc::ptr_eq(a, b));
        assert_eq!(bootstrap.registration_count(), 1);
        assert_eq!(
            bootstrap.registered_source(),
            Some((Path::new("/fonts/first.ttf"), "Inter"))
        );
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = font_library_from_bytes(b"not a font".to_vec(), "Inter", Path::new("x.ttf")).unwrap_err();
        assert_eq!(err.path, PathBuf::from("x.ttf"));
    }
}
