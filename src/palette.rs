//! Face palettes: the assets tiles are bound to.
//!
//! A palette is an ordered list of distinct face assets plus an optional
//! trap asset. The engine only ever compares tiles by face id, never by
//! asset identity, so a palette is just names and display glyphs with an
//! optional backing file. Disk I/O happens here at setup and nowhere else.

use crate::error::SetupError;
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions recognized as face images.
const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

/// File stem reserved for the trap asset.
const TRAP_STEM: &str = "bomb";

/// One face asset: a name, a one-character terminal glyph, and the image
/// file backing it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceAsset {
    /// Asset name (file stem for directory palettes).
    pub name: String,
    /// Single character shown on a face-up tile in the TUI.
    pub glyph: char,
    /// Backing image path, absent for the builtin palette.
    pub path: Option<PathBuf>,
}

impl FaceAsset {
    fn builtin(name: &str, glyph: char) -> Self {
        Self {
            name: name.to_string(),
            glyph,
            path: None,
        }
    }
}

/// An ordered set of face assets and an optional trap asset.
#[derive(Debug, Clone)]
pub struct Palette {
    faces: Vec<FaceAsset>,
    trap: Option<FaceAsset>,
}

impl Palette {
    /// The compiled-in palette: eighteen animal faces and a bomb trap.
    ///
    /// Large enough for any grid up to 6x6, so the TUI needs no files on
    /// disk.
    #[must_use]
    pub fn builtin() -> Self {
        let faces = vec![
            FaceAsset::builtin("cat", 'C'),
            FaceAsset::builtin("dog", 'D'),
            FaceAsset::builtin("fox", 'F'),
            FaceAsset::builtin("owl", 'O'),
            FaceAsset::builtin("bee", 'B'),
            FaceAsset::builtin("elk", 'E'),
            FaceAsset::builtin("hen", 'H'),
            FaceAsset::builtin("pig", 'P'),
            FaceAsset::builtin("ram", 'R'),
            FaceAsset::builtin("ant", 'A'),
            FaceAsset::builtin("bat", 'T'),
            FaceAsset::builtin("yak", 'Y'),
            FaceAsset::builtin("koi", 'K'),
            FaceAsset::builtin("jay", 'J'),
            FaceAsset::builtin("sow", 'S'),
            FaceAsset::builtin("gnu", 'G'),
            FaceAsset::builtin("wasp", 'W'),
            FaceAsset::builtin("newt", 'N'),
        ];
        let trap = Some(FaceAsset {
            name: TRAP_STEM.to_string(),
            glyph: '*',
            path: None,
        });
        Self { faces, trap }
    }

    /// The builtin palette padded with numbered placeholder faces until
    /// it holds at least `min_faces` faces.
    ///
    /// The engine compares tiles by face id only, so a padded palette
    /// replays any recording exactly even when the original assets
    /// (say, a directory palette) are unavailable.
    #[must_use]
    pub fn sized(min_faces: usize) -> Self {
        let mut palette = Self::builtin();
        while palette.faces.len() < min_faces {
            let name = format!("face{}", palette.faces.len());
            palette.faces.push(FaceAsset {
                name,
                glyph: '#',
                path: None,
            });
        }
        palette
    }

    /// Build a palette by scanning a directory for image files.
    ///
    /// One face per recognized image, named by file stem and sorted by
    /// name for determinism. A file with the stem `bomb` becomes the trap
    /// asset instead of a face.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read or contains no
    /// usable images.
    pub fn from_dir(dir: &Path) -> Result<Self, SetupError> {
        let entries = fs::read_dir(dir).map_err(|_| SetupError::EmptyPaletteDir {
            path: dir.to_path_buf(),
        })?;

        let mut faces = Vec::new();
        let mut trap = None;

        for entry in entries.flatten() {
            let path = entry.path();
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if !IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let glyph = stem
                .chars()
                .next()
                .map_or('?', |c| c.to_ascii_uppercase());
            let asset = FaceAsset {
                name: stem.to_string(),
                glyph,
                path: Some(path.clone()),
            };

            if stem.eq_ignore_ascii_case(TRAP_STEM) {
                trap = Some(FaceAsset { glyph: '*', ..asset });
            } else {
                faces.push(asset);
            }
        }

        if faces.is_empty() {
            return Err(SetupError::EmptyPaletteDir {
                path: dir.to_path_buf(),
            });
        }

        faces.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Self { faces, trap })
    }

    /// Number of distinct non-trap faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Whether a trap asset is present.
    #[must_use]
    pub const fn has_trap(&self) -> bool {
        self.trap.is_some()
    }

    /// Get a face asset by id.
    #[must_use]
    pub fn face(&self, id: usize) -> Option<&FaceAsset> {
        self.faces.get(id)
    }

    /// The trap asset, if present.
    #[must_use]
    pub const fn trap(&self) -> Option<&FaceAsset> {
        self.trap.as_ref()
    }

    /// All face assets in palette order.
    #[must_use]
    pub fn faces(&self) -> &[FaceAsset] {
        &self.faces
    }
}
