//! Scoped temporary files for report thumbnails.
//!
//! While the PDF report is assembled, each record's PNG is written to its own
//! temporary file and read back from there for embedding. Files live inside a
//! private [`TempDir`]:
//!
//! * a [`StagedThumbnail`] deletes its file when dropped, right after the
//!   image has been embedded;
//! * the [`ThumbnailStaging`] directory is removed when it is dropped, on the
//!   success path and on every early `?` return alike, so a failed report never
//!   leaves `*.png` files behind.

use image::RgbImage;
use std::io::{self, Write};
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};
use tracing::debug;

/// Private directory holding the thumbnails of one report build.
pub struct ThumbnailStaging {
    dir: TempDir,
}

impl ThumbnailStaging {
    /// Create a fresh staging directory under the system temp dir.
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("pdfqr-thumbs-").tempdir()?;
        debug!("Staging thumbnails in {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `png` to a new file in the staging directory.
    pub fn stage(&self, png: &[u8]) -> io::Result<StagedThumbnail> {
        let mut file = tempfile::Builder::new()
            .prefix("qr_")
            .suffix(".png")
            .tempfile_in(self.dir.path())?;
        file.write_all(png)?;
        file.flush()?;
        Ok(StagedThumbnail { file })
    }
}

/// One staged thumbnail; its file is deleted on drop.
pub struct StagedThumbnail {
    file: NamedTempFile,
}

impl StagedThumbnail {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Decode the staged file back into RGB pixels.
    pub fn load(&self) -> Result<RgbImage, image::ImageError> {
        Ok(image::open(self.file.path())?.into_rgb8())
    }
}
