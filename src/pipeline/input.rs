//! Input discovery: list the PDFs of a folder and sanity-check each one.
//!
//! Only regular files directly inside the folder whose name ends in `.pdf`
//! (any case) are scanned. Everything else is skipped with a `debug` log line
//! saying why. Entries are returned sorted by file name so that two runs over
//! an unchanged folder emit their rows in the same order.

use crate::error::QrScanError;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// PDFs found in a folder, plus how many entries were passed over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderListing {
    /// PDF paths in scan order.
    pub pdfs: Vec<PathBuf>,
    /// Entries that are not PDF files (sub-folders, other extensions).
    pub skipped: usize,
}

/// `true` if `name` ends in `.pdf`, ignoring case.
pub fn has_pdf_extension(name: &str) -> bool {
    name.len() >= 4
        && name
            .get(name.len() - 4..)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(".pdf"))
}

/// List the PDF files directly inside `folder`, sorted by file name.
pub fn list_pdf_files(folder: &Path) -> Result<FolderListing, QrScanError> {
    if !folder.exists() {
        return Err(QrScanError::FolderNotFound {
            path: folder.to_path_buf(),
        });
    }
    if !folder.is_dir() {
        return Err(QrScanError::NotADirectory {
            path: folder.to_path_buf(),
        });
    }

    let unreadable = |source| QrScanError::FolderUnreadable {
        path: folder.to_path_buf(),
        source,
    };

    let mut listing = FolderListing::default();
    for entry in std::fs::read_dir(folder).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        if !has_pdf_extension(&name) {
            debug!("Skipping '{}': not a .pdf file", name);
            listing.skipped += 1;
            continue;
        }
        // `metadata` follows symlinks, so a link to a PDF is scanned.
        let is_file = std::fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false);
        if !is_file {
            debug!("Skipping '{}': not a regular file", name);
            listing.skipped += 1;
            continue;
        }
        listing.pdfs.push(path);
    }

    listing
        .pdfs
        .sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(
        "Found {} PDF files in {} ({} entries skipped)",
        listing.pdfs.len(),
        folder.display(),
        listing.skipped
    );
    Ok(listing)
}

/// Check that `path` is readable and starts with the `%PDF` magic bytes.
///
/// pdfium reports every parse failure the same way; checking the header first
/// lets a renamed spreadsheet or image fail with a message that says so.
pub fn validate_pdf(path: &Path) -> Result<(), QrScanError> {
    let mut file =
        File::open(path).map_err(|e| QrScanError::from_open_error(path.to_path_buf(), &e))?;

    let mut magic = [0u8; 4];
    let mut read = 0;
    while read < magic.len() {
        match file.read(&mut magic[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(QrScanError::from_open_error(path.to_path_buf(), &e)),
        }
    }

    if &magic[..read] != b"%PDF" {
        return Err(QrScanError::NotAPdf {
            path: path.to_path_buf(),
            magic: magic[..read].to_vec(),
        });
    }
    Ok(())
}

/// File name of `path` as shown in the reports.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
