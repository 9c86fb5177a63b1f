// SPDX-License-Identifier: MPL-2.0
//! Gallery model for finding and ordering image files.
//!
//! This module scans a directory for supported image formats, sorts them
//! according to the configured sort order, and pairs each file with a
//! caption. Captions come from an optional `captions.toml` sidecar in the
//! scanned directory; files without an entry fall back to a humanized
//! version of their file stem.

use crate::config::SortOrder;
use crate::error::Result;
use crate::media;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// File name of the optional caption sidecar inside a scanned directory.
///
/// The sidecar is a flat TOML table mapping file names to captions:
///
/// ```toml
/// "beach.jpg" = "A quiet beach at dawn"
/// "forest.png" = "Morning light in the forest"
/// ```
pub const CAPTIONS_FILE: &str = "captions.toml";

/// A single gallery entry: an image path plus its display caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub path: PathBuf,
    pub caption: String,
}

/// An ordered collection of images scanned from one directory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Gallery {
    items: Vec<GalleryItem>,
    directory: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct CaptionTable(HashMap<String, String>);

impl Gallery {
    /// Creates a new empty gallery.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans a directory for supported image files, non-recursively.
    ///
    /// Hidden files (names starting with `.`) and subdirectories are
    /// skipped. The second tuple element is a notification key when the
    /// caption sidecar exists but cannot be parsed; the scan itself still
    /// succeeds with humanized captions in that case.
    ///
    /// Returns an error if the directory cannot be read.
    pub fn scan_directory(directory: &Path, sort_order: SortOrder) -> Result<(Self, Option<String>)> {
        let mut image_files = Vec::new();

        for entry in std::fs::read_dir(directory)? {
            let entry = entry?;
            let path = entry.path();

            if is_hidden(&path) {
                continue;
            }

            if path.is_file() && media::extensions::path_is_supported(&path) {
                image_files.push(path);
            }
        }

        sort_image_files(&mut image_files, sort_order);

        let (captions, warning) = load_captions(directory);

        let items = image_files
            .into_iter()
            .map(|path| {
                let caption = caption_for(&path, &captions);
                GalleryItem { path, caption }
            })
            .collect();

        Ok((
            Self {
                items,
                directory: Some(directory.to_path_buf()),
            },
            warning,
        ))
    }

    /// Returns the total number of images in the gallery.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the gallery is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the item at the specified index.
    pub fn get(&self, index: usize) -> Option<&GalleryItem> {
        self.items.get(index)
    }

    /// Returns all items in display order.
    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    /// Returns the image paths in display order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.items.iter().map(|item| item.path.clone()).collect()
    }

    /// Returns the scanned directory, if any.
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

/// Loads the caption sidecar from a directory.
///
/// A missing sidecar is not an error. A present but unparsable sidecar
/// yields an empty table plus a notification key for the caller.
fn load_captions(directory: &Path) -> (HashMap<String, String>, Option<String>) {
    let sidecar = directory.join(CAPTIONS_FILE);
    if !sidecar.exists() {
        return (HashMap::new(), None);
    }

    let parsed = std::fs::read_to_string(&sidecar)
        .map_err(|e| e.to_string())
        .and_then(|content| toml::from_str::<CaptionTable>(&content).map_err(|e| e.to_string()));

    match parsed {
        Ok(CaptionTable(captions)) => (captions, None),
        Err(_) => (
            HashMap::new(),
            Some("notification-captions-load-error".to_string()),
        ),
    }
}

fn caption_for(path: &Path, captions: &HashMap<String, String>) -> String {
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        if let Some(caption) = captions.get(name) {
            return caption.clone();
        }
    }

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    humanize_caption(stem)
}

/// Turns a file stem into a readable caption.
///
/// Underscores and hyphens become spaces, runs of whitespace collapse, and
/// the first letter is uppercased: `beach-sunset_02` becomes `Beach sunset 02`.
fn humanize_caption(stem: &str) -> String {
    let spaced: String = stem
        .chars()
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect();
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut chars = collapsed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Sorts image paths according to the specified sort order.
fn sort_image_files(image_files: &mut [PathBuf], sort_order: SortOrder) {
    match sort_order {
        SortOrder::Alphabetical => {
            image_files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        }
        SortOrder::ModifiedDate => {
            image_files.sort_by(|a, b| {
                let a_time = a
                    .metadata()
                    .and_then(|m| m.modified())
                    .unwrap_or(std::time::SystemTime::UNIX_EPOCH);
                let b_time = b
                    .metadata()
                    .and_then(|m| m.modified())
                    .unwrap_or(std::time::SystemTime::UNIX_EPOCH);
                a_time.cmp(&b_time)
            });
        }
        SortOrder::CreatedDate => {
            image_files.sort_by(|a, b| {
                let a_time = a
                    .metadata()
                    .and_then(|m| m.created())
                    .unwrap_or(std::time::SystemTime::UNIX_EPOCH);
                let b_time = b
                    .metadata()
                    .and_then(|m| m.created())
                    .unwrap_or(std::time::SystemTime::UNIX_EPOCH);
                a_time.cmp(&b_time)
            });
        }
    }
}
