// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::error::Error;
use crate::gallery::Gallery;
use crate::media::ImageData;
use crate::ui::grid;
use crate::ui::lightbox;
use crate::ui::notifications;
use std::path::PathBuf;
use std::time::Instant;

/// Top-level messages consumed by `App::update`. The variants forward
/// lower-level component messages while keeping a single update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    Grid(grid::Message),
    Lightbox(lightbox::Message),
    Notification(notifications::NotificationMessage),
    /// Periodic tick for loading timeout and notification auto-dismiss.
    Tick(Instant),
    /// Trigger the folder picker dialog.
    OpenFolderDialog,
    /// Result from the folder picker dialog.
    FolderDialogResult(Option<PathBuf>),
    /// A file or folder was dropped on the window.
    FileDropped(PathBuf),
    /// Result from async directory scanning.
    GalleryScanned {
        directory: PathBuf,
        result: Result<(Gallery, Option<String>), Error>,
        /// Image inside the scanned folder to select once the grid is built.
        select_path: Option<PathBuf>,
    },
    /// Result from prefetching a neighbor image in the background.
    ImagePrefetched {
        path: PathBuf,
        result: Result<ImageData, Error>,
    },
    /// The window was resized; grid layout and persisted geometry follow it.
    WindowResized(iced::Size),
    /// Window close was requested (user clicked X or pressed Alt+F4).
    WindowCloseRequested(iced::window::Id),
}

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `ro`, `en-US`).
    pub lang: Option<String>,
    /// Optional directory to scan on startup instead of the last opened one.
    pub directory: Option<PathBuf>,
}
