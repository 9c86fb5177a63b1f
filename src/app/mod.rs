// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration between the grid and the lightbox.
//!
//! The `App` struct wires together the domains (gallery, localization,
//! notifications) and translates component effects into side effects like
//! config persistence or image loading. This file intentionally keeps policy
//! decisions (minimum window size, startup folder resolution, prefetch
//! scheduling) close to the main update loop so it is easy to audit
//! user-facing behavior.

mod message;
mod subscription;
mod view;

pub use message::{Flags, Message};

use crate::config::{self, Config, SortOrder};
use crate::error::Error;
use crate::gallery::Gallery;
use crate::i18n::fluent::I18n;
use crate::media::prefetch::{
    load_image_for_prefetch, neighbor_paths, PrefetchCache, PrefetchConfig,
};
use crate::media::{self, extensions};
use crate::ui::grid;
use crate::ui::lightbox;
use crate::ui::notifications;
use crate::ui::theming::ThemeMode;
use fluent_bundle::FluentArgs;
use iced::{window, Element, Size, Subscription, Task, Theme};
use std::fmt;
use std::path::PathBuf;

pub const WINDOW_DEFAULT_WIDTH: u32 = 1024;
pub const WINDOW_DEFAULT_HEIGHT: u32 = 720;
pub const MIN_WINDOW_WIDTH: u32 = 480;
pub const MIN_WINDOW_HEIGHT: u32 = 360;

/// Root Iced application state that bridges UI components, localization, and
/// persisted preferences.
pub struct App {
    pub i18n: I18n,
    config: Config,
    gallery: Gallery,
    grid: grid::State,
    lightbox: lightbox::State,
    /// Toast notification manager for user feedback.
    notifications: notifications::Manager,
    /// Cache of decoded neighbor images for instant navigation.
    prefetch_cache: PrefetchCache,
    theme_mode: ThemeMode,
    /// Whether captions are shown under thumbnails and in the lightbox.
    show_captions: bool,
    sort_order: SortOrder,
    /// Decode bound for generated thumbnails, in pixels.
    thumbnail_px: u32,
    /// Last known window size, persisted on close.
    window_size: Option<Size>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("gallery_len", &self.gallery.len())
            .field("lightbox_open", &self.lightbox.is_open())
            .finish()
    }
}

/// Builds the window settings from persisted geometry.
pub fn window_settings(config: &Config) -> window::Settings {
    window::Settings {
        size: initial_window_size(config),
        min_size: Some(Size::new(MIN_WINDOW_WIDTH as f32, MIN_WINDOW_HEIGHT as f32)),
        icon: crate::icon::load_window_icon(),
        ..window::Settings::default()
    }
}

fn initial_window_size(config: &Config) -> Size {
    let width = config
        .window
        .width
        .unwrap_or(WINDOW_DEFAULT_WIDTH)
        .max(MIN_WINDOW_WIDTH);
    let height = config
        .window
        .height
        .unwrap_or(WINDOW_DEFAULT_HEIGHT)
        .max(MIN_WINDOW_HEIGHT);
    Size::new(width as f32, height as f32)
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    let (config, config_warning) = config::load();
    let settings = window_settings(&config);

    // Wrap the startup state in RefCell<Option<_>> to satisfy the Fn trait
    // requirement while only consuming it once (iced 0.14 requires Fn, not
    // FnOnce)
    let boot_state = RefCell::new(Some((flags, config, config_warning)));
    let boot = move || {
        let (flags, config, config_warning) = boot_state
            .borrow_mut()
            .take()
            .expect("Boot function called more than once");
        App::new(flags, config, config_warning)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(settings)
        .subscription(App::subscription)
        .run()
}

impl Default for App {
    fn default() -> Self {
        Self {
            i18n: I18n::default(),
            config: Config::default(),
            gallery: Gallery::default(),
            grid: grid::State::default(),
            lightbox: lightbox::State::default(),
            notifications: notifications::Manager::new(),
            prefetch_cache: PrefetchCache::with_defaults(),
            theme_mode: ThemeMode::System,
            show_captions: true,
            sort_order: SortOrder::default(),
            thumbnail_px: config::DEFAULT_THUMBNAIL_SIZE,
            window_size: None,
        }
    }
}

impl App {
    /// Initializes application state and kicks off the startup folder scan
    /// based on `Flags` received from the launcher.
    fn new(flags: Flags, config: Config, config_warning: Option<String>) -> (Self, Task<Message>) {
        let i18n = I18n::new(flags.lang.clone(), &config);

        let mut app = App {
            i18n,
            ..Self::default()
        };

        app.theme_mode = config.general.theme_mode;
        app.sort_order = config.gallery.sort_order.unwrap_or_default();
        app.show_captions = config.gallery.show_captions.unwrap_or(true);
        app.thumbnail_px = config::clamp_thumbnail_size(
            config
                .gallery
                .thumbnail_size
                .unwrap_or(config::DEFAULT_THUMBNAIL_SIZE),
        );
        app.prefetch_cache = PrefetchCache::new(PrefetchConfig::from_cache_config(&config.cache));

        let size = initial_window_size(&config);
        app.window_size = Some(size);
        app.grid.set_viewport(size.width, size.height);

        if let Some(key) = config_warning {
            app.notifications
                .push(notifications::Notification::warning(key));
        }

        // The command line wins over the remembered folder
        let startup_directory = flags.directory.or_else(|| {
            config
                .general
                .last_directory
                .clone()
                .filter(|dir| dir.is_dir())
        });

        app.config = config;

        let task = match startup_directory {
            Some(directory) => scan_task(directory, app.sort_order, None),
            None => Task::none(),
        };

        (app, task)
    }

    fn title(&self) -> String {
        let folder = self
            .gallery
            .directory()
            .and_then(|dir| dir.file_name())
            .and_then(|name| name.to_str());

        match folder {
            Some(name) => {
                let mut args = FluentArgs::new();
                args.set("name", name);
                self.i18n.tr_with_args("window-title-with-name", &args)
            }
            None => self.i18n.tr("window-title"),
        }
    }

    fn theme(&self) -> Theme {
        if self.theme_mode.is_dark() {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        let event_sub = subscription::create_event_subscription(self.lightbox.is_open());
        let tick_sub = subscription::create_tick_subscription(
            self.lightbox.is_loading(),
            self.notifications.has_notifications(),
        );

        Subscription::batch([event_sub, tick_sub])
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(view::ViewContext {
            i18n: &self.i18n,
            gallery: &self.gallery,
            grid: &self.grid,
            lightbox: &self.lightbox,
            notifications: &self.notifications,
            show_captions: self.show_captions,
            theme_mode: self.theme_mode,
        })
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Grid(grid_message) => {
                let (effect, task) = self.grid.handle_message(grid_message);
                let effect_task = self.handle_grid_effect(effect);
                Task::batch([task.map(Message::Grid), effect_task])
            }
            Message::Lightbox(lightbox_message) => {
                let (effect, task) = self.lightbox.handle_message(lightbox_message);
                let effect_task = self.handle_lightbox_effect(effect);
                Task::batch([task.map(Message::Lightbox), effect_task])
            }
            Message::Notification(notification_message) => {
                self.notifications.handle_message(&notification_message);
                Task::none()
            }
            Message::Tick(_instant) => {
                // The tick drives the loading timeout check and toast expiry;
                // the view picks up the state changes on the next render
                self.lightbox.check_loading_timeout();
                self.notifications.tick();
                Task::none()
            }
            Message::OpenFolderDialog => {
                open_folder_dialog_task(self.config.general.last_directory.clone())
            }
            Message::FolderDialogResult(Some(directory)) => {
                scan_task(directory, self.sort_order, None)
            }
            Message::FolderDialogResult(None) => Task::none(),
            Message::FileDropped(path) => self.handle_file_dropped(path),
            Message::GalleryScanned {
                directory,
                result,
                select_path,
            } => match result {
                Ok((gallery, caption_warning)) => {
                    self.install_gallery(directory, gallery, caption_warning, select_path)
                }
                Err(_) => {
                    self.notifications.push(notifications::Notification::warning(
                        "notification-scan-dir-error",
                    ));
                    Task::none()
                }
            },
            Message::ImagePrefetched { path, result } => {
                // Prefetching is best effort; failures resurface on demand load
                if let Ok(image) = result {
                    self.prefetch_cache.insert(path, image);
                }
                Task::none()
            }
            Message::WindowResized(size) => {
                self.window_size = Some(size);
                self.grid.set_viewport(size.width, size.height);
                Task::none()
            }
            Message::WindowCloseRequested(id) => {
                self.persist_session();
                window::close(id)
            }
        }
    }

    fn handle_grid_effect(&mut self, effect: grid::Effect) -> Task<Message> {
        match effect {
            grid::Effect::None => Task::none(),
            grid::Effect::Activated { index } => self.open_lightbox(index),
            grid::Effect::OpenFolderDialog => {
                open_folder_dialog_task(self.config.general.last_directory.clone())
            }
        }
    }

    fn handle_lightbox_effect(&mut self, effect: lightbox::Effect) -> Task<Message> {
        match effect {
            lightbox::Effect::None => Task::none(),
            lightbox::Effect::Closed { origin } => {
                // Hand the selection back to the grid and bring the
                // originating thumbnail into view
                self.grid.select(origin);
                self.grid.snap_task().map(Message::Grid)
            }
            lightbox::Effect::Navigated { index } => {
                self.grid.select(index);
                Task::batch([self.load_current_image(), self.schedule_prefetch()])
            }
        }
    }

    /// Opens the lightbox on `index` and starts loading its image.
    fn open_lightbox(&mut self, index: usize) -> Task<Message> {
        if !self.lightbox.open(index) {
            return Task::none();
        }
        Task::batch([self.load_current_image(), self.schedule_prefetch()])
    }

    /// Resolves the current lightbox image from the prefetch cache, or spawns
    /// a background load when it is not cached.
    fn load_current_image(&mut self) -> Task<Message> {
        let index = self.lightbox.current_index();
        let Some(item) = self.gallery.get(index) else {
            return Task::none();
        };
        let path = item.path.clone();

        if let Some(image) = self.prefetch_cache.get(&path) {
            let (_effect, task) = self
                .lightbox
                .handle_message(lightbox::Message::ImageLoaded {
                    index,
                    result: Ok(image),
                });
            return task.map(Message::Lightbox);
        }

        image_load_task(index, path)
    }

    /// Spawns background loads for the uncached neighbors of the current
    /// selection.
    fn schedule_prefetch(&mut self) -> Task<Message> {
        if !self.prefetch_cache.is_enabled() {
            return Task::none();
        }

        let paths = self.gallery.paths();
        let neighbors = neighbor_paths(
            &paths,
            self.lightbox.current_index(),
            self.prefetch_cache.prefetch_count(),
        );
        let pending = self.prefetch_cache.paths_to_prefetch(&neighbors);

        Task::batch(pending.into_iter().map(|path| {
            Task::perform(load_image_for_prefetch(path), |(path, result)| {
                Message::ImagePrefetched { path, result }
            })
        }))
    }

    /// Replaces the gallery after a scan and rebuilds the dependent component
    /// states around the new item count.
    fn install_gallery(
        &mut self,
        directory: PathBuf,
        gallery: Gallery,
        caption_warning: Option<String>,
        select_path: Option<PathBuf>,
    ) -> Task<Message> {
        // Notifications about the previous folder are stale now
        self.notifications
            .clear_by_key_prefix("notification-scan");
        self.notifications
            .clear_by_key_prefix("notification-captions");

        let count = gallery.len();
        self.gallery = gallery;
        self.grid = grid::State::new(count);
        self.lightbox = lightbox::State::new(count);
        self.prefetch_cache.clear();

        if let Some(size) = self.window_size {
            self.grid.set_viewport(size.width, size.height);
        }

        // Remember the folder so the next launch reopens it
        self.config.general.last_directory = Some(directory);
        let _ = config::save(&self.config);

        if let Some(key) = caption_warning {
            self.notifications
                .push(notifications::Notification::warning(key));
        }

        let mut tasks: Vec<Task<Message>> = self
            .gallery
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| thumbnail_task(index, item.path.clone(), self.thumbnail_px))
            .collect();

        if let Some(path) = select_path {
            let found = self
                .gallery
                .items()
                .iter()
                .position(|item| item.path == path);
            if let Some(index) = found {
                self.grid.select(index);
                tasks.push(self.grid.snap_task().map(Message::Grid));
            }
        }

        Task::batch(tasks)
    }

    fn handle_file_dropped(&mut self, path: PathBuf) -> Task<Message> {
        if path.is_dir() {
            return scan_task(path, self.sort_order, None);
        }

        // A dropped image opens its folder with that image selected
        if extensions::path_is_supported(&path) {
            if let Some(parent) = path.parent() {
                return scan_task(parent.to_path_buf(), self.sort_order, Some(path));
            }
        }

        Task::none()
    }

    /// Writes window geometry and the open folder back to the config file.
    fn persist_session(&mut self) {
        if let Some(size) = self.window_size {
            self.config.window.width = Some(size.width as u32);
            self.config.window.height = Some(size.height as u32);
        }
        if let Some(directory) = self.gallery.directory() {
            self.config.general.last_directory = Some(directory.to_path_buf());
        }
        let _ = config::save(&self.config);
    }
}

/// Scans `directory` off the UI thread and reports back as a message.
fn scan_task(
    directory: PathBuf,
    sort_order: SortOrder,
    select_path: Option<PathBuf>,
) -> Task<Message> {
    Task::perform(
        async move {
            let scanned = tokio::task::spawn_blocking({
                let directory = directory.clone();
                move || Gallery::scan_directory(&directory, sort_order)
            })
            .await;

            let result = match scanned {
                Ok(inner) => inner,
                Err(_) => Err(Error::Io("background scan task failed".into())),
            };
            (directory, result)
        },
        move |(directory, result)| Message::GalleryScanned {
            directory,
            result,
            select_path: select_path.clone(),
        },
    )
}

/// Loads the thumbnail for one gallery item off the UI thread.
fn thumbnail_task(index: usize, path: PathBuf, max_px: u32) -> Task<Message> {
    Task::perform(
        async move {
            let loaded =
                tokio::task::spawn_blocking(move || media::load_thumbnail(&path, max_px)).await;
            match loaded {
                Ok(inner) => inner,
                Err(_) => Err(Error::Io("background thumbnail task failed".into())),
            }
        },
        move |result| Message::Grid(grid::Message::ThumbnailLoaded { index, result }),
    )
}

/// Loads the full-size image for the lightbox off the UI thread.
fn image_load_task(index: usize, path: PathBuf) -> Task<Message> {
    Task::perform(
        async move {
            let loaded = tokio::task::spawn_blocking(move || media::load_image(&path)).await;
            match loaded {
                Ok(inner) => inner,
                Err(_) => Err(Error::Io("background image task failed".into())),
            }
        },
        move |result| Message::Lightbox(lightbox::Message::ImageLoaded { index, result }),
    )
}

/// Opens the system folder picker, starting from the last opened folder.
fn open_folder_dialog_task(last_directory: Option<PathBuf>) -> Task<Message> {
    Task::perform(
        async move {
            let mut dialog = rfd::AsyncFileDialog::new();

            if let Some(dir) = last_directory {
                if dir.exists() {
                    dialog = dialog.set_directory(&dir);
                }
            }

            dialog
                .pick_folder()
                .await
                .map(|handle| handle.path().to_path_buf())
        },
        Message::FolderDialogResult,
    )
}
