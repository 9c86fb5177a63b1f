// SPDX-License-Identifier: MPL-2.0
//! Binary entry point: parses command line arguments and starts the app.

use iced_lightbox::app::{self, Flags};
use std::path::PathBuf;

const HELP: &str = "\
iced_lightbox - folder image gallery with a lightbox overlay

USAGE:
    iced_lightbox [OPTIONS] [DIRECTORY]

ARGS:
    <DIRECTORY>    Folder to open at startup (defaults to the last opened one)

OPTIONS:
    --lang <LOCALE>    Override the UI language (e.g. en-US, ro)
    -h, --help         Print this help text
    -V, --version      Print the version
";

fn main() -> iced::Result {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    if args.contains(["-V", "--version"]) {
        println!("iced_lightbox {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let lang = match args.opt_value_from_str("--lang") {
        Ok(lang) => lang,
        Err(error) => {
            eprintln!("error: {error}");
            eprintln!("Run with --help for usage.");
            std::process::exit(2);
        }
    };

    let directory = args.finish().into_iter().next().map(PathBuf::from);

    app::run(Flags { lang, directory })
}
