// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use kamera::app::AppModel;
use kamera::backends::camera::CameraFacing;
use kamera::constants::ui;
use kamera::i18n;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "kamera")]
#[command(about = "Minimal camera application for the COSMIC desktop")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available cameras
    List,

    /// Take a photo
    Photo {
        /// Camera to use (front or back)
        #[arg(short, long, default_value_t = CameraFacing::Back)]
        facing: CameraFacing,

        /// Output directory (default: ~/Pictures/Kamera)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fire the flash LEDs before capturing
        #[arg(long)]
        flash: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG to control the log level, e.g. RUST_LOG=kamera=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List) => cli::list_cameras(),
        Some(Commands::Photo {
            facing,
            output,
            flash,
        }) => cli::take_photo(facing, output, flash),
        None => run_gui(),
    }
}

fn run_gui() -> Result<(), Box<dyn std::error::Error>> {
    // Settings for configuring the application window and iced runtime.
    let settings = cosmic::app::Settings::default().size_limits(
        cosmic::iced::Limits::NONE
            .min_width(ui::MIN_WINDOW_WIDTH)
            .min_height(ui::MIN_WINDOW_HEIGHT),
    );

    // Starts the application's event loop with `()` as the application's flags.
    cosmic::app::run::<AppModel>(settings, ())?;

    Ok(())
}
