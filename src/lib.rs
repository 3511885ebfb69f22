//! Asset tooling for the Sinbad memory game.
//!
//! Derives which audio clips and item images the game needs, works out which
//! ones are missing on disk and generates them in paced batches.

pub mod backends;
pub mod catalog;
pub mod config_loader;
pub mod content;
pub mod driver;
pub mod error;
pub mod migrate;
pub mod pacer;
pub mod scanner;
pub mod slug;

pub use error::{AssetError, Result};

/// Installs the stderr log subscriber shared by the binaries.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
