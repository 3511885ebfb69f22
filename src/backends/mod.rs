pub mod gtts;
pub mod openai;
pub mod placeholder;

use crate::config_loader::Settings;
use crate::error::{AssetError, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Trait that every asset generator implements.
/// The batch driver only cares whether a call succeeded, so backends are
/// interchangeable (free TTS, paid TTS, placeholder images, ...).
pub trait GenerationBackend: Send + Sync {
    /// Returns the unique ID of the backend (e.g., "gtts")
    fn id(&self) -> &'static str;

    /// Produces the asset for `text` at `output`.
    /// The parent directory may not exist yet.
    fn generate(&self, text: &str, output: &Path) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Google Translate voice, free
    Gtts,
    /// OpenAI speech API, paid, better quality
    OpenAi,
    /// Solid-colour tiles standing in for illustrations
    Placeholder,
}

/// What a backend writes, which must match the file extension it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetMedium {
    Audio,
    Image,
}

impl fmt::Display for AssetMedium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetMedium::Audio => write!(f, "audio"),
            AssetMedium::Image => write!(f, "image"),
        }
    }
}

impl BackendKind {
    pub fn medium(self) -> AssetMedium {
        match self {
            BackendKind::Gtts | BackendKind::OpenAi => AssetMedium::Audio,
            BackendKind::Placeholder => AssetMedium::Image,
        }
    }

    /// Parses a configured backend name and checks that it writes `medium`.
    /// An image backend behind the audio tool would leave PNG bytes in
    /// `.mp3` files that the scanner then treats as done.
    pub fn for_medium(name: &str, medium: AssetMedium) -> Result<Self> {
        let kind: BackendKind = name.parse()?;
        if kind.medium() != medium {
            return Err(AssetError::Config(config::ConfigError::Message(format!(
                "backend '{}' produces {} files, not {}",
                name.trim(),
                kind.medium(),
                medium
            ))));
        }
        Ok(kind)
    }
}

impl FromStr for BackendKind {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gtts" | "google" => Ok(BackendKind::Gtts),
            "openai" => Ok(BackendKind::OpenAi),
            "placeholder" => Ok(BackendKind::Placeholder),
            other => Err(AssetError::BackendUnavailable(format!(
                "unknown backend '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Gtts => write!(f, "Google TTS"),
            BackendKind::OpenAi => write!(f, "OpenAI TTS"),
            BackendKind::Placeholder => write!(f, "placeholder images"),
        }
    }
}

/// Builds the configured backend.
pub fn try_create_backend(kind: BackendKind, settings: &Settings) -> Result<Box<dyn GenerationBackend>> {
    let backend: Box<dyn GenerationBackend> = match kind {
        BackendKind::Gtts => Box::new(gtts::GttsBackend::from_settings(settings)?),
        BackendKind::OpenAi => Box::new(openai::OpenAiBackend::from_settings(settings)?),
        BackendKind::Placeholder => {
            Box::new(placeholder::PlaceholderImageBackend::from_settings(settings))
        }
    };
    Ok(backend)
}

/// Like [`try_create_backend`], but a backend that cannot be built turns
/// into one that fails every item, so the run still reports each of them.
pub fn create_backend(kind: BackendKind, settings: &Settings) -> Box<dyn GenerationBackend> {
    match try_create_backend(kind, settings) {
        Ok(backend) => backend,
        Err(e) => {
            tracing::warn!("{} unavailable: {}", kind, e);
            Box::new(UnavailableBackend::new(e.to_string()))
        }
    }
}

pub struct UnavailableBackend {
    reason: String,
}

impl UnavailableBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl GenerationBackend for UnavailableBackend {
    fn id(&self) -> &'static str {
        "unavailable"
    }

    fn generate(&self, _text: &str, _output: &Path) -> Result<()> {
        Err(AssetError::BackendUnavailable(self.reason.clone()))
    }
}

/// Writes through a sibling `.part` file so an interrupted run never leaves
/// a truncated asset that the scanner would count as done.
pub(crate) fn write_asset(output: &Path, bytes: &[u8]) -> Result<()> {
    if bytes.is_empty() {
        return Err(AssetError::Backend("backend returned no data".to_string()));
    }
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let partial = output.with_extension("part");
    std::fs::write(&partial, bytes)?;
    std::fs::rename(&partial, output)?;
    Ok(())
}

pub(crate) fn http_client(settings: &Settings) -> Result<reqwest::blocking::Client> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(settings.request_timeout())
        .build()?)
}

/// First `max` characters of a response body, for error messages.
pub(crate) fn truncate_body(body: &str, max: usize) -> String {
    body.chars().take(max).collect()
}
