use crate::backends::{AssetMedium, BackendKind};
use crate::error::AssetError;
use config::{Config, File};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A credential that never shows up in `Debug` output.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "Secret(<unset>)")
        } else {
            write!(f, "Secret(<redacted>)")
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    // Paths
    pub game_data_path: PathBuf,
    pub audio_dir: PathBuf,
    pub image_dir: PathBuf,
    pub migration_path: PathBuf,
    // Speech synthesis
    pub tts_backend: String, // "gtts" or "openai"
    pub tts_language: String,
    pub gtts_url: String,
    pub openai_url: String,
    pub openai_api_key: Secret,
    pub openai_model: String,
    pub openai_voice: String,
    pub openai_speed: f32,
    // Images
    pub image_backend: String, // "placeholder"
    pub image_prompt_template: String,
    pub placeholder_delay_ms: u64,
    pub placeholder_size: u32,
    // Batching
    pub audio_batch_size: usize,
    pub audio_batch_pause_ms: u64,
    pub image_batch_size: usize,
    pub image_batch_pause_ms: u64,
    // Remote services
    pub request_timeout_secs: u64,
    pub supabase_url: String,
    pub service_role_key: Secret,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            game_data_path: PathBuf::from("src/assets/game-data.json"),
            audio_dir: PathBuf::from("public/audio"),
            image_dir: PathBuf::from("public/game-images"),
            migration_path: PathBuf::from("supabase/migrations/20241224_create_sinbad_tables.sql"),
            tts_backend: "gtts".to_string(),
            tts_language: "ar".to_string(),
            gtts_url: "https://translate.google.com/translate_tts".to_string(),
            openai_url: "https://api.openai.com/v1/audio/speech".to_string(),
            openai_api_key: Secret::default(),
            openai_model: "tts-1".to_string(),
            openai_voice: "nova".to_string(),
            openai_speed: 0.9,
            image_backend: "placeholder".to_string(),
            image_prompt_template: "Child-friendly colorful cartoon illustration of {item}"
                .to_string(),
            placeholder_delay_ms: 500,
            placeholder_size: 512,
            audio_batch_size: 20,
            audio_batch_pause_ms: 0,
            image_batch_size: 10,
            image_batch_pause_ms: 2000,
            request_timeout_secs: 30,
            supabase_url: String::new(),
            service_role_key: Secret::default(),
        }
    }
}

impl Settings {
    /// Layers, lowest priority first: built-in defaults, `./Sinbad.*`,
    /// `~/.config/sinbad-assets/Sinbad.*`, `explicit`, `SINBAD_*` env vars.
    pub fn load(explicit: Option<&Path>) -> Result<Self, config::ConfigError> {
        let user_dir = dirs::config_dir().map(|dir| dir.join("sinbad-assets"));
        Self::load_from(Path::new("."), user_dir.as_deref(), explicit)
    }

    /// [`Settings::load`] with the project and per-user directories given
    /// explicitly.
    pub fn load_from(
        project_dir: &Path,
        user_dir: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<Self, config::ConfigError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            // Paths
            .set_default("game_data_path", path_str(&defaults.game_data_path))?
            .set_default("audio_dir", path_str(&defaults.audio_dir))?
            .set_default("image_dir", path_str(&defaults.image_dir))?
            .set_default("migration_path", path_str(&defaults.migration_path))?
            // Speech synthesis
            .set_default("tts_backend", defaults.tts_backend)?
            .set_default("tts_language", defaults.tts_language)?
            .set_default("gtts_url", defaults.gtts_url)?
            .set_default("openai_url", defaults.openai_url)?
            .set_default("openai_api_key", "")?
            .set_default("openai_model", defaults.openai_model)?
            .set_default("openai_voice", defaults.openai_voice)?
            .set_default("openai_speed", defaults.openai_speed as f64)?
            // Images
            .set_default("image_backend", defaults.image_backend)?
            .set_default("image_prompt_template", defaults.image_prompt_template)?
            .set_default("placeholder_delay_ms", defaults.placeholder_delay_ms)?
            .set_default("placeholder_size", defaults.placeholder_size as u64)?
            // Batching
            .set_default("audio_batch_size", defaults.audio_batch_size as u64)?
            .set_default("audio_batch_pause_ms", defaults.audio_batch_pause_ms)?
            .set_default("image_batch_size", defaults.image_batch_size as u64)?
            .set_default("image_batch_pause_ms", defaults.image_batch_pause_ms)?
            // Remote services
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            .set_default("supabase_url", "")?
            .set_default("service_role_key", "")?
            // Project-local and per-user config files (if they exist)
            .add_source(
                File::with_name(&path_str(&project_dir.join("Sinbad"))).required(false),
            );

        if let Some(user_dir) = user_dir {
            let user_file = user_dir.join("Sinbad");
            builder = builder.add_source(File::with_name(&path_str(&user_file)).required(false));
        }

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        // e.g. SINBAD_OPENAI_API_KEY, SINBAD_SUPABASE_URL
        builder = builder.add_source(config::Environment::with_prefix("SINBAD"));

        let mut settings: Settings = builder.build()?.try_deserialize()?;
        if settings.openai_api_key.is_empty() {
            if let Ok(key) = std::env::var("OPENAI_API_KEY") {
                settings.openai_api_key = Secret::new(key);
            }
        }
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        check_backend(&self.tts_backend, AssetMedium::Audio)?;
        check_backend(&self.image_backend, AssetMedium::Image)?;
        if self.audio_batch_size == 0 || self.image_batch_size == 0 {
            return Err(config::ConfigError::Message(
                "batch sizes must be greater than 0".to_string(),
            ));
        }
        if !(0.25..=4.0).contains(&self.openai_speed) {
            return Err(config::ConfigError::Message(format!(
                "Invalid openai_speed: {}. Must be between 0.25 and 4.0",
                self.openai_speed
            )));
        }
        if !self.image_prompt_template.contains("{item}") {
            return Err(config::ConfigError::Message(
                "image_prompt_template must contain '{item}'".to_string(),
            ));
        }
        if self.placeholder_size == 0 {
            return Err(config::ConfigError::Message(
                "placeholder_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn check_backend(name: &str, medium: AssetMedium) -> Result<(), config::ConfigError> {
    match BackendKind::for_medium(name, medium) {
        Ok(_) => Ok(()),
        Err(AssetError::Config(e)) => Err(e),
        Err(e) => Err(config::ConfigError::Message(e.to_string())),
    }
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_load() {
        let dir = tempfile::tempdir().unwrap();
        let settings =
            Settings::load_from(dir.path(), None, None).expect("Failed to load settings");
        let defaults = Settings::default();
        assert_eq!(settings.image_batch_size, defaults.image_batch_size);
        assert_eq!(settings.audio_dir, defaults.audio_dir);
        assert_eq!(settings.tts_backend, "gtts");
        assert!(settings.image_prompt_template.contains("{item}"));
    }

    #[test]
    #[serial]
    fn test_user_file_overrides_project_file() {
        let project = tempfile::tempdir().unwrap();
        let user = tempfile::tempdir().unwrap();
        std::fs::write(
            project.path().join("Sinbad.toml"),
            "image_batch_size = 5\naudio_batch_size = 7\n",
        )
        .unwrap();
        std::fs::write(user.path().join("Sinbad.toml"), "image_batch_size = 6\n").unwrap();

        let settings = Settings::load_from(project.path(), Some(user.path()), None).unwrap();
        assert_eq!(settings.image_batch_size, 6);
        assert_eq!(settings.audio_batch_size, 7);
    }

    #[test]
    #[serial]
    fn test_env_rejects_image_backend_for_speech() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("SINBAD_TTS_BACKEND", "placeholder");
        let result = Settings::load_from(dir.path(), None, None);
        std::env::remove_var("SINBAD_TTS_BACKEND");

        let err = result.unwrap_err();
        assert!(err.to_string().contains("placeholder"));
    }

    #[test]
    #[serial]
    fn test_env_override() {
        std::env::set_var("SINBAD_IMAGE_BATCH_SIZE", "4");
        std::env::set_var("SINBAD_SUPABASE_URL", "https://example.supabase.co");
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(dir.path(), None, None);
        std::env::remove_var("SINBAD_IMAGE_BATCH_SIZE");
        std::env::remove_var("SINBAD_SUPABASE_URL");

        let settings = settings.unwrap();
        assert_eq!(settings.image_batch_size, 4);
        assert_eq!(settings.supabase_url, "https://example.supabase.co");
    }

    #[test]
    #[serial]
    fn test_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "image_batch_size = 3\naudio_dir = \"out/audio\"\nopenai_voice = \"shimmer\"\n",
        )
        .unwrap();

        let settings = Settings::load_from(dir.path(), None, Some(&path)).unwrap();
        assert_eq!(settings.image_batch_size, 3);
        assert_eq!(settings.audio_dir, PathBuf::from("out/audio"));
        assert_eq!(settings.openai_voice, "shimmer");
    }

    #[test]
    #[serial]
    fn test_explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Settings::load_from(dir.path(), None, Some(&missing)).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_ok());

        settings.image_batch_size = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.openai_speed = 5.0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.image_prompt_template = "a cartoon".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_backend_for_wrong_medium() {
        let mut settings = Settings::default();
        settings.tts_backend = "openai".to_string();
        assert!(settings.validate().is_ok());

        settings.tts_backend = "placeholder".to_string();
        assert!(settings.validate().is_err());

        for name in ["gtts", "openai"] {
            let mut settings = Settings::default();
            settings.image_backend = name.to_string();
            assert!(settings.validate().is_err(), "{} accepted for images", name);
        }

        let mut settings = Settings::default();
        settings.tts_backend = "espeak".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_secrets_redacted() {
        let mut settings = Settings::default();
        settings.service_role_key = Secret::new("super-secret-token");
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("<redacted>"));
    }
}
