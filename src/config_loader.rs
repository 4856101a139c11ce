use crate::error::MissingCredentials;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";
pub const ELEVENLABS_KEY_VAR: &str = "ELEVENLABS_API_KEY";

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
const DEFAULT_MAX_TOKENS: u32 = 1500;
const DEFAULT_ELEVENLABS_URL: &str = "https://api.elevenlabs.io/v1/text-to-speech";
const DEFAULT_ELEVENLABS_MODEL: &str = "eleven_multilingual_v2";
const DEFAULT_VOICE_ID: &str = "nPczCjzI2devNBz1zQrb";
const DEFAULT_STABILITY: f32 = 0.8;
const DEFAULT_SIMILARITY_BOOST: f32 = 0.65;
const DEFAULT_MIN_AUDIO_BYTES: usize = 1024;
// 555-01xx numbers are reserved for fictional use.
const DEFAULT_CALLBACK_NUMBER: &str = "1-800-555-0123";
const DEFAULT_OUTPUT_FILE: &str = "voicemail.mp3";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    // Text completion provider
    pub openai_url: String,
    pub openai_model: String,
    pub max_tokens: u32,
    // Speech synthesis provider
    pub elevenlabs_url: String,
    pub elevenlabs_model: String,
    pub voice_id: String,
    pub stability: f32,
    pub similarity_boost: f32,
    /// Responses shorter than this are treated as provider error payloads.
    pub min_audio_bytes: usize,
    // Script content
    pub callback_number: String,
    // Output
    pub output_dir: PathBuf,
    pub output_file: String,
    pub save_script: bool,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openai_url: DEFAULT_OPENAI_URL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            elevenlabs_url: DEFAULT_ELEVENLABS_URL.to_string(),
            elevenlabs_model: DEFAULT_ELEVENLABS_MODEL.to_string(),
            voice_id: DEFAULT_VOICE_ID.to_string(),
            stability: DEFAULT_STABILITY,
            similarity_boost: DEFAULT_SIMILARITY_BOOST,
            min_audio_bytes: DEFAULT_MIN_AUDIO_BYTES,
            callback_number: DEFAULT_CALLBACK_NUMBER.to_string(),
            output_dir: PathBuf::from("."),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            save_script: false,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Layers defaults, the optional `Voicemail.*` files, an explicit config file
    /// and `VOICEMAIL_*` environment variables, in that order.
    pub fn load(explicit: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut search = vec![PathBuf::from("Voicemail")];
        if let Some(config_dir) = dirs::config_dir() {
            search.push(config_dir.join("voicemail-studio").join("Voicemail"));
        }
        Self::load_from(&search, explicit)
    }

    /// Same as [`Settings::load`] with the optional file layers given explicitly.
    /// Paths without an extension are resolved against the supported formats.
    pub fn load_from(search: &[PathBuf], explicit: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder()
            .set_default("openai_url", DEFAULT_OPENAI_URL)?
            .set_default("openai_model", DEFAULT_OPENAI_MODEL)?
            .set_default("max_tokens", i64::from(DEFAULT_MAX_TOKENS))?
            .set_default("elevenlabs_url", DEFAULT_ELEVENLABS_URL)?
            .set_default("elevenlabs_model", DEFAULT_ELEVENLABS_MODEL)?
            .set_default("voice_id", DEFAULT_VOICE_ID)?
            .set_default("stability", DEFAULT_STABILITY as f64)?
            .set_default("similarity_boost", DEFAULT_SIMILARITY_BOOST as f64)?
            .set_default("min_audio_bytes", DEFAULT_MIN_AUDIO_BYTES as i64)?
            .set_default("callback_number", DEFAULT_CALLBACK_NUMBER)?
            .set_default("output_dir", ".")?
            .set_default("output_file", DEFAULT_OUTPUT_FILE)?
            .set_default("save_script", false)?
            .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS as i64)?;

        for path in search {
            builder = builder.add_source(File::from(path.as_path()).required(false));
        }
        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        // e.g. VOICEMAIL_CALLBACK_NUMBER, VOICEMAIL_MAX_TOKENS. Values stay strings
        // here; numeric fields are converted on deserialization so a number like
        // +18005550123 keeps its sign and leading zeros.
        let builder = builder.add_source(Environment::with_prefix("VOICEMAIL"));

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if !(0.0..=1.0).contains(&self.stability) {
            return Err(config::ConfigError::Message(format!(
                "Invalid stability: {}. Must be between 0.0 and 1.0",
                self.stability
            )));
        }
        if !(0.0..=1.0).contains(&self.similarity_boost) {
            return Err(config::ConfigError::Message(format!(
                "Invalid similarity_boost: {}. Must be between 0.0 and 1.0",
                self.similarity_boost
            )));
        }
        if self.max_tokens == 0 {
            return Err(config::ConfigError::Message(
                "max_tokens must be greater than 0".to_string(),
            ));
        }
        if self.min_audio_bytes == 0 {
            return Err(config::ConfigError::Message(
                "min_audio_bytes must be greater than 0".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.callback_number.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "callback_number must not be empty".to_string(),
            ));
        }
        if self.output_file.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "output_file must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }
}

/// API keys for both providers. Never printed.
#[derive(Clone)]
pub struct Credentials {
    openai_api_key: String,
    elevenlabs_api_key: String,
}

impl Credentials {
    pub fn new(openai_api_key: impl Into<String>, elevenlabs_api_key: impl Into<String>) -> Self {
        Self {
            openai_api_key: openai_api_key.into(),
            elevenlabs_api_key: elevenlabs_api_key.into(),
        }
    }

    pub fn from_env() -> Result<Self, MissingCredentials> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MissingCredentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let openai = lookup(OPENAI_KEY_VAR).filter(|s| !s.trim().is_empty());
        let elevenlabs = lookup(ELEVENLABS_KEY_VAR).filter(|s| !s.trim().is_empty());

        match (openai, elevenlabs) {
            (Some(openai), Some(elevenlabs)) => Ok(Self::new(openai, elevenlabs)),
            (openai, elevenlabs) => {
                let mut missing = Vec::new();
                if openai.is_none() {
                    missing.push(OPENAI_KEY_VAR);
                }
                if elevenlabs.is_none() {
                    missing.push(ELEVENLABS_KEY_VAR);
                }
                Err(MissingCredentials { missing })
            }
        }
    }

    pub fn openai_api_key(&self) -> &str {
        &self.openai_api_key
    }

    pub fn elevenlabs_api_key(&self) -> &str {
        &self.elevenlabs_api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &"<redacted>")
            .field("elevenlabs_api_key", &"<redacted>")
            .finish()
    }
}
