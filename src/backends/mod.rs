pub mod elevenlabs;
pub mod openai;

use crate::error::GenerationResult;

pub use elevenlabs::{ElevenLabsClient, SpeechRequest};
pub use openai::{ChatCompletionRequest, OpenAiClient};

/// Text completion provider: one prompt in, generated text out.
#[cfg_attr(test, mockall::automock)]
pub trait TextGenerator {
    fn complete(&self, prompt: &str) -> GenerationResult<String>;

    /// Short provider name used in logs.
    fn id(&self) -> &'static str;
}

/// Speech synthesis provider: one script in, encoded audio out.
///
/// How an error payload is told apart from audio is up to the implementation.
#[cfg_attr(test, mockall::automock)]
pub trait SpeechSynthesizer {
    fn synthesize(&self, script: &str) -> GenerationResult<Vec<u8>>;

    fn id(&self) -> &'static str;
}
