//! ElevenLabs text-to-speech client.
//!
//! The endpoint returns either MP3 bytes or a JSON error document on the same
//! channel, and the transport hands back only the body. Bodies shorter than
//! `min_audio_bytes` are therefore read as error text. A very short but valid
//! clip would be misread; a content-type check can replace [`classify`]
//! without touching callers.

use super::SpeechSynthesizer;
use crate::config_loader::Settings;
use crate::error::{GenerationError, GenerationResult, TransportError};
use crate::transport::Transport;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize)]
pub struct SpeechRequest {
    pub text: String,
    pub model_id: String,
    pub voice_settings: VoiceSettings,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
}

pub struct ElevenLabsClient {
    transport: Arc<dyn Transport>,
    api_key: String,
    url: String,
    model_id: String,
    voice_settings: VoiceSettings,
    min_audio_bytes: usize,
}

impl ElevenLabsClient {
    pub fn new(settings: &Settings, api_key: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            api_key: api_key.to_string(),
            url: format!(
                "{}/{}",
                settings.elevenlabs_url.trim_end_matches('/'),
                settings.voice_id
            ),
            model_id: settings.elevenlabs_model.clone(),
            voice_settings: VoiceSettings {
                stability: settings.stability,
                similarity_boost: settings.similarity_boost,
            },
            min_audio_bytes: settings.min_audio_bytes,
        }
    }
}

impl SpeechSynthesizer for ElevenLabsClient {
    fn id(&self) -> &'static str {
        "elevenlabs"
    }

    fn synthesize(&self, script: &str) -> GenerationResult<Vec<u8>> {
        if script.is_empty() {
            return Err(GenerationError::InvalidInput("script must not be empty"));
        }

        let request = SpeechRequest {
            text: script.to_string(),
            model_id: self.model_id.clone(),
            voice_settings: self.voice_settings,
        };
        let body = serde_json::to_vec(&request)
            .map_err(|e| TransportError::Malformed(e.to_string()))?;
        let headers = [
            ("xi-api-key", self.api_key.clone()),
            ("Content-Type", "application/json".to_string()),
        ];

        debug!(target = "elevenlabs", url = %self.url, model = %self.model_id, "requesting synthesis");
        let response = self.transport.post(&self.url, body, &headers)?;

        let result = classify(response, self.min_audio_bytes);
        match &result {
            Ok(audio) => debug!(target = "elevenlabs", bytes = audio.len(), "audio received"),
            Err(e) => warn!(target = "elevenlabs", error = %e, "synthesis rejected"),
        }
        result
    }
}

pub(crate) fn classify(body: Vec<u8>, min_audio_bytes: usize) -> GenerationResult<Vec<u8>> {
    if body.len() < min_audio_bytes {
        return Err(GenerationError::Provider(
            String::from_utf8_lossy(&body).into_owned(),
        ));
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use proptest::prelude::*;
    use serde_json::Value;

    #[test]
    fn test_threshold_boundary() {
        let below = vec![0u8; 1023];
        assert!(matches!(classify(below, 1024), Err(GenerationError::Provider(_))));

        let exact = vec![0u8; 1024];
        assert_eq!(classify(exact, 1024).unwrap().len(), 1024);
    }

    #[test]
    fn test_short_body_becomes_error_message() {
        let body = br#"{"detail":{"status":"quota_exceeded"}}"#.to_vec();
        match classify(body, 1024) {
            Err(GenerationError::Provider(m)) => assert!(m.contains("quota_exceeded")),
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[test]
    fn test_request_shape_and_headers() {
        let mut transport = MockTransport::new();
        transport
            .expect_post()
            .withf(|url, body, headers| {
                let json: Value = serde_json::from_slice(body).unwrap();
                url == "https://api.elevenlabs.io/v1/text-to-speech/nPczCjzI2devNBz1zQrb"
                    && json["text"] == "Please call back."
                    && json["model_id"] == "eleven_multilingual_v2"
                    && (json["voice_settings"]["stability"].as_f64().unwrap() - 0.8).abs() < 1e-6
                    && (json["voice_settings"]["similarity_boost"].as_f64().unwrap() - 0.65).abs()
                        < 1e-6
                    && headers
                        .iter()
                        .any(|(k, v)| *k == "xi-api-key" && v == "xi-test")
            })
            .times(1)
            .returning(|_, _, _| Ok(vec![7u8; 2048]));

        let client = ElevenLabsClient::new(&Settings::default(), "xi-test", Arc::new(transport));
        assert_eq!(client.synthesize("Please call back.").unwrap().len(), 2048);
    }

    #[test]
    fn test_trailing_slash_in_base_url() {
        let settings = Settings {
            elevenlabs_url: "http://localhost/v1/text-to-speech/".to_string(),
            voice_id: "voice".to_string(),
            ..Settings::default()
        };
        let mut transport = MockTransport::new();
        transport
            .expect_post()
            .withf(|url, _, _| url == "http://localhost/v1/text-to-speech/voice")
            .times(1)
            .returning(|_, _, _| Ok(vec![1u8; 4096]));

        let client = ElevenLabsClient::new(&settings, "k", Arc::new(transport));
        assert!(client.synthesize("hi").is_ok());
    }

    #[test]
    fn test_empty_script_makes_no_request() {
        let mut transport = MockTransport::new();
        transport.expect_post().times(0);

        let client = ElevenLabsClient::new(&Settings::default(), "k", Arc::new(transport));
        assert!(matches!(client.synthesize(""), Err(GenerationError::InvalidInput(_))));
    }

    #[test]
    fn test_whitespace_script_is_sent() {
        let mut transport = MockTransport::new();
        transport
            .expect_post()
            .withf(|_, body, _| {
                let json: Value = serde_json::from_slice(body).unwrap();
                json["text"] == " "
            })
            .times(1)
            .returning(|_, _, _| Ok(vec![3u8; 2048]));

        let client = ElevenLabsClient::new(&Settings::default(), "k", Arc::new(transport));
        assert_eq!(client.synthesize(" ").unwrap().len(), 2048);
    }

    proptest! {
        #[test]
        fn prop_short_payloads_are_provider_errors(len in 0usize..1024) {
            let result = classify(vec![b'x'; len], 1024);
            prop_assert!(matches!(result, Err(GenerationError::Provider(_))));
        }

        #[test]
        fn prop_long_payloads_are_audio(len in 1024usize..16_384) {
            let result = classify(vec![0xFF; len], 1024);
            prop_assert_eq!(result.unwrap().len(), len);
        }
    }
}
