use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::info;

/// Final output of a completed run: the audio and the script it was voiced from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    audio: Vec<u8>,
    script: String,
}

impl Artifact {
    pub fn new(audio: Vec<u8>, script: String) -> Self {
        Self { audio, script }
    }

    pub fn audio(&self) -> &[u8] {
        &self.audio
    }

    pub fn script(&self) -> &str {
        &self.script
    }
}

/// Durable storage for the artifact. Takes ownership; nothing is kept after handoff.
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactSink {
    /// Returns where the audio was written.
    fn persist(&mut self, artifact: Artifact) -> io::Result<PathBuf>;
}

pub struct FileSink {
    dir: PathBuf,
    file_name: String,
    save_script: bool,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>, save_script: bool) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
            save_script,
        }
    }
}

impl ArtifactSink for FileSink {
    fn persist(&mut self, artifact: Artifact) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let audio_path = self.dir.join(&self.file_name);
        fs::write(&audio_path, artifact.audio())?;
        info!(target = "studio", path = %audio_path.display(), bytes = artifact.audio().len(), "voicemail saved");

        if self.save_script {
            let script_path = audio_path.with_extension("txt");
            fs::write(&script_path, artifact.script())?;
            info!(target = "studio", path = %script_path.display(), "script saved");
        }

        Ok(audio_path)
    }
}
