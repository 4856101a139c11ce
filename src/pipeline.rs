//! Staged Details -> Script -> Audio controller with operator confirmation gates.
//!
//! Each call to [`PipelineController::step`] performs exactly one transition.
//! Rejecting the details starts over from a fresh details generation and drops
//! everything downstream; rejecting the script regenerates only the script from
//! the same approved details. Audio has no gate: once synthesis succeeds the
//! artifact is persisted and the run is complete. Any generation, operator or
//! persistence failure aborts the run without retrying.

use crate::backends::{SpeechSynthesizer, TextGenerator};
use crate::error::{PipelineError, Stage};
use crate::operator::Operator;
use crate::persistence::{Artifact, ArtifactSink};
use crate::prompts::{script_prompt, DETAILS_PROMPT};
use std::path::PathBuf;
use tracing::{debug, error, info};

const PROCEED_QUESTION: &str = "Would you like to proceed?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    AwaitingDetails,
    AwaitingDetailsConfirmation { details: String },
    AwaitingScript { details: String },
    AwaitingScriptConfirmation { details: String, script: String },
    AwaitingAudio { script: String },
    Completed { location: PathBuf },
    Aborted { stage: Stage, reason: String },
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineState::Completed { .. } | PipelineState::Aborted { .. }
        )
    }

    /// Stage being worked on, `None` once the run has finished.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineState::AwaitingDetails | PipelineState::AwaitingDetailsConfirmation { .. } => {
                Some(Stage::Details)
            }
            PipelineState::AwaitingScript { .. }
            | PipelineState::AwaitingScriptConfirmation { .. } => Some(Stage::Script),
            PipelineState::AwaitingAudio { .. } => Some(Stage::Audio),
            PipelineState::Completed { .. } | PipelineState::Aborted { .. } => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            PipelineState::AwaitingDetails => "awaiting_details",
            PipelineState::AwaitingDetailsConfirmation { .. } => "awaiting_details_confirmation",
            PipelineState::AwaitingScript { .. } => "awaiting_script",
            PipelineState::AwaitingScriptConfirmation { .. } => "awaiting_script_confirmation",
            PipelineState::AwaitingAudio { .. } => "awaiting_audio",
            PipelineState::Completed { .. } => "completed",
            PipelineState::Aborted { .. } => "aborted",
        }
    }
}

pub struct PipelineController {
    text: Box<dyn TextGenerator>,
    speech: Box<dyn SpeechSynthesizer>,
    operator: Box<dyn Operator>,
    sink: Box<dyn ArtifactSink>,
    callback_number: String,
    state: PipelineState,
    details_attempts: u32,
    script_attempts: u32,
}

impl PipelineController {
    pub fn new(
        text: Box<dyn TextGenerator>,
        speech: Box<dyn SpeechSynthesizer>,
        operator: Box<dyn Operator>,
        sink: Box<dyn ArtifactSink>,
        callback_number: impl Into<String>,
    ) -> Self {
        Self {
            text,
            speech,
            operator,
            sink,
            callback_number: callback_number.into(),
            state: PipelineState::AwaitingDetails,
            details_attempts: 0,
            script_attempts: 0,
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Drives the pipeline until it completes or aborts.
    pub fn run(&mut self) -> Result<PathBuf, PipelineError> {
        loop {
            match &self.state {
                PipelineState::Completed { location } => return Ok(location.clone()),
                PipelineState::Aborted { stage, reason } => {
                    return Err(PipelineError::Aborted {
                        stage: *stage,
                        reason: reason.clone(),
                    })
                }
                _ => self.step()?,
            }
        }
    }

    /// Performs one transition. A no-op once the run has finished.
    pub fn step(&mut self) -> Result<(), PipelineError> {
        let Some(stage) = self.state.stage() else {
            return Ok(());
        };

        let current = std::mem::replace(&mut self.state, PipelineState::AwaitingDetails);
        let from = current.name();
        match self.advance(current) {
            Ok(next) => {
                debug!(target = "pipeline", from, to = next.name(), "transition");
                self.state = next;
                Ok(())
            }
            Err(err) => {
                error!(target = "pipeline", %stage, error = %err, "pipeline aborted");
                self.state = PipelineState::Aborted {
                    stage,
                    reason: err.to_string(),
                };
                Err(err)
            }
        }
    }

    fn advance(&mut self, state: PipelineState) -> Result<PipelineState, PipelineError> {
        match state {
            PipelineState::AwaitingDetails => {
                self.details_attempts += 1;
                self.script_attempts = 0;
                info!(target = "pipeline", attempt = self.details_attempts, "generating details");
                self.announce("Generating IT support department details...")?;

                let details = self
                    .text
                    .complete(DETAILS_PROMPT)
                    .map_err(|source| PipelineError::Generation {
                        stage: Stage::Details,
                        source,
                    })?;
                Ok(PipelineState::AwaitingDetailsConfirmation { details })
            }

            PipelineState::AwaitingDetailsConfirmation { details } => {
                self.operator
                    .show("Generated Details", &details)
                    .map_err(PipelineError::Operator)?;
                if self.confirm()? {
                    Ok(PipelineState::AwaitingScript { details })
                } else {
                    info!(target = "pipeline", "details rejected; starting over");
                    Ok(PipelineState::AwaitingDetails)
                }
            }

            PipelineState::AwaitingScript { details } => {
                self.script_attempts += 1;
                info!(target = "pipeline", attempt = self.script_attempts, "generating script");
                self.announce("Generating IT security alert script...")?;

                let prompt = script_prompt(&details, &self.callback_number);
                let script = self
                    .text
                    .complete(&prompt)
                    .map_err(|source| PipelineError::Generation {
                        stage: Stage::Script,
                        source,
                    })?;
                Ok(PipelineState::AwaitingScriptConfirmation { details, script })
            }

            PipelineState::AwaitingScriptConfirmation { details, script } => {
                self.operator
                    .show("Generated Script", &script)
                    .map_err(PipelineError::Operator)?;
                if self.confirm()? {
                    Ok(PipelineState::AwaitingAudio { script })
                } else {
                    info!(target = "pipeline", "script rejected; regenerating from approved details");
                    Ok(PipelineState::AwaitingScript { details })
                }
            }

            PipelineState::AwaitingAudio { script } => {
                info!(target = "pipeline", "synthesizing voicemail");
                self.announce("Generating voicemail...")?;

                let audio = self
                    .speech
                    .synthesize(&script)
                    .map_err(|source| PipelineError::Generation {
                        stage: Stage::Audio,
                        source,
                    })?;
                let location = self
                    .sink
                    .persist(Artifact::new(audio, script))
                    .map_err(PipelineError::Persistence)?;

                self.announce(&format!("Voicemail saved as '{}'.", location.display()))?;
                Ok(PipelineState::Completed { location })
            }

            finished @ (PipelineState::Completed { .. } | PipelineState::Aborted { .. }) => {
                Ok(finished)
            }
        }
    }

    fn announce(&mut self, message: &str) -> Result<(), PipelineError> {
        self.operator
            .announce(message)
            .map_err(PipelineError::Operator)
    }

    fn confirm(&mut self) -> Result<bool, PipelineError> {
        self.operator
            .confirm(PROCEED_QUESTION)
            .map_err(PipelineError::Operator)
    }
}
