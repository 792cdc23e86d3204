//! Render pipeline
//!
//! A [`Renderer`] owns a [`RenderConfig`], a [`CancelToken`] and an ordered
//! list of [`Stage`]s. Rendering feeds the output of each stage into the next:
//!
//! ```text
//! trim -> line-breaks -> whitespace
//!      -> major-section-heading -> section-heading
//!      -> paragraph -> blank-line -> poetic-line -> right-aligned-poetic-line
//!      -> verse -> note -> chapter-label -> selah
//! ```
//!
//! Cancellation is all-or-nothing per pass. When the token is raised while a
//! stage is scanning, that stage's partial output is discarded and its input
//! becomes the result of the whole render; later stages do not run.

pub mod stage;
pub mod stages;

pub use stage::{rewrite, Stage, StageContext, StageOutcome};
pub use stages::leading_major_section_heading;

use crate::cancel::CancelToken;
use crate::config::RenderConfig;
use crate::styled::{ClickRegion, StyledText};
use serde::Serialize;
use stages::*;

/// The fixed stage order used by [`Renderer::new`]
pub fn default_stages() -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(TrimWhitespace),
        Box::new(CollapseLineBreaks),
        Box::new(CollapseWhitespace),
        Box::new(MajorSectionHeading),
        Box::new(SectionHeading),
        Box::new(Paragraph),
        Box::new(BlankLine),
        Box::new(PoeticLine),
        Box::new(RightAlignedPoeticLine),
        Box::new(Verses),
        Box::new(Notes),
        Box::new(ChapterLabel),
        Box::new(Selah),
    ]
}

/// Outcome of a render, with the stages that actually ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderReport {
    pub text: StyledText,
    pub completed_stages: Vec<&'static str>,
    /// The stage that observed cancellation, if any
    pub cancelled_stage: Option<&'static str>,
}

impl RenderReport {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled_stage.is_some()
    }
}

pub struct Renderer {
    config: RenderConfig,
    cancel: CancelToken,
    stages: Vec<Box<dyn Stage>>,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self::with_stages(config, default_stages())
    }

    /// Build a renderer running a custom stage list
    pub fn with_stages(config: RenderConfig, stages: Vec<Box<dyn Stage>>) -> Self {
        Renderer {
            config,
            cancel: CancelToken::new(),
            stages,
        }
    }

    /// Poll `cancel` instead of a private token
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The token polled during rendering; clones may be sent to other threads
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Raise the stop signal. It stays raised until the token is reset.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn stage_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.stages.iter().map(|stage| stage.name())
    }

    /// Run every stage over `input`
    pub fn render(&self, input: impl Into<StyledText>) -> StyledText {
        self.render_report(input).text
    }

    pub fn render_report(&self, input: impl Into<StyledText>) -> RenderReport {
        let cx = StageContext {
            config: &self.config,
            cancel: &self.cancel,
        };
        let mut text = input.into();
        let mut completed_stages = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let outcome = if self.cancel.is_cancelled() {
                StageOutcome::Cancelled
            } else {
                stage.apply(&text, &cx)
            };

            match outcome {
                StageOutcome::Completed(out) => {
                    tracing::debug!(stage = stage.name(), len = out.len(), "stage completed");
                    text = out;
                    completed_stages.push(stage.name());
                }
                StageOutcome::Cancelled => {
                    tracing::info!(
                        stage = stage.name(),
                        completed = completed_stages.len(),
                        "render cancelled"
                    );
                    return RenderReport {
                        text,
                        completed_stages,
                        cancelled_stage: Some(stage.name()),
                    };
                }
            }
        }

        RenderReport {
            text,
            completed_stages,
            cancelled_stage: None,
        }
    }

    /// Hand a tapped region to the matching configured handler
    pub fn dispatch(&self, region: &ClickRegion) -> bool {
        self.config.dispatch(region)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}
