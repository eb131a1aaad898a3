//! Pipeline driver: runs every title through all five stages.
//!
//! ## Per-Title State Machine
//!
//! ```text
//! Pending → IdeaGenerated → PlanGenerated → ArticleWritten → ImagesProduced → BundleAssembled
//! ```
//!
//! Any stage failure ends the title in `Failed`, recording the last stage it
//! reached. Failures never abort the run: the driver moves on to the next
//! title. The three text stages are each followed by `api.call_delay`, and
//! titles are separated by `api.interval_between_posts` (none after the last).

use crate::article::{self, ArticleError};
use crate::bundle::{self, BundleError};
use crate::config::GeneratorConfig;
use crate::genai::{ImageModel, TextModel};
use crate::idea::{self, ConfigGenerationError};
use crate::images::{self, ImageError};
use crate::output;
use crate::pacing::Pacer;
use crate::plan::{self, PlanError};
use crate::spinner::Spinner;
use chrono::Local;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

/// Last stage a title completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Pending,
    IdeaGenerated,
    PlanGenerated,
    ArticleWritten,
    ImagesProduced,
    BundleAssembled,
}

impl Stage {
    /// Spinner text for the step that follows this stage.
    fn next_step_label(self) -> &'static str {
        match self {
            Stage::Pending => "Step 1/5: Generating strategic configuration...",
            Stage::IdeaGenerated => "Step 2/5: Creating article outline and image plan...",
            Stage::PlanGenerated => "Step 3/5: Writing article markdown...",
            Stage::ArticleWritten => "Step 4/5: Generating all images...",
            Stage::ImagesProduced => "Step 5/5: Assembling page bundle...",
            Stage::BundleAssembled => "Done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Pending => "pending",
            Stage::IdeaGenerated => "idea generated",
            Stage::PlanGenerated => "plan generated",
            Stage::ArticleWritten => "article written",
            Stage::ImagesProduced => "images produced",
            Stage::BundleAssembled => "bundle assembled",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Idea generation failed: {0}")]
    Idea(#[from] ConfigGenerationError),
    #[error("Plan generation failed: {0}")]
    Plan(#[from] PlanError),
    #[error("Article writing failed: {0}")]
    Article(#[from] ArticleError),
    #[error("Image production failed: {0}")]
    Images(#[from] ImageError),
    #[error("Bundle assembly failed: {0}")]
    Bundle(#[from] BundleError),
}

impl PipelineError {
    /// Last stage completed before the failure.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Idea(_) => Stage::Pending,
            PipelineError::Plan(_) => Stage::IdeaGenerated,
            PipelineError::Article(_) => Stage::PlanGenerated,
            PipelineError::Images(_) => Stage::ArticleWritten,
            PipelineError::Bundle(_) => Stage::ImagesProduced,
        }
    }
}

/// Progress notifications for the console.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    TitleStarted {
        index: usize,
        total: usize,
        title: String,
    },
    TitleSucceeded {
        title: String,
        bundle: PathBuf,
        placeholders: usize,
    },
    TitleFailed {
        title: String,
        stage: Stage,
        error: String,
    },
    Waiting {
        seconds: u64,
    },
}

/// A successfully assembled post.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleReport {
    pub bundle: PathBuf,
    pub images: usize,
    pub placeholders: usize,
}

/// What happened to one title.
#[derive(Debug, Clone, PartialEq)]
pub enum TitleOutcome {
    Succeeded { title: String, report: BundleReport },
    Failed { title: String, stage: Stage, error: String },
}

impl TitleOutcome {
    pub fn title(&self) -> &str {
        match self {
            TitleOutcome::Succeeded { title, .. } | TitleOutcome::Failed { title, .. } => title,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TitleOutcome::Succeeded { .. })
    }
}

/// Outcome of a whole run, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub outcomes: Vec<TitleOutcome>,
}

impl RunSummary {
    pub fn successful(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.successful()
    }
}

/// Everything a run needs, borrowed from `main`.
pub struct Pipeline<'a> {
    config: &'a GeneratorConfig,
    text: &'a dyn TextModel,
    images: &'a dyn ImageModel,
    pacer: &'a dyn Pacer,
    show_progress: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a GeneratorConfig,
        text: &'a dyn TextModel,
        images: &'a dyn ImageModel,
        pacer: &'a dyn Pacer,
    ) -> Self {
        Self {
            config,
            text,
            images,
            pacer,
            show_progress: false,
        }
    }

    /// Print progress lines and spinners while running.
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn emit(&self, event: PipelineEvent) {
        if self.show_progress {
            output::print_pipeline_event(&event);
        }
    }

    fn spinner(&self, reached: Stage) -> Spinner {
        Spinner::start_if(self.show_progress, reached.next_step_label())
    }

    /// Run one title through all stages and return its bundle.
    pub fn process_title(&self, title: &str, output_root: &Path) -> Result<BundleReport, PipelineError> {
        let config = self.config;
        let delay = config.api.call_delay();

        let idea = {
            let _spinner = self.spinner(Stage::Pending);
            idea::generate_idea(self.text, config, title)?
        };
        self.pacer.pause(delay);

        let plan = {
            let _spinner = self.spinner(Stage::IdeaGenerated);
            plan::generate_plan(self.text, config, &idea)?
        };
        self.pacer.pause(delay);

        let article = {
            let _spinner = self.spinner(Stage::PlanGenerated);
            article::write_article(self.text, config, &plan)?
        };
        self.pacer.pause(delay);

        let images = {
            let _spinner = self.spinner(Stage::ArticleWritten);
            images::produce_images(self.images, config, &plan, self.pacer)?
        };

        let bundle = {
            let _spinner = self.spinner(Stage::ImagesProduced);
            bundle::assemble_bundle(
                output_root,
                &config.paths.temp_image_dir,
                &idea,
                &plan,
                &article,
                &images,
                &Local::now(),
            )?
        };

        Ok(BundleReport {
            bundle,
            images: images.len(),
            placeholders: images.placeholder_count(),
        })
    }

    /// Process every title in order. A failed title is logged and skipped.
    pub fn run(&self, titles: &[String], output_root: &Path) -> RunSummary {
        let total = titles.len();
        let mut summary = RunSummary::default();

        for (i, title) in titles.iter().enumerate() {
            self.emit(PipelineEvent::TitleStarted {
                index: i + 1,
                total,
                title: title.clone(),
            });

            let outcome = match self.process_title(title, output_root) {
                Ok(report) => {
                    info!(title = %title, bundle = %report.bundle.display(), "title processed");
                    self.emit(PipelineEvent::TitleSucceeded {
                        title: title.clone(),
                        bundle: report.bundle.clone(),
                        placeholders: report.placeholders,
                    });
                    TitleOutcome::Succeeded {
                        title: title.clone(),
                        report,
                    }
                }
                Err(e) => {
                    let stage = e.stage();
                    error!(title = %title, stage = %stage, error = %e, "failed to process title");
                    self.emit(PipelineEvent::TitleFailed {
                        title: title.clone(),
                        stage,
                        error: e.to_string(),
                    });
                    TitleOutcome::Failed {
                        title: title.clone(),
                        stage,
                        error: e.to_string(),
                    }
                }
            };
            summary.outcomes.push(outcome);

            if i + 1 < total {
                let interval = self.config.api.interval_between_posts();
                self.emit(PipelineEvent::Waiting {
                    seconds: interval.as_secs(),
                });
                self.pacer.pause(interval);
            }
        }

        summary
    }
}
