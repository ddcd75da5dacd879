//! Runs steps in order, either by name or by resuming what is unfinished.

use crate::{PipelineStep, RunContext, StepKind};
use bulletin_error::BulletinResult;
use tracing::{info, instrument};

/// Steps that ran and steps that were left alone.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Steps whose `run` was called, in order
    pub executed: Vec<StepKind>,
    /// Steps not run, in order
    pub skipped: Vec<StepKind>,
}

struct Scheduled {
    step: Box<dyn PipelineStep>,
    explicit: bool,
}

/// Sequences pipeline steps.
///
/// A step runs when it was named explicitly, or when resumption is on and
/// its artifact is not complete. Steps always run in [`StepKind`] order and
/// the first error ends the run.
pub struct Orchestrator {
    steps: Vec<Scheduled>,
    resume: bool,
}

impl Orchestrator {
    /// Creates an orchestrator; `resume` runs every unfinished step.
    pub fn new(resume: bool) -> Self {
        Self {
            steps: Vec::new(),
            resume,
        }
    }

    /// Adds a step. `explicit` steps run even when done.
    pub fn with_step(mut self, step: Box<dyn PipelineStep>, explicit: bool) -> Self {
        self.steps.push(Scheduled { step, explicit });
        self
    }

    /// Whether a step should run in this invocation.
    pub fn should_run(&self, explicit: bool, done: bool) -> bool {
        explicit || (self.resume && !done)
    }

    /// Runs the scheduled steps.
    #[instrument(skip_all, fields(resume = self.resume, steps = self.steps.len()))]
    pub async fn run(mut self, ctx: &RunContext) -> BulletinResult<RunSummary> {
        self.steps.sort_by_key(|s| s.step.kind());
        let mut summary = RunSummary::default();

        for scheduled in &self.steps {
            let kind = scheduled.step.kind();
            let done = scheduled.step.done(ctx);
            if !self.should_run(scheduled.explicit, done) {
                info!(step = %kind, done, "Skipping step");
                summary.skipped.push(kind);
                continue;
            }

            info!(step = %kind, done, explicit = scheduled.explicit, "Running step");
            scheduled.step.run(ctx).await?;
            summary.executed.push(kind);
        }

        Ok(summary)
    }
}
