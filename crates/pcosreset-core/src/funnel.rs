//! Page controller for the quiz funnel.
//!
//! Every call loads the session through a [`QuizRepository`], applies one
//! command to a [`QuizEngine`], saves the result and hands back the events
//! plus a [`PageView`] of where the user now stands.
//!
//! With a [`SubmissionSink`] attached, a session that begins or completes
//! is also submitted in the background. Submission results never change
//! the outcome of the command that triggered them.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::error::{CoreError, DatabaseError};
use crate::events::Event;
use crate::integrations::submission::{spawn_submission, SubmissionOutcome, SubmissionSink};
use crate::quiz::{
    Answer, EngineSettings, Gender, QuestionType, QuizEngine, QuizQuestion, QuizState, UserProfile,
};
use crate::storage::{FunnelConfig, QuizRepository};
use crate::views::{interstitial_description, GoalProjectionView, PersonalSummaryView, StepDetail};

/// Controller settings, usually from the `[funnel]` config section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunnelSettings {
    pub engine: EngineSettings,
    pub default_gender: Gender,
    pub weekly_loss_rate_kg: f64,
}

impl Default for FunnelSettings {
    fn default() -> Self {
        (&FunnelConfig::default()).into()
    }
}

impl From<&FunnelConfig> for FunnelSettings {
    fn from(config: &FunnelConfig) -> Self {
        Self {
            engine: config.engine_settings(),
            default_gender: config.default_gender,
            weekly_loss_rate_kg: config.weekly_loss_rate_kg,
        }
    }
}

/// Everything a front end needs to render the current step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub session_id: String,
    pub gender: Gender,
    pub step: u32,
    pub total_steps: u32,
    pub progress_pct: f64,
    pub question: QuizQuestion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<Answer>,
    pub can_continue: bool,
    pub completed: bool,
    /// Interstitial body copy, personalised where the screen asks for it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Derived content for the goal-projection and summary screens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<StepDetail>,
}

impl PageView {
    pub fn build(engine: &QuizEngine, today: NaiveDate, weekly_loss_rate_kg: f64) -> Self {
        let state = engine.state();
        let question = engine.current_question();
        let progress = engine.progress();

        let detail = match question.question_type {
            QuestionType::GoalProjection => {
                match GoalProjectionView::build(state, today, weekly_loss_rate_kg) {
                    Ok(view) => Some(StepDetail::GoalProjection(view)),
                    Err(e) => {
                        tracing::warn!(error = %e, "goal projection unavailable");
                        None
                    }
                }
            }
            QuestionType::PersonalSummary => {
                Some(StepDetail::PersonalSummary(PersonalSummaryView::build(state)))
            }
            _ => None,
        };

        Self {
            session_id: state.session_id.clone(),
            gender: state.gender,
            step: progress.step,
            total_steps: progress.total_steps,
            progress_pct: progress.percent,
            question: question.clone(),
            answer: engine.current_answer().cloned(),
            can_continue: engine.can_continue(),
            completed: progress.completed,
            description: interstitial_description(question, state),
            detail,
        }
    }
}

/// Result of one controller command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelResponse {
    pub events: Vec<Event>,
    pub page: PageView,
}

struct SubmissionHook {
    sink: Arc<dyn SubmissionSink>,
    timeout: Duration,
    pending: Mutex<Vec<(String, JoinHandle<SubmissionOutcome>)>>,
}

impl SubmissionHook {
    fn fire(&self, state: &QuizState) {
        if tokio::runtime::Handle::try_current().is_err() {
            tracing::warn!(session_id = %state.session_id, "no async runtime, funnel submission skipped");
            return;
        }
        let handle = spawn_submission(Arc::clone(&self.sink), state, self.timeout);
        if let Ok(mut pending) = self.pending.lock() {
            pending.push((state.session_id.clone(), handle));
        }
    }
}

pub struct FunnelController<R: QuizRepository> {
    repo: R,
    settings: FunnelSettings,
    today: Option<NaiveDate>,
    submission: Option<SubmissionHook>,
}

impl<R: QuizRepository> FunnelController<R> {
    pub fn new(repo: R, settings: FunnelSettings) -> Self {
        Self {
            repo,
            settings,
            today: None,
            submission: None,
        }
    }

    /// Submit sessions to `sink` when they begin or complete.
    ///
    /// Submissions are spawned on the ambient tokio runtime. Commands run
    /// outside one skip the submission with a warning.
    pub fn with_submission(mut self, sink: Arc<dyn SubmissionSink>, timeout: Duration) -> Self {
        self.submission = Some(SubmissionHook {
            sink,
            timeout,
            pending: Mutex::new(Vec::new()),
        });
        self
    }

    /// Pin "today" for the goal projection instead of the local date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn settings(&self) -> FunnelSettings {
        self.settings
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// The stored session, or a fresh one. Unreadable state is replaced.
    pub fn load_engine(&self) -> Result<QuizEngine, DatabaseError> {
        Ok(self.load_or_create()?.0)
    }

    /// Like [`Self::load_engine`], also reporting whether the session is new.
    fn load_or_create(&self) -> Result<(QuizEngine, bool), DatabaseError> {
        let state = match self.repo.load() {
            Ok(Some(state)) => Some(state),
            Ok(None) => None,
            Err(DatabaseError::Corrupt { key, message }) => {
                tracing::warn!(%key, %message, "discarding unreadable quiz state");
                None
            }
            Err(e) => return Err(e),
        };
        Ok(match state {
            Some(state) => (QuizEngine::from_state(state, self.settings.engine), false),
            None => (
                QuizEngine::new(self.settings.default_gender, self.settings.engine),
                true,
            ),
        })
    }

    /// Wait for in-flight submissions and return their outcomes by session.
    ///
    /// A submission task that panicked or was cancelled counts as failed.
    pub async fn drain_submissions(&self) -> Vec<(String, SubmissionOutcome)> {
        let pending = match &self.submission {
            Some(hook) => match hook.pending.lock() {
                Ok(mut pending) => std::mem::take(&mut *pending),
                Err(_) => Vec::new(),
            },
            None => Vec::new(),
        };
        let mut outcomes = Vec::with_capacity(pending.len());
        for (session_id, handle) in pending {
            let outcome = handle
                .await
                .unwrap_or_else(|e| SubmissionOutcome::failed(e.to_string()));
            outcomes.push((session_id, outcome));
        }
        outcomes
    }

    pub fn state(&self) -> Result<QuizState, DatabaseError> {
        Ok(self.load_engine()?.into_state())
    }

    pub fn user_profile(&self) -> Result<Option<UserProfile>, DatabaseError> {
        Ok(self.load_engine()?.user_profile())
    }

    /// Current page without changing anything.
    pub fn view(&self) -> Result<PageView, DatabaseError> {
        let engine = self.load_engine()?;
        Ok(PageView::build(&engine, self.today(), self.settings.weekly_loss_rate_kg))
    }

    fn apply<F>(&self, command: F) -> Result<FunnelResponse, CoreError>
    where
        F: FnOnce(&mut QuizEngine) -> Result<Vec<Event>, CoreError>,
    {
        let (mut engine, created) = self.load_or_create()?;
        let events = command(&mut engine)?;
        self.repo.save(engine.state())?;
        for event in &events {
            tracing::debug!(event = event.kind(), step = engine.current_step(), "funnel event");
        }
        if let Some(hook) = &self.submission {
            let begins_or_ends = created
                || events.iter().any(|e| {
                    matches!(e, Event::FunnelCompleted { .. } | Event::QuizReset { .. })
                });
            if begins_or_ends {
                hook.fire(engine.state());
            }
        }
        Ok(FunnelResponse {
            events,
            page: PageView::build(&engine, self.today(), self.settings.weekly_loss_rate_kg),
        })
    }

    /// Resume or begin a session, optionally switching the catalog variant.
    pub fn start(&self, gender: Option<Gender>) -> Result<FunnelResponse, CoreError> {
        self.apply(|engine| {
            let mut events = gender.map(|g| engine.set_gender(g)).unwrap_or_default();
            events.push(engine.snapshot());
            Ok(events)
        })
    }

    pub fn answer(&self, value: Answer) -> Result<FunnelResponse, CoreError> {
        self.apply(|engine| Ok(engine.answer(value)?))
    }

    /// Answer the current question from raw text, parsed by question type.
    pub fn answer_raw(&self, raw: &[String]) -> Result<FunnelResponse, CoreError> {
        self.apply(|engine| {
            let value = Answer::parse_for(engine.current_question(), raw)?;
            Ok(engine.answer(value)?)
        })
    }

    pub fn set_response(&self, question_id: &str, value: Answer) -> Result<FunnelResponse, CoreError> {
        self.apply(|engine| Ok(vec![engine.set_response(question_id, value)?]))
    }

    pub fn next(&self) -> Result<FunnelResponse, CoreError> {
        self.apply(|engine| Ok(engine.advance().into_iter().collect()))
    }

    pub fn back(&self) -> Result<FunnelResponse, CoreError> {
        self.apply(|engine| Ok(engine.back().into_iter().collect()))
    }

    pub fn go_to(&self, step: i64) -> Result<FunnelResponse, CoreError> {
        self.apply(|engine| Ok(engine.go_to(step).into_iter().collect()))
    }

    pub fn set_gender(&self, gender: Gender) -> Result<FunnelResponse, CoreError> {
        self.apply(|engine| Ok(engine.set_gender(gender)))
    }

    pub fn reset(&self) -> Result<FunnelResponse, CoreError> {
        self.apply(|engine| Ok(engine.reset().into_iter().collect()))
    }
}
