//! Quiz engine implementation.
//!
//! A linear step state machine over the active catalog. It owns the
//! session's `QuizState`; persisting that state is the caller's job.
//!
//! ## State Transitions
//!
//! ```text
//! 1 -> 2 -> ... -> N -> Completed
//! ```
//!
//! `Completed` is absorbing until `reset()`.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = QuizEngine::new(Gender::Female, EngineSettings::default());
//! engine.answer(Answer::Choice("27-40".into()))?; // records and auto-advances
//! engine.advance(); // Some(Event::AdvanceBlocked) until "symptoms" is answered
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::answer::Answer;
use super::catalog::{Gender, QuestionCatalog};
use super::profile::{self, UserProfile};
use super::question::QuizQuestion;
use super::state::QuizState;
use crate::error::ValidationError;
use crate::events::Event;

/// Navigation switches, usually filled from the `[funnel]` config section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Single-choice answers move to the next step on their own.
    pub auto_advance: bool,
    /// Back at step 1 leaves the funnel instead of doing nothing.
    pub exit_on_back_at_start: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            auto_advance: true,
            exit_on_back_at_start: false,
        }
    }
}

/// Outcome of resolving a requested step number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepResolution<'a> {
    Question(&'a QuizQuestion),
    RedirectToStart,
}

/// Progress bar data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub step: u32,
    pub total_steps: u32,
    /// 0.0 ..= 100.0
    pub percent: f64,
    pub answered: usize,
    pub completed: bool,
}

/// Whether "Continue" is allowed on `question` given its current answer.
///
/// Informational screens and optional questions always pass. Required
/// questions fail on a missing answer, an empty string or an empty set.
pub fn can_continue(question: &QuizQuestion, answer: Option<&Answer>) -> bool {
    if question.question_type.is_informational() || !question.required {
        return true;
    }
    answer.is_some_and(|a| !a.is_empty())
}

#[derive(Debug, Clone)]
pub struct QuizEngine {
    state: QuizState,
    settings: EngineSettings,
}

impl QuizEngine {
    /// Fresh session at step 1.
    pub fn new(gender: Gender, settings: EngineSettings) -> Self {
        Self {
            state: QuizState::new(gender),
            settings,
        }
    }

    /// Resume a stored session. A step pointer outside the catalog is
    /// pulled back to 1.
    pub fn from_state(mut state: QuizState, settings: EngineSettings) -> Self {
        if QuestionCatalog::for_gender(state.gender)
            .question_by_step(state.current_step)
            .is_none()
        {
            state.current_step = 1;
        }
        Self { state, settings }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn into_state(self) -> QuizState {
        self.state
    }

    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    pub fn catalog(&self) -> &'static QuestionCatalog {
        QuestionCatalog::for_gender(self.state.gender)
    }

    pub fn current_step(&self) -> u32 {
        self.state.current_step
    }

    pub fn total_steps(&self) -> u32 {
        self.catalog().total_steps()
    }

    pub fn current_question(&self) -> &'static QuizQuestion {
        let catalog = self.catalog();
        catalog
            .question_by_step(self.state.current_step)
            .unwrap_or(&catalog.questions()[0])
    }

    pub fn current_answer(&self) -> Option<&Answer> {
        self.state.response(&self.current_question().id)
    }

    pub fn is_completed(&self) -> bool {
        self.state.is_completed()
    }

    /// Map a requested step number (e.g. from a URL) onto the catalog.
    pub fn resolve_step(&self, step: i64) -> StepResolution<'static> {
        u32::try_from(step)
            .ok()
            .and_then(|s| self.catalog().question_by_step(s))
            .map_or(StepResolution::RedirectToStart, StepResolution::Question)
    }

    /// Whether "Continue" is allowed on the current step.
    pub fn can_continue(&self) -> bool {
        can_continue(self.current_question(), self.current_answer())
    }

    pub fn user_profile(&self) -> Option<UserProfile> {
        UserProfile::from_state(&self.state)
    }

    /// All fifteen profile source questions are answered.
    pub fn is_complete(&self) -> bool {
        profile::is_complete(&self.state)
    }

    pub fn progress(&self) -> Progress {
        let total = self.total_steps();
        let step = self.state.current_step;
        let percent = if total == 0 {
            0.0
        } else {
            (f64::from(step) / f64::from(total) * 100.0).min(100.0)
        };
        Progress {
            step,
            total_steps: total,
            percent,
            answered: self.state.responses.len(),
            completed: self.is_completed(),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let question = self.current_question();
        let progress = self.progress();
        Event::StateSnapshot {
            session_id: self.state.session_id.clone(),
            gender: self.state.gender,
            step: progress.step,
            total_steps: progress.total_steps,
            question_id: question.id.clone(),
            question_type: question.question_type,
            answered: progress.answered,
            progress_pct: progress.percent,
            completed: progress.completed,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Record an answer for the current question.
    ///
    /// Single-choice questions also advance when auto-advance is on, so
    /// the result may carry a second event.
    pub fn answer(&mut self, value: Answer) -> Result<Vec<Event>, ValidationError> {
        if self.is_completed() {
            return Err(ValidationError::InvalidValue {
                field: "step".into(),
                message: "quiz is already completed".into(),
            });
        }
        let question = self.current_question();
        let value = value.validate_for(question)?;
        let mut events = vec![self.record(question, value)];
        if self.settings.auto_advance && question.question_type.auto_advances() {
            events.extend(self.advance());
        }
        Ok(events)
    }

    /// Upsert an answer by question id, wherever the pointer is.
    pub fn set_response(
        &mut self,
        question_id: &str,
        value: Answer,
    ) -> Result<Event, ValidationError> {
        let question = self
            .catalog()
            .question_by_id(question_id)
            .ok_or_else(|| ValidationError::UnknownQuestion(question_id.to_string()))?;
        let value = value.validate_for(question)?;
        Ok(self.record(question, value))
    }

    /// "Continue". Blocked on a required question without an answer;
    /// completes the funnel from the last step.
    pub fn advance(&mut self) -> Option<Event> {
        if self.is_completed() {
            return None;
        }
        let question = self.current_question();
        let from = self.state.current_step;
        if !self.can_continue() {
            return Some(Event::AdvanceBlocked {
                step: from,
                question_id: question.id.clone(),
                at: Utc::now(),
            });
        }
        match self.catalog().next_step(from) {
            Some(to) => {
                self.state.current_step = to;
                Some(Event::StepAdvanced {
                    from_step: from,
                    to_step: to,
                    at: Utc::now(),
                })
            }
            None => {
                self.state.completed_at = Some(Utc::now());
                tracing::info!(session_id = %self.state.session_id, "funnel completed");
                Some(Event::FunnelCompleted {
                    session_id: self.state.session_id.clone(),
                    total_steps: self.total_steps(),
                    at: Utc::now(),
                })
            }
        }
    }

    pub fn back(&mut self) -> Option<Event> {
        if self.is_completed() {
            return None;
        }
        let from = self.state.current_step;
        match self.catalog().previous_step(from) {
            Some(to) => {
                self.state.current_step = to;
                Some(Event::StepRetreated {
                    from_step: from,
                    to_step: to,
                    at: Utc::now(),
                })
            }
            None if self.settings.exit_on_back_at_start => Some(Event::FunnelExited {
                session_id: self.state.session_id.clone(),
                at: Utc::now(),
            }),
            None => None,
        }
    }

    /// Jump straight to `step`. Out-of-range requests land on step 1.
    /// Answers are left untouched either way.
    pub fn go_to(&mut self, step: i64) -> Option<Event> {
        if self.is_completed() {
            return None;
        }
        let from = self.state.current_step;
        match self.resolve_step(step) {
            StepResolution::Question(q) => {
                let to = q.step;
                self.state.current_step = to;
                match to.cmp(&from) {
                    std::cmp::Ordering::Greater => Some(Event::StepAdvanced {
                        from_step: from,
                        to_step: to,
                        at: Utc::now(),
                    }),
                    std::cmp::Ordering::Less => Some(Event::StepRetreated {
                        from_step: from,
                        to_step: to,
                        at: Utc::now(),
                    }),
                    std::cmp::Ordering::Equal => None,
                }
            }
            StepResolution::RedirectToStart => {
                tracing::debug!(requested = step, "step out of range, redirecting to start");
                self.state.current_step = 1;
                Some(Event::Redirected {
                    requested: step,
                    to_step: 1,
                    at: Utc::now(),
                })
            }
        }
    }

    /// Drop every answer and start a new session at step 1.
    pub fn reset(&mut self) -> Option<Event> {
        self.state = QuizState::new(self.state.gender);
        Some(Event::QuizReset {
            session_id: self.state.session_id.clone(),
            at: Utc::now(),
        })
    }

    /// Switch the catalog variant. A pointer the new catalog lacks is sent
    /// back to step 1.
    pub fn set_gender(&mut self, gender: Gender) -> Vec<Event> {
        if gender == self.state.gender {
            return Vec::new();
        }
        self.state.gender = gender;
        let mut events = vec![Event::GenderChanged {
            gender,
            at: Utc::now(),
        }];
        let current = i64::from(self.state.current_step);
        if let StepResolution::RedirectToStart = self.resolve_step(current) {
            self.state.current_step = 1;
            events.push(Event::Redirected {
                requested: current,
                to_step: 1,
                at: Utc::now(),
            });
        }
        events
    }

    fn record(&mut self, question: &QuizQuestion, value: Answer) -> Event {
        self.state.set_response(question.id.clone(), value.clone());
        Event::AnswerRecorded {
            session_id: self.state.session_id.clone(),
            step: question.step,
            question_id: question.id.clone(),
            answer: value,
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> QuizEngine {
        QuizEngine::new(Gender::Female, EngineSettings::default())
    }

    fn choice(id: &str) -> Answer {
        Answer::Choice(id.into())
    }

    fn choices(ids: &[&str]) -> Answer {
        Answer::Choices(ids.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn starts_at_step_one() {
        let engine = engine();
        assert_eq!(engine.current_step(), 1);
        assert_eq!(engine.current_question().id, "age-range");
        assert!(!engine.is_completed());
    }

    #[test]
    fn single_choice_auto_advances() {
        let mut engine = engine();
        let events = engine.answer(choice("27-40")).unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::AnswerRecorded { .. }));
        assert!(matches!(
            events[1],
            Event::StepAdvanced { from_step: 1, to_step: 2, .. }
        ));
        assert_eq!(engine.current_step(), 2);
    }

    #[test]
    fn auto_advance_can_be_disabled() {
        let mut engine = QuizEngine::new(
            Gender::Female,
            EngineSettings {
                auto_advance: false,
                ..EngineSettings::default()
            },
        );
        let events = engine.answer(choice("27-40")).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(engine.current_step(), 1);
    }

    #[test]
    fn multi_select_waits_for_continue() {
        let mut engine = engine();
        engine.go_to(2);
        let events = engine.answer(choices(&["acne"])).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(engine.current_step(), 2);
        assert!(matches!(engine.advance(), Some(Event::StepAdvanced { .. })));
    }

    #[test]
    fn advance_is_blocked_without_required_answer() {
        let mut engine = engine();
        engine.go_to(2);
        let event = engine.advance();
        assert!(matches!(
            event,
            Some(Event::AdvanceBlocked { step: 2, .. })
        ));
        assert_eq!(engine.current_step(), 2);

        engine.answer(choices(&[])).unwrap();
        assert!(matches!(engine.advance(), Some(Event::AdvanceBlocked { .. })));
    }

    #[test]
    fn informational_screens_always_continue() {
        let mut engine = engine();
        engine.go_to(7);
        assert!(engine.can_continue());
        assert!(matches!(engine.advance(), Some(Event::StepAdvanced { to_step: 8, .. })));
    }

    #[test]
    fn rejected_answer_leaves_state_untouched() {
        let mut engine = engine();
        assert!(engine.answer(choice("nope")).is_err());
        assert!(engine.state().responses.is_empty());
        assert_eq!(engine.current_step(), 1);
    }

    #[test]
    fn back_is_floored_at_step_one() {
        let mut engine = engine();
        assert!(engine.back().is_none());
        assert_eq!(engine.current_step(), 1);

        engine.go_to(5);
        assert!(matches!(
            engine.back(),
            Some(Event::StepRetreated { from_step: 5, to_step: 4, .. })
        ));
    }

    #[test]
    fn back_at_start_can_exit() {
        let mut engine = QuizEngine::new(
            Gender::Female,
            EngineSettings {
                exit_on_back_at_start: true,
                ..EngineSettings::default()
            },
        );
        assert!(matches!(engine.back(), Some(Event::FunnelExited { .. })));
        assert_eq!(engine.current_step(), 1);
    }

    #[test]
    fn out_of_range_navigation_redirects_to_start() {
        let mut engine = engine();
        engine.go_to(9);
        engine.set_response("age", Answer::Number(30.0)).unwrap();

        for bad in [0, 24, -3, i64::MAX] {
            engine.go_to(9);
            assert!(matches!(
                engine.go_to(bad),
                Some(Event::Redirected { to_step: 1, .. })
            ));
            assert_eq!(engine.current_step(), 1);
        }
        assert_eq!(engine.state().number("age"), Some(30.0));
    }

    #[test]
    fn resolve_step_maps_onto_catalog() {
        let engine = engine();
        match engine.resolve_step(11) {
            StepResolution::Question(q) => assert_eq!(q.id, "height"),
            StepResolution::RedirectToStart => panic!("step 11 exists"),
        }
        assert_eq!(engine.resolve_step(0), StepResolution::RedirectToStart);
    }

    #[test]
    fn set_response_rejects_unknown_ids() {
        let mut engine = engine();
        assert_eq!(
            engine.set_response("shoe-size", Answer::Number(40.0)),
            Err(ValidationError::UnknownQuestion("shoe-size".into()))
        );
    }

    #[test]
    fn completion_happens_once_and_is_absorbing() {
        let mut engine = engine();
        engine.go_to(23);
        assert!(matches!(
            engine.advance(),
            Some(Event::FunnelCompleted { total_steps: 23, .. })
        ));
        assert!(engine.is_completed());
        assert!(engine.advance().is_none());
        assert!(engine.back().is_none());
        assert!(engine.go_to(3).is_none());
        assert_eq!(engine.current_step(), 23);
        assert!(engine.answer(choice("x")).is_err());
    }

    #[test]
    fn reset_issues_new_session() {
        let mut engine = engine();
        let old = engine.state().session_id.clone();
        engine.answer(choice("27-40")).unwrap();
        engine.go_to(23);
        engine.advance();

        assert!(matches!(engine.reset(), Some(Event::QuizReset { .. })));
        assert_ne!(engine.state().session_id, old);
        assert!(engine.state().responses.is_empty());
        assert_eq!(engine.current_step(), 1);
        assert!(!engine.is_completed());
    }

    #[test]
    fn stored_step_outside_catalog_is_clamped() {
        let state = QuizState {
            current_step: 99,
            ..QuizState::default()
        };
        let engine = QuizEngine::from_state(state, EngineSettings::default());
        assert_eq!(engine.current_step(), 1);
    }

    #[test]
    fn gender_switch_keeps_valid_step() {
        let mut engine = engine();
        engine.go_to(6);
        let events = engine.set_gender(Gender::Male);
        assert_eq!(events.len(), 1);
        assert_eq!(engine.current_step(), 6);
        assert!(engine.set_gender(Gender::Male).is_empty());
    }

    #[test]
    fn progress_tracks_step() {
        let mut engine = engine();
        engine.go_to(23);
        let progress = engine.progress();
        assert_eq!(progress.total_steps, 23);
        assert!((progress.percent - 100.0).abs() < 1e-9);
        assert!(matches!(engine.snapshot(), Event::StateSnapshot { step: 23, .. }));
    }

    #[test]
    fn full_walkthrough_completes_with_profile() {
        let mut engine = engine();
        engine.answer(choice("27-40")).unwrap();
        engine.answer(choices(&["acne", "fatigue"])).unwrap();
        engine.advance();
        engine.answer(choice("irregular")).unwrap();
        engine.answer(choice("sometimes")).unwrap();
        engine.answer(choice("comes-back")).unwrap();
        engine.answer(choice("afternoon-crashes")).unwrap();
        assert_eq!(engine.current_step(), 7);
        engine.advance();
        engine.answer(choices(&["lose-weight"])).unwrap();
        engine.advance();
        engine.answer(choice("plump")).unwrap();
        engine.advance();
        for value in [165.0, 80.0, 68.0, 34.0] {
            engine.answer(Answer::Number(value)).unwrap();
            engine.advance();
        }
        assert_eq!(engine.current_step(), 15);
        engine.advance();
        engine.answer(choice("desk-job")).unwrap();
        engine.answer(choice("occasionally")).unwrap();
        engine.answer(choice("2-6-glasses")).unwrap();
        engine.answer(choices(&["sweets"])).unwrap();
        engine.advance();
        engine.answer(choices(&["walking"])).unwrap();
        engine.advance();
        assert_eq!(engine.current_step(), 21);
        engine.advance();
        engine.advance();
        assert!(matches!(engine.advance(), Some(Event::FunnelCompleted { .. })));

        assert!(engine.is_complete());
        let profile = engine.user_profile().unwrap();
        assert_eq!(profile.height, 165.0);
        assert_eq!(profile.target_weight, 68.0);
        assert_eq!(profile.symptoms, vec!["acne".to_string(), "fatigue".to_string()]);
    }
}
