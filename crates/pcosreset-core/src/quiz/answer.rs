//! Typed answers.
//!
//! The persisted form stays `string | string[] | number` (untagged), but
//! inside the crate every answer is checked against the declared question
//! type before it reaches the state store.

use serde::{Deserialize, Serialize};

use super::question::{QuestionType, QuizQuestion};
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// numeric, height (cm) and weight (kg) inputs
    Number(f64),
    /// single-select and visual-select
    Choice(String),
    /// multi-select and ingredient-select
    Choices(Vec<String>),
}

impl Answer {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Answer::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_choice(&self) -> Option<&str> {
        match self {
            Answer::Choice(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_choices(&self) -> Option<&[String]> {
        match self {
            Answer::Choices(v) => Some(v),
            _ => None,
        }
    }

    /// Empty string or empty selection.
    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Number(_) => false,
            Answer::Choice(s) => s.is_empty(),
            Answer::Choices(v) => v.is_empty(),
        }
    }

    /// Check this answer against `question` and normalise it.
    ///
    /// Multi-selections are deduplicated, keeping the first occurrence.
    pub fn validate_for(self, question: &QuizQuestion) -> Result<Answer, ValidationError> {
        let qid = || question.id.clone();
        match question.question_type {
            QuestionType::SingleSelect | QuestionType::VisualSelect => match self {
                Answer::Choice(id) => {
                    if question.has_option(&id) {
                        Ok(Answer::Choice(id))
                    } else {
                        Err(ValidationError::InvalidOption {
                            question_id: qid(),
                            option: id,
                        })
                    }
                }
                _ => Err(ValidationError::WrongKind {
                    question_id: qid(),
                    expected: "a single option id",
                }),
            },
            QuestionType::MultiSelect | QuestionType::IngredientSelect => {
                let ids = match self {
                    Answer::Choices(ids) => ids,
                    Answer::Choice(id) => vec![id],
                    Answer::Number(_) => {
                        return Err(ValidationError::WrongKind {
                            question_id: qid(),
                            expected: "a list of option ids",
                        })
                    }
                };
                let mut unique: Vec<String> = Vec::with_capacity(ids.len());
                for id in ids {
                    if !question.has_option(&id) {
                        return Err(ValidationError::InvalidOption {
                            question_id: qid(),
                            option: id,
                        });
                    }
                    if !unique.contains(&id) {
                        unique.push(id);
                    }
                }
                Ok(Answer::Choices(unique))
            }
            QuestionType::NumericInput | QuestionType::HeightInput | QuestionType::WeightInput => {
                let value = self.as_number().ok_or_else(|| ValidationError::WrongKind {
                    question_id: qid(),
                    expected: "a number",
                })?;
                if !value.is_finite() || value <= 0.0 {
                    return Err(ValidationError::NotPositive { question_id: qid() });
                }
                if let Some(bounds) = question.validation {
                    if !bounds.contains(value) {
                        return Err(ValidationError::OutOfRange {
                            question_id: qid(),
                            value,
                            min: bounds.min,
                            max: bounds.max,
                        });
                    }
                }
                Ok(Answer::Number(value))
            }
            QuestionType::Interstitial
            | QuestionType::ScienceList
            | QuestionType::GoalProjection
            | QuestionType::PersonalSummary => Err(ValidationError::NotAnswerable(qid())),
        }
    }

    /// Build an answer from raw text input for `question`.
    ///
    /// Numbers are parsed for numeric inputs; select questions take option
    /// ids, either as separate values or comma separated.
    pub fn parse_for(question: &QuizQuestion, raw: &[String]) -> Result<Answer, ValidationError> {
        let qt = question.question_type;
        if qt.is_numeric() {
            let text = raw.first().map(|s| s.trim()).unwrap_or_default();
            let value = text
                .parse::<f64>()
                .map_err(|_| ValidationError::InvalidValue {
                    field: question.id.clone(),
                    message: format!("'{text}' is not a number"),
                })?;
            return Ok(Answer::Number(value));
        }
        let ids: Vec<String> = raw
            .iter()
            .flat_map(|s| s.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        match qt {
            QuestionType::MultiSelect | QuestionType::IngredientSelect => Ok(Answer::Choices(ids)),
            _ => match ids.as_slice() {
                [single] => Ok(Answer::Choice(single.clone())),
                _ => Err(ValidationError::WrongKind {
                    question_id: question.id.clone(),
                    expected: "exactly one option id",
                }),
            },
        }
    }
}
