//! Persistence boundary for the quiz session.

use std::cell::RefCell;

use super::database::Database;
use crate::error::DatabaseError;
use crate::quiz::QuizState;

/// kv key holding the serialized session.
pub const QUIZ_STORAGE_KEY: &str = "pcos-quiz-storage";

/// Load/save/clear for the single active `QuizState`.
pub trait QuizRepository {
    /// `Ok(None)` when nothing is stored.
    fn load(&self) -> Result<Option<QuizState>, DatabaseError>;

    fn save(&self, state: &QuizState) -> Result<(), DatabaseError>;

    fn clear(&self) -> Result<(), DatabaseError>;
}

impl QuizRepository for Database {
    fn load(&self) -> Result<Option<QuizState>, DatabaseError> {
        let Some(raw) = self.kv_get(QUIZ_STORAGE_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| DatabaseError::Corrupt {
                key: QUIZ_STORAGE_KEY.to_string(),
                message: e.to_string(),
            })
    }

    fn save(&self, state: &QuizState) -> Result<(), DatabaseError> {
        let raw = serde_json::to_string(state).map_err(|e| DatabaseError::Corrupt {
            key: QUIZ_STORAGE_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.kv_set(QUIZ_STORAGE_KEY, &raw)
    }

    fn clear(&self) -> Result<(), DatabaseError> {
        self.kv_delete(QUIZ_STORAGE_KEY)
    }
}

/// In-process repository for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    state: RefCell<Option<QuizState>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: QuizState) -> Self {
        Self {
            state: RefCell::new(Some(state)),
        }
    }
}

impl QuizRepository for MemoryRepository {
    fn load(&self) -> Result<Option<QuizState>, DatabaseError> {
        Ok(self.state.borrow().clone())
    }

    fn save(&self, state: &QuizState) -> Result<(), DatabaseError> {
        *self.state.borrow_mut() = Some(state.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), DatabaseError> {
        *self.state.borrow_mut() = None;
        Ok(())
    }
}
