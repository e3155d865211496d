use serde::{Deserialize, Serialize};

use crate::error::{Result, ScavengerError};
use crate::game::{Location, QuestionType};

/// What a team submitted for the question at its goal
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Answer {
    /// A multiple-choice button
    Choice(String),
    /// Free text for an open question
    Open(String),
    DontKnow,
}

impl Location {
    /// Score for free text: case-insensitive match, then the `""`/`"wrong"`
    /// catch-all option, then the first option.
    pub fn score_open_answer(&self, text: &str) -> i32 {
        let lowered = text.to_lowercase();

        self.answer
            .iter()
            .find(|o| o.option.to_lowercase() == lowered)
            .or_else(|| {
                self.answer
                    .iter()
                    .find(|o| o.option.is_empty() || o.option == "wrong")
            })
            .or_else(|| self.answer.first())
            .map(|o| o.score)
            .unwrap_or_default()
    }

    pub fn score_choice(&self, option: &str) -> Result<i32> {
        self.answer
            .iter()
            .chain(self.dont_know_answer.iter())
            .find(|o| o.option == option)
            .map(|o| o.score)
            .ok_or_else(|| ScavengerError::UnknownOption {
                location: self.name.clone(),
                option: option.to_string(),
            })
    }

    pub fn score(&self, answer: &Answer) -> Result<i32> {
        match (answer, self.question_type) {
            (Answer::Choice(option), QuestionType::MultipleChoice) => self.score_choice(option),
            (Answer::Open(text), QuestionType::OpenQuestion) => Ok(self.score_open_answer(text)),
            // Open questions are scored by text only, multiple choice by button only
            (Answer::Choice(text), QuestionType::OpenQuestion)
            | (Answer::Open(text), QuestionType::MultipleChoice) => {
                Err(ScavengerError::UnknownOption {
                    location: self.name.clone(),
                    option: text.clone(),
                })
            }
            (Answer::DontKnow, _) => self
                .dont_know_answer
                .as_ref()
                .map(|o| o.score)
                .ok_or_else(|| ScavengerError::UnknownOption {
                    location: self.name.clone(),
                    option: "don't know".to_string(),
                }),
        }
    }
}
