//! Forced-choice value discovery quiz.
//!
//! Six rounds, each offering two values. Every pick adds one to that value's
//! tally; the result is the three most-picked values.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ValuePair {
    pub a: &'static str,
    pub b: &'static str,
}

impl ValuePair {
    fn offers(&self, value: &str) -> bool {
        self.a == value || self.b == value
    }
}

pub static VALUE_PAIRS: [ValuePair; 6] = [
    ValuePair { a: "Segurança", b: "Aventura" },
    ValuePair { a: "Criatividade", b: "Ordem" },
    ValuePair { a: "Comunidade", b: "Independência" },
    ValuePair { a: "Conhecimento", b: "Ação" },
    ValuePair { a: "Crescimento", b: "Estabilidade" },
    ValuePair { a: "Impacto Social", b: "Sucesso Pessoal" },
];

pub const TOP_VALUES: usize = 3;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("the quiz is already finished")]
    Finished,

    #[error("\"{value}\" is not one of the options in round {round}")]
    InvalidChoice { round: usize, value: String },

    #[error("expected {expected} choices, got {got}")]
    WrongLength { expected: usize, got: usize },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Tally {
    pub value: String,
    pub count: u32,
}

#[derive(Debug, Default, Clone)]
pub struct ValueQuiz {
    round: usize,
    // Kept in first-pick order; that order breaks ties.
    tallies: Vec<Tally>,
}

impl ValueQuiz {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn round(&self) -> usize {
        self.round
    }

    pub fn current_pair(&self) -> Option<&'static ValuePair> {
        VALUE_PAIRS.get(self.round)
    }

    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.round >= VALUE_PAIRS.len()
    }

    pub fn select(&mut self, value: &str) -> Result<(), QuizError> {
        let pair = self.current_pair().ok_or(QuizError::Finished)?;
        if !pair.offers(value) {
            return Err(QuizError::InvalidChoice {
                round: self.round,
                value: value.to_string(),
            });
        }

        match self.tallies.iter_mut().find(|t| t.value == value) {
            Some(tally) => tally.count += 1,
            None => self.tallies.push(Tally {
                value: value.to_string(),
                count: 1,
            }),
        }
        self.round += 1;
        Ok(())
    }

    pub fn tallies(&self) -> &[Tally] {
        &self.tallies
    }

    /// Highest tallies first; the stable sort keeps first-pick order on ties.
    pub fn top_values(&self, n: usize) -> Vec<String> {
        let mut ranked: Vec<&Tally> = self.tallies.iter().collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.into_iter().take(n).map(|t| t.value.clone()).collect()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValueResults {
    pub tallies: Vec<Tally>,
    pub top_values: Vec<String>,
}

/// Score a completed quiz: one choice per round, in round order.
pub fn score(choices: &[String]) -> Result<ValueResults, QuizError> {
    if choices.len() != VALUE_PAIRS.len() {
        return Err(QuizError::WrongLength {
            expected: VALUE_PAIRS.len(),
            got: choices.len(),
        });
    }

    let mut quiz = ValueQuiz::new();
    for choice in choices {
        quiz.select(choice)?;
    }

    Ok(ValueResults {
        top_values: quiz.top_values(TOP_VALUES),
        tallies: quiz.tallies().to_vec(),
    })
}
