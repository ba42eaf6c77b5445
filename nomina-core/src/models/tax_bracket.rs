use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One marginal-rate band of a progressive scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower_bound: Decimal,
    /// `None` marks the open-ended top bracket.
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        lower_bound: Decimal,
        upper_bound: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rate,
        }
    }

    /// Whether `point` falls inside `[lower_bound, upper_bound)`.
    pub fn contains(
        &self,
        point: Decimal,
    ) -> bool {
        self.lower_bound <= point && self.upper_bound.is_none_or(|upper| point < upper)
    }
}

/// Errors raised when a set of brackets does not form a valid schedule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("a bracket schedule needs at least one bracket")]
    Empty,

    #[error("the first bracket must start at 0, got {0}")]
    FirstLowerNotZero(Decimal),

    #[error("bracket {index} has lower bound {lower} not below its upper bound {upper}")]
    EmptyBracket {
        index: usize,
        lower: Decimal,
        upper: Decimal,
    },

    #[error("bracket {index} starts at {lower}, overlapping the previous bracket ending at {previous_upper}")]
    Overlapping {
        index: usize,
        lower: Decimal,
        previous_upper: Decimal,
    },

    #[error("only the last bracket may be open-ended, found one at index {0}")]
    OpenBracketNotLast(usize),

    #[error("bracket {index} has a negative rate {rate}")]
    NegativeRate { index: usize, rate: Decimal },
}

/// An ordered, validated progressive scale.
///
/// Brackets are ascending and non-overlapping, start at zero, and only the
/// last one may lack an upper bound. A schedule is immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct BracketSchedule {
    brackets: Vec<TaxBracket>,
}

impl BracketSchedule {
    /// Validates `brackets` and wraps them in a schedule.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError`] when the brackets are empty, do not start at
    /// zero, overlap, are out of order, or have an open bracket before the end.
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, ScheduleError> {
        let first = brackets.first().ok_or(ScheduleError::Empty)?;
        if !first.lower_bound.is_zero() {
            return Err(ScheduleError::FirstLowerNotZero(first.lower_bound));
        }

        let last_index = brackets.len() - 1;
        let mut previous_upper: Option<Decimal> = None;
        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO {
                return Err(ScheduleError::NegativeRate {
                    index,
                    rate: bracket.rate,
                });
            }
            if let Some(previous_upper) = previous_upper {
                if bracket.lower_bound < previous_upper {
                    return Err(ScheduleError::Overlapping {
                        index,
                        lower: bracket.lower_bound,
                        previous_upper,
                    });
                }
            }
            match bracket.upper_bound {
                Some(upper) if upper <= bracket.lower_bound => {
                    return Err(ScheduleError::EmptyBracket {
                        index,
                        lower: bracket.lower_bound,
                        upper,
                    });
                }
                Some(upper) => previous_upper = Some(upper),
                None if index != last_index => {
                    return Err(ScheduleError::OpenBracketNotLast(index));
                }
                None => {}
            }
        }

        Ok(Self { brackets })
    }

    /// Wraps brackets that are already known to be valid (static tables and
    /// merge results).
    pub(crate) fn from_trusted(brackets: Vec<TaxBracket>) -> Self {
        debug_assert!(Self::new(brackets.clone()).is_ok());
        Self { brackets }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Rate of the bracket containing `point`, or zero when the point lies
    /// outside every bracket.
    pub fn rate_at(
        &self,
        point: Decimal,
    ) -> Decimal {
        self.brackets
            .iter()
            .find(|bracket| bracket.contains(point))
            .map_or(Decimal::ZERO, |bracket| bracket.rate)
    }

    /// Every finite boundary point (lower and upper bounds).
    pub fn boundaries(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.brackets
            .iter()
            .flat_map(|bracket| std::iter::once(bracket.lower_bound).chain(bracket.upper_bound))
    }
}

impl TryFrom<Vec<TaxBracket>> for BracketSchedule {
    type Error = ScheduleError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<BracketSchedule> for Vec<TaxBracket> {
    fn from(schedule: BracketSchedule) -> Self {
        schedule.brackets
    }
}
