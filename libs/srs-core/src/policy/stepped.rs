//! Stepped review policy.
//!
//! A four-state ladder (NEW -> INTRO -> LEARN -> KNOWN) driven by the
//! three-valued judgment, with fixed judgment-keyed intervals. Regression
//! has a floor: a `low` judgment on a KNOWN word demotes it to LEARN,
//! never back to NEW or INTRO.

use super::{ReviewOutcome, ReviewPolicy};
use crate::types::{Judgment, WordProgress, WordState};
use chrono::{DateTime, Duration, Utc};

/// Stepped policy with configurable intervals.
#[derive(Debug, Clone)]
pub struct Stepped {
    pub low_interval: Duration,
    pub mid_interval: Duration,
    pub high_interval: Duration,
}

impl Default for Stepped {
    fn default() -> Self {
        Self {
            low_interval: Duration::hours(12),
            mid_interval: Duration::days(2),
            high_interval: Duration::days(7),
        }
    }
}

impl ReviewPolicy for Stepped {
    fn name(&self) -> &'static str {
        "stepped"
    }

    fn interval(&self, judgment: Judgment) -> Duration {
        match judgment {
            Judgment::Low => self.low_interval,
            Judgment::Mid => self.mid_interval,
            Judgment::High => self.high_interval,
        }
    }

    fn apply(
        &self,
        progress: &WordProgress,
        judgment: Judgment,
        now: DateTime<Utc>,
    ) -> ReviewOutcome {
        let (state, reps, lapses) = match judgment {
            Judgment::Low => (
                match progress.state {
                    WordState::New | WordState::Intro => WordState::Intro,
                    WordState::Learn | WordState::Known => WordState::Learn,
                },
                progress.reps,
                progress.lapses + 1,
            ),
            Judgment::Mid => (
                match progress.state {
                    WordState::New | WordState::Intro | WordState::Learn => WordState::Learn,
                    WordState::Known => WordState::Known,
                },
                progress.reps + 1,
                progress.lapses,
            ),
            Judgment::High => (
                match progress.state {
                    WordState::New | WordState::Intro => WordState::Learn,
                    WordState::Learn | WordState::Known => WordState::Known,
                },
                progress.reps + 1,
                progress.lapses,
            ),
        };

        ReviewOutcome {
            progress: WordProgress { state, reps, lapses },
            next_due: now + self.interval(judgment),
        }
    }
}
