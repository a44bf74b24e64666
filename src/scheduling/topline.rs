//! Quota obligation summary.
//!
//! The topline answers "has this user (or their household) done their share
//! for the period?". Obligations are split into buckets: one regular bucket
//! for all fixed-slot work, plus one bucket per full-community job. Results
//! are derived on every call from the committed ledger and never stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::hours::round_next_half;
use super::ledger::Ledger;
use crate::directory::Directory;
use crate::error::{EngineError, EngineResult};
use crate::models::{Job, JobId, Period, QuotaType, UserId};

/// A group of work an obligation is tracked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Bucket {
    /// All fixed-slot jobs together, targeting `period.quota × share`.
    Regular,
    /// One full-community job, targeting `job.hours × share`.
    Job {
        /// The job.
        job_id: JobId,
        /// The job's title.
        title: String,
    },
}

/// Whose hours an obligation covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Myself,
    Household,
}

/// Progress against one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obligation {
    /// The bucket.
    pub bucket: Bucket,
    /// Display title of the bucket.
    pub title: String,
    /// Hours committed.
    pub got: Decimal,
    /// Hours required.
    pub ttl: Decimal,
    /// Whether the target is met at half-hour granularity.
    pub ok: bool,
}

/// The obligation summary for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToplineSummary {
    /// Whether the relevant obligation (personal or household) is met.
    pub done: bool,
    /// The user's own buckets.
    #[serde(rename = "self")]
    pub self_obligations: Vec<Obligation>,
    /// The household's buckets, for household quotas only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub household: Option<Vec<Obligation>>,
}

/// Computes obligation summaries for a period.
pub struct Topline<'a> {
    period: &'a Period,
    community_jobs: Vec<&'a Job>,
    ledger: &'a Ledger,
    directory: &'a dyn Directory,
    regular_title: String,
}

impl<'a> Topline<'a> {
    /// Creates a calculator over the period's jobs and committed ledger.
    pub fn new(
        period: &'a Period,
        jobs: impl IntoIterator<Item = &'a Job>,
        ledger: &'a Ledger,
        directory: &'a dyn Directory,
    ) -> Self {
        let mut community_jobs: Vec<&Job> = jobs
            .into_iter()
            .filter(|job| job.period_id == period.id && job.is_full_community())
            .collect();
        community_jobs.sort_by(|a, b| a.title.cmp(&b.title));

        Self {
            period,
            community_jobs,
            ledger,
            directory,
            regular_title: "Regular".to_string(),
        }
    }

    /// Sets the display title of the regular bucket.
    pub fn with_regular_title(mut self, title: impl Into<String>) -> Self {
        self.regular_title = title.into();
        self
    }

    /// Returns the summary for `user_id`, or `None` when the user has no
    /// obligation: the period is not open, it has no quota, or the user holds
    /// no share.
    pub fn summary(&self, user_id: &UserId) -> EngineResult<Option<ToplineSummary>> {
        if !self.period.is_open() || self.period.quota_type == QuotaType::None {
            return Ok(None);
        }

        let myself = vec![user_id.clone()];
        let self_share = self.share_for(&myself)?;
        if self_share.is_zero() {
            return Ok(None);
        }
        let mut self_obligations = self.obligations_for(Scope::Myself, &myself, self_share);

        if self.period.quota_type == QuotaType::ByPerson {
            let done = all_ok(&self_obligations);
            return Ok(Some(ToplineSummary {
                done,
                self_obligations,
                household: None,
            }));
        }

        let members = self.directory.household_members(user_id);
        let household_share = self.share_for(&members)?;
        let household = self.obligations_for(Scope::Household, &members, household_share);
        let done = all_ok(&household);

        // A household that is all set covers every member.
        if done {
            for obligation in &mut self_obligations {
                obligation.ok = true;
            }
        }

        Ok(Some(ToplineSummary {
            done,
            self_obligations,
            household: Some(household),
        }))
    }

    fn obligations_for(&self, scope: Scope, users: &[UserId], share: Decimal) -> Vec<Obligation> {
        self.buckets()
            .into_iter()
            .map(|bucket| {
                let (got, ttl) = match &bucket {
                    Bucket::Regular => (
                        self.ledger.fixed_slot_hours(users),
                        self.period.quota * share,
                    ),
                    Bucket::Job { job_id, .. } => {
                        let job_hours = self
                            .community_jobs
                            .iter()
                            .find(|job| job.id == *job_id)
                            .map_or(Decimal::ZERO, |job| job.hours);
                        (self.ledger.job_hours(*job_id, users), job_hours * share)
                    }
                };
                let title = match &bucket {
                    Bucket::Regular => self.regular_title.clone(),
                    Bucket::Job { title, .. } => title.clone(),
                };
                tracing::trace!(?scope, %got, %ttl, title = %title, "Computed obligation");
                Obligation {
                    ok: round_next_half(got) >= round_next_half(ttl),
                    bucket,
                    title,
                    got,
                    ttl,
                }
            })
            .collect()
    }

    fn buckets(&self) -> Vec<Bucket> {
        std::iter::once(Bucket::Regular)
            .chain(self.community_jobs.iter().map(|job| Bucket::Job {
                job_id: job.id,
                title: job.title.clone(),
            }))
            .collect()
    }

    fn share_for(&self, users: &[UserId]) -> EngineResult<Decimal> {
        let share = self.directory.total_share(self.period.id, users);
        if share < Decimal::ZERO {
            return Err(EngineError::InvariantViolation {
                message: format!("share portions for period {} sum to {}", self.period.id, share),
            });
        }
        Ok(share)
    }
}

fn all_ok(obligations: &[Obligation]) -> bool {
    obligations.iter().all(|o| o.ok)
}
