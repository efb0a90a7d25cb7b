//! Startup seeding of sample accounts and their profiles.
//!
//! # Responsibility
//! - Persist each sample account, then a profile linked to its assigned id.
//! - Report which samples were seeded and which already existed.
//!
//! # Invariants
//! - An account is always persisted before its profile.
//! - The first failing step aborts the remaining samples; earlier writes are
//!   kept (no rollback).
//! - Samples whose account and profile both exist are skipped, so re-running
//!   against a persisted database is a no-op.
//! - A sample whose account exists without a profile gets the missing profile.

use crate::model::account::{Account, AccountId, NewAccount};
use crate::model::profile::{NewProfile, Profile};
use crate::repo::account_repo::AccountRepository;
use crate::repo::error::RepoResult;
use crate::repo::profile_repo::ProfileRepository;
use log::{debug, error, info};
use std::time::Instant;

/// Fixed sample data inserted at startup.
pub const DEFAULT_SEED_SAMPLES: &[SeedSample] = &[
    SeedSample {
        email: "test1@test.se",
        full_name: "Test User 1",
        nickname: Some("URL"),
        phone_number: None,
        bio: None,
        address: None,
    },
    SeedSample {
        email: "a@x.se",
        full_name: "Sven Svensson",
        nickname: Some("Svenne"),
        phone_number: Some("070-123 45 67"),
        bio: Some("Likes long walks along Lake Vättern."),
        address: Some("Storgatan 1, 553 16 Jönköping"),
    },
];

/// One sample account and the profile attributes linked to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSample {
    pub email: &'static str,
    pub full_name: &'static str,
    pub nickname: Option<&'static str>,
    pub phone_number: Option<&'static str>,
    pub bio: Option<&'static str>,
    pub address: Option<&'static str>,
}

impl SeedSample {
    fn new_account(&self) -> NewAccount {
        NewAccount::new(self.email, self.full_name)
    }

    fn new_profile(&self, account_id: AccountId) -> NewProfile {
        NewProfile {
            account_id,
            nickname: self.nickname.map(str::to_string),
            phone_number: self.phone_number.map(str::to_string),
            bio: self.bio.map(str::to_string),
            address: self.address.map(str::to_string),
            profile_image: None,
        }
    }
}

/// Account and profile persisted for one sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededAccount {
    pub account: Account,
    pub profile: Profile,
}

/// Outcome of one seeding run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Newly persisted samples, in input order.
    pub seeded: Vec<SeededAccount>,
    /// Emails of samples skipped because account and profile already existed.
    pub skipped: Vec<String>,
}

/// Seeds sample data through the account and profile stores.
pub struct SeedService<A: AccountRepository, P: ProfileRepository> {
    accounts: A,
    profiles: P,
}

impl<A: AccountRepository, P: ProfileRepository> SeedService<A, P> {
    pub fn new(accounts: A, profiles: P) -> Self {
        Self { accounts, profiles }
    }

    /// Seeds `DEFAULT_SEED_SAMPLES`.
    pub fn seed_defaults(&self) -> RepoResult<SeedReport> {
        self.seed(DEFAULT_SEED_SAMPLES)
    }

    /// Seeds the given samples in order.
    ///
    /// # Side effects
    /// - Emits `seed` logging events with counts and duration.
    ///
    /// # Errors
    /// - Returns the first store error unchanged; remaining samples are not
    ///   attempted.
    pub fn seed(&self, samples: &[SeedSample]) -> RepoResult<SeedReport> {
        let started_at = Instant::now();
        info!(
            "event=seed module=seed status=start samples={}",
            samples.len()
        );

        let mut report = SeedReport::default();
        for (index, sample) in samples.iter().enumerate() {
            if let Err(err) = self.seed_one(sample, &mut report) {
                error!(
                    "event=seed module=seed status=error sample_index={} seeded={} duration_ms={} error={}",
                    index,
                    report.seeded.len(),
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err);
            }
        }

        info!(
            "event=seed module=seed status=ok seeded={} skipped={} duration_ms={}",
            report.seeded.len(),
            report.skipped.len(),
            started_at.elapsed().as_millis()
        );
        Ok(report)
    }

    fn seed_one(&self, sample: &SeedSample, report: &mut SeedReport) -> RepoResult<()> {
        let account = if self.accounts.exists_by_email(sample.email)? {
            let account = self.accounts.find_by_email(sample.email)?;
            match self.profiles.find_by_account_id(account.id) {
                Ok(_) => {
                    debug!(
                        "event=seed_sample module=seed status=skipped reason=account_exists account_id={}",
                        account.id
                    );
                    report.skipped.push(sample.email.to_string());
                    return Ok(());
                }
                // An earlier run stopped between the two inserts.
                Err(err) if err.is_not_found() => account,
                Err(err) => return Err(err),
            }
        } else {
            self.accounts.create(&sample.new_account())?
        };

        let profile = self.profiles.create(&sample.new_profile(account.id))?;
        debug!(
            "event=seed_sample module=seed status=ok account_id={} profile_id={}",
            account.id, profile.id
        );
        report.seeded.push(SeededAccount { account, profile });
        Ok(())
    }
}
