use userbase_core::db::open_db_in_memory;
use userbase_core::{
    AccountRepository, ConstraintViolation, ProfileRepository, RepoError, SeedSample,
    SeedService, SqliteAccountRepository, SqliteProfileRepository, ValidationError,
    DEFAULT_SEED_SAMPLES,
};

const SAMPLE_A: SeedSample = SeedSample {
    email: "first@x.se",
    full_name: "First Sample",
    nickname: Some("first"),
    phone_number: None,
    bio: None,
    address: None,
};

const SAMPLE_BROKEN: SeedSample = SeedSample {
    email: "broken@x.se",
    full_name: "   ",
    nickname: Some("broken"),
    phone_number: None,
    bio: None,
    address: None,
};

const SAMPLE_C: SeedSample = SeedSample {
    email: "third@x.se",
    full_name: "Third Sample",
    nickname: None,
    phone_number: Some("08-123 456"),
    bio: None,
    address: None,
};

#[test]
fn default_seed_creates_each_account_with_linked_profile() {
    let conn = open_db_in_memory().unwrap();
    let service = SeedService::new(
        SqliteAccountRepository::try_new(&conn).unwrap(),
        SqliteProfileRepository::try_new(&conn).unwrap(),
    );

    let report = service.seed_defaults().unwrap();
    assert_eq!(report.seeded.len(), DEFAULT_SEED_SAMPLES.len());
    assert!(report.skipped.is_empty());

    let accounts = SqliteAccountRepository::try_new(&conn).unwrap();
    let profiles = SqliteProfileRepository::try_new(&conn).unwrap();
    for (sample, seeded) in DEFAULT_SEED_SAMPLES.iter().zip(&report.seeded) {
        let account = accounts.find_by_email(sample.email).unwrap();
        assert_eq!(account, seeded.account);
        assert_eq!(account.full_name, sample.full_name);

        let profile = profiles.find_by_account_id(account.id).unwrap();
        assert_eq!(profile, seeded.profile);
        assert_eq!(profile.nickname.as_deref(), sample.nickname);
    }
}

#[test]
fn default_seed_contains_the_original_sample_account() {
    let conn = open_db_in_memory().unwrap();
    let service = SeedService::new(
        SqliteAccountRepository::try_new(&conn).unwrap(),
        SqliteProfileRepository::try_new(&conn).unwrap(),
    );
    service.seed_defaults().unwrap();

    let accounts = SqliteAccountRepository::try_new(&conn).unwrap();
    let profiles = SqliteProfileRepository::try_new(&conn).unwrap();
    let account = accounts.find_by_email("test1@test.se").unwrap();
    assert_eq!(account.full_name, "Test User 1");
    assert_eq!(
        profiles
            .find_by_account_id(account.id)
            .unwrap()
            .nickname
            .as_deref(),
        Some("URL")
    );
}

#[test]
fn reseeding_skips_existing_accounts() {
    let conn = open_db_in_memory().unwrap();
    let service = SeedService::new(
        SqliteAccountRepository::try_new(&conn).unwrap(),
        SqliteProfileRepository::try_new(&conn).unwrap(),
    );

    service.seed_defaults().unwrap();
    let second = service.seed_defaults().unwrap();

    assert!(second.seeded.is_empty());
    let expected: Vec<String> = DEFAULT_SEED_SAMPLES
        .iter()
        .map(|sample| sample.email.to_string())
        .collect();
    assert_eq!(second.skipped, expected);

    let accounts = SqliteAccountRepository::try_new(&conn).unwrap();
    let profiles = SqliteProfileRepository::try_new(&conn).unwrap();
    assert_eq!(accounts.count().unwrap(), DEFAULT_SEED_SAMPLES.len() as u64);
    assert_eq!(profiles.count().unwrap(), DEFAULT_SEED_SAMPLES.len() as u64);
}

#[test]
fn failure_aborts_remaining_samples_without_rollback() {
    let conn = open_db_in_memory().unwrap();
    let service = SeedService::new(
        SqliteAccountRepository::try_new(&conn).unwrap(),
        SqliteProfileRepository::try_new(&conn).unwrap(),
    );

    let err = service
        .seed(&[SAMPLE_A, SAMPLE_BROKEN, SAMPLE_C])
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::ConstraintViolation(ConstraintViolation::Field(ValidationError::Required {
            field: "full_name"
        }))
    ));

    let accounts = SqliteAccountRepository::try_new(&conn).unwrap();
    let profiles = SqliteProfileRepository::try_new(&conn).unwrap();
    assert!(accounts.exists_by_email(SAMPLE_A.email).unwrap());
    assert!(!accounts.exists_by_email(SAMPLE_BROKEN.email).unwrap());
    assert!(!accounts.exists_by_email(SAMPLE_C.email).unwrap());
    assert_eq!(profiles.count().unwrap(), 1);
}

#[test]
fn profile_failure_keeps_already_created_account() {
    let conn = open_db_in_memory().unwrap();
    let service = SeedService::new(
        SqliteAccountRepository::try_new(&conn).unwrap(),
        SqliteProfileRepository::try_new(&conn).unwrap(),
    );
    let oversized_bio = "b".repeat(501);
    let sample = SeedSample {
        email: "bio@x.se",
        full_name: "Long Bio",
        nickname: None,
        phone_number: None,
        bio: Some(Box::leak(oversized_bio.into_boxed_str())),
        address: None,
    };

    let err = service.seed(&[sample, SAMPLE_C]).unwrap_err();
    assert!(err.is_constraint_violation());

    let accounts = SqliteAccountRepository::try_new(&conn).unwrap();
    let profiles = SqliteProfileRepository::try_new(&conn).unwrap();
    let account = accounts.find_by_email("bio@x.se").unwrap();
    assert!(profiles.find_by_account_id(account.id).unwrap_err().is_not_found());
    assert!(!accounts.exists_by_email(SAMPLE_C.email).unwrap());
}

#[test]
fn reseeding_adds_profile_missing_after_earlier_failure() {
    let conn = open_db_in_memory().unwrap();
    let service = SeedService::new(
        SqliteAccountRepository::try_new(&conn).unwrap(),
        SqliteProfileRepository::try_new(&conn).unwrap(),
    );
    let long_phone = SeedSample {
        email: "p@x.se",
        full_name: "Phone Owner",
        nickname: None,
        phone_number: Some("012345678901234567890"),
        bio: None,
        address: None,
    };
    assert!(service.seed(&[long_phone]).unwrap_err().is_constraint_violation());

    let fixed = SeedSample {
        phone_number: Some("070-123 45 67"),
        ..long_phone
    };
    let report = service.seed(&[fixed]).unwrap();
    assert_eq!(report.seeded.len(), 1);
    assert!(report.skipped.is_empty());

    let accounts = SqliteAccountRepository::try_new(&conn).unwrap();
    let profiles = SqliteProfileRepository::try_new(&conn).unwrap();
    let account = accounts.find_by_email("p@x.se").unwrap();
    assert_eq!(report.seeded[0].account, account);
    let profile = profiles.find_by_account_id(account.id).unwrap();
    assert_eq!(profile.phone_number.as_deref(), Some("070-123 45 67"));
    assert_eq!(accounts.count().unwrap(), 1);

    let third = service.seed(&[fixed]).unwrap();
    assert!(third.seeded.is_empty());
    assert_eq!(third.skipped, vec!["p@x.se".to_string()]);
}

#[test]
fn seeding_nothing_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let service = SeedService::new(
        SqliteAccountRepository::try_new(&conn).unwrap(),
        SqliteProfileRepository::try_new(&conn).unwrap(),
    );

    let report = service.seed(&[]).unwrap();
    assert!(report.seeded.is_empty());
    assert!(report.skipped.is_empty());
}
