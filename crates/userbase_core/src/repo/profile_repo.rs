//! Profile store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `profiles` table.
//! - Resolve the one-to-one link from an account to its profile.
//!
//! # Invariants
//! - `account_id` must reference an existing account (foreign key).
//! - At most one profile per account (unique index on `account_id`).
//! - Profile writes and deletes never cascade to `accounts`.

use crate::model::account::AccountId;
use crate::model::profile::{NewProfile, Profile, ProfileId};
use crate::repo::error::{RecordKey, RepoError, RepoResult};
use crate::repo::schema::ensure_connection_ready;
use rusqlite::{params, Connection, Params, Row};

const PROFILE_SELECT_SQL: &str = "SELECT
    id,
    account_id,
    nickname,
    phone_number,
    bio,
    address,
    profile_image
FROM profiles";

const PROFILE_COLUMNS: &[&str] = &[
    "id",
    "account_id",
    "nickname",
    "phone_number",
    "bio",
    "address",
    "profile_image",
];

/// Store interface for profile records.
pub trait ProfileRepository {
    /// Inserts a new profile and returns it with `id` set.
    fn create(&self, profile: &NewProfile) -> RepoResult<Profile>;
    fn find_by_id(&self, id: ProfileId) -> RepoResult<Profile>;
    /// Profile linked to the given account.
    fn find_by_account_id(&self, account_id: AccountId) -> RepoResult<Profile>;
    /// Rewrites every column except `id`.
    fn update(&self, profile: &Profile) -> RepoResult<()>;
    fn delete(&self, id: ProfileId) -> RepoResult<()>;
    /// All profiles, ascending `id`.
    fn find_all(&self) -> RepoResult<Vec<Profile>>;
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed profile store.
pub struct SqliteProfileRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProfileRepository<'conn> {
    /// Constructs a store from a bootstrapped connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[("profiles", PROFILE_COLUMNS)])?;
        Ok(Self { conn })
    }

    fn query_one_profile(
        &self,
        sql: &str,
        params: impl Params,
        key: RecordKey,
    ) -> RepoResult<Profile> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        if let Some(row) = rows.next()? {
            return parse_profile_row(row);
        }

        Err(RepoError::NotFound(key))
    }
}

impl ProfileRepository for SqliteProfileRepository<'_> {
    fn create(&self, profile: &NewProfile) -> RepoResult<Profile> {
        profile.validate()?;

        self.conn.execute(
            "INSERT INTO profiles (
                account_id,
                nickname,
                phone_number,
                bio,
                address,
                profile_image
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                profile.account_id,
                profile.nickname.as_deref(),
                profile.phone_number.as_deref(),
                profile.bio.as_deref(),
                profile.address.as_deref(),
                profile.profile_image.as_deref(),
            ],
        )?;

        Ok(profile.clone().into_profile(self.conn.last_insert_rowid()))
    }

    fn find_by_id(&self, id: ProfileId) -> RepoResult<Profile> {
        self.query_one_profile(
            &format!("{PROFILE_SELECT_SQL} WHERE id = ?1;"),
            [id],
            RecordKey::ProfileId(id),
        )
    }

    fn find_by_account_id(&self, account_id: AccountId) -> RepoResult<Profile> {
        self.query_one_profile(
            &format!("{PROFILE_SELECT_SQL} WHERE account_id = ?1;"),
            [account_id],
            RecordKey::ProfileAccountId(account_id),
        )
    }

    fn update(&self, profile: &Profile) -> RepoResult<()> {
        profile.validate()?;

        let changed = self.conn.execute(
            "UPDATE profiles
             SET
                account_id = ?1,
                nickname = ?2,
                phone_number = ?3,
                bio = ?4,
                address = ?5,
                profile_image = ?6
             WHERE id = ?7;",
            params![
                profile.account_id,
                profile.nickname.as_deref(),
                profile.phone_number.as_deref(),
                profile.bio.as_deref(),
                profile.address.as_deref(),
                profile.profile_image.as_deref(),
                profile.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(RecordKey::ProfileId(profile.id)));
        }

        Ok(())
    }

    fn delete(&self, id: ProfileId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM profiles WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(RecordKey::ProfileId(id)));
        }

        Ok(())
    }

    fn find_all(&self) -> RepoResult<Vec<Profile>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROFILE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut profiles = Vec::new();
        while let Some(row) = rows.next()? {
            profiles.push(parse_profile_row(row)?);
        }
        Ok(profiles)
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM profiles;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative profile count `{count}`")))
    }
}

fn parse_profile_row(row: &Row<'_>) -> RepoResult<Profile> {
    let profile = Profile {
        id: row.get("id")?,
        account_id: row.get("account_id")?,
        nickname: row.get("nickname")?,
        phone_number: row.get("phone_number")?,
        bio: row.get("bio")?,
        address: row.get("address")?,
        profile_image: row.get("profile_image")?,
    };
    profile.validate().map_err(|err| {
        RepoError::InvalidData(format!("profile id={} in profiles: {err}", profile.id))
    })?;
    Ok(profile)
}
