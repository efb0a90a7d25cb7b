//! Account store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and lookup queries over the `accounts` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate fields before SQL runs.
//! - `created_at` is assigned here immediately before insert and never
//!   written by `update`.
//! - Email uniqueness is enforced by the table's unique index, not by a
//!   read-then-write check.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::model::account::{Account, AccountId, NewAccount};
use crate::repo::error::{RecordKey, RepoError, RepoResult};
use crate::repo::schema::ensure_connection_ready;
use rusqlite::{params, Connection, Params, Row};
use std::time::{SystemTime, UNIX_EPOCH};

const ACCOUNT_SELECT_SQL: &str = "SELECT
    id,
    email,
    full_name,
    created_at
FROM accounts";

const ACCOUNT_COLUMNS: &[&str] = &["id", "email", "full_name", "created_at"];

/// Store interface for account records.
pub trait AccountRepository {
    /// Inserts a new account and returns it with `id` and `created_at` set.
    fn create(&self, account: &NewAccount) -> RepoResult<Account>;
    fn find_by_id(&self, id: AccountId) -> RepoResult<Account>;
    /// Exact, case-sensitive email match.
    fn find_by_email(&self, email: &str) -> RepoResult<Account>;
    /// Case-sensitive substring match over `full_name`, ascending `id`.
    fn find_by_name_contains(&self, fragment: &str) -> RepoResult<Vec<Account>>;
    /// Accounts with `created_at` strictly greater than `threshold_ms`.
    fn find_by_created_after(&self, threshold_ms: i64) -> RepoResult<Vec<Account>>;
    fn exists_by_email(&self, email: &str) -> RepoResult<bool>;
    /// Rewrites `email` and `full_name`; `created_at` is left untouched.
    fn update(&self, account: &Account) -> RepoResult<()>;
    fn delete(&self, id: AccountId) -> RepoResult<()>;
    /// All accounts, ascending `id`.
    fn find_all(&self) -> RepoResult<Vec<Account>>;
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed account store.
pub struct SqliteAccountRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAccountRepository<'conn> {
    /// Constructs a store from a bootstrapped connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[("accounts", ACCOUNT_COLUMNS)])?;
        Ok(Self { conn })
    }

    fn query_accounts(&self, sql: &str, params: impl Params) -> RepoResult<Vec<Account>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut accounts = Vec::new();
        while let Some(row) = rows.next()? {
            accounts.push(parse_account_row(row)?);
        }
        Ok(accounts)
    }

    fn query_one_account(
        &self,
        sql: &str,
        params: impl Params,
        key: RecordKey,
    ) -> RepoResult<Account> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        if let Some(row) = rows.next()? {
            return parse_account_row(row);
        }

        Err(RepoError::NotFound(key))
    }
}

impl AccountRepository for SqliteAccountRepository<'_> {
    fn create(&self, account: &NewAccount) -> RepoResult<Account> {
        account.validate()?;

        let created_at = epoch_ms_at(SystemTime::now())?;
        self.conn.execute(
            "INSERT INTO accounts (email, full_name, created_at)
             VALUES (?1, ?2, ?3);",
            params![account.email.as_str(), account.full_name.as_str(), created_at],
        )?;

        Ok(Account {
            id: self.conn.last_insert_rowid(),
            email: account.email.clone(),
            full_name: account.full_name.clone(),
            created_at,
        })
    }

    fn find_by_id(&self, id: AccountId) -> RepoResult<Account> {
        self.query_one_account(
            &format!("{ACCOUNT_SELECT_SQL} WHERE id = ?1;"),
            [id],
            RecordKey::AccountId(id),
        )
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Account> {
        self.query_one_account(
            &format!("{ACCOUNT_SELECT_SQL} WHERE email = ?1;"),
            [email],
            RecordKey::AccountEmail(email.to_string()),
        )
    }

    fn find_by_name_contains(&self, fragment: &str) -> RepoResult<Vec<Account>> {
        // `instr` is case-sensitive; `LIKE` would fold ASCII case.
        self.query_accounts(
            &format!("{ACCOUNT_SELECT_SQL} WHERE instr(full_name, ?1) > 0 ORDER BY id ASC;"),
            [fragment],
        )
    }

    fn find_by_created_after(&self, threshold_ms: i64) -> RepoResult<Vec<Account>> {
        self.query_accounts(
            &format!("{ACCOUNT_SELECT_SQL} WHERE created_at > ?1 ORDER BY created_at ASC, id ASC;"),
            [threshold_ms],
        )
    }

    fn exists_by_email(&self, email: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE email = ?1);",
            [email],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn update(&self, account: &Account) -> RepoResult<()> {
        account.validate()?;

        let changed = self.conn.execute(
            "UPDATE accounts
             SET
                email = ?1,
                full_name = ?2
             WHERE id = ?3;",
            params![account.email.as_str(), account.full_name.as_str(), account.id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(RecordKey::AccountId(account.id)));
        }

        Ok(())
    }

    fn delete(&self, id: AccountId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM accounts WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(RecordKey::AccountId(id)));
        }

        Ok(())
    }

    fn find_all(&self) -> RepoResult<Vec<Account>> {
        self.query_accounts(&format!("{ACCOUNT_SELECT_SQL} ORDER BY id ASC;"), [])
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM accounts;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative account count `{count}`")))
    }
}

fn parse_account_row(row: &Row<'_>) -> RepoResult<Account> {
    let account = Account {
        id: row.get("id")?,
        email: row.get("email")?,
        full_name: row.get("full_name")?,
        created_at: row.get("created_at")?,
    };
    account.validate().map_err(|err| {
        RepoError::InvalidData(format!("account id={} in accounts: {err}", account.id))
    })?;
    Ok(account)
}

fn epoch_ms_at(now: SystemTime) -> RepoResult<i64> {
    let elapsed = now
        .duration_since(UNIX_EPOCH)
        .map_err(RepoError::ClockBeforeEpoch)?;
    Ok(i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
}
