//! Profile domain model.
//!
//! # Responsibility
//! - Define the optional extended attributes linked to one account.
//!
//! # Invariants
//! - `account_id` must reference an existing account at write time.
//! - At most one profile per account (enforced by the store).
//! - Deleting a profile never touches its account.

use crate::model::account::AccountId;
use crate::model::validation::{check_optional_bytes, check_optional_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-assigned profile identifier.
pub type ProfileId = i64;

pub const NICKNAME_MAX_CHARS: usize = 100;
pub const PHONE_NUMBER_MAX_CHARS: usize = 20;
pub const BIO_MAX_CHARS: usize = 500;
pub const ADDRESS_MAX_CHARS: usize = 255;
/// 1 MB, in bytes.
pub const PROFILE_IMAGE_MAX_BYTES: usize = 1_000_000;

/// Input for creating a profile. The store assigns `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfile {
    pub account_id: AccountId,
    pub nickname: Option<String>,
    pub phone_number: Option<String>,
    pub bio: Option<String>,
    pub address: Option<String>,
    pub profile_image: Option<Vec<u8>>,
}

impl NewProfile {
    /// Creates an empty profile linked to `account_id`.
    pub fn for_account(account_id: AccountId) -> Self {
        Self {
            account_id,
            nickname: None,
            phone_number: None,
            bio: None,
            address: None,
            profile_image: None,
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    /// Checks bounded-length fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_details(
            self.nickname.as_deref(),
            self.phone_number.as_deref(),
            self.bio.as_deref(),
            self.address.as_deref(),
            self.profile_image.as_deref(),
        )
    }

    /// Attaches the store-assigned identifier.
    pub fn into_profile(self, id: ProfileId) -> Profile {
        Profile {
            id,
            account_id: self.account_id,
            nickname: self.nickname,
            phone_number: self.phone_number,
            bio: self.bio,
            address: self.address,
            profile_image: self.profile_image,
        }
    }
}

/// Persisted profile record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub account_id: AccountId,
    pub nickname: Option<String>,
    pub phone_number: Option<String>,
    pub bio: Option<String>,
    pub address: Option<String>,
    /// Raw image bytes, at most `PROFILE_IMAGE_MAX_BYTES`.
    pub profile_image: Option<Vec<u8>>,
}

impl Profile {
    /// Checks bounded-length fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_details(
            self.nickname.as_deref(),
            self.phone_number.as_deref(),
            self.bio.as_deref(),
            self.address.as_deref(),
            self.profile_image.as_deref(),
        )
    }
}

fn validate_details(
    nickname: Option<&str>,
    phone_number: Option<&str>,
    bio: Option<&str>,
    address: Option<&str>,
    profile_image: Option<&[u8]>,
) -> Result<(), ValidationError> {
    check_optional_text("nickname", nickname, NICKNAME_MAX_CHARS)?;
    check_optional_text("phone_number", phone_number, PHONE_NUMBER_MAX_CHARS)?;
    check_optional_text("bio", bio, BIO_MAX_CHARS)?;
    check_optional_text("address", address, ADDRESS_MAX_CHARS)?;
    check_optional_bytes("profile_image", profile_image, PROFILE_IMAGE_MAX_BYTES)?;
    Ok(())
}
