//! Basic authentication credentials handed to the query gateway.

use std::fmt;

use super::error::ScanError;

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, ScanError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ScanError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("PersonalAccessToken(<redacted>)")
    }
}

/// GitHub account name used as the basic-auth user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountName(String);

impl AccountName {
    /// Validates that the account name is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::MissingUser` when the supplied string is blank.
    pub fn new(user: impl AsRef<str>) -> Result<Self, ScanError> {
        let trimmed = user.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ScanError::MissingUser);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the account name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Credentials supplied once per run and borrowed by every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    user: AccountName,
    token: PersonalAccessToken,
}

impl Credentials {
    /// Creates credentials from validated parts.
    #[must_use]
    pub const fn new(user: AccountName, token: PersonalAccessToken) -> Self {
        Self { user, token }
    }

    /// Validates raw user and token strings.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::MissingUser` or `ScanError::MissingToken` when
    /// either value is blank.
    pub fn parse(user: impl AsRef<str>, token: impl AsRef<str>) -> Result<Self, ScanError> {
        Ok(Self::new(
            AccountName::new(user)?,
            PersonalAccessToken::new(token)?,
        ))
    }

    /// The basic-auth user.
    #[must_use]
    pub const fn user(&self) -> &AccountName {
        &self.user
    }

    /// The basic-auth password.
    #[must_use]
    pub const fn token(&self) -> &PersonalAccessToken {
        &self.token
    }
}
