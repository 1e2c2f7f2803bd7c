use utoipa::ToSchema;

use super::class_level::ClassLevel;
use crate::error::PortalError;
use crate::role::Role;
use crate::storage::{Repository, USERS};

/// A registered account. Stored exactly as entered, password included.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "type")]
    pub role: Role,
    #[serde(default)]
    pub class: Option<ClassLevel>,
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("class", &self.class)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, FromForm, ToSchema)]
pub struct SignupData {
    pub name: String,
    #[schema(format = "email")]
    pub email: String,
    #[schema(format = "password")]
    pub password: String,
    #[field(name = "type")]
    #[schema(example = "student")]
    pub account_type: String,
    #[schema(example = "2")]
    pub class: Option<String>,
}

impl std::fmt::Debug for SignupData {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SignupData:{}", self.email)
    }
}

#[cfg(feature = "validation-regex")]
pub fn looks_like_email(value: &str) -> bool {
    lazy_static::lazy_static! {
        static ref EMAIL: regex::Regex =
            regex::Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid");
    }
    EMAIL.is_match(value)
}

#[cfg(not(feature = "validation-regex"))]
pub fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    }
}

impl SignupData {
    pub fn validate(&self) -> Result<Account, PortalError> {
        if self.name.trim().is_empty() {
            return Err(PortalError::validation("name", "Name is required."));
        }

        if self.email.trim().is_empty() {
            return Err(PortalError::validation("email", "Email is required."));
        }
        if !looks_like_email(&self.email) {
            return Err(PortalError::validation(
                "email",
                "Please enter a valid email address.",
            ));
        }

        if self.password.is_empty() {
            return Err(PortalError::validation("password", "Password is required."));
        }

        let role: Role = self
            .account_type
            .parse()
            .map_err(|_| PortalError::validation("type", "Please select a user type."))?;

        let class = match role {
            Role::Teacher => None,
            Role::Student => {
                let raw = self
                    .class
                    .as_deref()
                    .filter(|it| !it.trim().is_empty())
                    .ok_or_else(|| PortalError::validation("class", "Please select your class"))?;
                Some(
                    raw.parse::<ClassLevel>()
                        .map_err(|e| PortalError::validation("class", e))?,
                )
            }
        };

        Ok(Account {
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            role,
            class,
        })
    }
}

#[derive(Clone, FromForm, ToSchema)]
pub struct LoginData {
    #[schema(format = "email")]
    pub email: String,
    #[schema(format = "password")]
    pub password: String,
}

impl std::fmt::Debug for LoginData {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LoginData:{}", self.email)
    }
}

impl LoginData {
    pub fn validate(&self) -> Result<(), PortalError> {
        if self.email.is_empty() {
            return Err(PortalError::validation("email", "Email is required."));
        }
        if self.password.is_empty() {
            return Err(PortalError::validation("password", "Password is required."));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountCreatedResponse {
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub role: Role,
    #[schema(value_type = Option<String>)]
    pub class: Option<ClassLevel>,
}

impl From<Account> for AccountCreatedResponse {
    fn from(account: Account) -> Self {
        AccountCreatedResponse {
            name: account.name,
            email: account.email,
            role: account.role,
            class: account.class,
        }
    }
}

pub trait AccountsExt {
    /// Appends the account. Duplicate emails are accepted.
    fn create_account(&self, signup: &SignupData) -> Result<Account, PortalError>;

    /// First account whose email and password both match exactly.
    fn find_account(&self, email: &str, password: &str) -> Result<Option<Account>, PortalError>;
}

impl AccountsExt for Repository {
    fn create_account(&self, signup: &SignupData) -> Result<Account, PortalError> {
        let account = signup.validate()?;
        self.push(USERS, account.clone())?;
        tracing::info!("Registered new {} account: {}", account.role, account.email);
        Ok(account)
    }

    fn find_account(&self, email: &str, password: &str) -> Result<Option<Account>, PortalError> {
        Ok(self
            .list(USERS)?
            .into_iter()
            .find(|it| it.email == email && it.password == password))
    }
}
