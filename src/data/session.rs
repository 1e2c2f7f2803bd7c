use tokio::sync::watch;
use utoipa::ToSchema;

use super::account::{Account, AccountsExt};
use super::class_level::ClassLevel;
use crate::error::PortalError;
use crate::role::Role;
use crate::storage::{Repository, CURRENT_USER};

/// The logged in identity: a copy of the account plus derived display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(flatten)]
    pub account: Account,
    pub avatar: String,
    /// Display role, e.g. `Class 2 Student`.
    pub role: String,
}

impl Session {
    pub fn new(account: Account, teacher_title: impl AsRef<str>) -> Session {
        let role = match (account.role, account.class) {
            (Role::Teacher, _) => teacher_title.as_ref().to_string(),
            (Role::Student, Some(class)) => format!("Class {} Student", class),
            (Role::Student, None) => "Student".to_string(),
        };

        Session {
            avatar: account.role.avatar_path(),
            account,
            role,
        }
    }

    pub fn account_type(&self) -> Role {
        self.account.role
    }

    pub fn class(&self) -> Option<ClassLevel> {
        self.account.class
    }

    pub fn initials(&self) -> String {
        initials(&self.account.name)
    }
}

pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .collect()
}

/// Session as shown to clients; never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionView {
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub account_type: Role,
    #[schema(value_type = Option<String>)]
    pub class: Option<ClassLevel>,
    pub avatar: String,
    pub role: String,
    pub initials: String,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        SessionView {
            name: session.account.name.clone(),
            email: session.account.email.clone(),
            account_type: session.account.role,
            class: session.account.class,
            avatar: session.avatar.clone(),
            role: session.role.clone(),
            initials: session.initials(),
        }
    }
}

/// Owns the single current session and announces every change to it.
#[derive(Debug)]
pub struct SessionGate {
    teacher_title: String,
    current: watch::Sender<Option<Session>>,
}

impl SessionGate {
    /// Restores whatever session was persisted last.
    pub fn load(repo: &Repository, teacher_title: impl ToString) -> Result<SessionGate, PortalError> {
        let restored = repo.get(CURRENT_USER)?;
        if let Some(session) = &restored {
            tracing::info!("Restored session for {}", session.account.email);
        }

        let (current, _) = watch::channel(restored);
        Ok(SessionGate {
            teacher_title: teacher_title.to_string(),
            current,
        })
    }

    pub fn current(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.current.subscribe()
    }

    pub fn login(
        &self,
        repo: &Repository,
        email: &str,
        password: &str,
    ) -> Result<Session, PortalError> {
        let account = repo
            .find_account(email, password)?
            .ok_or(PortalError::InvalidCredentials)?;

        let session = Session::new(account, &self.teacher_title);
        repo.put(CURRENT_USER, &session)?;
        self.current.send_replace(Some(session.clone()));

        tracing::info!("Logged in {} as {}", session.account.email, session.role);
        Ok(session)
    }

    pub fn logout(&self, repo: &Repository) -> Result<(), PortalError> {
        repo.remove(CURRENT_USER)?;
        if let Some(previous) = self.current.send_replace(None) {
            tracing::info!("Logged out {}", previous.account.email);
        }
        Ok(())
    }
}
