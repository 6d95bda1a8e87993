//! Sign-in against a fixed set of accounts, standing in for the API's login
//! endpoint.

use async_trait::async_trait;
use console_framework::session::{Authenticator, Credentials};
use console_framework::{ConsoleError, Role, Session};
use tracing::{info, warn};
use uuid::Uuid;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

struct Account {
    username: String,
    password: String,
    role: Role,
}

#[derive(Default)]
pub struct AccountDirectory {
    accounts: Vec<Account>,
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// One account per role: `admin`, `accountant` and `resident`, each with
    /// the password `<username>123`.
    pub fn seeded() -> Self {
        Self::new()
            .with_account("admin", "admin123", Role::Admin)
            .with_account("accountant", "accountant123", Role::Accountant)
            .with_account("resident", "resident123", Role::Resident)
    }

    pub fn with_account(mut self, username: &str, password: &str, role: Role) -> Self {
        self.accounts.push(Account {
            username: username.to_string(),
            password: password.to_string(),
            role,
        });
        self
    }
}

#[async_trait]
impl Authenticator for AccountDirectory {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, ConsoleError> {
        let account = self
            .accounts
            .iter()
            .find(|a| a.username == credentials.username && a.password == credentials.password);
        match account {
            Some(account) => {
                info!(username = %account.username, role = %account.role, "Credentials accepted");
                Ok(Session {
                    token: Uuid::new_v4().to_string(),
                    username: account.username.clone(),
                    role: account.role,
                })
            }
            None => {
                warn!(username = %credentials.username, "Credentials rejected");
                Err(ConsoleError::rejected(INVALID_CREDENTIALS))
            }
        }
    }
}
