use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;

use crate::error::{Error, Result};
use crate::models::{Role, SessionUser, UserAccount};
use crate::storage::{AUTH_KEY, Storage, USERS_KEY};

/// Reversible base64 encoding of the stored password. This is a prototype
/// gate, not a security control; anyone with the users file can decode it.
fn encode_password(raw: &str) -> String {
    BASE64.encode(raw.as_bytes())
}

pub struct CredentialStore<'a> {
    storage: &'a Storage,
}

impl<'a> CredentialStore<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn load_users(&self) -> Vec<UserAccount> {
        self.storage.read(USERS_KEY).unwrap_or_default()
    }

    pub fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<UserAccount> {
        if name.trim().is_empty() {
            return Err(Error::Validation("name"));
        }
        if email.trim().is_empty() {
            return Err(Error::Validation("email"));
        }
        if password.is_empty() {
            return Err(Error::Validation("password"));
        }
        if password.len() < 6 {
            return Err(Error::PasswordTooShort);
        }

        let mut users = self.load_users();
        // Exact, case-sensitive match on the stored email
        if users.iter().any(|u| u.email == email) {
            return Err(Error::DuplicateEmail);
        }

        let account = UserAccount {
            id: Utc::now().timestamp_millis() as u64,
            name: name.to_string(),
            email: email.to_string(),
            password: encode_password(password),
            role,
        };
        users.push(account.clone());
        self.storage.write(USERS_KEY, &users)?;
        Ok(account)
    }

    pub fn authenticate(&self, email: &str, password: &str) -> Result<UserAccount> {
        let encoded = encode_password(password);
        self.load_users()
            .into_iter()
            .find(|u| u.email == email && u.password == encoded)
            .ok_or(Error::InvalidCredentials)
    }
}

pub struct SessionHolder<'a> {
    storage: &'a Storage,
    current: Option<SessionUser>,
}

impl<'a> SessionHolder<'a> {
    /// Rehydrate the session from storage. A missing or malformed value
    /// starts the holder logged out; this never fails.
    pub fn restore(storage: &'a Storage) -> Self {
        let current = storage.read(AUTH_KEY);
        Self { storage, current }
    }

    pub fn current(&self) -> Option<&SessionUser> {
        self.current.as_ref()
    }

    pub fn establish(&mut self, account: &UserAccount) -> Result<()> {
        let view = SessionUser::from(account);
        self.storage.write(AUTH_KEY, &view)?;
        self.current = Some(view);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.storage.remove(AUTH_KEY)?;
        self.current = None;
        Ok(())
    }
}
