use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Staff,
    Hrd,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Staff => "staff",
            Role::Hrd => "hrd",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "staff" => Ok(Role::Staff),
            "hrd" => Ok(Role::Hrd),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("unknown role: {} (staff, hrd, admin)", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Lolos,
    Wawancara,
    Test,
    Ditolak,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Pending,
        Status::Lolos,
        Status::Wawancara,
        Status::Test,
        Status::Ditolak,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Lolos => "lolos",
            Status::Wawancara => "wawancara",
            Status::Test => "test",
            Status::Ditolak => "ditolak",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Status::Pending),
            "lolos" => Ok(Status::Lolos),
            "wawancara" => Ok(Status::Wawancara),
            "test" => Ok(Status::Test),
            "ditolak" => Ok(Status::Ditolak),
            _ => Err(format!(
                "unknown status: {} (pending, lolos, wawancara, test, ditolak)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "Frontend Developer")]
    FrontendDeveloper,
    #[serde(rename = "Backend Developer")]
    BackendDeveloper,
    #[serde(rename = "UI Designer")]
    UiDesigner,
    #[serde(rename = "Product Manager")]
    ProductManager,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::FrontendDeveloper,
        Position::BackendDeveloper,
        Position::UiDesigner,
        Position::ProductManager,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::FrontendDeveloper => "Frontend Developer",
            Position::BackendDeveloper => "Backend Developer",
            Position::UiDesigner => "UI Designer",
            Position::ProductManager => "Product Manager",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept the full title or a one-word shorthand
        match s.to_lowercase().as_str() {
            "frontend developer" | "frontend" => Ok(Position::FrontendDeveloper),
            "backend developer" | "backend" => Ok(Position::BackendDeveloper),
            "ui designer" | "ui" | "designer" => Ok(Position::UiDesigner),
            "product manager" | "product" | "pm" => Ok(Position::ProductManager),
            _ => Err(format!(
                "unknown position: {} (frontend, backend, ui, product)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password: String, // base64-encoded, reversible - not a security control
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&UserAccount> for SessionUser {
    fn from(account: &UserAccount) -> Self {
        SessionUser {
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub text: String,
    pub author: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub position: Position,
    pub status: Status,
    pub applied_date: NaiveDate,
    pub interview_date: Option<NaiveDate>,
    pub documents: Vec<String>, // file names only, no content is stored
    pub notes: Vec<Note>,
}

/// Field values for creating or overwriting a record. Notes and documents are
/// never part of a draft; they only change through the append operations.
#[derive(Debug, Clone)]
pub struct ApplicationDraft {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub position: Position,
    pub status: Status,
    pub applied_date: Option<NaiveDate>,
    pub interview_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_accepts_full_title_and_shorthand() {
        assert_eq!(
            "Frontend Developer".parse::<Position>().unwrap(),
            Position::FrontendDeveloper
        );
        assert_eq!("backend".parse::<Position>().unwrap(), Position::BackendDeveloper);
        assert!("astronaut".parse::<Position>().is_err());
    }

    #[test]
    fn test_status_serializes_to_lowercase_names() {
        let json = serde_json::to_string(&Status::Wawancara).unwrap();
        assert_eq!(json, "\"wawancara\"");
        assert_eq!("DITOLAK".parse::<Status>().unwrap(), Status::Ditolak);
    }

    #[test]
    fn test_session_user_drops_the_password() {
        let account = UserAccount {
            id: 1,
            name: "Jane".to_string(),
            email: "jane@x.com".to_string(),
            password: "c2VjcmV0MQ==".to_string(),
            role: Role::Staff,
        };
        let view = SessionUser::from(&account);
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("c2VjcmV0MQ=="));
        assert!(!json.contains("password"));
    }
}
