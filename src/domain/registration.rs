use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub registration_status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Pending,
    Approved,
    Rejected,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Approved => "approved",
            RegistrationStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RegistrationStatus::Pending)
    }
}

impl FromStr for RegistrationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RegistrationStatus::Pending),
            "approved" => Ok(RegistrationStatus::Approved),
            "rejected" => Ok(RegistrationStatus::Rejected),
            _ => Err(AppError::InvalidStatus(s.to_string())),
        }
    }
}

/// The outcome an admin may record. `pending` is not a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn as_status(&self) -> RegistrationStatus {
        match self {
            Decision::Approved => RegistrationStatus::Approved,
            Decision::Rejected => RegistrationStatus::Rejected,
        }
    }
}

impl FromStr for Decision {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(Decision::Approved),
            "rejected" => Ok(Decision::Rejected),
            _ => Err(AppError::InvalidStatus(s.to_string())),
        }
    }
}

/// Admin listing row: the registration joined with its volunteer and event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationSummary {
    pub id: Uuid,
    pub registration_status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub event_id: Uuid,
    pub event_title: String,
}

/// A volunteer's own application, as shown on "My Applications".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub event_id: Uuid,
    pub event_title: String,
    pub start_date: DateTime<Utc>,
    pub registration_status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_parsing() {
        assert_eq!("approved".parse::<Decision>().unwrap(), Decision::Approved);
        assert_eq!("rejected".parse::<Decision>().unwrap(), Decision::Rejected);
        assert!(matches!(
            "pending".parse::<Decision>(),
            Err(AppError::InvalidStatus(_))
        ));
        assert!(matches!(
            "cancelled".parse::<Decision>(),
            Err(AppError::InvalidStatus(_))
        ));
        assert!("Approved".parse::<Decision>().is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!RegistrationStatus::Pending.is_terminal());
        assert!(RegistrationStatus::Approved.is_terminal());
        assert!(RegistrationStatus::Rejected.is_terminal());
    }
}
