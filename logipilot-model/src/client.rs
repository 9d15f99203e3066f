use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::ids::ClientId;

/// Relationship stage of a client account.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum ClientStatus {
    Active,
    Inactive,
    Prospect,
    Onboarding,
}

impl ClientStatus {
    pub fn all() -> [ClientStatus; 4] {
        [
            ClientStatus::Active,
            ClientStatus::Inactive,
            ClientStatus::Prospect,
            ClientStatus::Onboarding,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Active => "Active",
            ClientStatus::Inactive => "Inactive",
            ClientStatus::Prospect => "Prospect",
            ClientStatus::Onboarding => "Onboarding",
        }
    }
}

impl std::fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ClientStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(ClientStatus::Active),
            "Inactive" => Ok(ClientStatus::Inactive),
            "Prospect" => Ok(ClientStatus::Prospect),
            "Onboarding" => Ok(ClientStatus::Onboarding),
            other => Err(ModelError::InvalidValue(format!(
                "unknown client status: {other}"
            ))),
        }
    }
}

/// A client account as served by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub status: ClientStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// 0..=100 where recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satisfaction_score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload for a client; the server assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDraft {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub status: ClientStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satisfaction_score: Option<f64>,
}

impl ClientDraft {
    pub fn into_client(self, id: ClientId, now: DateTime<Utc>) -> Client {
        Client {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            status: self.status,
            company_name: self.company_name,
            contact_person: self.contact_person,
            industry: self.industry,
            notes: self.notes,
            satisfaction_score: self.satisfaction_score,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_to(self, existing: &Client, now: DateTime<Utc>) -> Client {
        Client {
            id: existing.id.clone(),
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            status: self.status,
            company_name: self.company_name,
            contact_person: self.contact_person,
            industry: self.industry,
            notes: self.notes,
            satisfaction_score: self.satisfaction_score,
            created_at: existing.created_at,
            updated_at: now,
        }
    }
}

impl From<&Client> for ClientDraft {
    fn from(client: &Client) -> Self {
        ClientDraft {
            name: client.name.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
            address: client.address.clone(),
            status: client.status,
            company_name: client.company_name.clone(),
            contact_person: client.contact_person.clone(),
            industry: client.industry.clone(),
            notes: client.notes.clone(),
            satisfaction_score: client.satisfaction_score,
        }
    }
}
