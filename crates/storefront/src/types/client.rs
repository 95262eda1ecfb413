//! Client (customer account) records.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use texpress_core::{ClientId, Email};

/// A T-Express customer account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub nom: String,
    #[serde(default)]
    pub prenom: Option<String>,
    pub email: String,
    #[serde(default)]
    pub telephone: Option<String>,
    /// `"admin"` for back-office accounts, absent or `"client"` otherwise.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Client {
    /// First and last name, as shown in the account header.
    #[must_use]
    pub fn nom_complet(&self) -> String {
        match &self.prenom {
            Some(prenom) if !prenom.is_empty() => format!("{prenom} {}", self.nom),
            _ => self.nom.clone(),
        }
    }

    /// Whether the account may use the admin dashboard.
    #[must_use]
    pub fn est_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }
}

/// Registration form.
#[derive(Debug, Clone)]
pub struct Inscription {
    pub nom: String,
    pub prenom: Option<String>,
    pub email: Email,
    pub telephone: Option<String>,
    pub password: SecretString,
}

/// Profile update; `None` fields are left untouched by the API.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MiseAJourProfil {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prenom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
}
