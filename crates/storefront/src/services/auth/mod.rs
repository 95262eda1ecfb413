//! Authentication service.
//!
//! The only service with side effects beyond the network call: a successful
//! sign-in or registration installs the token and profile in the shared
//! [`Session`](crate::api::Session); sign-out clears both even when the API
//! call fails.

mod error;

pub use error::AuthError;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{Value, json};
use texpress_core::Email;
use tracing::{debug, info, instrument, warn};

use crate::api::{ApiClient, RequestOptions, envelope};
use crate::types::{Client, Inscription};

/// Minimum password length accepted by the API.
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Serialize)]
struct ConnexionRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct InscriptionRequest<'a> {
    nom: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    prenom: Option<&'a str>,
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    telephone: Option<&'a str>,
    password: &'a str,
    password_confirmation: &'a str,
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Sign in with email and password.
    ///
    /// On success the token and profile are installed in the session before
    /// this returns.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` for a malformed email, or
    /// `AuthError::Api` if the API rejects the credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn connexion(&self, email: &str, password: &SecretString) -> Result<Client, AuthError> {
        let email = Email::parse(email)?;
        let request = ConnexionRequest {
            email: email.as_str(),
            password: password.expose_secret(),
        };

        let mut body: Value = self
            .client
            .post("client/connexion", &request, RequestOptions::public())
            .await?;

        self.install_session(&mut body).await
    }

    /// Create an account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the password is too short, or
    /// `AuthError::Api` if the API rejects the registration (e.g. email
    /// already used, with details in `field_errors`).
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn inscription(&self, form: &Inscription) -> Result<Client, AuthError> {
        let password = form.password.expose_secret();
        validate_password(password)?;

        let request = InscriptionRequest {
            nom: &form.nom,
            prenom: form.prenom.as_deref(),
            email: form.email.as_str(),
            telephone: form.telephone.as_deref(),
            password,
            password_confirmation: password,
        };

        let mut body: Value = self
            .client
            .post("client/inscription", &request, RequestOptions::public())
            .await?;

        self.install_session(&mut body).await
    }

    /// Sign out.
    ///
    /// The remote call is best effort: its failure is logged and the local
    /// session is cleared regardless.
    #[instrument(skip(self))]
    pub async fn deconnexion(&self) {
        let session = self.client.session();

        if session.is_authenticated().await {
            let result: Result<Value, _> = self
                .client
                .post("client/deconnexion", &json!({}), RequestOptions::authenticated())
                .await;
            if let Err(e) = result {
                warn!(error = %e, "Remote sign-out failed, clearing local session anyway");
            }
        } else {
            debug!("Sign-out without a session, nothing to revoke");
        }

        session.clear().await;
        info!("Client signed out");
    }

    /// Re-fetch the signed-in client's profile and update the cached copy.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` without a session, or
    /// `AuthError::Api` if the request fails.
    #[instrument(skip(self))]
    pub async fn profil(&self) -> Result<Client, AuthError> {
        let session = self.client.session();
        if !session.is_authenticated().await {
            return Err(AuthError::NotAuthenticated);
        }

        let mut body: Value = self
            .client
            .post(
                "client/profil",
                &json!({}),
                RequestOptions::authenticated().fresh(),
            )
            .await?;
        let client: Client = envelope::field(&mut body, "client")?;

        session.update_profile(client.clone()).await;
        Ok(client)
    }

    /// Load the session persisted by a previous run, if any.
    pub async fn restaurer(&self) -> Option<Client> {
        self.client.session().restore().await
    }

    async fn install_session(&self, body: &mut Value) -> Result<Client, AuthError> {
        // Sanctum setups answer with `token`, Passport ones with `access_token`
        let token: String = match envelope::optional_field(body, "token")? {
            Some(token) => token,
            None => envelope::field(body, "access_token")?,
        };
        let client: Client = envelope::field(body, "client")?;

        self.client
            .session()
            .establish(SecretString::from(token), client.clone())
            .await;

        info!(client_id = %client.id, "Client signed in");
        Ok(client)
    }
}

/// Validate password length before sending it to the API.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_length() {
        assert!(matches!(
            validate_password("court"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("assez-long").is_ok());
    }

    #[test]
    fn test_validate_password_counts_characters_not_bytes() {
        // 7 characters, 15 bytes
        assert!(validate_password("éééééé√").is_err());
    }
}
