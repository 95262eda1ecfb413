//! Sign-in, registration and sign-out against the mock API.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use texpress_core::Email;
use texpress_integration_tests::MockBackend;
use texpress_storefront::api::session::{AUTH_TOKEN_KEY, USER_DATA_KEY};
use texpress_storefront::api::{MemoryStorage, Session, SessionStorage};
use texpress_storefront::services::AuthError;
use texpress_storefront::types::{Inscription, MiseAJourProfil};
use texpress_storefront::{ApiError, AppContext};

fn password(raw: &str) -> SecretString {
    SecretString::from(raw.to_string())
}

#[tokio::test]
async fn test_login_establishes_session_and_persists_both_keys() {
    let mock = MockBackend::start().await;
    let client_id = mock.add_account("awa@t-express.sn", "motdepasse1", "Diop");

    let storage = Arc::new(MemoryStorage::default());
    let session = Session::new(storage.clone());
    let ctx = AppContext::new(mock.config(), session)
        .expect("context")
        .with_all_stores();
    ctx.start().await;

    let client = ctx
        .auth()
        .connexion("awa@t-express.sn", &password("motdepasse1"))
        .await
        .expect("login should succeed");

    assert_eq!(client.id.as_i64(), client_id);
    assert!(ctx.auth().is_authenticated());
    assert_eq!(ctx.session().client().await, Some(client));

    let token = ctx.session().token().await.expect("token in session");
    assert!(mock.token_is_valid(token.expose_secret()));
    assert!(storage.get(AUTH_TOKEN_KEY).unwrap().is_some());
    assert!(storage.get(USER_DATA_KEY).unwrap().is_some());

    ctx.shutdown().await;
}

#[tokio::test]
async fn test_authenticated_requests_carry_bearer_token() {
    let mock = MockBackend::start().await;
    mock.add_account("awa@t-express.sn", "motdepasse1", "Diop");
    let ctx = mock.context();

    ctx.auth()
        .connexion("awa@t-express.sn", &password("motdepasse1"))
        .await
        .unwrap();
    ctx.auth().rafraichir_profil().await.unwrap();


    let token = ctx.session().token().await.unwrap();
    let profil = mock.requests("client/profil");
    assert_eq!(profil.len(), 1);
    assert_eq!(profil[0].bearer.as_deref(), Some(token.expose_secret()));

    // Public endpoints never send the token
    let login = mock.requests("client/connexion");
    assert_eq!(login[0].bearer, None);
}

#[tokio::test]
async fn test_bad_credentials_leave_session_empty() {
    let mock = MockBackend::start().await;
    mock.add_account("awa@t-express.sn", "motdepasse1", "Diop");
    let ctx = mock.context();

    let err = ctx
        .auth()
        .connexion("awa@t-express.sn", &password("mauvais-mdp"))
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert!(err.to_string().contains("Identifiants invalides."));
    assert!(!ctx.session().is_authenticated().await);
    assert!(!ctx.auth().state().logging_in);
}

#[tokio::test]
async fn test_register_duplicate_email_exposes_field_errors() {
    let mock = MockBackend::start().await;
    mock.add_account("awa@t-express.sn", "motdepasse1", "Diop");
    let ctx = mock.context();

    let form = Inscription {
        nom: "Diop".to_string(),
        prenom: Some("Awa".to_string()),
        email: Email::parse("awa@t-express.sn").unwrap(),
        telephone: None,
        password: password("autre-motdepasse"),
    };
    let err = ctx.auth().inscription(&form).await.unwrap_err();

    let AuthError::Api(ApiError::Api {
        status,
        field_errors,
        ..
    }) = err
    else {
        panic!("expected an API validation error, got {err:?}");
    };
    assert_eq!(status, 422);
    assert_eq!(field_errors["email"], vec!["L'email est déjà utilisé.".to_string()]);

    let body = &mock.requests("client/inscription")[0].body;
    assert_eq!(body["password_confirmation"], "autre-motdepasse");
}

#[tokio::test]
async fn test_register_signs_in() {
    let mock = MockBackend::start().await;
    let ctx = mock.context();

    let form = Inscription {
        nom: "Ndiaye".to_string(),
        prenom: Some("Moussa".to_string()),
        email: Email::parse("Moussa@T-Express.SN").unwrap(),
        telephone: Some("+221770000000".to_string()),
        password: password("motdepasse1"),
    };
    let client = ctx.auth().inscription(&form).await.unwrap();

    assert_eq!(client.nom_complet(), "Moussa Ndiaye");
    assert_eq!(client.email, "Moussa@t-express.sn");
    assert!(ctx.session().is_authenticated().await);
}

#[tokio::test]
async fn test_weak_password_is_rejected_before_any_request() {
    let mock = MockBackend::start().await;
    let ctx = mock.context();

    let form = Inscription {
        nom: "Ndiaye".to_string(),
        prenom: None,
        email: Email::parse("moussa@t-express.sn").unwrap(),
        telephone: None,
        password: password("court"),
    };
    let err = ctx.auth().inscription(&form).await.unwrap_err();

    assert!(matches!(err, AuthError::WeakPassword(_)));
    assert_eq!(mock.count("client/inscription"), 0);
}

#[tokio::test]
async fn test_logout_revokes_token_and_clears_storage() {
    let mock = MockBackend::start().await;
    mock.add_account("awa@t-express.sn", "motdepasse1", "Diop");
    let storage = Arc::new(MemoryStorage::default());
    let ctx = AppContext::new(mock.config(), Session::new(storage.clone()))
        .unwrap()
        .with_auth();

    ctx.auth()
        .connexion("awa@t-express.sn", &password("motdepasse1"))
        .await
        .unwrap();
    let token = ctx.session().token().await.unwrap();

    ctx.auth().deconnexion().await;

    assert!(!mock.token_is_valid(token.expose_secret()));
    assert!(!ctx.auth().is_authenticated());
    assert!(!ctx.session().is_authenticated().await);
    assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap(), None);
    assert_eq!(storage.get(USER_DATA_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_logout_clears_local_session_when_api_fails() {
    let mock = MockBackend::start().await;
    mock.add_account("awa@t-express.sn", "motdepasse1", "Diop");
    mock.fail_logout();
    let ctx = mock.context();

    ctx.auth()
        .connexion("awa@t-express.sn", &password("motdepasse1"))
        .await
        .unwrap();
    ctx.auth().deconnexion().await;

    assert_eq!(mock.count("client/deconnexion"), 1);
    assert!(!ctx.session().is_authenticated().await);
    assert_eq!(ctx.session().client().await, None);
    assert!(!ctx.auth().state().logging_out);
}

#[tokio::test]
async fn test_profile_update_mirrors_into_session_and_store() {
    let mock = MockBackend::start().await;
    mock.add_account("awa@t-express.sn", "motdepasse1", "Diop");
    let ctx = mock.context();

    ctx.auth()
        .connexion("awa@t-express.sn", &password("motdepasse1"))
        .await
        .unwrap();

    let update = MiseAJourProfil {
        prenom: Some("Awa".to_string()),
        telephone: Some("+221771234567".to_string()),
        ..MiseAJourProfil::default()
    };
    let client = ctx.auth().modifier_profil(&update).await.unwrap();

    assert_eq!(client.telephone.as_deref(), Some("+221771234567"));
    assert_eq!(ctx.auth().client(), Some(client.clone()));
    assert_eq!(ctx.session().client().await, Some(client));
    assert_eq!(
        mock.requests("client/profil/modifier")[0].body,
        serde_json::json!({ "prenom": "Awa", "telephone": "+221771234567" })
    );
}

#[tokio::test]
async fn test_revoked_token_signs_out_on_profile_refresh() {
    let mock = MockBackend::start().await;
    mock.add_account("awa@t-express.sn", "motdepasse1", "Diop");
    let ctx = mock.context();
    ctx.auth()
        .connexion("awa@t-express.sn", &password("motdepasse1"))
        .await
        .unwrap();

    let token = ctx.session().token().await.unwrap();
    mock.revoke_token(token.expose_secret());

    let err = ctx.auth().rafraichir_profil().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!ctx.auth().is_authenticated());
    assert!(!ctx.session().is_authenticated().await);
}

#[tokio::test]
async fn test_persisted_session_is_restored_on_start() {
    let mock = MockBackend::start().await;
    mock.add_account("awa@t-express.sn", "motdepasse1", "Diop");
    let storage = Arc::new(MemoryStorage::default());

    let first = AppContext::new(mock.config(), Session::new(storage.clone()))
        .unwrap()
        .with_auth();
    let client = first
        .auth()
        .connexion("awa@t-express.sn", &password("motdepasse1"))
        .await
        .unwrap();
    drop(first);

    let second = AppContext::new(mock.config(), Session::new(storage))
        .unwrap()
        .with_all_stores();
    second.start().await;

    assert_eq!(second.auth().client(), Some(client));
    assert!(second.session().is_authenticated().await);
    assert_eq!(mock.count("panier/contenu"), 1);
    assert_eq!(mock.count("favoris/liste"), 1);
    second.shutdown().await;
}

#[tokio::test]
async fn test_torn_persisted_session_is_discarded() {
    let storage = Arc::new(MemoryStorage::default());
    storage.set(AUTH_TOKEN_KEY, "tok-orphan").unwrap();

    let session = Session::new(storage.clone());
    assert_eq!(session.restore().await, None);
    assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap(), None);
}
