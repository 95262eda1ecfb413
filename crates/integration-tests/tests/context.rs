//! Composition root: providers and the session watcher.

use std::time::Duration;

use secrecy::SecretString;
use texpress_core::ProduitId;
use texpress_integration_tests::MockBackend;
use texpress_storefront::AppContext;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

fn password() -> SecretString {
    SecretString::from("motdepasse1".to_string())
}

#[tokio::test]
async fn test_sign_in_reloads_cart_and_sign_out_resets_it() {
    let mock = MockBackend::start().await;
    mock.add_produit(11, "Chemise lin", 18_000, false);
    mock.add_account("awa@t-express.sn", "motdepasse1", "Diop");

    // Server-side cart filled from another device
    let other = mock.context();
    other.auth().connexion("awa@t-express.sn", &password()).await.unwrap();
    other.panier().ajouter(ProduitId::new(11), 2).await.unwrap();

    let ctx = mock.context();
    ctx.start().await;
    assert!(ctx.panier().contenu().est_vide());
    let mut rx = ctx.panier().subscribe();

    ctx.auth().connexion("awa@t-express.sn", &password()).await.unwrap();
    timeout(WAIT, rx.wait_for(|state| state.contenu.nombre_articles == 2))
        .await
        .expect("cart reload timed out")
        .expect("store dropped");

    ctx.auth().deconnexion().await;
    timeout(WAIT, rx.wait_for(|state| state.contenu.est_vide()))
        .await
        .expect("cart reset timed out")
        .expect("store dropped");

    ctx.shutdown().await;
}

#[tokio::test]
async fn test_start_without_session_sends_no_cart_request() {
    let mock = MockBackend::start().await;
    let ctx = mock.context();

    ctx.start().await;

    assert!(!ctx.auth().is_authenticated());
    assert_eq!(mock.count("panier/contenu"), 0);
    assert_eq!(mock.count("favoris/liste"), 0);
    ctx.shutdown().await;
}

#[tokio::test]
async fn test_context_with_only_auth_starts() {
    let mock = MockBackend::start().await;
    let ctx = AppContext::in_memory(mock.config()).unwrap().with_auth();

    ctx.start().await;

    assert!(ctx.try_panier().is_none());
    assert!(ctx.try_favoris().is_none());
    ctx.shutdown().await;
}

#[test]
#[should_panic(expected = "`favoris` must be used within its provider")]
fn test_wishlist_outside_provider_panics() {
    let config = texpress_storefront::Config::for_api_url("http://127.0.0.1:9/api").unwrap();
    let ctx = AppContext::in_memory(config).unwrap().with_auth().with_panier();
    let _ = ctx.favoris();
}

#[tokio::test]
async fn test_shutdown_drops_cached_state() {
    let mock = MockBackend::start().await;
    mock.add_produit(11, "Chemise lin", 18_000, false);
    mock.add_account("awa@t-express.sn", "motdepasse1", "Diop");
    let ctx = mock.context();
    ctx.start().await;
    ctx.auth().connexion("awa@t-express.sn", &password()).await.unwrap();
    ctx.panier().ajouter(ProduitId::new(11), 1).await.unwrap();

    ctx.shutdown().await;

    assert!(ctx.panier().contenu().est_vide());
    assert!(ctx.auth().client().is_none());
    // The persisted session survives an unmount
    assert!(ctx.session().is_authenticated().await);
}
