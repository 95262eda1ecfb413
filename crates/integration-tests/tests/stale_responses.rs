//! Responses that arrive after a store was unmounted must not touch it.

use std::time::Duration;

use secrecy::SecretString;
use texpress_core::ProduitId;
use texpress_integration_tests::MockBackend;
use texpress_storefront::AppContext;
use texpress_storefront::stores::{FavorisState, PanierState};
use tokio::time::timeout;

const SLOW: Duration = Duration::from_millis(300);
const WAIT: Duration = Duration::from_secs(5);

/// Signed-in context whose stores were never started, so no background
/// reload competes with the requests under test.
async fn signed_in(mock: &MockBackend) -> AppContext {
    mock.add_produit(21, "Bracelet bronze", 6_000, false);
    mock.add_account("awa@t-express.sn", "motdepasse1", "Diop");
    let ctx = mock.context();
    ctx.auth()
        .connexion("awa@t-express.sn", &SecretString::from("motdepasse1".to_string()))
        .await
        .unwrap();
    ctx
}

#[tokio::test]
async fn test_cart_refresh_resolving_after_unmount_is_discarded() {
    let mock = MockBackend::start().await;
    let ctx = signed_in(&mock).await;
    ctx.services().panier.ajouter(ProduitId::new(21), 3).await.unwrap();
    mock.delay("panier/contenu", SLOW);

    let store = ctx.panier().clone();
    let pending = tokio::spawn(async move { store.refresh().await });
    timeout(WAIT, mock.wait_for_requests("panier/contenu", 1))
        .await
        .expect("refresh never reached the API");
    assert!(ctx.panier().state().loading);

    ctx.panier().unmount();
    let fetched = pending.await.unwrap().unwrap();

    // The caller still gets its answer; the store ignores it
    assert_eq!(fetched.nombre_articles, 3);
    assert_eq!(ctx.panier().state(), PanierState::default());
}

#[tokio::test]
async fn test_cart_mutation_resolving_after_reset_is_discarded() {
    let mock = MockBackend::start().await;
    let ctx = signed_in(&mock).await;
    mock.delay("panier/ajouter", SLOW);

    let store = ctx.panier().clone();
    let pending = tokio::spawn(async move { store.ajouter(ProduitId::new(21), 1).await });
    timeout(WAIT, mock.wait_for_requests("panier/ajouter", 1))
        .await
        .expect("addition never reached the API");

    ctx.panier().reset();
    let contenu = pending.await.unwrap().unwrap();

    assert_eq!(contenu.nombre_articles, 1);
    assert_eq!(ctx.panier().state(), PanierState::default());
}

#[tokio::test]
async fn test_wishlist_refresh_resolving_after_unmount_is_discarded() {
    let mock = MockBackend::start().await;
    let ctx = signed_in(&mock).await;
    ctx.services().favoris.ajouter(ProduitId::new(21)).await.unwrap();
    mock.delay("favoris/liste", SLOW);

    let store = ctx.favoris().clone();
    let pending = tokio::spawn(async move { store.refresh().await });
    timeout(WAIT, mock.wait_for_requests("favoris/liste", 1))
        .await
        .expect("refresh never reached the API");
    assert!(ctx.favoris().state().loading);

    ctx.favoris().unmount();
    let fetched = pending.await.unwrap().unwrap();

    assert_eq!(fetched.len(), 1);
    assert_eq!(ctx.favoris().state(), FavorisState::default());
    assert!(!ctx.favoris().est_favori(ProduitId::new(21)));
}

#[tokio::test]
async fn test_remount_accepts_new_responses() {
    let mock = MockBackend::start().await;
    let ctx = signed_in(&mock).await;
    ctx.services().panier.ajouter(ProduitId::new(21), 2).await.unwrap();

    ctx.panier().unmount();
    ctx.panier().mount().await.unwrap();

    assert_eq!(ctx.panier().contenu().nombre_articles, 2);
    assert!(!ctx.panier().state().is_busy());
}
