//! Wishlist store behaviour against the mock API.

use secrecy::SecretString;
use texpress_core::ProduitId;
use texpress_integration_tests::MockBackend;
use texpress_storefront::AppContext;

async fn signed_in(mock: &MockBackend) -> AppContext {
    mock.add_account("moussa@t-express.sn", "motdepasse1", "Ndiaye");
    let ctx = mock.context();
    ctx.auth()
        .connexion("moussa@t-express.sn", &SecretString::from("motdepasse1".to_string()))
        .await
        .expect("login should succeed");
    ctx
}

#[tokio::test]
async fn test_sequential_toggles_alternate() {
    let mock = MockBackend::start().await;
    mock.add_produit(7, "Sac en raphia", 15_000, false);
    let ctx = signed_in(&mock).await;
    let produit = ProduitId::new(7);

    assert!(ctx.favoris().basculer(produit).await.unwrap());
    assert!(ctx.favoris().est_favori(produit));

    assert!(!ctx.favoris().basculer(produit).await.unwrap());
    assert!(!ctx.favoris().est_favori(produit));

    assert!(ctx.favoris().basculer(produit).await.unwrap());
    assert!(ctx.favoris().est_favori(produit));
    assert_eq!(ctx.favoris().state().len(), 1);

    assert_eq!(mock.count("favoris/basculer"), 3);
    // Every toggle answered with the entry, so no reload was needed
    assert_eq!(mock.count("favoris/liste"), 0);
}

#[tokio::test]
async fn test_cache_matches_server_after_mutations() {
    let mock = MockBackend::start().await;
    for id in 1..=3 {
        mock.add_produit(id, &format!("Produit {id}"), 1_000 * id, false);
    }
    let ctx = signed_in(&mock).await;

    ctx.favoris().ajouter(ProduitId::new(1)).await.unwrap();
    ctx.favoris().ajouter(ProduitId::new(2)).await.unwrap();
    ctx.favoris().basculer(ProduitId::new(3)).await.unwrap();
    ctx.favoris().retirer(ProduitId::new(2)).await.unwrap();

    let cached: Vec<ProduitId> = ctx
        .favoris()
        .state()
        .favoris
        .iter()
        .map(|f| f.produit_id)
        .collect();
    let server: Vec<ProduitId> = ctx
        .services()
        .favoris
        .liste()
        .await
        .unwrap()
        .iter()
        .map(|f| f.produit_id)
        .collect();

    assert_eq!(cached, server);
    assert_eq!(cached, vec![ProduitId::new(1), ProduitId::new(3)]);
}

#[tokio::test]
async fn test_adding_twice_keeps_one_entry() {
    let mock = MockBackend::start().await;
    mock.add_produit(9, "Collier perles", 4_500, false);
    let ctx = signed_in(&mock).await;

    let first = ctx.favoris().ajouter(ProduitId::new(9)).await.unwrap();
    let second = ctx.favoris().ajouter(ProduitId::new(9)).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(ctx.favoris().state().len(), 1);
}

#[tokio::test]
async fn test_unknown_product_leaves_cache_unchanged() {
    let mock = MockBackend::start().await;
    let ctx = signed_in(&mock).await;

    let err = ctx.favoris().basculer(ProduitId::new(404)).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert!(ctx.favoris().state().is_empty());
    assert!(!ctx.favoris().state().toggling);
}

#[tokio::test]
async fn test_sign_in_after_start_loads_wishlist() {
    let mock = MockBackend::start().await;
    mock.add_produit(5, "Tissu bazin", 30_000, true);
    mock.add_account("awa@t-express.sn", "motdepasse1", "Diop");

    // Seed the server-side wishlist through a first session
    let seeder = mock.context();
    seeder
        .auth()
        .connexion("awa@t-express.sn", &SecretString::from("motdepasse1".to_string()))
        .await
        .unwrap();
    seeder.favoris().ajouter(ProduitId::new(5)).await.unwrap();

    let ctx = mock.context();
    ctx.start().await;
    let mut rx = ctx.favoris().subscribe();
    assert!(ctx.favoris().state().is_empty());

    ctx.auth()
        .connexion("awa@t-express.sn", &SecretString::from("motdepasse1".to_string()))
        .await
        .unwrap();

    tokio::time::timeout(
        std::time::Duration::from_secs(5),
        rx.wait_for(|state| state.est_favori(ProduitId::new(5))),
    )
    .await
    .expect("wishlist reload timed out")
    .expect("store dropped");

    ctx.shutdown().await;
}

#[tokio::test]
async fn test_refresh_reports_revoked_session_instead_of_empty_list() {
    let mock = MockBackend::start().await;
    let ctx = signed_in(&mock).await;
    let token = ctx.session().token().await.unwrap();
    mock.revoke_token(secrecy::ExposeSecret::expose_secret(&token));

    let err = ctx.favoris().refresh().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(ctx.favoris().state().is_empty());
}
