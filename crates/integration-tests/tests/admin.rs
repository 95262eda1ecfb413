//! Back-office listings against the mock API.

use secrecy::SecretString;
use serde_json::json;
use texpress_core::ProduitId;
use texpress_integration_tests::MockBackend;

#[tokio::test]
async fn test_stock_alerts_filtered_and_sorted() {
    let mock = MockBackend::start().await;
    mock.add_account("admin@t-express.sn", "motdepasse1", "Admin");
    mock.set_stocks(json!([
        { "id": 1, "produit_id": 10, "quantite": 40, "seuil_alerte": 10 },
        { "id": 2, "produit_id": 11, "quantite": 3 },
        { "id": 3, "produit_id": 12, "quantite": 0, "seuil_alerte": 2 },
        { "id": 4, "produit_id": 13, "quantite": 10, "seuil_alerte": 10 }
    ]));
    let ctx = mock.context();
    ctx.auth()
        .connexion("admin@t-express.sn", &SecretString::from("motdepasse1".to_string()))
        .await
        .unwrap();

    let alertes = ctx.services().stock.alertes().await.unwrap();

    let produits: Vec<ProduitId> = alertes.iter().map(|s| s.produit_id).collect();
    assert_eq!(
        produits,
        vec![ProduitId::new(12), ProduitId::new(11), ProduitId::new(13)]
    );
    let request = &mock.requests("admin/stocks")[0];
    assert_eq!(request.method, "GET");
    assert!(request.bearer.is_some());
}

#[tokio::test]
async fn test_admin_listing_requires_session() {
    let mock = MockBackend::start().await;
    let ctx = mock.context();

    let err = ctx.services().client.liste().await.unwrap_err();

    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_client_listing() {
    let mock = MockBackend::start().await;
    mock.add_account("admin@t-express.sn", "motdepasse1", "Admin");
    mock.add_account("awa@t-express.sn", "motdepasse1", "Diop");
    let ctx = mock.context();
    ctx.auth()
        .connexion("admin@t-express.sn", &SecretString::from("motdepasse1".to_string()))
        .await
        .unwrap();

    let clients = ctx.services().client.liste().await.unwrap();

    let emails: Vec<&str> = clients.iter().map(|c| c.email.as_str()).collect();
    assert_eq!(emails, vec!["admin@t-express.sn", "awa@t-express.sn"]);
}
