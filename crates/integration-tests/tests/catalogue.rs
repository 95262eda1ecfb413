//! Catalogue and category services against the mock API.

use std::time::Duration;

use rust_decimal::Decimal;
use serde_json::json;
use texpress_core::{CategorieId, CurrencyCode, ProduitId};
use texpress_integration_tests::MockBackend;
use texpress_storefront::adapters::adapt_produit_to_product;
use texpress_storefront::services::{CategorieService, SearchFilters};
use texpress_storefront::{ApiError, AppContext};

fn seed(mock: &MockBackend) {
    mock.add_produit(1, "Boubou brodé", 25_000, true);
    mock.add_produit(2, "Pagne wax", 8_000, false);
    mock.add_produit(3, "Boubou simple", 15_000, true);
    mock.add_produit(4, "Sandales cuir", 12_500, false);
}

#[tokio::test]
async fn test_featured_is_a_plain_search() {
    let mock = MockBackend::start().await;
    seed(&mock);
    let ctx = mock.context();

    let featured = ctx.services().catalogue.en_vedette(10).await.unwrap();
    let explicit = ctx
        .services()
        .catalogue
        .rechercher(&SearchFilters {
            en_vedette: Some(true),
            per_page: Some(10),
            ..SearchFilters::default()
        })
        .await
        .unwrap();

    assert_eq!(featured, explicit.produits);
    let requests = mock.requests("catalogue/rechercher");
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].body, requests[1].body);
    assert_eq!(requests[0].body, json!({ "en_vedette": true, "per_page": 10 }));
    assert!(requests[0].bearer.is_none());

    let ids: Vec<ProduitId> = featured.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![ProduitId::new(1), ProduitId::new(3)]);
}

#[tokio::test]
async fn test_search_decodes_laravel_paginator() {
    let mock = MockBackend::start().await;
    seed(&mock);
    let ctx = mock.context();

    let page = ctx
        .services()
        .catalogue
        .rechercher(&SearchFilters {
            per_page: Some(3),
            ..SearchFilters::default()
        })
        .await
        .unwrap();

    assert_eq!(page.produits.len(), 3);
    let pagination = page.pagination.expect("paginator metadata");
    assert_eq!(pagination.total, 4);
    assert_eq!(pagination.last_page, 2);
    assert!(pagination.has_next());
}

#[tokio::test]
async fn test_text_search_filters_server_side() {
    let mock = MockBackend::start().await;
    seed(&mock);
    let ctx = mock.context();

    let page = ctx
        .services()
        .catalogue
        .rechercher(&SearchFilters::texte("boubou"))
        .await
        .unwrap();

    assert_eq!(page.produits.len(), 2);
    assert_eq!(
        mock.requests("catalogue/rechercher")[0].body,
        json!({ "q": "boubou" })
    );
}

#[tokio::test]
async fn test_missing_product_is_a_404() {
    let mock = MockBackend::start().await;
    let ctx = mock.context();

    let err = ctx
        .services()
        .catalogue
        .produit(ProduitId::new(42))
        .await
        .unwrap_err();

    let ApiError::Api { status, message, .. } = err else {
        panic!("expected an API error, got {err:?}");
    };
    assert_eq!(status, 404);
    assert_eq!(message, "Produit introuvable.");
}

#[tokio::test]
async fn test_product_details_adapt_to_view_model() {
    let mock = MockBackend::start().await;
    seed(&mock);
    let ctx = mock.context();

    let produit = ctx
        .services()
        .catalogue
        .produit(ProduitId::new(2))
        .await
        .unwrap();
    let product = adapt_produit_to_product(&produit, ctx.images(), CurrencyCode::XOF);

    assert_eq!(product.title, "Pagne wax");
    assert_eq!(product.price.amount, Decimal::from(8_000));
    assert_eq!(product.images, vec![product.featured_image.clone()]);
    assert_eq!(product.featured_image.url, ctx.images().default_image());
}

#[tokio::test]
async fn test_categories_are_cached() {
    let mock = MockBackend::start().await;
    mock.set_categories(json!([
        { "id": 1, "nom": "Vêtements", "slug": "vetements" },
        { "id": 2, "nom": "Accessoires", "slug": "accessoires" }
    ]));
    let ctx = mock.context();
    let categories = &ctx.services().categorie;

    let first = categories.liste().await.unwrap();
    let second = categories.liste().await.unwrap();
    let by_slug = categories.par_slug("accessoires").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(by_slug.map(|c| c.nom), Some("Accessoires".to_string()));
    assert_eq!(mock.count("categories"), 1);
}

#[tokio::test]
async fn test_invalidate_forces_category_reload() {
    let mock = MockBackend::start().await;
    mock.set_categories(json!([{ "id": 1, "nom": "Vêtements" }]));
    let ctx = AppContext::in_memory(mock.config()).unwrap();
    let categories = CategorieService::new(ctx.api().clone(), Duration::from_secs(300));

    categories.liste().await.unwrap();
    mock.set_categories(json!([
        { "id": 1, "nom": "Vêtements" },
        { "id": 3, "nom": "Maison" }
    ]));
    assert_eq!(categories.liste().await.unwrap().len(), 1);

    categories.invalidate().await;
    assert_eq!(categories.liste().await.unwrap().len(), 2);
    assert_eq!(mock.count("categories"), 2);
}

#[tokio::test]
async fn test_similar_products_accept_unbounded_limit() {
    let mock = MockBackend::start().await;
    seed(&mock);
    let ctx = mock.context();
    let mut produit = ctx
        .services()
        .catalogue
        .produit(ProduitId::new(1))
        .await
        .unwrap();
    produit.categorie_id = Some(CategorieId::new(1));

    let similaires = ctx
        .services()
        .catalogue
        .similaires(&produit, u32::MAX)
        .await
        .unwrap();

    assert_eq!(similaires.len(), 3);
    assert!(similaires.iter().all(|p| p.id != produit.id));
    assert_eq!(
        mock.requests("catalogue/rechercher")[0].body["per_page"],
        json!(u32::MAX)
    );
}
