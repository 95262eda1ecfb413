//! Product card / product page view-model.

use rust_decimal::Decimal;
use serde::Serialize;
use texpress_core::{CurrencyCode, Price, ProduitId};

use super::ImageResolver;
use crate::types::Produit;

/// Product image as rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    /// Public URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
}

/// Review summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProductRating {
    /// Average note on a 1-5 scale.
    pub value: Decimal,
    /// Number of published reviews.
    pub count: u32,
}

/// A product ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProduitId,
    /// URL handle; the slug, or the id when the product has none.
    pub handle: String,
    pub title: String,
    pub description: String,
    pub available_for_sale: bool,
    /// Price the customer pays.
    pub price: Price,
    /// List price, set only while a promotion applies.
    pub compare_at_price: Option<Price>,
    pub discount_percent: Option<u8>,
    /// First entry of `images`.
    pub featured_image: Image,
    /// Never empty: holds the placeholder when the product has no image.
    pub images: Vec<Image>,
    pub rating: Option<ProductRating>,
    pub category: Option<String>,
    pub is_featured: bool,
    pub is_new: bool,
}

/// Build the view-model of `produit`.
///
/// Images are the primary image followed by the gallery, in order. A
/// primary image that also appears in the gallery is listed twice.
#[must_use]
pub fn adapt_produit_to_product(
    produit: &Produit,
    images: &ImageResolver,
    currency: CurrencyCode,
) -> Product {
    let alt_text = Some(produit.nom.clone());

    let mut urls: Vec<String> = produit
        .image_principale
        .iter()
        .chain(produit.images.iter())
        .filter_map(|path| images.resolve(path))
        .collect();
    if urls.is_empty() {
        urls.push(images.default_image().to_string());
    }
    let gallery: Vec<Image> = urls
        .into_iter()
        .map(|url| Image {
            url,
            alt_text: alt_text.clone(),
        })
        .collect();
    let featured_image = gallery.first().cloned().unwrap_or_else(|| Image {
        url: images.default_image().to_string(),
        alt_text: alt_text.clone(),
    });

    let list_price = Price::new(produit.prix, currency);
    let price = Price::new(produit.prix_effectif(), currency);
    let (compare_at_price, discount_percent) = if produit.est_en_promo() {
        (Some(list_price), list_price.discount_percent(&price))
    } else {
        (None, None)
    };

    let rating = produit.note_moyenne.map(|value| ProductRating {
        value,
        count: produit.nombre_avis,
    });

    Product {
        id: produit.id,
        handle: produit
            .slug
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| produit.id.to_string()),
        title: produit.nom.clone(),
        description: produit.description.clone().unwrap_or_default(),
        available_for_sale: produit.est_disponible(),
        price,
        compare_at_price,
        discount_percent,
        featured_image,
        images: gallery,
        rating,
        category: produit.categorie.as_ref().map(|c| c.nom.clone()),
        is_featured: produit.en_vedette,
        is_new: produit.est_nouveau,
    }
}
