//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use bloom_core::order::ESTIMATED_DELIVERY;
use tracing::instrument;

use crate::catalog::Arrangement;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::CspNonce;
use crate::state::AppState;

/// Number of related arrangements shown under a product.
const RELATED_COUNT: usize = 4;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image: String,
    pub rating: String,
    pub reviews: u32,
    pub badge: Option<String>,
    pub description: String,
    pub in_stock: bool,
}

impl From<&Arrangement> for ProductView {
    fn from(arrangement: &Arrangement) -> Self {
        Self {
            id: arrangement.id.to_string(),
            name: arrangement.name.clone(),
            price: arrangement.price.to_string(),
            image: arrangement.image.clone(),
            rating: format!("{:.1}", arrangement.rating),
            reviews: arrangement.reviews,
            badge: arrangement.badge.map(|b| b.to_string()),
            description: arrangement.description.clone(),
            in_stock: arrangement.in_stock,
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "product.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
    pub related_products: Vec<ProductView>,
    pub delivery: &'static str,
    pub nonce: String,
}

/// Display product detail page.
#[instrument(skip(state, nonce))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    CspNonce(nonce): CspNonce,
) -> Result<impl IntoResponse> {
    let catalog = state.catalog();
    let arrangement = catalog
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("arrangement {id}")))?;

    add_breadcrumb("navigation", "Viewed product page", Some(&[("product_id", id.as_str())]));

    Ok(ProductShowTemplate {
        product: ProductView::from(arrangement),
        related_products: catalog
            .related(&id, RELATED_COUNT)
            .map(ProductView::from)
            .collect(),
        delivery: ESTIMATED_DELIVERY,
        nonce,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::catalog::Catalog;

    use super::*;

    #[test]
    fn test_product_view_formats_rating() {
        let catalog = Catalog::default();
        let view = ProductView::from(catalog.get("3").unwrap());

        assert_eq!(view.rating, "4.8");
        assert_eq!(view.price, "$124.99");
        assert_eq!(view.badge.as_deref(), Some("New"));
    }
}
