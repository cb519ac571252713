//! Shop listing route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use crate::catalog::Category;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::CspNonce;
use crate::routes::products::ProductView;
use crate::state::AppState;

/// Category tab display data.
#[derive(Clone)]
pub struct CategoryTab {
    pub slug: String,
    pub label: &'static str,
    pub active: bool,
}

/// Shop query parameters.
#[derive(Debug, Deserialize)]
pub struct ShopQuery {
    pub category: Option<String>,
}

/// Shop page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop.html")]
pub struct ShopTemplate {
    pub tabs: Vec<CategoryTab>,
    pub products: Vec<ProductView>,
    pub nonce: String,
}

/// Build the category tabs with one marked active.
pub(crate) fn category_tabs(active: Category) -> Vec<CategoryTab> {
    Category::ALL
        .into_iter()
        .map(|category| CategoryTab {
            slug: category.to_string(),
            label: category.label(),
            active: category == active,
        })
        .collect()
}

/// Display the shop listing, optionally filtered by category.
#[instrument(skip(state, nonce))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ShopQuery>,
    CspNonce(nonce): CspNonce,
) -> Result<impl IntoResponse> {
    let category = query
        .category
        .as_deref()
        .unwrap_or_default()
        .parse::<Category>()
        .map_err(AppError::BadRequest)?;

    Ok(ShopTemplate {
        tabs: category_tabs(category),
        products: state
            .catalog()
            .in_category(category)
            .map(ProductView::from)
            .collect(),
        nonce,
    })
}
