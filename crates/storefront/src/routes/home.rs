//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::catalog::{Category, Collection, FEATURED_COLLECTIONS};
use crate::filters;
use crate::middleware::CspNonce;
use crate::routes::products::ProductView;
use crate::routes::shop::{CategoryTab, category_tabs};
use crate::state::AppState;

// =============================================================================
// Hero Content
// =============================================================================

/// A headline figure shown under the hero.
#[derive(Clone, Copy)]
pub struct HeroStat {
    pub label: &'static str,
    pub value: &'static str,
}

/// Hero section copy.
#[derive(Clone)]
pub struct Hero {
    pub eyebrow: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub stats: [HeroStat; 3],
    pub tags: [&'static str; 3],
}

impl Default for Hero {
    fn default() -> Self {
        Self {
            eyebrow: "Bloom Atelier",
            title: "Haute Floral Atelier",
            subtitle: "Extraordinary floral stories crafted for unforgettable celebrations.",
            stats: [
                HeroStat {
                    label: "Same-day hand delivery",
                    value: "London · Paris · Dubai",
                },
                HeroStat {
                    label: "Master florists on call",
                    value: "24/7 concierge design",
                },
                HeroStat {
                    label: "Sustainably sourced",
                    value: "Traceable farms & growers",
                },
            ],
            tags: ["Bespoke bouquets", "Artful installations", "Editorial styling"],
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub hero: Hero,
    pub collections: &'static [Collection],
    pub tabs: Vec<CategoryTab>,
    pub products: Vec<ProductView>,
    pub nonce: String,
}

/// Display the home page.
#[instrument(skip(state, nonce))]
pub async fn home(State(state): State<AppState>, CspNonce(nonce): CspNonce) -> impl IntoResponse {
    HomeTemplate {
        hero: Hero::default(),
        collections: &FEATURED_COLLECTIONS,
        tabs: category_tabs(Category::All),
        products: state.catalog().all().iter().map(ProductView::from).collect(),
        nonce,
    }
}
