//! Built-in arrangement catalog.
//!
//! The storefront ships with a fixed set of arrangements. The hosted table
//! behind `/api/arrangements` is not consulted for pages or for cart pricing.

use std::fmt;
use std::str::FromStr;

use bloom_core::{CartItem, Price, ProductId};

/// A floral arrangement for sale.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrangement {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    /// Average rating out of 5.
    pub rating: f32,
    pub reviews: u32,
    pub badge: Option<Badge>,
    pub description: String,
    pub in_stock: bool,
}

impl Arrangement {
    /// A cart line for this arrangement.
    #[must_use]
    pub fn to_cart_item(&self, quantity: u32) -> CartItem {
        CartItem::new(
            self.id.clone(),
            self.name.clone(),
            self.price,
            self.image.clone(),
            quantity,
        )
    }

    /// Whether the arrangement belongs to a listing category.
    #[must_use]
    pub fn in_category(&self, category: Category) -> bool {
        match category {
            Category::All => true,
            Category::Bestsellers => self.badge == Some(Badge::Bestseller),
            Category::New => self.badge == Some(Badge::New),
            Category::Exclusive => matches!(self.badge, Some(Badge::Exclusive | Badge::Limited)),
        }
    }
}

/// Highlight shown on a product card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Bestseller,
    Featured,
    New,
    Limited,
    Exclusive,
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Bestseller => "Bestseller",
            Self::Featured => "Featured",
            Self::New => "New",
            Self::Limited => "Limited",
            Self::Exclusive => "Exclusive",
        };
        f.write_str(label)
    }
}

/// Shop listing filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    All,
    Bestsellers,
    New,
    Exclusive,
}

impl Category {
    /// All categories, in tab order.
    pub const ALL: [Self; 4] = [Self::All, Self::Bestsellers, Self::New, Self::Exclusive];

    /// Tab label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Bestsellers => "Bestsellers",
            Self::New => "New",
            Self::Exclusive => "Exclusive",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Bestsellers => write!(f, "bestsellers"),
            Self::New => write!(f, "new"),
            Self::Exclusive => write!(f, "exclusive"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(Self::All),
            "bestsellers" => Ok(Self::Bestsellers),
            "new" => Ok(Self::New),
            "exclusive" => Ok(Self::Exclusive),
            _ => Err(format!("invalid category: {s}")),
        }
    }
}

/// A curated collection promoted on the home page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub name: &'static str,
    pub description: &'static str,
    pub image: &'static str,
    /// Starting price label, e.g. "From $95".
    pub price_label: &'static str,
}

/// Collections featured on the home page.
pub const FEATURED_COLLECTIONS: [Collection; 3] = [
    Collection {
        name: "Romantic Roses",
        description: "Crimson Ecuadorian roses cascading with vanilla orchids and hand-dyed silk ribbon.",
        image: "/static/images/romantic-red-roses-bouquet.svg",
        price_label: "From $95",
    },
    Collection {
        name: "Seasonal Blooms",
        description: "A rotating curation of rare seasonal stems, wild grasses, and aromatic herbs.",
        image: "/static/images/seasonal-mixed-flowers-bouquet.svg",
        price_label: "From $75",
    },
    Collection {
        name: "Luxury Premium",
        description: "Statement arrangements with preserved elements, architectural branches, and custom vessels.",
        image: "/static/images/luxury-premium-exotic-flowers.svg",
        price_label: "From $150",
    },
];

/// The arrangement catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    arrangements: Vec<Arrangement>,
}

impl Catalog {
    /// Create a catalog from a list of arrangements.
    #[must_use]
    pub const fn new(arrangements: Vec<Arrangement>) -> Self {
        Self { arrangements }
    }

    /// All arrangements, in display order.
    #[must_use]
    pub fn all(&self) -> &[Arrangement] {
        &self.arrangements
    }

    /// Look up an arrangement by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arrangement> {
        self.arrangements.iter().find(|a| a.id.as_str() == id)
    }

    /// Arrangements in a category.
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &Arrangement> {
        self.arrangements
            .iter()
            .filter(move |a| a.in_category(category))
    }

    /// Other arrangements to suggest alongside `id`.
    pub fn related(&self, id: &str, count: usize) -> impl Iterator<Item = &Arrangement> {
        self.arrangements
            .iter()
            .filter(move |a| a.id.as_str() != id)
            .take(count)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(vec![
            arrangement(
                "1",
                "Midnight Eclipse",
                12_999,
                "dark-purple-flowers-arrangement-luxury.svg",
                (5.0, 234),
                Some(Badge::Bestseller),
                "Velvet-dark calla lilies, black baccara roses and plum anemones gathered in a smoked glass vessel.",
            ),
            arrangement(
                "2",
                "Neon Pulse",
                11_999,
                "neon-cyan-bright-flowers-arrangement-modern.svg",
                (5.0, 189),
                Some(Badge::Featured),
                "Electric blue delphinium and bright gerberas arranged in a sculptural, modern silhouette.",
            ),
            arrangement(
                "3",
                "Ethereal Garden",
                12_499,
                "mixed-flowers-garden-arrangement-elegant.svg",
                (4.8, 156),
                Some(Badge::New),
                "Garden roses, sweet peas and trailing jasmine for a loose, just-picked feel.",
            ),
            arrangement(
                "4",
                "Romantic Dreams",
                9_999,
                "placeholder.svg",
                (4.9, 201),
                None,
                "Blush peonies and premium red roses softened with eucalyptus. Perfect for anniversaries.",
            ),
            arrangement(
                "5",
                "Cyber Bloom",
                13_499,
                "placeholder.svg",
                (5.0, 178),
                Some(Badge::Limited),
                "Iridescent orchids and silver-sprayed foliage in a limited seasonal run.",
            ),
            arrangement(
                "6",
                "Velvet Whisper",
                10_999,
                "placeholder.svg",
                (4.7, 143),
                None,
                "Deep burgundy ranunculus and dusty miller wrapped in hand-dyed silk ribbon.",
            ),
            arrangement(
                "7",
                "Aurora Blaze",
                13_999,
                "placeholder.svg",
                (5.0, 267),
                Some(Badge::Bestseller),
                "Sunset-toned roses, tulips and protea that glow from amber to coral.",
            ),
            arrangement(
                "8",
                "Void Eternal",
                14_999,
                "placeholder.svg",
                (4.9, 198),
                Some(Badge::Exclusive),
                "Preserved black roses and architectural branches in a custom ceramic vessel.",
            ),
        ])
    }
}

fn arrangement(
    id: &str,
    name: &str,
    cents: u32,
    image: &str,
    (rating, reviews): (f32, u32),
    badge: Option<Badge>,
    description: &str,
) -> Arrangement {
    Arrangement {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Price::from_cents(cents),
        image: format!("/static/images/{image}"),
        rating,
        reviews,
        badge,
        description: description.to_string(),
        in_stock: true,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_has_eight_arrangements() {
        let catalog = Catalog::default();
        assert_eq!(catalog.all().len(), 8);
        assert_eq!(catalog.get("1").unwrap().name, "Midnight Eclipse");
        assert_eq!(catalog.get("8").unwrap().price.to_string(), "$149.99");
        assert!(catalog.get("99").is_none());
    }

    #[test]
    fn test_category_filter() {
        let catalog = Catalog::default();
        let names = |c| {
            catalog
                .in_category(c)
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
        };

        assert_eq!(names(Category::All).len(), 8);
        assert_eq!(names(Category::Bestsellers), ["Midnight Eclipse", "Aurora Blaze"]);
        assert_eq!(names(Category::New), ["Ethereal Garden"]);
        assert_eq!(names(Category::Exclusive), ["Cyber Bloom", "Void Eternal"]);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("".parse::<Category>().unwrap(), Category::All);
        assert_eq!("bestsellers".parse::<Category>().unwrap(), Category::Bestsellers);
        assert!("roses".parse::<Category>().is_err());

        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_related_excludes_current() {
        let catalog = Catalog::default();
        let related: Vec<_> = catalog.related("1", 3).map(|a| a.id.as_str()).collect();
        assert_eq!(related, ["2", "3", "4"]);
    }

    #[test]
    fn test_to_cart_item_uses_catalog_price() {
        let catalog = Catalog::default();
        let item = catalog.get("4").unwrap().to_cart_item(2);

        assert_eq!(item.name, "Romantic Dreams");
        assert_eq!(item.line_total().to_string(), "$199.98");
    }
}
