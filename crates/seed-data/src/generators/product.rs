//! Random product generation.

use fake::{
    Fake,
    faker::lorem::en::{Sentence, Word},
};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use storefront::ProductRecord;

/// Configuration for product generation.
#[derive(Debug, Clone)]
pub struct ProductGenConfig {
    /// Price range in dollars.
    pub price_range: (f64, f64),
    /// Probability that a product carries a pre-discount price.
    pub discount_rate: f64,
    /// Mean star rating.
    pub rating_mean: f64,
    /// Standard deviation of the star rating.
    pub rating_std: f64,
    /// Upper bound for review counts.
    pub max_reviews: u32,
    pub categories: Vec<String>,
}

impl Default for ProductGenConfig {
    fn default() -> Self {
        Self {
            price_range: (9.99, 149.99),
            discount_rate: 0.7,
            rating_mean: 4.5,
            rating_std: 0.3,
            max_reviews: 250,
            categories: ["shoes", "kids T-shirt", "accessories", "toys", "blankets"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

const ADJECTIVES: [&str; 8] = [
    "Classic", "Cozy", "Deluxe", "Mini", "Soft", "Sport", "Wireless", "Rainbow",
];

const SIZE_SETS: [&[&str]; 4] = [
    &["One Size"],
    &["XS", "S", "M", "L", "XL"],
    &["Small", "Medium", "Large"],
    &["US 1", "US 2", "US 3", "US 4", "US 5"],
];

const COLORS: [&str; 10] = [
    "Black", "Blue", "Brown", "Gray", "Green", "Pink", "Purple", "Red", "White", "Yellow",
];

/// Generates plausible catalogue entries.
pub struct ProductGenerator {
    config: ProductGenConfig,
}

impl ProductGenerator {
    /// Creates a new product generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: ProductGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: ProductGenConfig) -> Self {
        Self { config }
    }

    /// Generates a single product.
    pub fn generate(&self, rng: &mut impl Rng) -> ProductRecord {
        let name = self.generate_name(rng);
        let description: String = Sentence(6..14).fake_with_rng(rng);

        let (lo, hi) = self.config.price_range;
        let price = round_cents(rng.gen_range(lo..hi));
        let original_price = (rng.r#gen::<f64>() < self.config.discount_rate)
            .then(|| round_cents(price * rng.gen_range(1.1..1.5)));

        let category = self
            .config
            .categories
            .get(rng.gen_range(0..self.config.categories.len().max(1)))
            .cloned()
            .unwrap_or_else(|| "misc".to_string());

        ProductRecord {
            name,
            description,
            price,
            original_price,
            image_url: format!("https://images.example.com/products/{}.jpg", rng.r#gen::<u32>()),
            category,
            rating: self.generate_rating(rng),
            reviews: rng.gen_range(0..=self.config.max_reviews),
            sizes: self.generate_sizes(rng),
            colors: self.generate_colors(rng),
            is_available: true,
        }
    }

    /// Generates multiple products.
    pub fn generate_batch(&self, count: usize, rng: &mut impl Rng) -> Vec<ProductRecord> {
        (0..count).map(|_| self.generate(rng)).collect()
    }

    fn generate_name(&self, rng: &mut impl Rng) -> String {
        let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];
        let noun: String = Word().fake_with_rng(rng);
        let noun: String = noun
            .chars()
            .take(1)
            .flat_map(char::to_uppercase)
            .chain(noun.chars().skip(1))
            .collect();
        format!("{adjective} {noun}")
    }

    /// Ratings cluster near the configured mean, rounded to one decimal.
    fn generate_rating(&self, rng: &mut impl Rng) -> f64 {
        let rating = match Normal::new(self.config.rating_mean, self.config.rating_std) {
            Ok(normal) => normal.sample(rng),
            Err(_) => self.config.rating_mean,
        };
        (rating.clamp(0.0, 5.0) * 10.0).round() / 10.0
    }

    fn generate_sizes(&self, rng: &mut impl Rng) -> Vec<String> {
        SIZE_SETS[rng.gen_range(0..SIZE_SETS.len())]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn generate_colors(&self, rng: &mut impl Rng) -> Vec<String> {
        let count = rng.gen_range(1..=4);
        let start = rng.gen_range(0..COLORS.len());
        (0..count)
            .map(|i| COLORS[(start + i) % COLORS.len()].to_string())
            .collect()
    }
}

impl Default for ProductGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
