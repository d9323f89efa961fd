// Dweve DictExpr - Structured queries over nested JSON documents
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Synthetic documents for checks and benchmarks
//!
//! Generates the store document every case runs against: users, products,
//! daily sales, a tag table and a fixed-schema metadata block. All
//! generation is seeded so two runs with the same seed see identical data.
//!
//! Sizes are validated against [`MAX_DOCUMENT_SIZE`].

use crate::error::{validate_document_size, Result};

use fake::faker::address::en::{CityName, StreetName};
use fake::faker::lorem::en::Word;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Map, Value};
use std::sync::Arc;

pub use crate::error::MAX_DOCUMENT_SIZE;

/// Default generator seed.
pub const DEFAULT_SEED: u64 = 42;

/// Default number of sales days per document.
pub const DEFAULT_DAYS: usize = 3;

/// User categories.
pub const CATEGORIES: &[&str] = &["VIP", "Regular", "Guest"];

/// Product tags, in tag-table order.
pub const TAGS: &[&str] = &["new", "popular", "limited", "exclusive"];

/// An immutable document plus the size it was generated for.
///
/// Cloning is cheap: the value is shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    value: Arc<Value>,
    size: usize,
}

impl Document {
    /// Wraps a value as a document of the given size.
    pub fn new(value: Value, size: usize) -> Self {
        Self {
            value: Arc::new(value),
            size,
        }
    }

    /// The document root.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The size the document was generated for.
    pub fn size(&self) -> usize {
        self.size
    }
}

/// Produces documents of a requested size.
pub trait DataProvider {
    /// Generates a fresh document whose cardinalities scale with `size`.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Generation`](crate::BenchError::Generation) for
    /// a size of zero or above [`MAX_DOCUMENT_SIZE`].
    fn generate(&self, size: usize) -> Result<Document>;
}

/// Seeded store-document generator.
///
/// # Example
///
/// ```
/// use dictexpr_bench::datasets::{DataProvider, SeededProvider};
///
/// let provider = SeededProvider::new(7);
/// let doc = provider.generate(20).unwrap();
/// assert_eq!(doc.value()["users"].as_array().unwrap().len(), 20);
/// assert_eq!(doc, provider.generate(20).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededProvider {
    /// Generator seed.
    pub seed: u64,
    /// Number of daily sales lists.
    pub days: usize,
}

impl SeededProvider {
    /// Creates a provider with the given seed and [`DEFAULT_DAYS`].
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            days: DEFAULT_DAYS,
        }
    }

    /// Sets the number of sales days.
    pub fn with_days(mut self, days: usize) -> Self {
        self.days = days;
        self
    }
}

impl Default for SeededProvider {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl DataProvider for SeededProvider {
    fn generate(&self, size: usize) -> Result<Document> {
        validate_document_size(size)?;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let users = generate_users(&mut rng, size);
        let products = generate_products(&mut rng, product_count(size));
        let sales = generate_sales(&mut rng, &users, &products, size, self.days);

        let value = json!({
            "users": users,
            "products": products,
            "sales": sales,
            "tags": tag_table(),
            "metadata": metadata(),
        });
        Ok(Document::new(value, size))
    }
}

/// Number of products generated for a document size.
pub fn product_count(size: usize) -> usize {
    size / 10 + 5
}

fn round_cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn generate_users(rng: &mut StdRng, count: usize) -> Vec<Value> {
    let mut users = Vec::with_capacity(count);
    for i in 0..count {
        let first: String = FirstName().fake_with_rng(rng);
        let last: String = LastName().fake_with_rng(rng);
        let street: String = StreetName().fake_with_rng(rng);
        let city: String = CityName().fake_with_rng(rng);

        let category: Vec<&str> = (0..rng.gen_range(1..=3))
            .map(|_| CATEGORIES[rng.gen_range(0..CATEGORIES.len())])
            .collect();
        let nested_scores: Vec<Vec<u32>> = (0..rng.gen_range(2..=4))
            .map(|_| {
                (0..rng.gen_range(2..=5))
                    .map(|_| rng.gen_range(0..=100))
                    .collect()
            })
            .collect();

        users.push(json!({
            "id": i + 1,
            "name": format!("{} {}", first, last),
            "address": {
                "street": format!("{} {}", rng.gen_range(1..400), street),
                "city": city,
            },
            "age": rng.gen_range(18..=65),
            "active": rng.gen_bool(0.5),
            "category": category,
            "nested_scores": nested_scores,
        }));
    }
    users
}

/// Prices increase strictly with the product id, so price orderings never tie.
fn generate_products(rng: &mut StdRng, count: usize) -> Vec<Value> {
    let mut products = Vec::with_capacity(count);
    for i in 0..count {
        let word: String = Word().fake_with_rng(rng);
        let mut chars = word.chars();
        let name: String = match chars.next() {
            Some(c) => c.to_uppercase().chain(chars).collect(),
            None => format!("Product{}", i + 1),
        };
        let cents = rng.gen_range(0..200) as f64 / 100.0;
        let price = round_cents(5.0 + i as f64 * 2.5 + cents);

        products.push(json!({
            "product_id": i + 1,
            "name": name,
            "price": price,
            "in_stock": rng.gen_bool(0.5),
            "tags": [TAGS[rng.gen_range(0..TAGS.len())]],
        }));
    }
    products
}

fn generate_sales(
    rng: &mut StdRng,
    users: &[Value],
    products: &[Value],
    size: usize,
    days: usize,
) -> Vec<Value> {
    let mut order_id = 0usize;
    let mut sales = Vec::with_capacity(days);
    for _ in 0..days {
        let mut day = Vec::with_capacity(size * 2);
        for _ in 0..size * 2 {
            order_id += 1;
            let customer = &users[rng.gen_range(0..users.len())];
            let product = &products[rng.gen_range(0..products.len())];
            let items: u32 = rng.gen_range(1..=10);
            let price = product["price"].as_f64().unwrap_or(0.0);

            day.push(json!({
                "order_id": order_id,
                "customer_id": customer["id"],
                "product_id": product["product_id"],
                "items": items,
                "amount": round_cents(price * items as f64),
                "shipped": rng.gen_bool(0.5),
            }));
        }
        sales.push(Value::Array(day));
    }
    sales
}

/// Tag name to tag index.
pub fn tag_table() -> Value {
    let mut map = Map::new();
    for (i, tag) in TAGS.iter().enumerate() {
        map.insert(tag.to_string(), json!(i));
    }
    Value::Object(map)
}

/// Fixed-schema block exercised by the navigation and function cases.
pub fn metadata() -> Value {
    json!({
        "a": {"b": [{"c": "first"}, {"c": "second"}]},
        "d": {"x": {"e": 1}, "y": {"e": 2}, "z": {"f": 3}},
        "h": [4.5, -3.25, 8.0, -1.75, 5.5],
        "i": [[1, 2], [3], [4, 5, 6]],
        "j": [0, 1, 2],
        "k": [true, false],
        "l": {"m": {"n": {"o": 5}}, "p": "q"},
        "m": ["alpha", "beta", "gamma"]
    })
}

/// Three users with distinct ages, for cases whose result depends on
/// ordering by age.
pub fn user_document() -> Document {
    Document::new(
        json!({
            "users": [
                {"name": "Ada", "age": 36},
                {"name": "Bob", "age": 17},
                {"name": "Cy", "age": 20}
            ]
        }),
        3,
    )
}

/// Small heterogeneous document for navigation edge cases.
pub fn mixed_document() -> Document {
    Document::new(
        json!({
            "foo": {"bar": [{"baz": 1}, {"baz": 2}]},
            "stats": {"a": 3, "b": 1, "c": 2},
            "arr": [3, 1, 2, 2],
            "nested": [[1, 2], [3], 4]
        }),
        4,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BenchError;

    #[test]
    fn test_cardinalities_scale_with_size() {
        let provider = SeededProvider::default().with_days(2);
        let doc = provider.generate(30).unwrap();
        let root = doc.value();

        assert_eq!(doc.size(), 30);
        assert_eq!(root["users"].as_array().unwrap().len(), 30);
        assert_eq!(root["products"].as_array().unwrap().len(), product_count(30));
        let sales = root["sales"].as_array().unwrap();
        assert_eq!(sales.len(), 2);
        assert!(sales.iter().all(|day| day.as_array().unwrap().len() == 60));
        assert_eq!(root["metadata"], metadata());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = SeededProvider::new(1).generate(10).unwrap();
        let b = SeededProvider::new(1).generate(10).unwrap();
        let c = SeededProvider::new(2).generate(10).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_user_fields_within_ranges() {
        let doc = SeededProvider::default().generate(50).unwrap();
        for (i, user) in doc.value()["users"].as_array().unwrap().iter().enumerate() {
            assert_eq!(user["id"], json!(i + 1));
            let age = user["age"].as_u64().unwrap();
            assert!((18..=65).contains(&age));
            let categories = user["category"].as_array().unwrap();
            assert!((1..=3).contains(&categories.len()));
            let scores = user["nested_scores"].as_array().unwrap();
            assert!((2..=4).contains(&scores.len()));
            assert!(user["address"]["city"].is_string());
        }
    }

    #[test]
    fn test_prices_strictly_increase() {
        let doc = SeededProvider::default().generate(200).unwrap();
        let prices: Vec<f64> = doc.value()["products"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["price"].as_f64().unwrap())
            .collect();
        assert!(prices.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_sales_reference_existing_entities() {
        let doc = SeededProvider::default().generate(10).unwrap();
        let root = doc.value();
        let products = product_count(10) as u64;
        for day in root["sales"].as_array().unwrap() {
            for sale in day.as_array().unwrap() {
                let customer = sale["customer_id"].as_u64().unwrap();
                assert!((1..=10).contains(&customer));
                let product = sale["product_id"].as_u64().unwrap();
                assert!((1..=products).contains(&product));
            }
        }
    }

    #[test]
    fn test_rejects_invalid_sizes() {
        let provider = SeededProvider::default();
        assert!(matches!(
            provider.generate(0),
            Err(BenchError::Generation { size: 0, .. })
        ));
        assert!(provider.generate(MAX_DOCUMENT_SIZE + 1).is_err());
    }

    #[test]
    fn test_tag_table() {
        assert_eq!(
            tag_table(),
            json!({"new": 0, "popular": 1, "limited": 2, "exclusive": 3})
        );
    }
}
