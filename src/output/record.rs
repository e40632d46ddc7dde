//! Page record types written to the results file
//!
//! The crawler fills `title`, `url`, `first_paragraph` and `links`. The
//! optional product fields belong to the schema the downstream indexer reads;
//! they are omitted when absent and accepted when present.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single visited page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    pub url: String,
    pub first_paragraph: String,
    pub links: Vec<Link>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_features: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_reviews: Option<Vec<Review>>,
}

/// An outbound in-scope link found on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Absolute URL with the fragment removed
    pub url: String,
    /// Anchor text, at most 100 characters
    pub text: String,
}

/// A product review, as expected by the indexer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub rating: f64,
    pub date: String,
    pub text: String,
}

impl Page {
    /// Creates a page record with no product fields
    pub fn new(title: String, url: String, first_paragraph: String, links: Vec<Link>) -> Self {
        Self {
            title,
            url,
            first_paragraph,
            links,
            description: None,
            product_features: None,
            product_reviews: None,
        }
    }

    /// Returns true if the page URL looks like a product page
    pub fn is_product(&self) -> bool {
        self.url.to_lowercase().contains("product")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawler_record_omits_product_fields() {
        let page = Page::new(
            "Home".to_string(),
            "https://example.com/".to_string(),
            String::new(),
            vec![],
        );
        let json = serde_json::to_value(&page).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 4);
        assert!(object.contains_key("first_paragraph"));
        assert!(!object.contains_key("product_features"));
    }

    #[test]
    fn test_indexer_record_accepted() {
        let json = r#"{
            "title": "Box of Chocolate Candy",
            "url": "https://web-scraping.dev/product/1",
            "first_paragraph": "Indulge your sweet tooth",
            "links": [],
            "description": "A box of candy",
            "product_features": {"brand": "ChocoDelight", "origin": "Belgium"},
            "product_reviews": [{"rating": 5, "date": "2022-07-22", "text": "Amazing!"}]
        }"#;

        let page: Page = serde_json::from_str(json).unwrap();
        assert!(page.is_product());
        assert_eq!(
            page.product_features.as_ref().unwrap().get("brand").map(String::as_str),
            Some("ChocoDelight")
        );
        assert_eq!(page.product_reviews.as_ref().unwrap()[0].rating, 5.0);
    }

    #[test]
    fn test_missing_optional_fields_tolerated() {
        let json = r#"{"title": "t", "url": "u", "first_paragraph": "", "links": []}"#;
        let page: Page = serde_json::from_str(json).unwrap();
        assert_eq!(page.description, None);
        assert_eq!(page.product_reviews, None);
    }
}
