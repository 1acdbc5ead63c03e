//! Menu and category models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Optional menu filters; empty strings count as absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuQuery {
    pub category: Option<String>,
    #[serde(rename = "searchText")]
    pub search_text: Option<String>,
}

impl MenuQuery {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            search_text: None,
        }
    }

    pub fn search(text: impl Into<String>) -> Self {
        Self {
            category: None,
            search_text: Some(text.into()),
        }
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    pub(crate) fn category_filter(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    pub(crate) fn search_filter(&self) -> Option<&str> {
        self.search_text.as_deref().filter(|s| !s.is_empty())
    }
}

/// Menu item document
///
/// Attributes without a dedicated field are kept verbatim in `attributes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<u32>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Menu category document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filters_are_ignored() {
        let query = MenuQuery {
            category: Some(String::new()),
            search_text: Some(String::new()),
        };
        assert_eq!(query.category_filter(), None);
        assert_eq!(query.search_filter(), None);

        let query = MenuQuery::category("Pizza").with_search("cheese");
        assert_eq!(query.category_filter(), Some("Pizza"));
        assert_eq!(query.search_filter(), Some("cheese"));
    }

    #[test]
    fn test_menu_item_keeps_unknown_attributes() {
        let item: MenuItem = serde_json::from_value(serde_json::json!({
            "$id": "m1",
            "$collectionId": "menu",
            "name": "Margherita",
            "price": 9.5,
            "image_url": "https://example.com/m.png",
            "categories": "Pizza",
            "type": "veg"
        }))
        .unwrap();

        assert_eq!(item.name, "Margherita");
        assert_eq!(item.price, Some(9.5));
        assert_eq!(item.attributes["categories"], "Pizza");
        assert_eq!(item.attributes["type"], "veg");
        assert_eq!(item.attributes["$collectionId"], "menu");
    }
}
