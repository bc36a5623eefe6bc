//! Product descriptors returned by catalog collaborators.

use core::fmt;

use serde::{Deserialize, Serialize};

use plugon_core::{Price, ProductId};

/// A product as described by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Shown on the landing page carousel.
    #[serde(default)]
    pub featured: bool,
    /// Units on hand, when the catalog reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

/// Product category.
///
/// Unknown category names are preserved as [`Category::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Software,
    Hardware,
    Service,
    Consulting,
    Other(String),
}

impl Category {
    /// The wire name of this category.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Software => "software",
            Self::Hardware => "hardware",
            Self::Service => "service",
            Self::Consulting => "consulting",
            Self::Other(raw) => raw,
        }
    }

    /// Korean label for listings. Unknown categories display their raw name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Software => "소프트웨어",
            Self::Hardware => "하드웨어",
            Self::Service => "서비스",
            Self::Consulting => "컨설팅",
            Self::Other(raw) => raw,
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        match s.as_str() {
            "software" => Self::Software,
            "hardware" => Self::Hardware,
            "service" => Self::Service,
            "consulting" => Self::Consulting,
            _ => Self::Other(s),
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}
