//! Built-in sample catalog used in demo mode.

use plugon_core::{Price, ProductId};

use crate::models::{Category, Product};

use super::{CatalogError, ProductCatalog};

/// A fixed in-memory product table.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    /// Create a catalog over `products`.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The five PlugOn sample products, `prod-001` through `prod-005`.
    #[must_use]
    pub fn sample() -> Self {
        Self::new(vec![
            sample_product(
                "prod-001",
                "PlugOn 스탠다드 패키지",
                "기본 전산시스템 패키지로 소규모 사업체에 최적화된 솔루션입니다.",
                99_000,
                Category::Software,
                true,
                100,
            ),
            sample_product(
                "prod-002",
                "PlugOn 프리미엄 패키지",
                "중소기업을 위한 고급 전산시스템 패키지입니다.",
                199_000,
                Category::Software,
                true,
                50,
            ),
            sample_product(
                "prod-003",
                "PlugOn 엔터프라이즈 패키지",
                "대기업용 전산시스템 패키지로 무제한 사용자 지원합니다.",
                499_000,
                Category::Software,
                true,
                25,
            ),
            sample_product(
                "prod-004",
                "PlugOn 하드웨어 키트",
                "전산시스템 구축을 위한 하드웨어 패키지입니다.",
                299_000,
                Category::Hardware,
                false,
                30,
            ),
            sample_product(
                "prod-005",
                "PlugOn 컨설팅 서비스",
                "전문가의 1:1 컨설팅 서비스를 제공합니다.",
                150_000,
                Category::Consulting,
                false,
                999,
            ),
        ])
    }

    /// Every product in table order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products flagged for the landing page.
    pub fn featured(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|product| product.featured)
    }

    /// Look up a product by id without going through the async trait.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::sample()
    }
}

impl ProductCatalog for StaticCatalog {
    async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self.get(id).cloned())
    }
}

fn sample_product(
    id: &str,
    name: &str,
    description: &str,
    price: u64,
    category: Category,
    featured: bool,
    stock: u32,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        description: description.to_owned(),
        price: Price::won(price),
        category,
        image_url: None,
        featured,
        stock: Some(stock),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_sample_product() {
        let catalog = StaticCatalog::sample();
        let product = catalog
            .find_product(&ProductId::new("prod-001"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.price, Price::won(99_000));
        assert_eq!(product.category, Category::Software);
    }

    #[tokio::test]
    async fn test_missing_product() {
        let catalog = StaticCatalog::sample();
        let result = catalog
            .find_product(&ProductId::new("item1"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_featured() {
        let catalog = StaticCatalog::sample();
        let featured: Vec<_> = catalog.featured().map(|p| p.id.as_str()).collect();
        assert_eq!(featured, vec!["prod-001", "prod-002", "prod-003"]);
    }
}
