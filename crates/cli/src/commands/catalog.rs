//! Product lookup commands.

#![allow(clippy::print_stdout)]

use plugon_core::ProductId;
use plugon_storefront::catalog::{Catalog, ProductCatalog};
use plugon_storefront::error::AppError;
use plugon_storefront::models::Product;
use plugon_storefront::services::shop::product_url;
use plugon_storefront::state::AppState;

/// List products. Only the sample catalog can be enumerated.
pub fn list(state: &AppState) {
    let Catalog::Static(catalog) = state.catalog() else {
        println!("원격 카탈로그는 목록을 제공하지 않습니다. `plugon product <id>`를 사용하세요.");
        return;
    };

    for product in catalog.products() {
        let marker = if product.featured { "*" } else { " " };
        println!(
            "{marker} {:<10} {:<28} {:>10}  [{}]",
            product.id,
            product.name,
            product.price.display(),
            product.category.display_name()
        );
    }
}

/// Look up one product through the configured catalog.
pub async fn show(state: &AppState, product_id: &str) -> Result<(), AppError> {
    let product = state
        .catalog()
        .find_product(&ProductId::new(product_id))
        .await?
        .ok_or_else(|| AppError::NotFound(product_id.to_string()))?;

    print_product(&product);
    Ok(())
}

fn print_product(product: &Product) {
    println!("{} ({})", product.name, product.id);
    println!("  가격:     {}", product.price.display());
    println!("  분류:     {}", product.category.display_name());
    if let Some(stock) = product.stock {
        println!("  재고:     {stock}");
    }
    println!("  링크:     {}", product_url(&product.id));
    if !product.description.is_empty() {
        println!("  {}", product.description);
    }
}
