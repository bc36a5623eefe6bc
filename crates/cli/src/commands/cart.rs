//! Cart commands.

#![allow(clippy::print_stdout)]

use plugon_core::ProductId;
use plugon_storefront::error::AppError;
use plugon_storefront::models::CartLine;
use plugon_storefront::services::shop::added_message;
use plugon_storefront::state::AppState;

/// Add a product for the logged-in user.
pub async fn add(state: &mut AppState, product_id: &str, quantity: u32) -> Result<(), AppError> {
    let line = state
        .shop()
        .add_to_cart(&ProductId::new(product_id), quantity)
        .await?;

    println!("{}", added_message(&line));
    println!("장바구니: {}개", state.cart().item_count());
    Ok(())
}

/// Add a product and print the checkout page.
pub async fn buy(state: &mut AppState, product_id: &str, quantity: u32) -> Result<(), AppError> {
    let checkout = state
        .shop()
        .buy_now(&ProductId::new(product_id), quantity)
        .await?;

    println!("→ {checkout}");
    Ok(())
}

/// Remove a product's line.
pub fn remove(state: &mut AppState, product_id: &str) -> Result<(), AppError> {
    if !state.cart_mut().remove_item(&ProductId::new(product_id)) {
        return Err(AppError::NotFound(product_id.to_string()));
    }
    println!("삭제했습니다. 장바구니: {}개", state.cart().item_count());
    Ok(())
}

/// Set a product's quantity; zero or less removes the line.
pub fn set(state: &mut AppState, product_id: &str, quantity: i64) -> Result<(), AppError> {
    let id = ProductId::new(product_id);
    if !state.cart_mut().set_quantity(&id, quantity) {
        return Err(AppError::NotFound(product_id.to_string()));
    }

    match state.cart().get(&id) {
        Some(line) => println!("{}: {}개", line.name, line.quantity),
        None => println!("삭제했습니다."),
    }
    Ok(())
}

pub fn clear(state: &mut AppState) {
    state.cart_mut().clear();
    println!("장바구니를 비웠습니다.");
}

/// Print every line and the order summary.
pub fn show(state: &AppState) {
    let cart = state.cart();
    if cart.is_empty() {
        println!("장바구니가 비어 있습니다.");
        return;
    }

    for line in cart.snapshot() {
        print_line(&line);
    }

    let summary = cart.order_summary();
    println!();
    println!("  상품 수량  {:>12}", summary.item_count);
    println!("  상품 금액  {:>12}", summary.subtotal.display());
    println!("  배송비     {:>12}", summary.shipping.display());
    println!("  할인       {:>12}", summary.discount.display());
    println!("  결제 금액  {:>12}", summary.total.display());
}

/// Drop invalid lines and report what is left.
pub fn validate(state: &mut AppState) {
    let before = state.cart().len();
    let remaining = state.cart_mut().validate();
    println!(
        "{}개 상품 확인, {}개 제거",
        remaining.len(),
        before - remaining.len()
    );
}

fn print_line(line: &CartLine) {
    println!(
        "{:<10} {:<28} {:>10} x {:>2} = {:>12}",
        line.id,
        line.name,
        line.price.display(),
        line.quantity,
        line.line_total().display()
    );
}
