//! Page access check.

#![allow(clippy::print_stdout)]

use plugon_storefront::services::guard::{PageAccess, check_page_access};
use plugon_storefront::state::AppState;

pub fn check(state: &AppState, path: &str) {
    match check_page_access(path, state.session()) {
        PageAccess::Allowed => println!("허용: {path}"),
        PageAccess::Denied { message, redirect } => {
            println!("거부: {message}");
            println!("→ {redirect}");
        }
    }
}
