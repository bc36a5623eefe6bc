//! Login, logout and identity commands.

#![allow(clippy::print_stdout)]

use secrecy::SecretString;

use plugon_storefront::error::AppError;
use plugon_storefront::services::auth::SyncOutcome;
use plugon_storefront::state::AppState;

/// Log in and print where the user lands.
pub async fn login(state: &mut AppState, email: &str, password: String) -> Result<(), AppError> {
    let password = SecretString::from(password);
    let identity = state.auth().login(email, &password).await?;

    println!(
        "{} ({}) 님, 환영합니다.",
        identity.display_name(),
        identity.role.display_name()
    );
    println!("→ {}", state.session().dashboard_path());
    Ok(())
}

/// Log out; the local session is cleared even if the server is unreachable.
pub async fn logout(state: &mut AppState) {
    let outcome = state.auth().logout().await;

    if outcome.remote_ok {
        println!(
            "{}",
            outcome
                .message
                .as_deref()
                .unwrap_or("로그아웃되었습니다.")
        );
    } else {
        println!(
            "로컬 세션을 종료했습니다. 서버 로그아웃 실패: {}",
            outcome.message.as_deref().unwrap_or("알 수 없는 오류")
        );
    }
}

/// Refresh the session from the server and describe it.
pub async fn whoami(state: &mut AppState) {
    if state.auth().sync().await == SyncOutcome::Cleared {
        println!("서버 세션이 만료되어 로그아웃되었습니다.");
    }

    let session = state.session();
    let Some(identity) = session.current_identity() else {
        println!("로그인하지 않았습니다.");
        return;
    };

    println!("{} <{}>", identity.display_name(), identity.email);
    println!("  role:      {} ({})", identity.role, identity.role.display_name());
    if let Some(company) = &identity.company_name {
        println!("  company:   {company}");
    }
    println!("  tasks:     {}", yes_no(session.has_task_access()));
    println!("  mystore:   {}", yes_no(session.has_admin_access()));
    println!("  dashboard: {}", session.dashboard_path());
}

const fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
