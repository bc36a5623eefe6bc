//! PlugOn CLI - session and cart management from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in with a demo account (no PLUGON_API_BASE_URL set)
//! plugon login -e user@plugon.co.kr -p user123
//!
//! # Show the current user and their access
//! plugon whoami
//!
//! # Shop
//! plugon products
//! plugon cart add prod-001 --quantity 2
//! plugon cart show
//! plugon buy prod-003
//!
//! # Check a page against the current role
//! plugon access /mystore/dashboard.html
//! ```
//!
//! State persists under `PLUGON_STORAGE_DIR` (default `.plugon`) between
//! invocations. See `plugon_storefront::config` for every variable.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plugon_storefront::config::PlugonConfig;
use plugon_storefront::error::AppError;
use plugon_storefront::state::AppState;

mod commands;

#[derive(Parser)]
#[command(name = "plugon")]
#[command(author, version, about = "PlugOn session and cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with email and password
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Log out (always clears the local session)
    Logout,
    /// Show the current user, refreshed from the server when possible
    Whoami,
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Add a product and print the checkout page
    Buy {
        /// Product id (e.g., prod-001)
        product_id: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// List the sample products
    Products,
    /// Show one product
    Product {
        /// Product id (e.g., prod-001)
        product_id: String,
    },
    /// Check whether the current user may open a page
    Access {
        /// Page path (e.g., /mystore/dashboard.html)
        path: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product (requires login)
    Add {
        /// Product id (e.g., prod-001)
        product_id: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product
    Remove {
        /// Product id
        product_id: String,
    },
    /// Set a product's quantity (0 or less removes it)
    Set {
        /// Product id
        product_id: String,

        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Show lines and the order summary
    Show,
    /// Drop invalid lines
    Validate,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &PlugonConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match PlugonConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("{}", AppError::from(e).user_message());
            }
            std::process::exit(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "plugon=info,plugon_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config).await {
        e.report();
        #[allow(clippy::print_stderr)]
        {
            eprintln!("{}", e.user_message());
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: PlugonConfig) -> Result<(), AppError> {
    let mut state = AppState::from_config(config)?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&mut state, &email, password).await?;
        }
        Commands::Logout => commands::auth::logout(&mut state).await,
        Commands::Whoami => commands::auth::whoami(&mut state).await,
        Commands::Cart { action } => match action {
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&mut state, &product_id, quantity).await?,
            CartAction::Remove { product_id } => commands::cart::remove(&mut state, &product_id)?,
            CartAction::Set {
                product_id,
                quantity,
            } => commands::cart::set(&mut state, &product_id, quantity)?,
            CartAction::Clear => commands::cart::clear(&mut state),
            CartAction::Show => commands::cart::show(&state),
            CartAction::Validate => commands::cart::validate(&mut state),
        },
        Commands::Buy {
            product_id,
            quantity,
        } => commands::cart::buy(&mut state, &product_id, quantity).await?,
        Commands::Products => commands::catalog::list(&state),
        Commands::Product { product_id } => {
            commands::catalog::show(&state, &product_id).await?;
        }
        Commands::Access { path } => commands::access::check(&state, &path),
    }
    Ok(())
}
