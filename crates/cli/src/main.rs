//! Copperleaf terminal storefront.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (tokens persist under $HOME/.copperleaf/)
//! copperleaf login -u mary -p 'hunter2!'
//!
//! # Browse
//! copperleaf products --search mug --ordering price
//! copperleaf product 3
//!
//! # Cart and checkout
//! copperleaf cart add 3 -q 2
//! copperleaf checkout --address "221B Baker Street" \
//!     --card-number 4242424242424242 --exp-month 12 --exp-year 2030 --cvc 123
//!
//! # History and reviews
//! copperleaf orders
//! copperleaf reviews add 3 -r 5 -t "Great mug"
//! ```
//!
//! Configuration comes from the environment (see `StoreConfig`):
//! `STORE_API_URL`, `STRIPE_PUBLISHABLE_KEY`, optional `STORE_TOKEN_FILE`
//! and `SENTRY_DSN`.

#![cfg_attr(not(test), forbid(unsafe_code))]
// Terminal output is the product of this binary.
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

use std::sync::Arc;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use copperleaf_storefront::config::StoreConfig;
use copperleaf_storefront::state::AppState;

mod commands;
mod notify;

use notify::TermNotifier;

#[derive(Parser)]
#[command(name = "copperleaf")]
#[command(author, version, about = "Copperleaf terminal storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with username and password
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        #[arg(long, default_value = "")]
        first_name: String,

        #[arg(long, default_value = "")]
        last_name: String,
    },
    /// Sign out and forget the persisted tokens
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Browse the product catalog
    Products {
        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Full-text search query
        #[arg(short, long)]
        search: Option<String>,

        /// Sort field (e.g. `price`, `-created_at`)
        #[arg(short, long)]
        ordering: Option<String>,
    },
    /// Show a product with its reviews
    Product {
        /// Product id
        id: i64,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Pay for the cart's contents
    Checkout {
        /// Shipping address
        #[arg(long)]
        address: String,

        /// Card number
        #[arg(long)]
        card_number: String,

        /// Card expiry month (1-12)
        #[arg(long)]
        exp_month: u8,

        /// Card expiry year (four digits)
        #[arg(long)]
        exp_year: u16,

        /// Card verification code
        #[arg(long)]
        cvc: String,
    },
    /// Show order history, or one order in detail
    Orders {
        /// Order id
        id: Option<i64>,
    },
    /// Manage product reviews
    Reviews {
        #[command(subcommand)]
        action: ReviewAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product to the cart
    Add {
        /// Product id
        product_id: i64,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Change a line item's quantity
    Update {
        /// Cart item id (see `cart show`)
        item_id: i64,

        #[arg(short, long)]
        quantity: u32,
    },
    /// Remove a line item
    Remove {
        /// Cart item id
        item_id: i64,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum ReviewAction {
    /// Show your reviews
    Mine,
    /// Show a product's reviews
    For {
        /// Product id
        product_id: i64,
    },
    /// Review a product
    Add {
        /// Product id
        product_id: i64,

        /// Rating, 1-5 stars
        #[arg(short, long)]
        rating: u8,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        comment: Option<String>,
    },
    /// Edit one of your reviews
    Edit {
        /// Review id
        review_id: i64,

        #[arg(short, long)]
        rating: Option<u8>,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        comment: Option<String>,
    },
    /// Delete one of your reviews
    Delete {
        /// Review id
        review_id: i64,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StoreConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
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
    // Parse args first so `--help` works without configuration.
    let cli = Cli::parse();

    let config = match StoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            std::process::exit(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Notifications go to the terminal, so default tracing to warn only.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "copperleaf=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let state = AppState::with_notifier(config, Arc::new(TermNotifier));

    if let Err(err) = run(cli, &state).await {
        if !err.is::<commands::Reported>() {
            eprintln!("error: {err}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(state, username, password).await
        }
        Commands::Register {
            username,
            email,
            password,
            first_name,
            last_name,
        } => commands::auth::register(state, username, email, password, first_name, last_name).await,
        Commands::Logout => commands::auth::logout(state),
        Commands::Whoami => commands::auth::whoami(state),
        Commands::Products {
            page,
            search,
            ordering,
        } => commands::products::list(state, page, search, ordering).await,
        Commands::Product { id } => commands::products::show(state, id).await,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(state).await,
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(state, product_id, quantity).await,
            CartAction::Update { item_id, quantity } => {
                commands::cart::update(state, item_id, quantity).await
            }
            CartAction::Remove { item_id } => commands::cart::remove(state, item_id).await,
            CartAction::Clear => commands::cart::clear(state).await,
        },
        Commands::Checkout {
            address,
            card_number,
            exp_month,
            exp_year,
            cvc,
        } => commands::checkout::run(state, &address, &card_number, exp_month, exp_year, &cvc).await,
        Commands::Orders { id } => match id {
            Some(id) => commands::orders::show(state, id).await,
            None => commands::orders::list(state).await,
        },
        Commands::Reviews { action } => match action {
            ReviewAction::Mine => commands::reviews::mine(state).await,
            ReviewAction::For { product_id } => commands::reviews::for_product(state, product_id).await,
            ReviewAction::Add {
                product_id,
                rating,
                title,
                comment,
            } => commands::reviews::add(state, product_id, rating, title, comment).await,
            ReviewAction::Edit {
                review_id,
                rating,
                title,
                comment,
            } => commands::reviews::edit(state, review_id, rating, title, comment).await,
            ReviewAction::Delete { review_id } => commands::reviews::delete(state, review_id).await,
        },
    }
}
