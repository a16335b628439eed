//! BacklinkVista CLI - Terminal client of the backlink marketplace.
//!
//! # Usage
//!
//! ```bash
//! # Create an account (the session token is remembered)
//! bv register -e ada@example.com -p 'correct horse' --first-name Ada --last-name Lovelace
//!
//! # Browse and fill the cart
//! bv websites list --min-dr 60 --language English
//! bv cart add 2
//!
//! # Pay from the wallet
//! bv billing add-funds 500
//! bv checkout --payment-method balance
//! bv orders list --period 30d
//! ```
//!
//! # Environment Variables
//!
//! - `BV_SERVER_URL` - Server base URL (default: `http://127.0.0.1:3000`)
//! - `BV_STATE_FILE` - Local state file (default: `~/.backlink-vista/state.json`)
//! - `BV_PASSWORD` - Password for `register` and `login`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use backlink_vista_core::{CartItemId, ListingId, OrderId, OrderPeriod, OrderStatus, PaymentMethod};

mod client;
mod commands;
mod error;
mod output;
mod state;

use client::{ApiClient, parse_server_url};
use commands::ThemeChoice;
use commands::account::{LoginArgs, ProfileUpdateArgs, RegisterArgs};
use commands::websites::ListingFilterArgs;
use error::CliError;
use state::{ClientState, default_state_path};

#[derive(Parser)]
#[command(name = "bv")]
#[command(author, version, about = "BacklinkVista marketplace client")]
struct Cli {
    /// Server base URL
    #[arg(
        long,
        global = true,
        env = "BV_SERVER_URL",
        default_value = "http://127.0.0.1:3000",
        value_parser = parse_server_url
    )]
    server: Url,

    /// Local state file (cart, session, theme)
    #[arg(long, global = true, env = "BV_STATE_FILE")]
    state: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in
    Register(RegisterArgs),
    /// Log in with email and password
    Login(LoginArgs),
    /// Revoke the session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Show or edit the profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Browse the marketplace
    Websites {
        #[command(subcommand)]
        action: WebsitesAction,
    },
    /// Manage the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Order everything in the cart
    Checkout {
        /// `credit_card` or `balance`
        #[arg(long, default_value = "credit_card")]
        payment_method: PaymentMethod,
    },
    /// Order history
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Wallet balance and deposits
    Billing {
        #[command(subcommand)]
        action: BillingAction,
    },
    /// Set the colour theme
    Theme {
        #[arg(value_enum)]
        choice: ThemeChoice,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show the profile
    Show,
    /// Update profile fields; omitted fields are kept
    Update(ProfileUpdateArgs),
}

#[derive(Subcommand)]
enum WebsitesAction {
    /// List websites matching the filters
    List(ListingFilterArgs),
    /// Show one website
    Show { id: ListingId },
    /// Values available for the language, country and category filters
    Facets,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    List,
    /// Add a website by id
    Add { id: ListingId },
    /// Remove an item by cart id
    Remove { cart_id: CartItemId },
    /// Set an item's quantity (0 removes it)
    Quantity { cart_id: CartItemId, quantity: u32 },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders, newest first
    List {
        #[arg(long)]
        status: Option<OrderStatus>,
        /// `7d`, `30d`, `90d` or `all`
        #[arg(long)]
        period: Option<OrderPeriod>,
        /// Substring of a website URL in the order
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one order
    Show { id: OrderId },
    /// Cancel an order
    Cancel { id: OrderId },
    /// Set an order's status
    Status { id: OrderId, status: OrderStatus },
    /// Order counters
    Summary,
}

#[derive(Subcommand)]
enum BillingAction {
    /// Balance and transactions
    Show,
    /// Deposit bonus tiers
    Offers,
    /// Deposit funds
    AddFunds { amount: Decimal },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("backlink_vista_cli={level}").into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        report(&e);
        std::process::exit(1);
    }
}

#[allow(clippy::print_stderr)]
fn report(error: &CliError) {
    eprintln!("error: {error}");
    if let Some(errors) = error.field_errors() {
        for (field, message) in errors {
            eprintln!("  {field}: {message}");
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let state_path = cli.state.unwrap_or_else(default_state_path);
    let mut state = ClientState::load(&state_path).await?;
    let client = ApiClient::new(cli.server, state.session_token())?;

    let result = dispatch(cli.command, &client, &mut state).await;

    // The server no longer honours the stored token
    if let Err(e) = &result
        && e.is_unauthorized()
        && state.token.is_some()
    {
        tracing::warn!("Session expired, clearing stored token");
        state.sign_out();
    }

    state.save(&state_path).await?;
    result
}

async fn dispatch(
    command: Commands,
    client: &ApiClient,
    state: &mut ClientState,
) -> Result<(), CliError> {
    match command {
        Commands::Register(args) => commands::account::register(client, state, args).await?,
        Commands::Login(args) => commands::account::login(client, state, args).await?,
        Commands::Logout => commands::account::logout(client, state).await?,
        Commands::Whoami => commands::account::whoami(client, state).await?,
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::account::whoami(client, state).await?,
            ProfileAction::Update(args) => {
                commands::account::update_profile(client, state, args).await?;
            }
        },
        Commands::Websites { action } => match action {
            WebsitesAction::List(filters) => commands::websites::list(client, filters).await?,
            WebsitesAction::Show { id } => commands::websites::show(client, id).await?,
            WebsitesAction::Facets => commands::websites::facets(client).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::List => commands::cart::list(state),
            CartAction::Add { id } => commands::cart::add(client, state, id).await?,
            CartAction::Remove { cart_id } => commands::cart::remove(state, cart_id),
            CartAction::Quantity { cart_id, quantity } => {
                commands::cart::quantity(state, cart_id, quantity)?;
            }
            CartAction::Clear => commands::cart::clear(state),
        },
        Commands::Checkout { payment_method } => {
            commands::cart::checkout(client, state, payment_method).await?;
        }
        Commands::Orders { action } => match action {
            OrdersAction::List {
                status,
                period,
                search,
            } => commands::orders::list(client, status, period, search).await?,
            OrdersAction::Show { id } => commands::orders::show(client, id).await?,
            OrdersAction::Cancel { id } => commands::orders::cancel(client, id).await?,
            OrdersAction::Status { id, status } => {
                commands::orders::set_status(client, id, status).await?;
            }
            OrdersAction::Summary => commands::orders::summary(client).await?,
        },
        Commands::Billing { action } => match action {
            BillingAction::Show => commands::billing::show(client).await?,
            BillingAction::Offers => commands::billing::offers(client).await?,
            BillingAction::AddFunds { amount } => {
                commands::billing::add_funds(client, amount).await?;
            }
        },
        Commands::Theme { choice } => commands::theme(state, choice),
    }
    Ok(())
}
