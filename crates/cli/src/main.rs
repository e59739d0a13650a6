//! Vitrine CLI - migrations, catalog seeding and a local cart.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! vt-cli migrate
//!
//! # Replace the catalog with the JSON files in a directory
//! vt-cli seed --dir assets/json
//!
//! # Work with a cart stored in a local file
//! vt-cli cart add --img A.png --name RedWig --price 25.00
//! vt-cli cart show
//!
//! # Search the catalog; without a query, list recent searches
//! vt-cli search "body wave" --category wigs
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the product catalog
//! - `cart` - Add, change and check out a local cart
//! - `search` - Search the catalog

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use vitrine_core::{CurrencyCode, ProductIdentity};

mod commands;

use commands::cart::{CartHost, order_from_args};

#[derive(Parser)]
#[command(name = "vt-cli")]
#[command(author, version, about = "Vitrine CLI tools")]
struct Cli {
    /// Storage file holding the cart, currency and recent searches
    #[arg(
        long,
        global = true,
        env = "VITRINE_STORAGE",
        default_value = ".vitrine/storage.json"
    )]
    storage: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Replace the product catalog with seed files
    Seed {
        /// Directory of `<category>.json` files
        #[arg(short, long, default_value = "assets/json")]
        dir: PathBuf,
    },
    /// Work with a locally stored cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Search the catalog by length, lace, hair type, category or tag
    Search {
        /// Text to look for; omit to list recent searches
        query: Option<String>,
        /// Restrict to one category (`All` for every category)
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add one unit of a product
    Add {
        #[arg(long)]
        img: String,
        #[arg(long)]
        name: String,
        /// Unit price in USD
        #[arg(long)]
        price: Decimal,
    },
    /// Increase a line's quantity by one
    Inc {
        /// Line identity as `img|name`
        identity: ProductIdentity,
    },
    /// Decrease a line's quantity by one, removing it at zero
    Dec { identity: ProductIdentity },
    /// Remove a line
    Remove { identity: ProductIdentity },
    /// Show the cart
    Show,
    /// Select the display currency (USD, CAD, EUR, HTG, DOP); list them without a code
    Currency { code: Option<CurrencyCode> },
    /// Review and place the order
    Checkout {
        #[arg(long)]
        name: String,
        /// paypal, card, moncash, pickup or delivery
        #[arg(long)]
        payment: String,
        /// Pickup branch
        #[arg(long)]
        branch: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let storage = cli.storage;
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed { dir } => commands::seed::products(&dir).await?,
        Commands::Cart { action } => {
            ensure_parent(&storage).await?;
            let out = cart(&mut CartHost::open(&storage), action)?;

            #[allow(clippy::print_stdout)]
            {
                print!("{out}");
            }
        }
        Commands::Search { query, category } => {
            ensure_parent(&storage).await?;
            let out =
                commands::search::run(&storage, query.as_deref(), category.as_deref()).await?;

            #[allow(clippy::print_stdout)]
            {
                print!("{out}");
            }
        }
    }
    Ok(())
}

async fn ensure_parent(storage: &Path) -> std::io::Result<()> {
    if let Some(parent) = storage.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}

fn cart(host: &mut CartHost, action: CartAction) -> Result<String, Box<dyn std::error::Error>> {
    let out = match action {
        CartAction::Add { img, name, price } => host.add(ProductIdentity::new(img, name), price),
        CartAction::Inc { identity } => host.increment(identity),
        CartAction::Dec { identity } => host.decrement(identity),
        CartAction::Remove { identity } => host.remove(identity),
        CartAction::Show => host.show(),
        CartAction::Currency { code: Some(code) } => host.select_currency(code)?,
        CartAction::Currency { code: None } => host.currencies(),
        CartAction::Checkout {
            name,
            payment,
            branch,
        } => host.checkout(&order_from_args(name, &payment, branch)?)?,
    };
    Ok(out)
}
