//! # cart
//!
//! Drives a cart session from the command line. Each invocation restores
//! the cart from the file store, runs one operation and prints the result.
//!
//! ```bash
//! cart add 1
//! cart update 1 3
//! cart remove 1
//! cart show
//! ```

use cart_client::{open_controller, ClientConfig};
use cart_core::{Cart, CartController, CartOutcome, RecordingNotifier, UpdateProductAmount};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "cart", version, about = "Storefront cart session")]
struct Cli {
    /// Catalog API base URL (overrides CATALOG_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Directory holding the saved cart (overrides CART_STORE_DIR)
    #[arg(long)]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the cart
    Show,
    /// Add one unit of a product
    Add { product_id: u64 },
    /// Remove a product from the cart
    Remove { product_id: u64 },
    /// Set the quantity of a product already in the cart
    Update {
        product_id: u64,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::ERROR.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config = config.with_api_base_url(url);
    }
    if let Some(dir) = cli.store_dir {
        config = config.with_store_dir(dir);
    }

    let notifier = Arc::new(RecordingNotifier::new());
    let controller = open_controller(&config, notifier.clone())?;

    let outcome = run(&controller, cli.command).await;

    for notice in notifier.notices() {
        eprintln!("error: {} (product {})", notice.message(), notice.product_id);
    }
    print_cart(&controller.cart());

    Ok(match outcome {
        Some(CartOutcome::Rejected(_)) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

async fn run(controller: &CartController, command: Command) -> Option<CartOutcome> {
    match command {
        Command::Show => None,
        Command::Add { product_id } => Some(controller.add_product(product_id).await),
        Command::Remove { product_id } => Some(controller.remove_product(product_id)),
        Command::Update { product_id, amount } => Some(
            controller
                .update_product_amount(UpdateProductAmount::new(product_id, amount))
                .await,
        ),
    }
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Cart is empty");
        return;
    }

    for item in cart {
        println!("{:>4}  {:>3} x {:<50} {:>9.2}", item.id, item.amount, item.name, item.price);
    }
    println!("{} item(s), {} unit(s)", cart.len(), cart.item_count());
}
