//! bcex: one command line for many exchanges.
//!
//! Usage:
//!   bcex list
//!   bcex setkey okex <ACCESS> <SECRET>
//!   bcex price okex btc_usd
//!   bcex depth binance btc_usdt
//!
//! Environment variables:
//!   BCEX_KEYS  - credential file (default `config.json`)
//!   RUST_LOG   - log filter (default `info`)

mod keys;

use adapters::{
    default_registry, Balance, CurrencyPair, Exchange, ExchangeError, ExchangeKey, Order, Registry,
    Side,
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use crate::keys::KeyStore;

/// Levels shown per side by `depth`.
const DEPTH_LEVELS: usize = 5;

#[derive(Parser)]
#[command(name = "bcex")]
#[command(about = "Query balances, prices and order books, and place limit orders across exchanges")]
#[command(version)]
struct Cli {
    /// Credential file
    #[arg(long, env = "BCEX_KEYS", default_value = "config.json")]
    keys: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List exchanges
    List,

    /// Store API credentials for an exchange
    Setkey {
        exchange: String,
        access_key: String,
        secret_key: String,
    },

    /// Non-zero balances of one exchange, or of every exchange with `all`
    Balance {
        #[arg(default_value = "all")]
        exchange: String,
    },

    /// Last price of a pair such as `btc_usd`
    Price { exchange: String, pair: String },

    /// Every symbol the exchange lists
    Symbols { exchange: String },

    /// Best asks and bids of a pair
    Depth { exchange: String, pair: String },

    /// Place a limit order
    Neworder {
        exchange: String,
        side: Side,
        pair: String,
        price: f64,
        amount: f64,
    },

    /// Cancel an order
    Cancelorder {
        exchange: String,
        id: String,
        /// Pair of the order, for venues that need it
        #[arg(short, long, default_value = "")]
        symbol: String,
    },

    /// Show an order
    Queryorder {
        exchange: String,
        id: String,
        /// Pair of the order, for venues that need it
        #[arg(short, long, default_value = "")]
        symbol: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let registry = default_registry();
    let mut store = KeyStore::load(&cli.keys)?;

    match cli.command {
        Commands::List => {
            let mut names = registry.list();
            names.sort();
            for name in names {
                println!("{}", name);
            }
        }
        Commands::Setkey {
            exchange,
            access_key,
            secret_key,
        } => {
            ensure_known(&registry, &exchange)?;
            store.set(&exchange, ExchangeKey::new(access_key, secret_key))?;
        }
        Commands::Balance { exchange } => {
            let mut names = registry.list();
            names.sort();
            if exchange != "all" {
                ensure_known(&registry, &exchange)?;
                names.retain(|n| *n == exchange);
            }
            for name in names {
                let mut ex = open(&registry, &store, &name)?;
                println!("{}:", name);
                for line in balance_lines(ex.get_balance()) {
                    println!("\t{}", line);
                }
            }
        }
        Commands::Price { exchange, pair } => {
            let ex = open(&registry, &store, &exchange)?;
            let price = ex.get_price(&CurrencyPair::from_symbol(&pair))?;
            println!("{:.8}", price.price);
        }
        Commands::Symbols { exchange } => {
            let ex = open(&registry, &store, &exchange)?;
            println!("{}", ex.get_symbols()?.join(" "));
        }
        Commands::Depth { exchange, pair } => {
            let ex = open(&registry, &store, &exchange)?;
            let depth = ex.get_depth(&CurrencyPair::from_symbol(&pair))?;
            println!("Depth of {} on {}", pair, exchange);
            println!("\tPrice      \tAmount");
            println!("Asks:");
            let skip = depth.asks.len().saturating_sub(DEPTH_LEVELS);
            for unit in &depth.asks[skip..] {
                println!("\t{:.8}\t{:.8}", unit.price, unit.amount);
            }
            println!("Bids:");
            for unit in depth.bids.iter().take(DEPTH_LEVELS) {
                println!("\t{:.8}\t{:.8}", unit.price, unit.amount);
            }
        }
        Commands::Neworder {
            exchange,
            side,
            pair,
            price,
            amount,
        } => {
            let mut ex = open(&registry, &store, &exchange)?;
            let order = Order::limit(CurrencyPair::from_symbol(&pair), side, price, amount);
            let id = ex.new_order(&order)?;
            println!("ID: {}", id);
        }
        Commands::Cancelorder {
            exchange,
            id,
            symbol,
        } => {
            let ex = open(&registry, &store, &exchange)?;
            ex.cancel_order(&Order::with_id(id, CurrencyPair::from_symbol(&symbol)))?;
            println!("Done");
        }
        Commands::Queryorder {
            exchange,
            id,
            symbol,
        } => {
            let ex = open(&registry, &store, &exchange)?;
            let order = ex.query_order(&Order::with_id(id, CurrencyPair::from_symbol(&symbol)))?;
            println!("ID:       {}", order.id);
            println!("Pair:     {}", order.pair);
            println!("Side:     {}", order.side);
            println!("Price:    {}", order.price);
            println!("Amount:   {}", order.amount);
            println!("Executed: {}", order.executed);
            println!("Remain:   {}", order.remain);
            println!("State:    {}", order.state);
        }
    }

    Ok(())
}

fn ensure_known(registry: &Registry, exchange: &str) -> Result<()> {
    if registry.contains(exchange) {
        Ok(())
    } else {
        Err(anyhow!("{}: not supported", exchange))
    }
}

/// Lines printed under an exchange's name by `balance`.
fn balance_lines(result: adapters::Result<Vec<Balance>>) -> Vec<String> {
    match result {
        Ok(balances) if balances.is_empty() => vec!["None".to_string()],
        Ok(balances) => balances
            .into_iter()
            .map(|b| {
                let amount = b.amount().map(|d| d.normalize().to_string());
                format!("{} {}", b.currency, amount.unwrap_or(b.balance))
            })
            .collect(),
        Err(ExchangeError::Unsupported { .. }) => vec!["public data only".to_string()],
        Err(e) => vec![format!("Error: {}", e)],
    }
}

/// A fresh adapter with stored credentials applied, if there are any.
fn open(registry: &Registry, store: &KeyStore, exchange: &str) -> Result<Box<dyn Exchange>> {
    let mut ex = registry
        .get(exchange)
        .with_context(|| format!("{}: not supported", exchange))?;
    match store.get(exchange) {
        Some(key) => {
            debug!(exchange, "applying stored credentials");
            ex.set_key(&key.access_key_id, &key.secret_key_id);
        }
        None => debug!(exchange, "no stored credentials"),
    }
    Ok(ex)
}
