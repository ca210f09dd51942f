use clap::{Parser, Subcommand};

mod api;
mod cart;
mod checkout;
mod db;
mod order;

#[derive(Debug, Parser)]
#[command(name = "fairway", about = "Fairway storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inspect and edit the local cart
    Cart(cart::CartCommand),
    /// Start a hosted checkout for the local cart
    Checkout(checkout::CheckoutArgs),
    /// Confirm paid orders
    Order(order::OrderCommand),
    /// Database maintenance
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Cart(command) => cart::run(command),
            Commands::Checkout(args) => checkout::run(args).await,
            Commands::Order(command) => order::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}
