use std::path::PathBuf;

use clap::{Args, Subcommand};
use fairway::{
    cart::Cart,
    store::{FileCartStore, PersistentCart},
};

mod add;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(flatten)]
    pub(crate) location: CartLocation,

    #[command(subcommand)]
    command: CartSubcommand,
}

/// Where the local cart lives.
#[derive(Debug, Clone, Args)]
pub(crate) struct CartLocation {
    /// Directory holding the persisted cart
    #[arg(long, env = "FAIRWAY_CART_DIR", default_value = ".fairway")]
    pub(crate) cart_dir: PathBuf,
}

impl CartLocation {
    pub(crate) fn open(&self) -> PersistentCart<FileCartStore> {
        PersistentCart::open(FileCartStore::new(&self.cart_dir))
    }
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Print the cart and its prices
    Show,
    /// Add an item, merging with an existing line of the same client id
    Add(add::AddItemArgs),
    /// Remove a line
    Remove {
        /// Client id of the line to remove
        client_id: String,
    },
    /// Change the quantity of a line, clamped to its stock
    SetQuantity {
        /// Client id of the line to change
        client_id: String,

        /// New quantity
        quantity: u32,
    },
    /// Remove every line
    Clear,
}

pub(crate) fn run(command: CartCommand) -> Result<(), String> {
    let mut cart = command.location.open();

    match command.command {
        CartSubcommand::Show => {}
        CartSubcommand::Add(args) => {
            cart.add_item(args.into_item())
                .map_err(|error| format!("failed to add item: {error}"))?;
        }
        CartSubcommand::Remove { client_id } => {
            cart.remove_item(&client_id)
                .map_err(|error| format!("failed to save cart: {error}"))?;
        }
        CartSubcommand::SetQuantity {
            client_id,
            quantity,
        } => {
            if cart.cart().get(&client_id).is_none() {
                return Err(format!("no item {client_id} in cart"));
            }

            cart.update_quantity(&client_id, quantity)
                .map_err(|error| format!("failed to save cart: {error}"))?;
        }
        CartSubcommand::Clear => {
            cart.clear()
                .map_err(|error| format!("failed to save cart: {error}"))?;
        }
    }

    print_cart(cart.cart())
}

fn print_cart(cart: &Cart) -> Result<(), String> {
    let rendered = serde_json::to_string_pretty(cart)
        .map_err(|error| format!("failed to render cart: {error}"))?;

    println!("{rendered}");

    Ok(())
}
