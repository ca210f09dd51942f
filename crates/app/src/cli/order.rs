use clap::{Args, Subcommand};
use fairway::address::ShippingAddress;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cli::{api::ApiArgs, cart::CartLocation};

#[derive(Debug, Args)]
pub(crate) struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    /// Record the order for a paid checkout session and empty the local cart
    Confirm(ConfirmArgs),
}

#[derive(Debug, Args)]
struct ConfirmArgs {
    /// Checkout session id returned by `fairway checkout`
    session_id: String,

    #[command(flatten)]
    location: CartLocation,

    #[command(flatten)]
    api: ApiArgs,

    /// Leave the local cart untouched
    #[arg(long)]
    keep_cart: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmRequest<'a> {
    session_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmResponse {
    order_id: Uuid,
    total_price: Decimal,
    items_count: usize,
    shipping_address: ShippingAddress,
}

pub(crate) async fn run(command: OrderCommand) -> Result<(), String> {
    match command.command {
        OrderSubcommand::Confirm(args) => confirm(args).await,
    }
}

async fn confirm(args: ConfirmArgs) -> Result<(), String> {
    let response: ConfirmResponse = args
        .api
        .post(
            "/orders",
            &ConfirmRequest {
                session_id: &args.session_id,
            },
        )
        .await
        .map_err(|error| format!("failed to confirm order: {error}"))?;

    println!("order_id: {}", response.order_id);
    println!("items: {}", response.items_count);
    println!("total_price: {}", response.total_price);
    println!(
        "ships_to: {}, {}, {}",
        response.shipping_address.full_name,
        response.shipping_address.city,
        response.shipping_address.country
    );

    if !args.keep_cart {
        args.location
            .open()
            .clear()
            .map_err(|error| format!("order confirmed but the cart could not be cleared: {error}"))?;
    }

    Ok(())
}

