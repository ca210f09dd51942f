use clap::Args;
use fairway::{address::ShippingAddress, checkout::CheckoutRequest};
use serde::Deserialize;

use crate::cli::{api::ApiArgs, cart::CartLocation};

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    #[command(flatten)]
    location: CartLocation,

    #[command(flatten)]
    api: ApiArgs,

    /// Recipient name
    #[arg(long)]
    full_name: String,

    /// Street address
    #[arg(long)]
    street: String,

    /// City
    #[arg(long)]
    city: String,

    /// Postal code
    #[arg(long)]
    postal_code: String,

    /// Province or state
    #[arg(long)]
    province: String,

    /// Contact phone number
    #[arg(long)]
    phone: String,

    /// Country
    #[arg(long)]
    country: String,

    /// Receipt email
    #[arg(long)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutResponse {
    url: String,
    session_id: String,
}

pub(crate) async fn run(args: CheckoutArgs) -> Result<(), String> {
    let cart = args.location.open();

    if cart.cart().is_empty() {
        return Err("cart is empty".to_string());
    }

    let address = ShippingAddress {
        full_name: args.full_name,
        street: args.street,
        city: args.city,
        postal_code: args.postal_code,
        province: args.province,
        phone: args.phone,
        country: args.country,
    };

    let request = CheckoutRequest::from_cart(cart.cart(), address, args.email);

    let response: CheckoutResponse = args
        .api
        .post("/checkout", &request)
        .await
        .map_err(|error| format!("failed to start checkout: {error}"))?;

    println!("session_id: {}", response.session_id);
    println!("checkout_url: {}", response.url);

    Ok(())
}
