use clap::Args;
use fairway::items::LineItem;
use rust_decimal::Decimal;

#[derive(Debug, Args)]
pub(crate) struct AddItemArgs {
    /// Product identifier
    #[arg(long)]
    product: String,

    /// Display name
    #[arg(long)]
    name: String,

    /// Product category
    #[arg(long)]
    category: String,

    /// Unit price, e.g. 19.99
    #[arg(long)]
    price: Decimal,

    /// Units to add
    #[arg(long, default_value_t = 1)]
    quantity: u32,

    /// Units in stock
    #[arg(long)]
    stock: u32,

    /// Line identity; derived from product, size and color when omitted
    #[arg(long)]
    client_id: Option<String>,

    /// Product URL slug
    #[arg(long)]
    slug: Option<String>,

    /// Image reference
    #[arg(long, default_value = "")]
    image: String,

    /// Variant size
    #[arg(long)]
    size: Option<String>,

    /// Variant color
    #[arg(long)]
    color: Option<String>,
}

impl AddItemArgs {
    pub(crate) fn into_item(self) -> LineItem {
        let client_id = self.client_id.unwrap_or_else(|| {
            [Some(self.product.as_str()), self.size.as_deref(), self.color.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join("-")
        });

        LineItem {
            client_id,
            product_ref: self.product,
            name: self.name,
            slug: self.slug,
            category: self.category,
            unit_price: self.price,
            quantity: self.quantity,
            stock_limit: self.stock,
            image_ref: self.image,
            size: self.size,
            color: self.color,
        }
    }
}
