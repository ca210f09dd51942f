//! App Router

use salvo::Router;

use crate::{cart, checkout, donations, orders, webhooks};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("cart/prices").post(cart::prices::handler))
        .push(Router::with_path("checkout").post(checkout::create::handler))
        .push(
            Router::with_path("orders")
                .post(orders::create::handler)
                .push(Router::with_path("{order}").get(orders::get::handler)),
        )
        .push(Router::with_path("webhooks/stripe").post(webhooks::stripe::handler))
        .push(Router::with_path("donations").post(donations::create::handler))
}
