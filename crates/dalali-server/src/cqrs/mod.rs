//! Mediator wiring
//!
//! Every command and query handler is registered here so the whole API can
//! be driven without HTTP. Routes call the handlers directly.

pub use mediator::DefaultAsyncMediator;
use sqlx::PgPool;

use crate::auth::JwtKeys;

pub mod middleware;

pub type AppMediator = DefaultAsyncMediator;

/// Registers a `handle(pool, request)` function.
macro_rules! pool_handler {
    ($pool:expr, $handler:path) => {{
        let pool = $pool.clone();
        move |request| {
            let pool = pool.clone();
            async move { $handler(pool, request).await }
        }
    }};
}

/// Registers a `handle(pool, keys, request)` function.
macro_rules! token_handler {
    ($pool:expr, $keys:expr, $handler:path) => {{
        let pool = $pool.clone();
        let keys = $keys.clone();
        move |request| {
            let pool = pool.clone();
            let keys = keys.clone();
            async move { $handler(pool, keys, request).await }
        }
    }};
}

pub fn build_mediator(pool: PgPool, keys: JwtKeys) -> AppMediator {
    use crate::features::*;

    DefaultAsyncMediator::builder()
        // Auth
        .add_handler(token_handler!(pool, keys, auth::commands::register::handle))
        .add_handler(token_handler!(pool, keys, auth::commands::login::handle))
        .add_handler(token_handler!(pool, keys, auth::commands::refresh::handle))
        // Users
        .add_handler(pool_handler!(pool, users::commands::update_profile::handle))
        .add_handler(pool_handler!(pool, users::queries::get::handle))
        .add_handler(pool_handler!(pool, users::queries::list::handle))
        // Properties
        .add_handler(pool_handler!(pool, properties::commands::create::handle))
        .add_handler(pool_handler!(pool, properties::commands::update::handle))
        .add_handler(pool_handler!(pool, properties::commands::delete::handle))
        .add_handler(pool_handler!(pool, properties::commands::add_image::handle))
        .add_handler(pool_handler!(pool, properties::commands::delete_image::handle))
        .add_handler(pool_handler!(pool, properties::commands::set_primary_image::handle))
        .add_handler(pool_handler!(pool, properties::queries::get::handle))
        .add_handler(pool_handler!(pool, properties::queries::list::handle))
        .add_handler(pool_handler!(pool, properties::queries::list_images::handle))
        .add_handler(pool_handler!(pool, properties::queries::check_availability::handle))
        // Bookings
        .add_handler(pool_handler!(pool, bookings::commands::create::handle))
        .add_handler(pool_handler!(pool, bookings::commands::transition::handle))
        .add_handler(pool_handler!(pool, bookings::queries::get::handle))
        .add_handler(pool_handler!(pool, bookings::queries::list::handle))
        // Transactions
        .add_handler(pool_handler!(pool, transactions::commands::create::handle))
        .add_handler(pool_handler!(pool, transactions::commands::update::handle))
        .add_handler(pool_handler!(pool, transactions::queries::get::handle))
        .add_handler(pool_handler!(pool, transactions::queries::list::handle))
        // Subscriptions
        .add_handler(pool_handler!(pool, subscriptions::commands::create::handle))
        .add_handler(pool_handler!(pool, subscriptions::commands::update::handle))
        .add_handler(pool_handler!(pool, subscriptions::commands::delete::handle))
        .add_handler(pool_handler!(pool, subscriptions::queries::get::handle))
        .add_handler(pool_handler!(pool, subscriptions::queries::list::handle))
        // Messages
        .add_handler(pool_handler!(pool, messages::commands::send::handle))
        .add_handler(pool_handler!(pool, messages::commands::mark_read::handle))
        .add_handler(pool_handler!(pool, messages::commands::delete::handle))
        .add_handler(pool_handler!(pool, messages::queries::get::handle))
        .add_handler(pool_handler!(pool, messages::queries::list::handle))
        .add_handler(pool_handler!(pool, messages::queries::list::unread_count))
        // Reports
        .add_handler(pool_handler!(pool, reports::commands::create::handle))
        .add_handler(pool_handler!(pool, reports::commands::resolve::handle))
        .add_handler(pool_handler!(pool, reports::queries::get::handle))
        .add_handler(pool_handler!(pool, reports::queries::list::handle))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_mediator_builds() {
        let config = Config::default();
        let pool = PgPool::connect_lazy(&config.database.url).expect("lazy pool");
        let _mediator = build_mediator(pool, JwtKeys::new(&config.auth));
    }
}
