// src/lib.rs

use std::sync::Arc;

use crate::shopcarts::shopcart_store::ShopCartStore;

// Runtime configuration resolved from the environment
pub mod config;
// Error taxonomy and shared wire types
pub mod shared;
// The shopcart resource: data model, store and HTTP routes
pub mod shopcarts;

/// Shared application state handed to every handler.
///
/// The store is constructed once at startup and injected here, so the HTTP
/// layer never touches a connection pool directly and the tests can swap in
/// the in-memory implementation.
pub struct AppState {
    pub store: Arc<dyn ShopCartStore>,
}
