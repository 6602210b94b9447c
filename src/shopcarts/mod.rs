// src/shopcarts/mod.rs

// Declares the submodule with the shopcart item structs
pub mod shopcart_structs;
// Declares the submodule with the storage trait and its backends
pub mod shopcart_store;
// Declares the submodule with the shopcart route handlers
pub mod shopcart_router;
