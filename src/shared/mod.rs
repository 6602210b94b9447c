// src/shared/mod.rs

// The error taxonomy and its mapping onto HTTP status codes
pub mod api_error;
// Wire types shared by every route
pub mod shared_structs;
