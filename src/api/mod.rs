// src/api/mod.rs

mod handlers;
mod router;

pub use router::create_router;
