// src/api/handlers/mod.rs

mod fetch;
mod proxy;
mod status;

pub use fetch::{fetch_media, fetch_media_query};
pub use proxy::proxy_media;
pub use status::{list_platforms, liveness};
