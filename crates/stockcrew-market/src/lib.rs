//! Market context enrichment: latest and prior quotes for USD/BRL and
//! BTC/USD with their percentage variation.

pub mod client;
pub mod error;
pub mod memory;
pub mod provider;

pub use client::QuoteClient;
pub use error::MarketError;
pub use memory::SnapshotCache;
pub use provider::MarketContextProvider;
