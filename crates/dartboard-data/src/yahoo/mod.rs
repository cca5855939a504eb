//! Yahoo Finance data providers.

pub mod quotes;

pub use quotes::{YahooQuoteProvider, yahoo_symbol};
