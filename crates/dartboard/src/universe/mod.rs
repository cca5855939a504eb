//! Constituent sources bundled with the facade.

pub mod sp500;

pub use sp500::SP500Universe;
