//! Storage implementations of the provider traits.

#[cfg(feature = "postgres")]
pub mod postgres;
