//! Service implementations
//!
//! Production implementations of the curator traits: a JSON file store and
//! an OpenAI-compatible HTTP oracle.

pub mod item_store;
pub mod openai_oracle;

pub use item_store::JsonItemStore;
pub use openai_oracle::OpenAiOracle;
