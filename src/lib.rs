pub mod config;
pub mod keys;
pub mod tool;

pub use crate::keys::{Key, KeyError, KeyType, Signature};
