//! Command-line tokenizing

pub mod token;
pub mod tokenizer;

pub use token::{TokenKey, TokenProperty, TokenStream};
pub use tokenizer::{tokenize, TokenizerOptions};
