pub mod build;
pub mod check;
pub mod lex;
pub mod quote;
pub mod source;
pub mod tree;

#[cfg(test)]
mod source_tests;
