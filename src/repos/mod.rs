pub mod error;
pub mod pg;
pub mod store;

#[cfg(test)]
pub mod mem;
