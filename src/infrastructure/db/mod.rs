pub mod pool;

#[cfg(test)]
pub mod memory;
