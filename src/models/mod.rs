// Re-export all model types for ease of use


pub use lab_test::*;
