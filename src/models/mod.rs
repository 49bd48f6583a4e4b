
pub use diagnostic_test::*;
