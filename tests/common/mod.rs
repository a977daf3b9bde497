// Synthetic XBE builders shared with the unit tests

#[path = "../../src/testutil.rs"]
mod testutil;

pub use testutil::*;
