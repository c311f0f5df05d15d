//! Structure Model fixtures exercised by the conformance suite.

pub mod fixtures;
