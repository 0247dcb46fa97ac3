//! Macros shared between the geode crates.

mod macros;
