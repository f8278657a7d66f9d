//! Remote chat capability abstraction.

pub mod provider;
