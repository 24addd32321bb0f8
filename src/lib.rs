//! PolGen - bootstrap tooling for the policy wiki deployment

pub mod aws;
pub mod bootstrap;
pub mod core;
