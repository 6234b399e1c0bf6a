//! Schema tables for the chain's message types

pub mod cosmos;
pub mod intergamm;
pub mod qbank;
pub mod qoracle;
