//! Inbound adapters that translate operator requests into domain service
//! calls while keeping framework details at the edge.

pub mod cli;
