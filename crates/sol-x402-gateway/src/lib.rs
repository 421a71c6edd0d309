//! Host adapter for the x402 payment gate.
//!
//! A small actix-web reverse proxy that runs the gate's verification phase
//! before proxying a request upstream and its settlement phase after the
//! response is committed. The carried-metadata headers attached during
//! verification are the exact set handed to settlement — the adapter owns
//! the echo contract the core cannot verify itself.

pub mod config;
pub mod cors;
pub mod gate;
pub mod proxy;
pub mod state;
