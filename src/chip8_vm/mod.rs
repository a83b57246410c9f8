pub mod app;
pub mod config;
pub mod cpu;
pub mod display;
pub mod error;
pub mod input;
pub mod opcode;
pub mod quirks;
pub mod scaler;
pub mod state;
