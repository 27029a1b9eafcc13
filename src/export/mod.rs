//! Exports of generated items to other tools

pub mod foundry;

pub use foundry::gun_to_foundry;
