// src/models/mod.rs

pub mod difficulty;
pub mod question;
pub mod session;
