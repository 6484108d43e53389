// src/quiz/mod.rs

pub mod engine;
pub mod parser;
pub mod report;
pub mod shuffle;
pub mod source;
pub mod store;
