// src/types/mod.rs

pub mod job;

pub use job::Job;
