//! Main module for haml library functionality

pub mod ast;
pub mod config;
pub mod error;
pub mod formats;
pub mod lexing;
pub mod parsing;
