pub mod columns;
pub mod config;
pub mod fill;
pub mod split;
