pub mod common;
pub mod describe;
pub mod errors;
pub mod export;
pub mod feed;
pub mod generate_commands;
pub mod map;
pub mod overlay;
pub mod pipeline;
pub mod plan;
pub mod plan_execution;
pub mod style;
