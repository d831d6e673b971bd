// Library exports for the Battlesnake bot
// Integration tests and external tooling use the core engine through here

pub mod board;
pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod error;
pub mod greedy;
pub mod grid;
pub mod mcts;
pub mod minimax;
pub mod pathfind;
pub mod rules;
pub mod score;
pub mod types;
