pub mod assets;
pub mod boneblade;
pub mod canvas;
pub mod config;
pub mod error;
pub mod flow;
pub mod game;
pub mod input;
pub mod logging;
pub mod runner;
pub mod score_store;
pub mod screen;
