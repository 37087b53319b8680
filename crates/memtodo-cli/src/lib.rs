pub mod activity;
pub mod screens;
pub mod setup;
pub mod shell;

pub use shell::{Command, Screen, Shell};
