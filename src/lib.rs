//! A MAGI-themed floating window desktop for the terminal.
//!
//! The [`window`] module holds the window model: the [`window::WindowManager`]
//! registry, per-window geometry and pointer interaction, and the chrome
//! decorator. [`apps`] hosts the applications shown inside windows, and
//! [`desktop::Desktop`] ties both to the panel and terminal input.

pub mod apps;
pub mod component_context;
pub mod components;
pub mod config;
pub mod constants;
pub mod desktop;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod keybindings;
pub mod layout;
pub mod locale;
pub mod panel;
pub mod runner;
pub mod state;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod window;
