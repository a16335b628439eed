//! Command implementations, one module per command group.

pub mod account;
pub mod billing;
pub mod cart;
pub mod orders;
pub mod websites;

use crate::output;
use crate::state::{ClientState, Theme};

/// Theme selection for `bv theme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ThemeChoice {
    Light,
    Dark,
    Toggle,
}

pub fn theme(state: &mut ClientState, choice: ThemeChoice) {
    state.theme = match choice {
        ThemeChoice::Light => Theme::Light,
        ThemeChoice::Dark => Theme::Dark,
        ThemeChoice::Toggle => state.theme.toggled(),
    };
    output::emit(&format!("Theme: {}", state.theme));
}
