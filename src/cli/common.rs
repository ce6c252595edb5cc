//! Shared clap helper types for CLI commands.

use clap::ValueEnum;
use fixcol::Alignment;

/// Alignment flags accepted by CLI commands.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum AlignmentArg {
    Left,
    Right,
}

impl From<AlignmentArg> for Alignment {
    fn from(value: AlignmentArg) -> Alignment {
        match value {
            AlignmentArg::Left => Alignment::Left,
            AlignmentArg::Right => Alignment::Right,
        }
    }
}
