//! Interactive control loop for a configured board

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use rpitx_device::{Component, Device, FilterSlot};
use thiserror::Error;
use tracing::{debug, warn};

/// One line typed at the control prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Route the signal through filter slot N
    Filter(u8),
    /// Toggle the LNA between active and bypass
    Lna,
    /// Print the board configuration
    Info,
    /// List installed filters
    Filters,
    Help,
    Quit,
}

/// Errors from parsing a prompt line
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    /// Nothing was typed
    #[error("empty command")]
    Empty,

    /// First word is not a known command
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),

    /// `filter` without a valid slot number
    #[error("expected a filter number, e.g. 'filter 2'")]
    BadFilterIndex,
}

impl FromStr for Action {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let command = words.next().ok_or(ActionError::Empty)?;

        match command.to_ascii_lowercase().as_str() {
            "filter" | "f" => words
                .next()
                .and_then(|n| n.parse().ok())
                .map(Action::Filter)
                .ok_or(ActionError::BadFilterIndex),
            "lna" => Ok(Action::Lna),
            "info" => Ok(Action::Info),
            "filters" => Ok(Action::Filters),
            "help" | "?" => Ok(Action::Help),
            "quit" | "exit" | "q" => Ok(Action::Quit),
            other => Err(ActionError::Unknown(other.to_string())),
        }
    }
}

const HELP: &str = "\
Commands:
  filter <n>   route the signal through filter slot n
  filters      list installed filters
  lna          toggle the LNA between active and bypass
  info         print the board configuration
  help         show this help
  quit         leave the control loop";

/// Read commands from `input` until `quit` or end of input
pub fn run<R: BufRead, W: Write>(device: &mut Device, input: R, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", HELP)?;
    prompt(out)?;

    for line in input.lines() {
        let line = line?;
        let action = match line.parse::<Action>() {
            Ok(action) => action,
            Err(ActionError::Empty) => {
                prompt(out)?;
                continue;
            }
            Err(e) => {
                writeln!(out, "{}", e)?;
                prompt(out)?;
                continue;
            }
        };

        debug!("Prompt action: {:?}", action);
        if action == Action::Quit {
            break;
        }
        apply(device, action, out)?;
        prompt(out)?;
    }

    Ok(())
}

fn prompt<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}

fn apply<W: Write>(device: &mut Device, action: Action, out: &mut W) -> io::Result<()> {
    match action {
        Action::Filter(index) => {
            let installed = usize::from(index)
                .checked_sub(1)
                .and_then(|i| device.filters().get(i))
                .is_some_and(FilterSlot::is_installed);
            if !installed {
                writeln!(out, "Filter {} is not installed", index)?;
                return Ok(());
            }
            match device.enable_filter(index) {
                Ok(()) => writeln!(out, "Filter {} enabled", index)?,
                Err(e) => {
                    warn!("Filter {} switch failed: {}", index, e);
                    writeln!(out, "Failed to enable filter {}: {}", index, e)?;
                }
            }
        }
        Action::Lna => {
            if device.amplifier().is_none() {
                writeln!(out, "No LNA installed on {}", device.model())?;
                return Ok(());
            }
            match device.toggle_lna() {
                Ok(true) => writeln!(out, "LNA enabled")?,
                Ok(false) => writeln!(out, "LNA bypassed")?,
                Err(e) => {
                    warn!("LNA toggle failed: {}", e);
                    writeln!(out, "LNA toggle failed, LNA treated as bypassed: {}", e)?;
                }
            }
        }
        Action::Info => writeln!(out, "{}", device.describe_configuration())?,
        Action::Filters => {
            let mut any = false;
            for (index, filter) in device.installed_filters() {
                any = true;
                let marker = if device.active_filter() == Some(index) { "*" } else { " " };
                writeln!(out, "{} {}: {}", marker, index, filter.summary())?;
            }
            if !any {
                writeln!(out, "No filters installed")?;
            }
        }
        Action::Help => writeln!(out, "{}", HELP)?,
        Action::Quit => {}
    }
    Ok(())
}
