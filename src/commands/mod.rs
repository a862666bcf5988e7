//! Operator commands read line by line from stdin
//!
//! A terminal has no pointer, so hovering a device card is spelled out as
//! `hover <device>` / `leave`.

use tracing::{error, info, warn};

use crate::api::pricecontrol::SwitchAction;
use crate::dashboard::Dashboard;
use crate::services::chart_service::ChartSurface;

const HELP: &str = "Commands:
  hover <device>   highlight slots below the device's trigger prices
  leave            back to the default coloring
  on <device>      switch a device on (needs webui_toggle)
  off <device>     switch a device off (needs webui_toggle)
  refresh          refetch prices and devices now
  status           show prices, backend health and devices
  help             this text
  quit             exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Hover(String),
    Leave,
    Switch(String, SwitchAction),
    Refresh,
    Status,
    Help,
    Quit,
}

/// What the event loop does after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Start price and device fetches now
    Refresh,
    Quit,
}

/// Parse one input line. Blank lines are `Ok(None)`.
///
/// Device names may contain spaces; everything after the verb is the name.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let device = |verb: &str| {
        if rest.is_empty() {
            Err(format!("Usage: {} <device>", verb))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match verb.to_lowercase().as_str() {
        "hover" => Command::Hover(device("hover")?),
        "leave" => Command::Leave,
        "on" => Command::Switch(device("on")?, SwitchAction::On),
        "off" => Command::Switch(device("off")?, SwitchAction::Off),
        "refresh" => Command::Refresh,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("Unknown command '{}', try 'help'", other)),
    };

    Ok(Some(command))
}

/// Run one input line against the dashboard; never waits on the backend
pub fn handle_line<S: ChartSurface>(dashboard: &mut Dashboard<S>, line: &str) -> Flow {
    let command = match parse_command(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Flow::Continue,
        Err(e) => {
            warn!("{}", e);
            return Flow::Continue;
        }
    };

    let result = match &command {
        Command::Hover(device) => dashboard.hover(device),
        Command::Leave => dashboard.leave(),
        Command::Switch(device, action) => {
            dashboard.switch(device, *action);
            Ok(())
        }
        Command::Refresh => {
            info!("Refresh requested");
            return Flow::Refresh;
        }
        Command::Status => {
            println!("{}", dashboard.status_report());
            Ok(())
        }
        Command::Help => {
            println!("{}", HELP);
            Ok(())
        }
        Command::Quit => {
            info!("Quit requested");
            return Flow::Quit;
        }
    };

    if let Err(e) = result {
        error!("❌ Error executing {:?}: {}", command, e);
    }
    Flow::Continue
}
