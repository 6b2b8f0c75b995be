//! Inbound commands to the application service.
//!
//! Commands arrive as text lines on the serial console and are parsed
//! here into [`AppCommand`]s that the
//! [`IrrigationService`](super::service::IrrigationService) acts upon.
//!
//! | Line            | Command                       |
//! |-----------------|-------------------------------|
//! | `testmotor`     | [`AppCommand::TestMotor`]     |
//! | `stopmotor`     | [`AppCommand::CancelOverride`]|
//! | `setUmi <n>`    | [`AppCommand::SetHumidityThreshold`] |
//! | `setWater <n>`  | [`AppCommand::SetWaterLevelThreshold`] |
//! | `setTemp <n>`   | [`AppCommand::SetTempMax`]    |
//! | `show`          | [`AppCommand::Show`]          |
//!
//! Command words are case-sensitive.  Arguments must be base-10
//! integers; range checks happen later in the threshold setters.

use crate::error::CommandError;

/// Help text logged once at boot.
pub const USAGE: &str = "commands: setUmi <0-100>, setWater <0-1023>, setTemp <10-80>, show, testmotor, stopmotor";

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Run the motor for the override duration, bypassing the policy.
    TestMotor,
    /// End a running motor test early.
    CancelOverride,
    SetHumidityThreshold(i32),
    SetWaterLevelThreshold(i32),
    SetTempMax(i32),
    /// Report the current thresholds.
    Show,
}

/// Parse one command line.  Leading/trailing whitespace is ignored.
pub fn parse_command(line: &str) -> Result<AppCommand, CommandError> {
    let mut words = line.split_whitespace();
    let name = words.next().ok_or(CommandError::Empty)?;

    let cmd = match name {
        "testmotor" => AppCommand::TestMotor,
        "stopmotor" => AppCommand::CancelOverride,
        "show" => AppCommand::Show,
        "setUmi" => AppCommand::SetHumidityThreshold(int_arg("setUmi", words.next())?),
        "setWater" => AppCommand::SetWaterLevelThreshold(int_arg("setWater", words.next())?),
        "setTemp" => AppCommand::SetTempMax(int_arg("setTemp", words.next())?),
        _ => return Err(CommandError::Unknown),
    };

    if words.next().is_some() {
        return Err(CommandError::InvalidArgument(static_name(&cmd)));
    }
    Ok(cmd)
}

fn int_arg(cmd: &'static str, word: Option<&str>) -> Result<i32, CommandError> {
    let word = word.ok_or(CommandError::MissingArgument(cmd))?;
    word.parse::<i32>()
        .map_err(|_| CommandError::InvalidArgument(cmd))
}

fn static_name(cmd: &AppCommand) -> &'static str {
    match cmd {
        AppCommand::TestMotor => "testmotor",
        AppCommand::CancelOverride => "stopmotor",
        AppCommand::Show => "show",
        AppCommand::SetHumidityThreshold(_) => "setUmi",
        AppCommand::SetWaterLevelThreshold(_) => "setWater",
        AppCommand::SetTempMax(_) => "setTemp",
    }
}
