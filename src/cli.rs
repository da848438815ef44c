//! Command-line REPL driving a running client

use anyhow::{Context, Result};
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::runtime::Handle;

use crate::client::ClientHandle;
use crate::protocol::RemoteSettingRequest;

/// One parsed REPL line
#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand {
    DeviceIds,
    PlayArea,
    ApplicationInfo,
    Properties,
    StartPolling,
    StopPolling,
    State,
    Setting(RemoteSettingRequest),
    Help,
    Quit,
    Empty,
}

const HELP: &str = "\
Commands:
  ids                 request device ids
  playarea            request play area
  appinfo             request application info
  props               request the configured property for every headset and controller
  start               start polling analog and pose input
  stop                stop polling
  state               print connection state and tables
  setting <password> <section> <setting> <value> <type>
                      change a remote setting
  help                show this help
  quit | exit         leave";

/// Parse a REPL line
pub fn parse_command(line: &str) -> Result<ReplCommand, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(ReplCommand::Empty);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "ids" => ReplCommand::DeviceIds,
        "playarea" => ReplCommand::PlayArea,
        "appinfo" => ReplCommand::ApplicationInfo,
        "props" => ReplCommand::Properties,
        "start" => ReplCommand::StartPolling,
        "stop" => ReplCommand::StopPolling,
        "state" => ReplCommand::State,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" => ReplCommand::Quit,
        "setting" => {
            let args: Vec<&str> = words.by_ref().collect();
            let [password, section, setting, value, value_type] = args.as_slice() else {
                return Err(
                    "usage: setting <password> <section> <setting> <value> <type>".to_string(),
                );
            };
            return Ok(ReplCommand::Setting(RemoteSettingRequest {
                password: password.to_string(),
                section: section.to_string(),
                setting: setting.to_string(),
                value: value.to_string(),
                value_type: value_type.to_string(),
            }));
        },
        other => return Err(format!("unknown command '{}' (try 'help')", other)),
    };

    if words.next().is_some() {
        return Err(format!("'{}' takes no arguments", verb));
    }
    Ok(command)
}

/// Whether a line may be stored in history; `setting` lines carry a password
pub fn keep_in_history(line: &str) -> bool {
    match line.split_whitespace().next() {
        Some(verb) => !verb.eq_ignore_ascii_case("setting"),
        None => false,
    }
}

/// Run the REPL until `quit`, EOF or Ctrl+C
///
/// Blocking; call from a blocking thread. `runtime` is used for queries that
/// wait on the client.
pub fn run_repl(client: ClientHandle, runtime: Handle) -> Result<()> {
    let mut rl = DefaultEditor::new().context("Failed to initialize line editor")?;
    println!("{}", "Type 'help' for commands.".dimmed());

    loop {
        let line = match rl.readline("openvr2ws> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("Failed to read line"),
        };
        if keep_in_history(&line) {
            let _ = rl.add_history_entry(line.as_str());
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message.red());
                continue;
            },
        };

        if client.is_closed() {
            println!("{}", "Client has stopped".red());
            break;
        }

        match command {
            ReplCommand::DeviceIds => client.request_device_ids(),
            ReplCommand::PlayArea => client.request_play_area(),
            ReplCommand::ApplicationInfo => client.request_application_info(),
            ReplCommand::Properties => client.request_properties(),
            ReplCommand::StartPolling => client.start_polling(),
            ReplCommand::StopPolling => client.stop_polling(),
            ReplCommand::Setting(request) => client.send_remote_setting(request),
            ReplCommand::State => {
                let snapshot = runtime.block_on(client.snapshot())?;
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            },
            ReplCommand::Help => println!("{}", HELP),
            ReplCommand::Quit => break,
            ReplCommand::Empty => {},
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("ids"), Ok(ReplCommand::DeviceIds));
        assert_eq!(parse_command("  PROPS "), Ok(ReplCommand::Properties));
        assert_eq!(parse_command("start"), Ok(ReplCommand::StartPolling));
        assert_eq!(parse_command("exit"), Ok(ReplCommand::Quit));
        assert_eq!(parse_command(""), Ok(ReplCommand::Empty));
    }

    #[test]
    fn test_parse_setting() {
        let command = parse_command("setting pw steamvr supersampleScale 1.5 Float").unwrap();
        let ReplCommand::Setting(request) = command else {
            panic!("expected setting, got {:?}", command);
        };
        assert_eq!(request.password, "pw");
        assert_eq!(request.section, "steamvr");
        assert_eq!(request.setting, "supersampleScale");
        assert_eq!(request.value, "1.5");
        assert_eq!(request.value_type, "Float");
    }

    #[test]
    fn test_setting_lines_stay_out_of_history() {
        assert!(!keep_in_history("setting hunter2 steamvr supersampleScale 1.5 Float"));
        assert!(!keep_in_history("  SETTING hunter2"));
        assert!(!keep_in_history("   "));
        assert!(keep_in_history("ids"));
        assert!(keep_in_history("settings"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("setting pw steamvr").is_err());
        assert!(parse_command("ids now").is_err());
        assert!(parse_command("dance").unwrap_err().contains("dance"));
    }
}
