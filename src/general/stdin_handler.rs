use std::io::{self, BufRead};
use std::sync::Arc;
use std::thread;

use tracing::warn;

use super::banner;
use super::commands::{parse_command, Command, HELP};
use crate::interface::OscInterface;
use crate::logging::LogHandle;
use crate::messages::{AvatarChangeSend, AvatarParameterChange, Input};

/// Spawn a thread that reads commands from stdin and sends them through `osc`.
/// The thread returns on an exit command or when stdin closes.
pub fn spawn_stdin_handler(
    osc: Arc<OscInterface>,
    log: Option<LogHandle>,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin-handler".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            let mut line = String::new();
            loop {
                line.clear();
                match stdin.lock().read_line(&mut line) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {}
                }
                if !run_command(&osc, log.as_ref(), parse_command(&line)) {
                    break;
                }
            }
        })
}

/// Executes one command; returns false when the console should close.
pub fn run_command(osc: &OscInterface, log: Option<&LogHandle>, command: Command) -> bool {
    let result = match command {
        Command::Exit => return false,
        Command::Help => {
            for line in HELP {
                println!("{line}");
            }
            Ok(())
        }
        Command::Debug(enabled) => {
            match log.map(|handle| handle.set_debug(enabled)) {
                Some(Ok(())) => println!("Debug {}", if enabled { "enabled" } else { "disabled" }),
                Some(Err(err)) => warn!(error = %err, "failed to change log level"),
                None => println!("Logging is not reloadable here"),
            }
            Ok(())
        }
        Command::ConfigReset => osc.send_config_reset(),
        Command::AvatarChange(avatar_guid) => {
            osc.send_avatar_change(&AvatarChangeSend { avatar_guid })
        }
        Command::Parameter { name, value } => osc.send_avatar_parameter(&AvatarParameterChange {
            parameter_name: name,
            parameter_value: value,
        }),
        Command::LegacyParameter { name, value } => {
            osc.send_avatar_parameter_legacy(&AvatarParameterChange {
                parameter_name: name,
                parameter_value: value,
            })
        }
        Command::Input { name, value } => osc.set_input(&Input {
            input_name: name,
            input_value: value,
        }),
        Command::Unrecognized(cmd) => {
            println!("Unrecognized command: '{cmd}'. Type 'help' for available commands.");
            Ok(())
        }
    };
    if let Err(err) = result {
        banner::print_error(&format!("Send failed: {err}"));
    }
    true
}
