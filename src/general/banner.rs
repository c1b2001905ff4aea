use std::io::Write;
use std::net::SocketAddr;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Which half of the interface is starting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartupMode {
    Sender,
    Receiver,
}

fn print_colored(color: Color, line: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_intense(true));
    let _ = writeln!(&mut stdout, "{line}");
    let _ = stdout.reset();
}

pub fn starting_message(mode: StartupMode, addr: SocketAddr) -> String {
    match mode {
        StartupMode::Sender => {
            format!("Starting the OSC sender... Will send messages to {addr}")
        }
        StartupMode::Receiver => {
            format!("Starting the OSC receiver... Will listen for messages from {addr}")
        }
    }
}

pub fn print_starting_message(mode: StartupMode, addr: SocketAddr) {
    print_colored(Color::Green, &starting_message(mode, addr));
}

// Print the quick help line in blue (works on Windows CMD via termcolor)
pub fn print_quick_help() {
    print_colored(Color::Blue, "Type 'help' for commands, 'exit' to quit");
}

pub fn print_error(line: &str) {
    print_colored(Color::Red, line);
}
