use crate::messages::{InputName, ParameterValue};

/// A line typed into the console.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Exit,
    Help,
    Debug(bool),
    ConfigReset,
    AvatarChange(String),
    Parameter { name: String, value: ParameterValue },
    LegacyParameter { name: String, value: ParameterValue },
    Input { name: InputName, value: ParameterValue },
    Unrecognized(String),
}

pub const HELP: &[&str] = &[
    "Commands:",
    "  avatar <guid>           - Change to the avatar with that guid",
    "  param <name> <value>    - Send /avatar/parameter (value: 1.0, 1, true)",
    "  legacy <name> <value>   - Send /avatar/parameters/<name>",
    "  input <Name> <value>    - Send /input/<Name>, e.g. input LookRight 1",
    "  reset                   - Ask the mod to resend its cached state",
    "  debug on/off            - Enable/Disable verbose debug logs",
    "  help/h                  - Show this help",
    "  exit/quit/q             - Exit program",
];

pub fn parse_command(line: &str) -> Command {
    let cmd = line.trim();
    if cmd.is_empty()
        || cmd.eq_ignore_ascii_case("exit")
        || cmd.eq_ignore_ascii_case("quit")
        || cmd.eq_ignore_ascii_case("q")
    {
        return Command::Exit;
    }
    if cmd.eq_ignore_ascii_case("help") || cmd.eq_ignore_ascii_case("h") {
        return Command::Help;
    }

    let mut parts = cmd.split_whitespace();
    let head = parts.next().unwrap_or_default().to_ascii_lowercase();
    let rest: Vec<&str> = parts.collect();
    let unrecognized = || Command::Unrecognized(cmd.to_string());

    match (head.as_str(), rest.as_slice()) {
        ("debug", [flag]) => match flag.to_ascii_lowercase().as_str() {
            "on" | "enable" | "1" => Command::Debug(true),
            "off" | "disable" | "0" => Command::Debug(false),
            _ => unrecognized(),
        },
        ("reset", []) => Command::ConfigReset,
        ("avatar", [guid]) => Command::AvatarChange(guid.to_string()),
        ("param", [name, value]) => match value.parse() {
            Ok(value) => Command::Parameter {
                name: name.to_string(),
                value,
            },
            Err(_) => unrecognized(),
        },
        ("legacy", [name, value]) => match value.parse() {
            Ok(value) => Command::LegacyParameter {
                name: name.to_string(),
                value,
            },
            Err(_) => unrecognized(),
        },
        ("input", [name, value]) => match (name.parse(), value.parse()) {
            (Ok(name), Ok(value)) => Command::Input { name, value },
            _ => unrecognized(),
        },
        _ => unrecognized(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_forms() {
        for line in ["", "  ", "exit", "QUIT", "q\n"] {
            assert_eq!(parse_command(line), Command::Exit, "{line:?}");
        }
    }

    #[test]
    fn debug_toggle() {
        assert_eq!(parse_command("debug on"), Command::Debug(true));
        assert_eq!(parse_command("Debug Disable"), Command::Debug(false));
        assert!(matches!(parse_command("debug maybe"), Command::Unrecognized(_)));
    }

    #[test]
    fn sends() {
        assert_eq!(
            parse_command("avatar 6b86cced-e17c-4f57-8bdf-812615773ce6"),
            Command::AvatarChange("6b86cced-e17c-4f57-8bdf-812615773ce6".into())
        );
        assert_eq!(
            parse_command("param MainColor-r 1.0"),
            Command::Parameter {
                name: "MainColor-r".into(),
                value: ParameterValue::Float(1.0)
            }
        );
        assert_eq!(
            parse_command("legacy Toggle true"),
            Command::LegacyParameter {
                name: "Toggle".into(),
                value: ParameterValue::Bool(true)
            }
        );
        assert_eq!(
            parse_command("input LookRight 1"),
            Command::Input {
                name: InputName::LookRight,
                value: ParameterValue::Int(1)
            }
        );
        assert_eq!(parse_command("reset"), Command::ConfigReset);
    }

    #[test]
    fn bad_arguments_are_unrecognized() {
        for line in ["param MainColor-r", "param x y", "input Fly 1", "avatar", "dance"] {
            assert!(
                matches!(parse_command(line), Command::Unrecognized(_)),
                "{line}"
            );
        }
    }
}
