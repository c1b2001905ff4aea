use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! input_names {
    ($($(#[$meta:meta])* $variant:ident => $wire:literal,)*) => {
        /// Inputs the mod lets an OSC client drive, sent to `/input/<name>`.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum InputName {
            $($(#[$meta])* #[serde(rename = $wire)] $variant,)*
        }

        impl InputName {
            pub const ALL: &'static [InputName] = &[$(InputName::$variant,)*];

            /// Name as it appears in the OSC address.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(InputName::$variant => $wire,)*
                }
            }
        }

        impl FromStr for InputName {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(InputName::$variant),)*
                    _ => Err(format!("unknown input name '{s}'")),
                }
            }
        }
    };
}

input_names! {
    // Axes
    Horizontal => "Horizontal",
    Vertical => "Vertical",
    LookHorizontal => "LookHorizontal",
    MoveHoldFb => "MoveHoldFB",
    LookVertical => "LookVertical",
    GripLeftValue => "GripLeftValue",
    GripRightValue => "GripRightValue",

    // Buttons
    MoveForward => "MoveForward",
    MoveBackward => "MoveBackward",
    MoveLeft => "MoveLeft",
    MoveRight => "MoveRight",
    LookLeft => "LookLeft",
    LookRight => "LookRight",
    Jump => "Jump",
    Run => "Run",
    ComfortLeft => "ComfortLeft",
    ComfortRight => "ComfortRight",
    DropRight => "DropRight",
    UseRight => "UseRight",
    GrabRight => "GrabRight",
    DropLeft => "DropLeft",
    UseLeft => "UseLeft",
    GrabLeft => "GrabLeft",
    PanicButton => "PanicButton",
    QuickMenuToggleLeft => "QuickMenuToggleLeft",
    QuickMenuToggleRight => "QuickMenuToggleRight",
    Voice => "Voice",
    Crouch => "Crouch",
    Prone => "Prone",
    IndependentHeadTurn => "IndependentHeadTurn",
    Zoom => "Zoom",
    Reload => "Reload",
    ToggleNameplates => "ToggleNameplates",
    ToggleHud => "ToggleHUD",
    SwitchMode => "SwitchMode",
    ToggleFlightMode => "ToggleFlightMode",
    Respawn => "Respawn",
    ToggleCamera => "ToggleCamera",
    ToggleSeated => "ToggleSeated",
    QuitGame => "QuitGame",

    // Values
    Emote => "Emote",
    GestureLeft => "GestureLeft",
    GestureRight => "GestureRight",
    Toggle => "Toggle",
}

impl fmt::Display for InputName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_name_parses_back() {
        for name in InputName::ALL {
            assert_eq!(name.as_str().parse::<InputName>(), Ok(*name));
        }
    }

    #[test]
    fn wire_names_keep_their_casing() {
        assert_eq!(InputName::MoveHoldFb.as_str(), "MoveHoldFB");
        assert_eq!(InputName::ToggleHud.as_str(), "ToggleHUD");
        assert!("lookright".parse::<InputName>().is_err());
    }
}
