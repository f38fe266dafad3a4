use strum_macros::{Display, EnumIter, EnumString};

/// Named mount commands, parsed from their kebab-case names.
#[derive(Debug, EnumIter, EnumString, Display, Clone, Copy, Eq, PartialEq)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Command {
    ResetAll,
    ResetPan,
    ResetTilt,
    TiltUp,
    TiltDown,
    PanLeft,
    PanRight,
}
