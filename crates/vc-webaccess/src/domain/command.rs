//! Inbound channel frames and their typed commands.
//!
//! Grammar (pipe delimited):
//!
//! ```text
//! QLC+CMD|opMode
//! QLC+IO|{INPUT|OUTPUT|FB}|<universe>|<pluginName>|<lineNumber>
//! QLC+IO|PROFILE|<universe>|<profileName>
//! QLC+IO|{AUDIOIN|AUDIOOUT}|<deviceNameOrSentinel>
//! QLC+SYS|NETWORK|<ifaceName>|{static|dhcp}|<address>|<netmask>|<gateway>
//! QLC+SYS|AUTOSTART|{none|current}
//! QLC+SYS|REBOOT
//! POLL
//! <widgetId>[|<value>|...]
//! ```
//!
//! Parsing is purely syntactic. Whether a widget id resolves, and what its
//! arguments mean, is decided by the dispatcher against the live tree.

use crate::domain::error::FrameError;
use crate::domain::interface::AddressMode;
use crate::domain::widget::WidgetId;
use std::fmt;
use std::str::FromStr;

/// Token delimiter shared by inbound and outbound frames
pub const DELIMITER: char = '|';

pub const FAMILY_CMD: &str = "QLC+CMD";
pub const FAMILY_IO: &str = "QLC+IO";
pub const FAMILY_SYS: &str = "QLC+SYS";
pub const FAMILY_POLL: &str = "POLL";

/// Audio device value meaning "use the system default"
pub const DEFAULT_AUDIO_DEVICE: &str = "__qlcplusdefault__";

/// Line number of an unpatched plugin slot
pub const INVALID_LINE: u32 = u32::MAX;

/// Raw inbound frame split into tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFrame {
    tokens: Vec<String>,
}

impl CommandFrame {
    pub fn new(text: &str) -> Self {
        Self {
            tokens: text.split(DELIMITER).map(str::to_string).collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.iter().all(|t| t.is_empty())
    }

    pub fn family(&self) -> &str {
        self.token(0)
    }

    fn token(&self, index: usize) -> &str {
        self.tokens.get(index).map(String::as_str).unwrap_or("")
    }

    fn require(&self, family: &str, count: usize) -> Result<(), FrameError> {
        if self.tokens.len() < count {
            return Err(FrameError::malformed(
                family,
                format!("expected {} tokens, got {}", count, self.tokens.len()),
            ));
        }
        Ok(())
    }
}

impl FromStr for CommandFrame {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl fmt::Display for CommandFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join("|"))
    }
}

/// I/O patch slot targeted by a `QLC+IO` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchKind {
    Input,
    Output,
    Feedback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioDirection {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutostartChoice {
    /// Remove the autostart project
    None,
    /// Save the current project as the autostart project
    Current,
}

/// Cue list sub-command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueVerb {
    Play,
    Previous,
    Next,
    Step(usize),
}

/// Frame addressed to a widget by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetCommand {
    pub id: WidgetId,
    pub args: Vec<String>,
}

impl WidgetCommand {
    /// First argument as a byte.
    ///
    /// Out-of-range values wrap (`300` -> `44`, `-1` -> `255`), missing or
    /// non-numeric values read as zero.
    pub fn value(&self) -> u8 {
        self.byte().unwrap_or(0)
    }

    /// First argument as a byte, `None` if missing or not a number
    pub fn byte(&self) -> Option<u8> {
        self.args
            .first()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(|v| v as u8)
    }

    /// Cue list verb. `Ok(None)` for an unrecognized verb.
    pub fn cue_verb(&self) -> Result<Option<CueVerb>, FrameError> {
        let family = self.id.to_string();
        let verb = self
            .args
            .first()
            .ok_or_else(|| FrameError::malformed(&family, "missing cue list verb"))?;

        let verb = match verb.as_str() {
            "PLAY" => CueVerb::Play,
            "PREV" => CueVerb::Previous,
            "NEXT" => CueVerb::Next,
            "STEP" => {
                let index = self
                    .args
                    .get(1)
                    .ok_or_else(|| FrameError::malformed(&family, "STEP without index"))?;
                let index = index.trim().parse::<usize>().map_err(|_| {
                    FrameError::malformed(&family, format!("invalid step index: {}", index))
                })?;
                CueVerb::Step(index)
            }
            _ => return Ok(None),
        };
        Ok(Some(verb))
    }
}

/// Typed inbound command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ToggleOperatingMode,
    SetPatch {
        kind: PatchKind,
        universe: u32,
        plugin: String,
        line: u32,
    },
    SetProfile {
        universe: u32,
        profile: String,
    },
    /// `None` restores the default device
    SetAudioDevice {
        direction: AudioDirection,
        device: Option<String>,
    },
    ConfigureNetwork {
        interface: String,
        mode: AddressMode,
    },
    Autostart(AutostartChoice),
    Reboot,
    Poll,
    Widget(WidgetCommand),
}

impl Command {
    pub fn parse(frame: &CommandFrame) -> Result<Self, FrameError> {
        if frame.is_empty() {
            return Err(FrameError::Empty);
        }

        match frame.family() {
            FAMILY_CMD => parse_cmd(frame),
            FAMILY_IO => parse_io(frame),
            FAMILY_SYS => parse_sys(frame),
            FAMILY_POLL => Ok(Command::Poll),
            other => {
                let id = other
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| FrameError::unknown_command("frame", other))?;
                Ok(Command::Widget(WidgetCommand {
                    id: WidgetId(id),
                    args: frame.tokens()[1..].to_vec(),
                }))
            }
        }
    }
}

impl FromStr for Command {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::parse(&CommandFrame::new(s))
    }
}

fn parse_cmd(frame: &CommandFrame) -> Result<Command, FrameError> {
    frame.require(FAMILY_CMD, 2)?;
    match frame.token(1) {
        "opMode" => Ok(Command::ToggleOperatingMode),
        other => Err(FrameError::unknown_command(FAMILY_CMD, other)),
    }
}

fn parse_io(frame: &CommandFrame) -> Result<Command, FrameError> {
    frame.require(FAMILY_IO, 3)?;

    let sub = frame.token(1);
    match sub {
        "INPUT" | "OUTPUT" | "FB" => {
            frame.require(FAMILY_IO, 5)?;
            let kind = match sub {
                "INPUT" => PatchKind::Input,
                "OUTPUT" => PatchKind::Output,
                _ => PatchKind::Feedback,
            };
            Ok(Command::SetPatch {
                kind,
                universe: parse_universe(frame.token(2))?,
                plugin: frame.token(3).to_string(),
                line: parse_line(frame.token(4))?,
            })
        }
        "PROFILE" => {
            frame.require(FAMILY_IO, 4)?;
            Ok(Command::SetProfile {
                universe: parse_universe(frame.token(2))?,
                profile: frame.token(3).to_string(),
            })
        }
        "AUDIOIN" | "AUDIOOUT" => {
            let direction = if sub == "AUDIOIN" {
                AudioDirection::Input
            } else {
                AudioDirection::Output
            };
            let device = match frame.token(2) {
                DEFAULT_AUDIO_DEVICE => None,
                name => Some(name.to_string()),
            };
            Ok(Command::SetAudioDevice { direction, device })
        }
        other => Err(FrameError::unknown_command(FAMILY_IO, other)),
    }
}

fn parse_sys(frame: &CommandFrame) -> Result<Command, FrameError> {
    frame.require(FAMILY_SYS, 2)?;

    match frame.token(1) {
        "NETWORK" => {
            frame.require(FAMILY_SYS, 4)?;
            let interface = frame.token(2).to_string();
            if interface.is_empty() {
                return Err(FrameError::malformed(FAMILY_SYS, "empty interface name"));
            }
            let mode = match frame.token(3) {
                "static" => {
                    frame.require(FAMILY_SYS, 7)?;
                    let mode = AddressMode::Static {
                        address: frame.token(4).trim().to_string(),
                        netmask: frame.token(5).trim().to_string(),
                        gateway: frame.token(6).trim().to_string(),
                    };
                    if !mode.is_complete() {
                        return Err(FrameError::malformed(
                            FAMILY_SYS,
                            format!("static {} needs address, netmask and gateway", interface),
                        ));
                    }
                    mode
                }
                "dhcp" => AddressMode::Dhcp,
                other => {
                    return Err(FrameError::malformed(
                        FAMILY_SYS,
                        format!("unknown address mode: {}", other),
                    ))
                }
            };
            Ok(Command::ConfigureNetwork { interface, mode })
        }
        "AUTOSTART" => {
            frame.require(FAMILY_SYS, 3)?;
            match frame.token(2) {
                "none" => Ok(Command::Autostart(AutostartChoice::None)),
                "current" => Ok(Command::Autostart(AutostartChoice::Current)),
                other => Err(FrameError::malformed(
                    FAMILY_SYS,
                    format!("unknown autostart choice: {}", other),
                )),
            }
        }
        "REBOOT" => Ok(Command::Reboot),
        other => Err(FrameError::unknown_command(FAMILY_SYS, other)),
    }
}

fn parse_universe(token: &str) -> Result<u32, FrameError> {
    token
        .trim()
        .parse::<u32>()
        .map_err(|_| FrameError::malformed(FAMILY_IO, format!("invalid universe: {}", token)))
}

/// Plugin line index. Negative values select "no line".
fn parse_line(token: &str) -> Result<u32, FrameError> {
    let value = token
        .trim()
        .parse::<i64>()
        .map_err(|_| FrameError::malformed(FAMILY_IO, format!("invalid line: {}", token)))?;
    if value < 0 {
        return Ok(INVALID_LINE);
    }
    u32::try_from(value)
        .map_err(|_| FrameError::malformed(FAMILY_IO, format!("line out of range: {}", token)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_op_mode() {
        assert_eq!(
            "QLC+CMD|opMode".parse::<Command>(),
            Ok(Command::ToggleOperatingMode)
        );
        assert!(matches!(
            "QLC+CMD".parse::<Command>(),
            Err(FrameError::Malformed { .. })
        ));
        assert!(matches!(
            "QLC+CMD|fly".parse::<Command>(),
            Err(FrameError::UnknownCommand { .. })
        ));
    }

    #[test]
    fn test_parse_input_patch() {
        let cmd: Command = "QLC+IO|INPUT|3|midi|2".parse().unwrap();
        assert_eq!(
            cmd,
            Command::SetPatch {
                kind: PatchKind::Input,
                universe: 3,
                plugin: "midi".into(),
                line: 2,
            }
        );
    }

    #[test]
    fn test_parse_patch_none_line() {
        let cmd: Command = "QLC+IO|OUTPUT|0|None|-1".parse().unwrap();
        assert!(matches!(
            cmd,
            Command::SetPatch {
                kind: PatchKind::Output,
                line: INVALID_LINE,
                ..
            }
        ));
    }

    #[test]
    fn test_io_patch_requires_all_tokens() {
        // Plugin and line tokens are required, not just the universe
        let err = "QLC+IO|INPUT|3".parse::<Command>().unwrap_err();
        assert!(matches!(err, FrameError::Malformed { .. }));
        let err = "QLC+IO|FB|x|dmx|1".parse::<Command>().unwrap_err();
        assert!(matches!(err, FrameError::Malformed { .. }));
    }

    #[test]
    fn test_parse_audio_device() {
        assert_eq!(
            "QLC+IO|AUDIOIN|__qlcplusdefault__".parse::<Command>(),
            Ok(Command::SetAudioDevice {
                direction: AudioDirection::Input,
                device: None,
            })
        );
        assert_eq!(
            "QLC+IO|AUDIOOUT|hw:1,0".parse::<Command>(),
            Ok(Command::SetAudioDevice {
                direction: AudioDirection::Output,
                device: Some("hw:1,0".into()),
            })
        );
    }

    #[test]
    fn test_parse_unknown_io() {
        assert!(matches!(
            "QLC+IO|MIDI|1".parse::<Command>(),
            Err(FrameError::UnknownCommand { .. })
        ));
    }

    #[test]
    fn test_parse_network() {
        let cmd: Command = "QLC+SYS|NETWORK|eth1|static|10.0.0.5|255.255.255.0|10.0.0.1"
            .parse()
            .unwrap();
        assert_eq!(
            cmd,
            Command::ConfigureNetwork {
                interface: "eth1".into(),
                mode: AddressMode::Static {
                    address: "10.0.0.5".into(),
                    netmask: "255.255.255.0".into(),
                    gateway: "10.0.0.1".into(),
                },
            }
        );

        let cmd: Command = "QLC+SYS|NETWORK|eth0|dhcp|||".parse().unwrap();
        assert_eq!(
            cmd,
            Command::ConfigureNetwork {
                interface: "eth0".into(),
                mode: AddressMode::Dhcp,
            }
        );
    }

    #[test]
    fn test_parse_network_incomplete_static() {
        let err = "QLC+SYS|NETWORK|eth0|static|10.0.0.5||10.0.0.1"
            .parse::<Command>()
            .unwrap_err();
        assert!(matches!(err, FrameError::Malformed { .. }));
        assert!("QLC+SYS|NETWORK|eth0|static".parse::<Command>().is_err());
    }

    #[test]
    fn test_parse_autostart_and_reboot() {
        assert_eq!(
            "QLC+SYS|AUTOSTART|none".parse::<Command>(),
            Ok(Command::Autostart(AutostartChoice::None))
        );
        assert_eq!(
            "QLC+SYS|AUTOSTART|current".parse::<Command>(),
            Ok(Command::Autostart(AutostartChoice::Current))
        );
        assert!("QLC+SYS|AUTOSTART".parse::<Command>().is_err());
        assert_eq!("QLC+SYS|REBOOT".parse::<Command>(), Ok(Command::Reboot));
        assert!("QLC+SYS".parse::<Command>().is_err());
    }

    #[test]
    fn test_parse_poll_and_garbage() {
        assert_eq!("POLL".parse::<Command>(), Ok(Command::Poll));
        assert_eq!("".parse::<Command>(), Err(FrameError::Empty));
        assert!(matches!(
            "HELLO|1".parse::<Command>(),
            Err(FrameError::UnknownCommand { .. })
        ));
    }

    #[test]
    fn test_widget_value_truncates() {
        let Command::Widget(cmd) = "12|300".parse::<Command>().unwrap() else {
            panic!("expected widget command");
        };
        assert_eq!(cmd.id, WidgetId(12));
        assert_eq!(cmd.value(), 44);

        let Command::Widget(cmd) = "12|-1".parse::<Command>().unwrap() else {
            panic!("expected widget command");
        };
        assert_eq!(cmd.value(), 255);

        let Command::Widget(cmd) = "12".parse::<Command>().unwrap() else {
            panic!("expected widget command");
        };
        assert_eq!(cmd.value(), 0);
        assert_eq!(cmd.byte(), None);

        let Command::Widget(cmd) = "12|STEP|4".parse::<Command>().unwrap() else {
            panic!("expected widget command");
        };
        assert_eq!(cmd.byte(), None);
    }

    #[test]
    fn test_cue_verbs() {
        let cmd = WidgetCommand {
            id: WidgetId(5),
            args: vec!["STEP".into(), "4".into()],
        };
        assert_eq!(cmd.cue_verb(), Ok(Some(CueVerb::Step(4))));

        let cmd = WidgetCommand {
            id: WidgetId(5),
            args: vec!["PREV".into()],
        };
        assert_eq!(cmd.cue_verb(), Ok(Some(CueVerb::Previous)));

        let cmd = WidgetCommand {
            id: WidgetId(5),
            args: vec!["STEP".into()],
        };
        assert!(cmd.cue_verb().is_err());

        let cmd = WidgetCommand {
            id: WidgetId(5),
            args: vec!["JUMP".into()],
        };
        assert_eq!(cmd.cue_verb(), Ok(None));
    }

    #[test]
    fn test_frame_display() {
        let frame = CommandFrame::new("QLC+IO|PROFILE|1|Generic");
        assert_eq!(frame.len(), 4);
        assert_eq!(frame.family(), "QLC+IO");
        assert_eq!(frame.to_string(), "QLC+IO|PROFILE|1|Generic");
    }
}
