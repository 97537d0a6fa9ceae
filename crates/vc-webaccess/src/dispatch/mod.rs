//! Inbound command dispatch.
//!
//! Every text frame received on the push channel lands here. The dispatcher
//! parses it, routes it to the widget tree, the I/O patch map, the audio
//! settings or the system configuration, and reports what happened as an
//! [`Effect`]. Nothing is ever sent back to the browser on failure.

use crate::domain::command::{
    AudioDirection, AutostartChoice, Command, CommandFrame, CueVerb, PatchKind, WidgetCommand,
};
use crate::domain::config::{AutostartPolicy, SystemConfig};
use crate::domain::error::{FrameError, NetworkConfigError};
use crate::domain::event::PushEvent;
use crate::domain::interface::AddressMode;
use crate::domain::widget::{WidgetId, WidgetKind};
use crate::network::NetworkConfigStore;
use crate::ports::HostPorts;
use crate::ws::channel::PushChannel;
use std::io;
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

/// Alert pushed after the autostart project changed
pub const AUTOSTART_CHANGED: &str = "Autostart configuration changed";
/// Alert pushed when the autostart policy refuses to replace a project
pub const AUTOSTART_KEPT: &str = "Autostart project already exists, keeping it";

/// Outcome of one inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// A widget mutation entry point was invoked
    WidgetMutated(WidgetId),
    /// I/O, audio, network, autostart or host state changed
    ConfigMutated,
    /// Accepted with nothing to do (poll, unknown widget, unknown command)
    NoOp,
    /// Dropped: too few tokens or an unparsable field
    Malformed(FrameError),
}

/// Routes inbound frames to the host.
pub struct CommandDispatcher {
    ports: HostPorts,
    channel: Arc<PushChannel>,
    network: Arc<NetworkConfigStore>,
    system: SystemConfig,
}

impl CommandDispatcher {
    pub fn new(
        ports: HostPorts,
        channel: Arc<PushChannel>,
        network: Arc<NetworkConfigStore>,
        system: SystemConfig,
    ) -> Self {
        Self {
            ports,
            channel,
            network,
            system,
        }
    }

    /// Handle one raw text frame
    pub fn handle(&self, text: &str) -> Effect {
        let frame = CommandFrame::new(text);
        match Command::parse(&frame) {
            Ok(command) => self.execute(command),
            Err(e @ FrameError::UnknownCommand { .. }) => {
                warn!(frame = %text, error = %e, "Command not supported");
                Effect::NoOp
            }
            Err(e) => {
                warn!(frame = %text, error = %e, "Dropping malformed frame");
                Effect::Malformed(e)
            }
        }
    }

    /// Apply a parsed command
    pub fn execute(&self, command: Command) -> Effect {
        match command {
            Command::ToggleOperatingMode => {
                info!("Toggling operating mode");
                self.ports.console.toggle_operating_mode();
                Effect::ConfigMutated
            }
            Command::SetPatch {
                kind,
                universe,
                plugin,
                line,
            } => self.set_patch(kind, universe, &plugin, line),
            Command::SetProfile { universe, profile } => self.set_profile(universe, &profile),
            Command::SetAudioDevice { direction, device } => {
                self.set_audio_device(direction, device)
            }
            Command::ConfigureNetwork { interface, mode } => {
                self.configure_network(&interface, mode)
            }
            Command::Autostart(choice) => self.autostart(choice),
            Command::Reboot => {
                warn!("Reboot requested from web access");
                self.ports.console.reboot();
                Effect::ConfigMutated
            }
            Command::Poll => {
                trace!("Poll");
                Effect::NoOp
            }
            Command::Widget(cmd) => self.widget(cmd),
        }
    }

    fn set_patch(&self, kind: PatchKind, universe: u32, plugin: &str, line: u32) -> Effect {
        let io = &self.ports.io;
        let result = match kind {
            PatchKind::Input => io.set_input_patch(universe, plugin, line, None),
            PatchKind::Output => io.set_output_patch(universe, plugin, line, false),
            PatchKind::Feedback => io.set_output_patch(universe, plugin, line, true),
        };

        match result {
            Ok(()) => {
                io.save_defaults();
                info!(?kind, universe, plugin = %plugin, line, "Patch updated");
                Effect::ConfigMutated
            }
            Err(e) => {
                warn!(?kind, universe, plugin = %plugin, error = %e, "Patch rejected");
                Effect::NoOp
            }
        }
    }

    /// Rebind the profile of an existing input patch, keeping plugin and line
    fn set_profile(&self, universe: u32, profile: &str) -> Effect {
        let io = &self.ports.io;
        let Some(patch) = io.input_patch(universe) else {
            debug!(universe, "No input patch to set a profile on");
            return Effect::NoOp;
        };

        match io.set_input_patch(universe, &patch.plugin, patch.input, Some(profile)) {
            Ok(()) => {
                io.save_defaults();
                info!(universe, profile = %profile, "Input profile updated");
                Effect::ConfigMutated
            }
            Err(e) => {
                warn!(universe, profile = %profile, error = %e, "Profile rejected");
                Effect::NoOp
            }
        }
    }

    fn set_audio_device(&self, direction: AudioDirection, device: Option<String>) -> Effect {
        let audio = &self.ports.audio;
        info!(?direction, device = ?device, "Audio device preference changed");
        match direction {
            AudioDirection::Input => {
                audio.set_input_device(device);
                audio.recreate_capture();
            }
            AudioDirection::Output => audio.set_output_device(device),
        }
        Effect::ConfigMutated
    }

    fn configure_network(&self, interface: &str, mode: AddressMode) -> Effect {
        match self.network.update(interface, mode) {
            Ok(()) => Effect::ConfigMutated,
            Err(NetworkConfigError::UnknownInterface(name)) => {
                warn!(interface = %name, "Network change for unknown interface ignored");
                Effect::NoOp
            }
            Err(e) => {
                error!(interface = %interface, error = %e, "Error writing network configuration file");
                Effect::NoOp
            }
        }
    }

    fn autostart(&self, choice: AutostartChoice) -> Effect {
        let path = &self.system.autostart_file;
        match choice {
            AutostartChoice::None => match std::fs::remove_file(path) {
                Ok(()) => info!(path = %path.display(), "Autostart project removed"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!(path = %path.display(), "No autostart project to remove")
                }
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Cannot remove autostart project");
                    return Effect::NoOp;
                }
            },
            AutostartChoice::Current => {
                if self.system.autostart_policy == AutostartPolicy::KeepExisting && path.exists() {
                    info!(path = %path.display(), "Keeping existing autostart project");
                    self.channel.notify(&PushEvent::Alert(AUTOSTART_KEPT.to_string()));
                    return Effect::NoOp;
                }
                if let Err(e) = self.ports.console.store_autostart_project(path) {
                    error!(path = %path.display(), error = %e, "Cannot store autostart project");
                    return Effect::NoOp;
                }
                info!(path = %path.display(), "Current project stored for autostart");
            }
        }

        self.channel
            .notify(&PushEvent::Alert(AUTOSTART_CHANGED.to_string()));
        Effect::ConfigMutated
    }

    fn widget(&self, cmd: WidgetCommand) -> Effect {
        let id = cmd.id;
        let Some(widget) = self.ports.tree.widget(id) else {
            debug!(widget_id = %id, "{}", FrameError::UnknownWidget(id));
            return Effect::NoOp;
        };
        let console = &self.ports.console;

        match widget.kind {
            WidgetKind::Button { .. } => console.press_button(id),
            WidgetKind::Slider { .. } => {
                // A bare id moves the slider to zero
                let value = if cmd.args.is_empty() { Some(0) } else { cmd.byte() };
                let Some(value) = value else {
                    debug!(widget_id = %id, args = ?cmd.args, "Slider frame with a non-numeric value");
                    return Effect::NoOp;
                };
                console.set_slider_value(id, value);
            }
            WidgetKind::AudioTriggers => console.set_audio_triggers_enabled(id, cmd.value() != 0),
            WidgetKind::CueList { .. } => match cmd.cue_verb() {
                Ok(Some(CueVerb::Play)) => console.cue_playback(id),
                Ok(Some(CueVerb::Previous)) => console.cue_previous(id),
                Ok(Some(CueVerb::Next)) => console.cue_next(id),
                Ok(Some(CueVerb::Step(index))) => console.cue_play_at(id, index),
                Ok(None) => {
                    debug!(widget_id = %id, args = ?cmd.args, "Unknown cue list command");
                    return Effect::NoOp;
                }
                Err(e) => {
                    warn!(widget_id = %id, error = %e, "Dropping malformed cue list frame");
                    return Effect::Malformed(e);
                }
            },
            WidgetKind::Frame { .. }
            | WidgetKind::SoloFrame { .. }
            | WidgetKind::Label
            | WidgetKind::Generic => {
                trace!(widget_id = %id, kind = ?widget.tag(), "Widget takes no commands");
                return Effect::NoOp;
            }
        }

        debug!(widget_id = %id, args = ?cmd.args, "Widget command applied");
        Effect::WidgetMutated(id)
    }
}
