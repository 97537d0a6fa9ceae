//! Outbound ports: the narrow host interfaces the gateway depends on.
//!
//! The host application implements these. Every call may run on a server
//! worker thread, concurrently with the host's own threads.

use crate::domain::chaser::FunctionId;
use crate::domain::error::HostError;
use crate::domain::widget::{Widget, WidgetId};
use std::path::Path;
use std::sync::Arc;

/// Read access to the virtual console tree.
pub trait WidgetTree: Send + Sync {
    /// The console's root container, if a console is loaded
    fn root(&self) -> Option<Widget>;

    /// Snapshot of a widget; `None` once it has been deleted
    fn widget(&self, id: WidgetId) -> Option<Widget>;

    /// Widgets below `id`, in display order.
    ///
    /// May return deeper descendants too; the renderer filters on
    /// [`Widget::parent`].
    fn children(&self, id: WidgetId) -> Vec<WidgetId>;

    /// Name of a function, `None` if it no longer exists
    fn function_name(&self, id: FunctionId) -> Option<String>;
}

/// Mutation entry points of the console and the host application.
pub trait ConsoleControl: Send + Sync {
    /// Switch between design and operate mode
    fn toggle_operating_mode(&self);

    fn press_button(&self, id: WidgetId);

    fn set_slider_value(&self, id: WidgetId, value: u8);

    fn set_audio_triggers_enabled(&self, id: WidgetId, enabled: bool);

    fn cue_playback(&self, id: WidgetId);

    fn cue_previous(&self, id: WidgetId);

    fn cue_next(&self, id: WidgetId);

    fn cue_play_at(&self, id: WidgetId, index: usize);

    /// Replace the current project with the given XML document
    fn load_project(&self, xml: String);

    /// Save the current project to `path`
    fn store_autostart_project(&self, path: &Path) -> Result<(), HostError>;

    /// Power-cycle the host machine
    fn reboot(&self);
}

/// Input patch of one universe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPatch {
    pub plugin: String,
    pub input: u32,
    pub profile: String,
}

/// Output or feedback patch of one universe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPatch {
    pub plugin: String,
    pub output: u32,
}

/// Universe I/O patching.
pub trait IoPatchMap: Send + Sync {
    fn universes(&self) -> u32;

    fn universe_name(&self, universe: u32) -> String;

    fn input_plugin_names(&self) -> Vec<String>;

    fn output_plugin_names(&self) -> Vec<String>;

    fn plugin_inputs(&self, plugin: &str) -> Vec<String>;

    fn plugin_outputs(&self, plugin: &str) -> Vec<String>;

    fn plugin_supports_feedback(&self, plugin: &str) -> bool;

    fn profile_names(&self) -> Vec<String>;

    fn input_patch(&self, universe: u32) -> Option<InputPatch>;

    fn output_patch(&self, universe: u32) -> Option<OutputPatch>;

    fn feedback_patch(&self, universe: u32) -> Option<OutputPatch>;

    fn set_input_patch(
        &self,
        universe: u32,
        plugin: &str,
        input: u32,
        profile: Option<&str>,
    ) -> Result<(), HostError>;

    fn set_output_patch(
        &self,
        universe: u32,
        plugin: &str,
        output: u32,
        feedback: bool,
    ) -> Result<(), HostError>;

    /// Persist the current patching as the startup default
    fn save_defaults(&self);
}

/// One audio device as listed by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDeviceInfo {
    pub device_name: String,
    /// Identifier stored in the preferences
    pub private_name: String,
    pub input: bool,
    pub output: bool,
}

/// Persisted audio device preferences.
pub trait AudioSettings: Send + Sync {
    fn devices(&self) -> Vec<AudioDeviceInfo>;

    fn input_device(&self) -> Option<String>;

    fn output_device(&self) -> Option<String>;

    /// `None` restores the system default
    fn set_input_device(&self, device: Option<String>);

    fn set_output_device(&self, device: Option<String>);

    /// Drop the capture stream so the next user reopens it on the new device
    fn recreate_capture(&self);
}

/// User fixture definition cache.
pub trait FixtureStore: Send + Sync {
    fn store_definition(&self, file_name: &str, xml: &str) -> Result<(), HostError>;

    /// File names in the user definition directory, `None` if unreadable
    fn user_definitions(&self) -> Option<Vec<String>>;
}

/// All host ports, handed to the service at construction.
#[derive(Clone)]
pub struct HostPorts {
    pub tree: Arc<dyn WidgetTree>,
    pub console: Arc<dyn ConsoleControl>,
    pub io: Arc<dyn IoPatchMap>,
    pub audio: Arc<dyn AudioSettings>,
    pub fixtures: Arc<dyn FixtureStore>,
}

impl HostPorts {
    /// Build from one host object implementing every port
    pub fn from_host<H>(host: Arc<H>) -> Self
    where
        H: WidgetTree + ConsoleControl + IoPatchMap + AudioSettings + FixtureStore + 'static,
    {
        Self {
            tree: host.clone(),
            console: host.clone(),
            io: host.clone(),
            audio: host.clone(),
            fixtures: host,
        }
    }
}
