//! In-memory host implementing every outbound port.
//!
//! Backs the demo binary and the test suites. Mutations are applied to a
//! plain widget table, recorded in an action log, and reported back through
//! an attached [`EventSink`] the way a real host would signal them.

use crate::domain::chaser::{Chaser, ChaserStep, FunctionId, SpeedMode, INFINITE_SPEED};
use crate::domain::command::INVALID_LINE;
use crate::domain::error::HostError;
use crate::domain::event::HostEvent;
use crate::domain::widget::{Color, Geometry, Widget, WidgetId, WidgetKind};
use crate::ports::{
    AudioDeviceInfo, AudioSettings, ConsoleControl, FixtureStore, InputPatch, IoPatchMap,
    OutputPatch, WidgetTree,
};
use crate::ws::subscriptions::EventSink;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Id of the console root container
pub const ROOT_ID: WidgetId = WidgetId(1);

const DEFAULT_UNIVERSES: u32 = 4;
const NO_PROFILE: &str = "None";
const NO_PLUGIN: &str = "None";

/// Host-side effect recorded by [`InMemoryConsole`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleAction {
    ToggleOperatingMode,
    PressButton(WidgetId),
    SetSlider(WidgetId, u8),
    SetAudioTriggers(WidgetId, bool),
    CuePlayback(WidgetId),
    CuePrevious(WidgetId),
    CueNext(WidgetId),
    CuePlayAt(WidgetId, usize),
    LoadProject(String),
    StoreAutostart(PathBuf),
    Reboot,
    SaveDefaults,
    RecreateCapture,
    StoreFixture(String),
}

#[derive(Debug, Clone)]
struct Plugin {
    name: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
    feedback: bool,
}

#[derive(Default)]
struct State {
    root: Option<WidgetId>,
    order: Vec<WidgetId>,
    widgets: HashMap<WidgetId, Widget>,
    functions: HashMap<FunctionId, String>,
    design_mode: bool,
    project: Option<String>,

    universes: u32,
    plugins: Vec<Plugin>,
    profiles: Vec<String>,
    input_patches: HashMap<u32, InputPatch>,
    output_patches: HashMap<u32, OutputPatch>,
    feedback_patches: HashMap<u32, OutputPatch>,

    audio_devices: Vec<AudioDeviceInfo>,
    audio_input: Option<String>,
    audio_output: Option<String>,

    user_definitions: Option<Vec<String>>,
    fixture_xml: HashMap<String, String>,

    actions: Vec<ConsoleAction>,
}

impl State {
    /// Whether `ancestor` is on `id`'s parent chain
    fn descends_from(&self, id: WidgetId, ancestor: WidgetId) -> bool {
        let mut current = self.widgets.get(&id).and_then(|w| w.parent);
        // Bounded walk; a corrupt parent cycle must not hang a render
        for _ in 0..=self.order.len() {
            match current {
                Some(parent) if parent == ancestor => return true,
                Some(parent) => current = self.widgets.get(&parent).and_then(|w| w.parent),
                None => return false,
            }
        }
        false
    }
}

/// Virtual console, I/O map, audio settings and fixture cache in one struct.
pub struct InMemoryConsole {
    state: Mutex<State>,
    events: Mutex<Option<EventSink>>,
}

impl InMemoryConsole {
    /// Empty console: a bare 1024x768 root container, four universes
    pub fn new() -> Self {
        let root = Widget::new(
            ROOT_ID,
            WidgetKind::Frame {
                header_visible: false,
            },
        )
        .with_geometry(Geometry::new(0, 0, 1024, 768))
        .with_colors(Color::rgb(0, 0, 0), Color::rgb(0x33, 0x33, 0x33));

        let mut state = State {
            root: Some(ROOT_ID),
            universes: DEFAULT_UNIVERSES,
            user_definitions: Some(Vec::new()),
            ..Default::default()
        };
        state.order.push(ROOT_ID);
        state.widgets.insert(ROOT_ID, root);

        Self {
            state: Mutex::new(state),
            events: Mutex::new(None),
        }
    }

    /// Console with a few widgets of every kind, used by the binary
    pub fn demo() -> Self {
        let console = Self::new();
        let grey = Color::rgb(0xd6, 0xd2, 0xd0);
        let white = Color::rgb(0xff, 0xff, 0xff);

        console.insert_widget(
            Widget::new(
                2,
                WidgetKind::Frame {
                    header_visible: true,
                },
            )
            .with_parent(ROOT_ID)
            .with_geometry(Geometry::new(10, 10, 420, 300))
            .with_colors(white, Color::rgb(0x44, 0x44, 0x44))
            .with_caption("Stage"),
        );
        for (i, caption) in ["Blackout", "Strobe", "Haze"].into_iter().enumerate() {
            console.insert_widget(
                Widget::new(10 + i as u32, WidgetKind::Button { on: false })
                    .with_parent(2)
                    .with_geometry(Geometry::new(10 + 70 * i as i32, 45, 60, 60))
                    .with_colors(Color::rgb(0, 0, 0), grey)
                    .with_caption(caption),
            );
        }
        for (i, caption) in ["Front", "Back"].into_iter().enumerate() {
            console.insert_widget(
                Widget::new(20 + i as u32, WidgetKind::Slider { value: 0 })
                    .with_parent(2)
                    .with_geometry(Geometry::new(230 + 70 * i as i32, 45, 60, 240))
                    .with_colors(Color::rgb(0, 0, 0), grey)
                    .with_caption(caption),
            );
        }
        console.insert_widget(
            Widget::new(30, WidgetKind::Label)
                .with_parent(ROOT_ID)
                .with_geometry(Geometry::new(450, 10, 200, 30))
                .with_colors(white, Color::rgb(0x22, 0x22, 0x22))
                .with_caption("Main show"),
        );
        console.insert_widget(
            Widget::new(
                31,
                WidgetKind::SoloFrame {
                    header_visible: true,
                },
            )
            .with_parent(ROOT_ID)
            .with_geometry(Geometry::new(450, 50, 200, 120))
            .with_colors(white, Color::rgb(0x44, 0x44, 0x44))
            .with_caption("Looks"),
        );
        console.insert_widget(
            Widget::new(32, WidgetKind::Button { on: true })
                .with_parent(31)
                .with_geometry(Geometry::new(10, 45, 60, 60))
                .with_colors(Color::rgb(0, 0, 0), grey)
                .with_caption("Warm"),
        );
        console.insert_widget(
            Widget::new(40, WidgetKind::AudioTriggers)
                .with_parent(ROOT_ID)
                .with_geometry(Geometry::new(450, 180, 200, 130))
                .with_colors(white, Color::rgb(0x33, 0x55, 0x33))
                .with_caption("Audio"),
        );

        console.insert_function(100, "Intro");
        console.insert_function(101, "Verse");
        console.insert_function(102, "Chorus");
        let mut chaser = Chaser::new(vec![
            ChaserStep::new(100).with_timings(0, 0, 4000).with_note("house out"),
            ChaserStep::new(101).with_timings(1500, 500, 32_000),
            ChaserStep::new(102).with_timings(500, 500, INFINITE_SPEED),
        ]);
        chaser.fade_in_mode = SpeedMode::PerStep;
        chaser.fade_out_mode = SpeedMode::Common;
        chaser.fade_out = 1000;
        chaser.duration_mode = SpeedMode::PerStep;
        console.insert_widget(
            Widget::new(
                50,
                WidgetKind::CueList {
                    chaser: Some(chaser),
                },
            )
            .with_parent(ROOT_ID)
            .with_geometry(Geometry::new(10, 320, 640, 260))
            .with_colors(Color::rgb(0, 0, 0), grey),
        );
        console.insert_widget(
            Widget::new(60, WidgetKind::Generic)
                .with_parent(ROOT_ID)
                .with_geometry(Geometry::new(670, 10, 150, 150))
                .with_colors(Color::rgb(0, 0, 0), grey),
        );

        console.add_plugin("MIDI", &["USB MIDI In"], &["USB MIDI Out"], true);
        console.add_plugin("ArtNet", &["127.0.0.1"], &["127.0.0.1", "192.168.0.255"], false);
        console.add_profile("Generic MIDI");
        console.add_audio_device(AudioDeviceInfo {
            device_name: "Built-in Audio".into(),
            private_name: "default:0".into(),
            input: true,
            output: true,
        });
        console.set_user_definitions(Some(vec!["Generic-Par.qxf".into()]));
        console
    }

    /// Route state-change notifications into `sink`
    pub fn attach_events(&self, sink: EventSink) {
        *self.events.lock() = Some(sink);
    }

    fn emit(&self, event: HostEvent) {
        let sink = self.events.lock().clone();
        if let Some(sink) = sink {
            sink.post(event);
        }
    }

    fn record(&self, action: ConsoleAction) {
        debug!(?action, "Console action");
        self.state.lock().actions.push(action);
    }

    /// Add or replace a widget; new widgets go last in tree order
    pub fn insert_widget(&self, widget: Widget) {
        let mut state = self.state.lock();
        if !state.widgets.contains_key(&widget.id) {
            state.order.push(widget.id);
        }
        state.widgets.insert(widget.id, widget);
    }

    pub fn remove_widget(&self, id: WidgetId) -> Option<Widget> {
        let mut state = self.state.lock();
        state.order.retain(|w| *w != id);
        state.widgets.remove(&id)
    }

    pub fn insert_function(&self, id: FunctionId, name: &str) {
        self.state.lock().functions.insert(id, name.to_string());
    }

    pub fn remove_function(&self, id: FunctionId) {
        self.state.lock().functions.remove(&id);
    }

    /// Drop the console root, as if no project were loaded
    pub fn unload(&self) {
        self.state.lock().root = None;
    }

    pub fn set_universes(&self, count: u32) {
        self.state.lock().universes = count;
    }

    pub fn add_plugin(&self, name: &str, inputs: &[&str], outputs: &[&str], feedback: bool) {
        self.state.lock().plugins.push(Plugin {
            name: name.to_string(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
            feedback,
        });
    }

    pub fn add_profile(&self, name: &str) {
        self.state.lock().profiles.push(name.to_string());
    }

    pub fn add_audio_device(&self, device: AudioDeviceInfo) {
        self.state.lock().audio_devices.push(device);
    }

    /// `None` makes the user definition directory unreadable
    pub fn set_user_definitions(&self, files: Option<Vec<String>>) {
        self.state.lock().user_definitions = files;
    }

    pub fn fixture_definition(&self, file_name: &str) -> Option<String> {
        self.state.lock().fixture_xml.get(file_name).cloned()
    }

    pub fn is_design_mode(&self) -> bool {
        self.state.lock().design_mode
    }

    /// XML of the last loaded project
    pub fn project(&self) -> Option<String> {
        self.state.lock().project.clone()
    }

    /// Every action applied so far, oldest first
    pub fn actions(&self) -> Vec<ConsoleAction> {
        self.state.lock().actions.clone()
    }
}

impl Default for InMemoryConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetTree for InMemoryConsole {
    fn root(&self) -> Option<Widget> {
        let state = self.state.lock();
        state.root.and_then(|id| state.widgets.get(&id).cloned())
    }

    fn widget(&self, id: WidgetId) -> Option<Widget> {
        self.state.lock().widgets.get(&id).cloned()
    }

    /// All descendants, like a recursive child search
    fn children(&self, id: WidgetId) -> Vec<WidgetId> {
        let state = self.state.lock();
        state
            .order
            .iter()
            .copied()
            .filter(|w| state.descends_from(*w, id))
            .collect()
    }

    fn function_name(&self, id: FunctionId) -> Option<String> {
        self.state.lock().functions.get(&id).cloned()
    }
}

impl ConsoleControl for InMemoryConsole {
    fn toggle_operating_mode(&self) {
        {
            let mut state = self.state.lock();
            state.design_mode = !state.design_mode;
        }
        self.record(ConsoleAction::ToggleOperatingMode);
    }

    fn press_button(&self, id: WidgetId) {
        let toggled = {
            let mut state = self.state.lock();
            match state.widgets.get_mut(&id).map(|w| &mut w.kind) {
                Some(WidgetKind::Button { on }) => {
                    *on = !*on;
                    Some(*on)
                }
                _ => None,
            }
        };
        self.record(ConsoleAction::PressButton(id));
        if let Some(on) = toggled {
            self.emit(HostEvent::ButtonToggled { id, on });
        }
    }

    fn set_slider_value(&self, id: WidgetId, value: u8) {
        let changed = {
            let mut state = self.state.lock();
            match state.widgets.get_mut(&id).map(|w| &mut w.kind) {
                Some(WidgetKind::Slider { value: current }) => {
                    *current = value;
                    true
                }
                _ => false,
            }
        };
        self.record(ConsoleAction::SetSlider(id, value));
        if changed {
            self.emit(HostEvent::SliderChanged { id, value });
        }
    }

    fn set_audio_triggers_enabled(&self, id: WidgetId, enabled: bool) {
        self.record(ConsoleAction::SetAudioTriggers(id, enabled));
    }

    fn cue_playback(&self, id: WidgetId) {
        self.record(ConsoleAction::CuePlayback(id));
    }

    fn cue_previous(&self, id: WidgetId) {
        self.record(ConsoleAction::CuePrevious(id));
    }

    fn cue_next(&self, id: WidgetId) {
        self.record(ConsoleAction::CueNext(id));
    }

    fn cue_play_at(&self, id: WidgetId, index: usize) {
        self.record(ConsoleAction::CuePlayAt(id, index));
        if let Ok(index) = i32::try_from(index) {
            self.emit(HostEvent::CueIndexChanged { id, index });
        }
    }

    fn load_project(&self, xml: String) {
        info!(bytes = xml.len(), "Loading project");
        self.state.lock().project = Some(xml.clone());
        self.record(ConsoleAction::LoadProject(xml));
        self.emit(HostEvent::ConsoleLoaded);
    }

    fn store_autostart_project(&self, path: &Path) -> Result<(), HostError> {
        let xml = self
            .project()
            .unwrap_or_else(|| "<?xml version=\"1.0\"?>\n<Workspace/>\n".to_string());

        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| HostError::Unavailable(e.to_string()))?;
        }
        std::fs::write(path, xml).map_err(|e| HostError::Unavailable(e.to_string()))?;

        self.record(ConsoleAction::StoreAutostart(path.to_path_buf()));
        Ok(())
    }

    fn reboot(&self) {
        self.record(ConsoleAction::Reboot);
    }
}

impl IoPatchMap for InMemoryConsole {
    fn universes(&self) -> u32 {
        self.state.lock().universes
    }

    fn universe_name(&self, universe: u32) -> String {
        format!("Universe {}", universe + 1)
    }

    fn input_plugin_names(&self) -> Vec<String> {
        let state = self.state.lock();
        state
            .plugins
            .iter()
            .filter(|p| !p.inputs.is_empty())
            .map(|p| p.name.clone())
            .collect()
    }

    fn output_plugin_names(&self) -> Vec<String> {
        let state = self.state.lock();
        state
            .plugins
            .iter()
            .filter(|p| !p.outputs.is_empty())
            .map(|p| p.name.clone())
            .collect()
    }

    fn plugin_inputs(&self, plugin: &str) -> Vec<String> {
        let state = self.state.lock();
        state
            .plugins
            .iter()
            .find(|p| p.name == plugin)
            .map(|p| p.inputs.clone())
            .unwrap_or_default()
    }

    fn plugin_outputs(&self, plugin: &str) -> Vec<String> {
        let state = self.state.lock();
        state
            .plugins
            .iter()
            .find(|p| p.name == plugin)
            .map(|p| p.outputs.clone())
            .unwrap_or_default()
    }

    fn plugin_supports_feedback(&self, plugin: &str) -> bool {
        let state = self.state.lock();
        state.plugins.iter().any(|p| p.name == plugin && p.feedback)
    }

    fn profile_names(&self) -> Vec<String> {
        self.state.lock().profiles.clone()
    }

    fn input_patch(&self, universe: u32) -> Option<InputPatch> {
        self.state.lock().input_patches.get(&universe).cloned()
    }

    fn output_patch(&self, universe: u32) -> Option<OutputPatch> {
        self.state.lock().output_patches.get(&universe).cloned()
    }

    fn feedback_patch(&self, universe: u32) -> Option<OutputPatch> {
        self.state.lock().feedback_patches.get(&universe).cloned()
    }

    fn set_input_patch(
        &self,
        universe: u32,
        plugin: &str,
        input: u32,
        profile: Option<&str>,
    ) -> Result<(), HostError> {
        let mut state = self.state.lock();
        if universe >= state.universes {
            return Err(HostError::Rejected(format!("no universe {}", universe)));
        }

        if plugin == NO_PLUGIN || input == INVALID_LINE {
            state.input_patches.remove(&universe);
            return Ok(());
        }
        state.input_patches.insert(
            universe,
            InputPatch {
                plugin: plugin.to_string(),
                input,
                profile: profile.unwrap_or(NO_PROFILE).to_string(),
            },
        );
        Ok(())
    }

    fn set_output_patch(
        &self,
        universe: u32,
        plugin: &str,
        output: u32,
        feedback: bool,
    ) -> Result<(), HostError> {
        let mut state = self.state.lock();
        if universe >= state.universes {
            return Err(HostError::Rejected(format!("no universe {}", universe)));
        }

        let patches = if feedback {
            &mut state.feedback_patches
        } else {
            &mut state.output_patches
        };
        if plugin == NO_PLUGIN || output == INVALID_LINE {
            patches.remove(&universe);
        } else {
            patches.insert(
                universe,
                OutputPatch {
                    plugin: plugin.to_string(),
                    output,
                },
            );
        }
        Ok(())
    }

    fn save_defaults(&self) {
        self.record(ConsoleAction::SaveDefaults);
    }
}

impl AudioSettings for InMemoryConsole {
    fn devices(&self) -> Vec<AudioDeviceInfo> {
        self.state.lock().audio_devices.clone()
    }

    fn input_device(&self) -> Option<String> {
        self.state.lock().audio_input.clone()
    }

    fn output_device(&self) -> Option<String> {
        self.state.lock().audio_output.clone()
    }

    fn set_input_device(&self, device: Option<String>) {
        self.state.lock().audio_input = device;
    }

    fn set_output_device(&self, device: Option<String>) {
        self.state.lock().audio_output = device;
    }

    fn recreate_capture(&self) {
        self.record(ConsoleAction::RecreateCapture);
    }
}

impl FixtureStore for InMemoryConsole {
    fn store_definition(&self, file_name: &str, xml: &str) -> Result<(), HostError> {
        if file_name.is_empty() {
            return Err(HostError::Rejected("empty fixture file name".into()));
        }
        {
            let mut state = self.state.lock();
            state
                .fixture_xml
                .insert(file_name.to_string(), xml.to_string());
            if let Some(files) = state.user_definitions.as_mut() {
                if !files.iter().any(|f| f == file_name) {
                    files.push(file_name.to_string());
                }
            }
        }
        self.record(ConsoleAction::StoreFixture(file_name.to_string()));
        Ok(())
    }

    fn user_definitions(&self) -> Option<Vec<String>> {
        self.state.lock().user_definitions.clone()
    }
}
