//! Ports connecting the gateway to its host application.

pub mod outbound;

pub use outbound::{
    AudioDeviceInfo, AudioSettings, ConsoleControl, FixtureStore, HostPorts, InputPatch,
    IoPatchMap, OutputPatch, WidgetTree,
};
