//! Error types for the tracer engine front-ends.
//!
//! The core show model has no fatal conditions: out-of-range writes are
//! dropped, degenerate ranges map to their minimum, an empty trail yields
//! `None`. These enums cover the outer layers that talk to real devices —
//! GPU, window, MIDI, audio — where failure is an event worth reporting.

use std::fmt;

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors from the MIDI controller layer.
#[derive(Debug)]
pub enum MidiError {
    /// Failed to initialize the MIDI client.
    Init(midir::InitError),
    /// No MIDI input ports available.
    NoPorts,
    /// Named port not found among the available ports.
    PortNotFound(String),
    /// Failed to open the input connection.
    Connect(String),
}

impl fmt::Display for MidiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MidiError::Init(e) => write!(f, "Failed to initialize MIDI input: {}", e),
            MidiError::NoPorts => write!(f, "No MIDI input ports available"),
            MidiError::PortNotFound(name) => write!(f, "MIDI port '{}' not found", name),
            MidiError::Connect(msg) => write!(f, "Failed to connect MIDI input: {}", msg),
        }
    }
}

impl std::error::Error for MidiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MidiError::Init(e) => Some(e),
            _ => None,
        }
    }
}

impl From<midir::InitError> for MidiError {
    fn from(e: midir::InitError) -> Self {
        MidiError::Init(e)
    }
}

/// Errors from the audio capture layer.
#[derive(Debug)]
pub enum AudioError {
    /// No default input device available.
    NoDevice,
    /// Failed to query the device's default stream config.
    Config(cpal::DefaultStreamConfigError),
    /// Failed to build the input stream.
    BuildStream(cpal::BuildStreamError),
    /// Failed to start the input stream.
    PlayStream(cpal::PlayStreamError),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::NoDevice => write!(f, "No default audio input device available"),
            AudioError::Config(e) => write!(f, "Failed to query audio input config: {}", e),
            AudioError::BuildStream(e) => write!(f, "Failed to build audio input stream: {}", e),
            AudioError::PlayStream(e) => write!(f, "Failed to start audio input stream: {}", e),
        }
    }
}

impl std::error::Error for AudioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AudioError::NoDevice => None,
            AudioError::Config(e) => Some(e),
            AudioError::BuildStream(e) => Some(e),
            AudioError::PlayStream(e) => Some(e),
        }
    }
}

impl From<cpal::DefaultStreamConfigError> for AudioError {
    fn from(e: cpal::DefaultStreamConfigError) -> Self {
        AudioError::Config(e)
    }
}

impl From<cpal::BuildStreamError> for AudioError {
    fn from(e: cpal::BuildStreamError) -> Self {
        AudioError::BuildStream(e)
    }
}

impl From<cpal::PlayStreamError> for AudioError {
    fn from(e: cpal::PlayStreamError) -> Self {
        AudioError::PlayStream(e)
    }
}

/// Errors that can occur when running a show.
#[derive(Debug)]
pub enum RunError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// MIDI controller failed.
    Midi(MidiError),
    /// Audio capture failed.
    Audio(AudioError),
    /// Settings file I/O failed.
    Settings(std::io::Error),
    /// Settings file is not valid JSON.
    SettingsFormat(serde_json::Error),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            RunError::Window(e) => write!(f, "Failed to create window: {}", e),
            RunError::Gpu(e) => write!(f, "GPU error: {}", e),
            RunError::Midi(e) => write!(f, "MIDI error: {}", e),
            RunError::Audio(e) => write!(f, "Audio error: {}", e),
            RunError::Settings(e) => write!(f, "Settings I/O error: {}", e),
            RunError::SettingsFormat(e) => write!(f, "Settings format error: {}", e),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::EventLoop(e) => Some(e),
            RunError::Window(e) => Some(e),
            RunError::Gpu(e) => Some(e),
            RunError::Midi(e) => Some(e),
            RunError::Audio(e) => Some(e),
            RunError::Settings(e) => Some(e),
            RunError::SettingsFormat(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for RunError {
    fn from(e: winit::error::EventLoopError) -> Self {
        RunError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for RunError {
    fn from(e: winit::error::OsError) -> Self {
        RunError::Window(e)
    }
}

impl From<GpuError> for RunError {
    fn from(e: GpuError) -> Self {
        RunError::Gpu(e)
    }
}

impl From<MidiError> for RunError {
    fn from(e: MidiError) -> Self {
        RunError::Midi(e)
    }
}

impl From<AudioError> for RunError {
    fn from(e: AudioError) -> Self {
        RunError::Audio(e)
    }
}

impl From<std::io::Error> for RunError {
    fn from(e: std::io::Error) -> Self {
        RunError::Settings(e)
    }
}

impl From<serde_json::Error> for RunError {
    fn from(e: serde_json::Error) -> Self {
        RunError::SettingsFormat(e)
    }
}
