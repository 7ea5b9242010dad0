//! MIDI controller input.
//!
//! A deliberately thin layer: decode the three message families the
//! controller sends, and route encoder turns straight into property writers
//! on the callback thread. The normalized write lands in the property's
//! dirty buffer and commits on the next frame like any other producer write.

use midir::{Ignore, MidiInput, MidiInputConnection};

use crate::error::MidiError;
use crate::range;
use crate::registry::EncoderBinding;

const CLIENT_NAME: &str = "tracer";

/// Decoded controller message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Rotary encoder moved. `value` is the raw 0..127 position.
    EncoderTurn { channel: u8, value: u8 },
    /// Rotary encoder pushed down.
    EncoderPress { channel: u8, pressed: bool },
    /// One of the side buttons.
    SideButton { button: u8, pressed: bool },
}

impl ControlEvent {
    /// Decode a raw message. Status bytes are matched exactly; anything
    /// else (clock, notes, other channels) is `None`.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 3 {
            return None;
        }
        let (status, data1, data2) = (bytes[0], bytes[1], bytes[2]);
        match status {
            0xB0 => Some(ControlEvent::EncoderTurn {
                channel: data1,
                value: data2.min(127),
            }),
            0xB1 => Some(ControlEvent::EncoderPress {
                channel: data1,
                pressed: data2 > 0,
            }),
            0xB3 => Some(ControlEvent::SideButton {
                button: data1,
                pressed: data2 > 0,
            }),
            _ => None,
        }
    }
}

/// Raw encoder position mapped to the normalized scale the properties use.
pub fn encoder_scale(value: u8) -> f32 {
    range::map_clamped(value as f32, 0.0, 127.0, 0.0, 1.0)
}

/// An open controller connection. Dropping it closes the port.
pub struct MidiController {
    _connection: MidiInputConnection<()>,
    port_name: String,
}

impl MidiController {
    /// Names of the available input ports.
    pub fn list_ports() -> Result<Vec<String>, MidiError> {
        let midi_in = MidiInput::new(CLIENT_NAME)?;
        Ok(midi_in
            .ports()
            .iter()
            .filter_map(|p| midi_in.port_name(p).ok())
            .collect())
    }

    /// Open the first port whose name contains `port_filter` (or the first
    /// port at all when no filter is given) and route encoder turns through
    /// `bindings` on the callback thread.
    pub fn connect(
        port_filter: Option<&str>,
        bindings: Vec<EncoderBinding>,
    ) -> Result<Self, MidiError> {
        let mut midi_in = MidiInput::new(CLIENT_NAME)?;
        midi_in.ignore(Ignore::Sysex | Ignore::Time);

        let ports = midi_in.ports();
        if ports.is_empty() {
            return Err(MidiError::NoPorts);
        }

        let port = match port_filter {
            Some(filter) => ports
                .iter()
                .find(|p| {
                    midi_in
                        .port_name(p)
                        .map(|n| n.contains(filter))
                        .unwrap_or(false)
                })
                .ok_or_else(|| MidiError::PortNotFound(filter.to_string()))?,
            None => &ports[0],
        };
        let port_name = midi_in
            .port_name(port)
            .unwrap_or_else(|_| "<unknown>".to_string());

        for binding in &bindings {
            log::info!(
                "encoder {} -> '{}' (starting at {:.2})",
                binding.channel,
                binding.writer.name(),
                binding.initial_scale
            );
        }

        let connection = midi_in
            .connect(
                port,
                "tracer-input",
                move |_timestamp, message, _| match ControlEvent::decode(message) {
                    Some(ControlEvent::EncoderTurn { channel, value }) => {
                        if let Some(binding) = bindings.iter().find(|b| b.channel == channel) {
                            binding.writer.set_scale(encoder_scale(value));
                        } else {
                            log::trace!("unbound encoder {} moved to {}", channel, value);
                        }
                    }
                    Some(event) => log::debug!("controller event {:?}", event),
                    None => {}
                },
                (),
            )
            .map_err(|e| MidiError::Connect(e.to_string()))?;

        log::info!("MIDI controller connected on '{}'", port_name);
        Ok(Self {
            _connection: connection,
            port_name,
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}
