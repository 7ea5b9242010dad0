//! Tracer show runner.
//!
//! Assembles the default show: noise-driven tracers with curved trails,
//! palette stroke colors, an echo multiplier, MIDI encoder control and an
//! audio-reactive stroke width. Property scales persist to a JSON settings
//! file (press S in the show window to save).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glam::Vec3;
use rand::Rng;

use tracer::audio::AudioInput;
use tracer::behaviors::{
    CurvedPath, DrawPath, EllipseHead, HeadGrowth, MaximumLength, Multiplier, NoiseBrightness,
    NoiseMovement, RandomStrokeColor, StrokeWidth, StrokeWidthFromValue, VibratingMultiplier,
};
use tracer::engine::{Stage, TracerEngine};
use tracer::error::RunError;
use tracer::midi::MidiController;
use tracer::property::Property;
use tracer::registry::Settings;
use tracer::tracer::Tracer;
use tracer::visuals::Palette;
use tracer::window::App;

#[derive(Parser, Debug)]
#[command(name = "tracer", about = "Real-time generative trail show")]
struct Args {
    /// Substring of the MIDI input port name to connect to (first port when omitted).
    #[arg(long)]
    midi_port: Option<String>,

    /// List available MIDI input ports and exit.
    #[arg(long)]
    list_midi_ports: bool,

    /// Disable system audio capture.
    #[arg(long)]
    no_audio: bool,

    /// Settings file for loading and saving property scales.
    #[arg(long, default_value = "tracer-settings.json")]
    settings: PathBuf,

    /// Starting tracer count, overriding saved settings.
    #[arg(long)]
    tracers: Option<i32>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), RunError> {
    if args.list_midi_ports {
        for name in MidiController::list_ports()? {
            println!("{}", name);
        }
        return Ok(());
    }

    let stage = Stage::new(1280.0, 720.0, 400.0);

    // Show properties. Registration order below defines the numeric-key
    // index shown in the log at startup.
    let tracer_count = Property::new("tracerCount", 24, 1, 127);
    let velocity = Property::new(
        "velocity",
        Vec3::splat(40.0),
        Vec3::splat(1.0),
        Vec3::splat(200.0),
    );
    let stroke_width = Property::new("strokeWidth", 2.0_f32, 0.5, 12.0);
    let max_points = Property::new("maxPoints", 60, 2, 240);
    let multiplier_count = Property::new("multiplierCount", 1, 1, 9);
    let max_shift = Property::new("maxShift", 30.0_f32, 0.0, 120.0);
    let entropy = Property::new("entropy", 0.0_f32, 0.0, 1.0);
    let loudness = Property::new("loudness", 0.0_f32, 0.0, 1.0);

    let audio = if args.no_audio {
        None
    } else {
        match AudioInput::capture(Box::new(loudness.writer()), 0.2, 4.0) {
            Ok(audio) => {
                log::info!("audio-reactive stroke width on '{}'", audio.device_name());
                Some(audio)
            }
            Err(e) => {
                log::warn!("audio capture unavailable ({}), using fixed stroke width", e);
                None
            }
        }
    };
    let audio_reactive = audio.is_some();

    let mut engine = {
        let velocity = velocity.clone();
        let stroke_width = stroke_width.clone();
        let max_points = max_points.clone();
        let multiplier_count = multiplier_count.clone();
        let max_shift = max_shift.clone();
        let entropy = entropy.clone();
        let loudness = loudness.clone();

        TracerEngine::new(stage, tracer_count.clone(), move |_index| {
            let mut rng = rand::thread_rng();
            let time_shift = Vec3::new(
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
            );

            let mut tracer = Tracer::new(stage.random_point(&mut rng))
                .with_update_behavior(NoiseMovement::new(velocity.clone(), stage, time_shift))
                .with_update_behavior(HeadGrowth)
                .with_update_behavior(MaximumLength::new(max_points.clone()))
                .with_update_behavior(CurvedPath)
                .with_draw_behavior(RandomStrokeColor::new(Palette::Neon, &mut rng))
                .with_draw_behavior(NoiseBrightness::new(velocity.clone(), time_shift));

            if audio_reactive {
                tracer.add_draw_behavior(StrokeWidthFromValue::new(12.0, loudness.clone()));
            } else {
                tracer.add_draw_behavior(StrokeWidth::new(stroke_width.clone()));
            }

            tracer
                .with_draw_behavior(DrawPath)
                .with_draw_behavior(VibratingMultiplier::new(
                    Multiplier::new(multiplier_count.clone(), max_shift.clone()),
                    entropy.clone(),
                ))
                .with_draw_behavior(EllipseHead::new(stroke_width.clone()))
        })
    };

    // tracerCount was registered by the engine at index 0.
    let registry = engine.registry_mut();
    registry.register(&velocity);
    registry.register(&stroke_width);
    registry.register(&max_points);
    registry.register(&multiplier_count);
    registry.register(&max_shift);
    registry.register(&entropy);
    registry.register(&loudness);
    for (index, name) in registry.names().iter().enumerate() {
        log::info!("property {} = {}", index, name);
    }

    if args.settings.exists() {
        let json = std::fs::read_to_string(&args.settings)?;
        let settings: Settings = serde_json::from_str(&json)?;
        engine.registry().restore(&settings);
        log::info!("settings loaded from {}", args.settings.display());
    }
    if let Some(count) = args.tracers {
        tracer_count.set(count);
        tracer_count.clean();
    }

    for channel in 0..7 {
        engine.registry_mut().bind_encoder(channel, channel as usize);
    }
    let _midi = match MidiController::connect(
        args.midi_port.as_deref(),
        engine.registry().encoder_bindings(),
    ) {
        Ok(midi) => {
            log::info!("controller ready on '{}'", midi.port_name());
            Some(midi)
        }
        Err(e) => {
            log::warn!("MIDI unavailable ({}), keyboard control only", e);
            None
        }
    };

    App::new("Tracer", engine, Some(args.settings)).run()
}
