use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use rgb_udp_client::config;
use rgb_udp_client::effect::{ColorWheel, Effect, RandomColor, SineCycle, Solid, Stroboscope};
use rgb_udp_client::host::{ClientRegistry, HostClient};
use rgb_udp_client::{ChannelMapping, ColorSample};

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum EffectName {
    /// Phase-shifted sine waves.
    Cycle,
    /// The `--color` value, or spring green.
    Solid,
    /// A new random hue on every trigger.
    Random,
    /// White flash on every trigger, fading out.
    Strobe,
    /// Hue rotation at `--speed` degrees per second.
    Wheel,
}

/// Send colors to UDP light devices.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Config file listing clients (YAML or JSON).
    #[arg(long, conflicts_with_all = ["address", "port"])]
    config: Option<PathBuf>,
    /// Device address (IP or hostname).
    #[arg(long, default_value = "localhost")]
    address: String,
    /// Device port.
    #[arg(long, default_value = "9909")]
    port: String,
    /// Effect to render. Defaults to a single solid frame when `--color`
    /// is given, otherwise to the sine cycle.
    #[arg(long, value_enum)]
    effect: Option<EffectName>,
    /// Color for the solid effect, channels in 0..1.
    #[arg(long, num_args = 3, value_names = ["R", "G", "B"], allow_negative_numbers = true)]
    color: Option<Vec<f32>>,
    /// Trigger period for the random and strobe effects.
    #[arg(long, default_value_t = 500)]
    trigger_ms: u64,
    /// Color wheel speed in degrees per second.
    #[arg(long, default_value_t = ColorWheel::DEFAULT_SPEED)]
    speed: f32,
    /// Number of frames to send; 0 runs forever.
    #[arg(long, default_value_t = 0)]
    frames: u64,
    /// Delay between frames.
    #[arg(long, default_value_t = 50)]
    interval_ms: u64,
    /// Clamp out-of-range channels instead of wrapping them.
    #[arg(long)]
    clamp: bool,
}

fn open(args: &Args) -> Result<Vec<(String, Box<dyn HostClient>)>, String> {
    if let Some(path) = &args.config {
        let root = config::read_config(path).map_err(|err| err.to_string())?;
        let mapping = if args.clamp { ChannelMapping::Clamped } else { root.channels };
        let registry = ClientRegistry::with_defaults(mapping);
        return config::open_clients(&root, &registry).map_err(|err| err.to_string());
    }

    let mapping = if args.clamp { ChannelMapping::Clamped } else { ChannelMapping::Wrapping };
    let registry = ClientRegistry::with_defaults(mapping);
    let values = vec![args.address.clone(), args.port.clone()];
    match registry.create("UDP", &values) {
        Ok(Some(client)) => Ok(vec![(client.connection_address(), client)]),
        Ok(None) => Err("address and port are required".to_owned()),
        Err(err) => Err(err.to_string()),
    }
}

fn build_effect(args: &Args, name: EffectName) -> Box<dyn Effect> {
    match name {
        EffectName::Cycle => Box::new(SineCycle::default()),
        EffectName::Solid => match &args.color {
            Some(color) => Box::new(Solid::new(ColorSample::new(color[0], color[1], color[2]))),
            None => Box::new(Solid::default()),
        },
        EffectName::Random => Box::new(RandomColor::new()),
        EffectName::Strobe => Box::new(Stroboscope::default()),
        EffectName::Wheel => Box::new(ColorWheel::new(args.speed)),
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let mut clients = match open(&args) {
        Ok(clients) => clients,
        Err(err) => {
            error!("{}", err);
            process::exit(1);
        }
    };

    for (name, client) in &clients {
        if !client.is_connected() {
            warn!("{} is not connected", name);
        }
    }

    let name = match (args.effect, &args.color) {
        (Some(name), _) => name,
        (None, Some(_)) => EffectName::Solid,
        (None, None) => EffectName::Cycle,
    };
    let mut effect = build_effect(&args, name);

    // A bare --color sends one frame.
    let single = args.effect.is_none() && args.color.is_some();
    let frames = if single && args.frames == 0 { 1 } else { args.frames };
    let trigger_period = Duration::from_millis(args.trigger_ms.max(1));
    let mut last_frame = Instant::now();
    let mut last_trigger = last_frame;
    let mut sent: u64 = 0;

    info!("rendering {:?} to {} client(s)", name, clients.len());
    effect.trigger();

    while frames == 0 || sent < frames {
        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        if now.duration_since(last_trigger) >= trigger_period {
            effect.trigger();
            last_trigger = now;
        }

        let color = effect.render(dt);
        for (name, client) in &clients {
            if !client.send(color.red, color.green, color.blue) {
                warn!("{}: frame {} not sent", name, sent);
            }
        }

        sent += 1;
        if frames == 0 || sent < frames {
            std::thread::sleep(Duration::from_millis(args.interval_ms));
        }
    }

    info!("sent {} frame(s)", sent);

    for (_, client) in clients.iter_mut() {
        client.disconnect();
    }
}
