// Some helpers are only reached from tests or alternate front ends
#![allow(dead_code)]

mod config;
mod control;
mod display;
mod error;
mod game;
mod motion;
mod mqtt;
mod sprite;
mod util;

use log::{info, warn};

use config::GameConfig;
use control::{Controller, InputSource};
use display::{Display, HeadlessPresenter, RenderTarget, Screen};
use error::{Error, Result};
use game::{Game, RunOptions};
use mqtt::MqttClient;

const WINDOW_TITLE: &str = "Space Invaders";

/// Command line options layered over the config file
#[derive(Debug, Default)]
struct Options {
    config: Option<String>,
    write_config: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    scale: Option<u32>,
    no_vsync: bool,
    headless: bool,
    ticks: Option<u64>,
    control: bool,
    mqtt: Option<String>,
}

fn print_help() {
    println!("Usage: invaders [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config PATH         Load settings from a JSON file");
    println!("  --write-config PATH   Write the effective settings to PATH and exit");
    println!(
        "  --width W, -w W       Buffer width (default: {})",
        config::DEFAULT_WIDTH
    );
    println!(
        "  --height H, -h H      Buffer height (default: {})",
        config::DEFAULT_HEIGHT
    );
    println!(
        "  --scale S, -s S       Window pixels per buffer pixel (default: {})",
        config::DEFAULT_SCALE
    );
    println!("  --no-vsync            Disable VSync for uncapped framerate");
    println!("  --headless            Run without a window");
    println!("  --ticks N             Stop after N ticks");
    println!("  --control             Accept commands on {}", Controller::socket_path());
    println!("  --mqtt HOST[:TOPIC]   Accept commands from an MQTT topic");
    println!("  --help                Show this help message");
    println!();
    println!("Keys: Escape/Q quit, P pause, . single step while paused");
}

/// Parse command line arguments
fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().collect();
    let mut options = Options::default();

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "--config" => {
                options.config = value.cloned();
                i += 1;
            },
            "--write-config" => {
                options.write_config = value.cloned();
                i += 1;
            },
            "--width" | "-w" => {
                options.width = value.and_then(|v| v.parse().ok());
                i += 1;
            },
            "--height" | "-h" => {
                options.height = value.and_then(|v| v.parse().ok());
                i += 1;
            },
            "--scale" | "-s" => {
                options.scale = value.and_then(|v| v.parse().ok());
                i += 1;
            },
            "--ticks" => {
                options.ticks = value.and_then(|v| v.parse().ok());
                i += 1;
            },
            "--mqtt" => {
                options.mqtt = value.cloned();
                i += 1;
            },
            "--no-vsync" => options.no_vsync = true,
            "--headless" => options.headless = true,
            "--control" => options.control = true,
            "--help" => {
                print_help();
                std::process::exit(0);
            },
            other => warn!("ignoring unknown argument {:?}", other),
        }
        i += 1;
    }

    options
}

/// Config file (or defaults) with command line overrides applied
fn load_config(options: &Options) -> Result<GameConfig> {
    let mut config = match &options.config {
        Some(path) => {
            info!("loading config from {}", path);
            GameConfig::load(path)?
        },
        None => GameConfig::default(),
    };

    if let Some(w) = options.width {
        config.buffer_width = w;
    }
    if let Some(h) = options.height {
        config.buffer_height = h;
    }
    if let Some(s) = options.scale {
        config.window_scale = s;
    }
    if options.no_vsync {
        config.vsync = false;
    }

    config.validate()?;
    Ok(config)
}

/// Remote control sources that started successfully
fn remote_inputs<'a>(
    controller: &'a mut Option<Controller>,
    mqtt: &'a mut Option<MqttClient>,
) -> Vec<&'a mut dyn InputSource> {
    let mut inputs: Vec<&'a mut dyn InputSource> = Vec::new();
    if let Some(c) = controller.as_mut() {
        inputs.push(c);
    }
    if let Some(m) = mqtt.as_mut() {
        inputs.push(m);
    }
    inputs
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = parse_args();
    let config = load_config(&options)?;

    if let Some(path) = &options.write_config {
        config.save(path)?;
        info!("wrote config to {}", path);
        return Ok(());
    }

    // Optional remote control. A source that fails to start is skipped.
    let mut controller = if options.control {
        match Controller::new() {
            Ok(c) => {
                info!("control socket listening on {}", Controller::socket_path());
                Some(c)
            },
            Err(e) => {
                warn!("{}", e);
                None
            },
        }
    } else {
        None
    };
    let mut mqtt = options.mqtt.as_deref().and_then(|target| {
        let (host, topic) = mqtt::parse_target(target);
        MqttClient::new(host, topic)
            .map_err(|e| warn!("{}", e))
            .ok()
    });

    let mut game = Game::new(&config)?;
    info!(
        "buffer {}x{}, {} aliens, frame duration {} ticks",
        config.buffer_width,
        config.buffer_height,
        game.formation().members().len(),
        config.formation.frame_duration
    );

    let stats = if options.headless {
        if options.ticks.is_none() && controller.is_none() && mqtt.is_none() {
            return Err(Error::Config(
                "--headless needs --ticks N or a remote control source to stop".into(),
            ));
        }
        let mut presenter = HeadlessPresenter::new();
        let mut inputs = remote_inputs(&mut controller, &mut mqtt);
        // Without a tick limit the run waits on remote input, so pace it
        let run_options = RunOptions {
            max_ticks: options.ticks,
            frame_period: options.ticks.is_none().then_some(game::NOMINAL_TICK_PERIOD),
        };
        let stats = game::run(&mut game, &mut presenter, &mut inputs, run_options)?;
        if let Some(checksum) = presenter.last_checksum() {
            info!("final frame checksum {:016x}", checksum);
        }
        stats
    } else {
        let (width, height) = config.window_size();
        let (display, texture_creator, mut sdl_input) =
            Display::with_options(WINDOW_TITLE, width, height, config.vsync)?;
        let target =
            RenderTarget::with_size(&texture_creator, config.buffer_width, config.buffer_height)?;
        let mut screen = Screen::new(display, target);

        let mut inputs: Vec<&mut dyn InputSource> = Vec::new();
        inputs.push(&mut sdl_input);
        inputs.extend(remote_inputs(&mut controller, &mut mqtt));
        let run_options = RunOptions {
            max_ticks: options.ticks,
            frame_period: None,
        };
        game::run(&mut game, &mut screen, &mut inputs, run_options)?
    };

    info!(
        "ran {} ticks ({} simulated), {:.1} fps average",
        stats.ticks,
        game.ticks(),
        stats.avg_fps
    );
    Ok(())
}
