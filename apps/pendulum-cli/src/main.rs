use anyhow::{Context, ensure};
use clap::{Parser, Subcommand, ValueEnum};
use glam::Vec3;
use pendulum_common::{OrbitDelta, SceneConfig};
use pendulum_input::{Action, InputState, OrbitKey};
use pendulum_kernel::Pendulum;
use pendulum_render::{DebugTextRenderer, FrameState, OrbitCamera, Renderer, Session};
use pendulum_tools::{SessionInspector, SessionSummary};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pendulum-cli", about = "Headless tools for the spring pendulum")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Integrate the pendulum and print trajectory samples
    Simulate {
        /// Number of steps to integrate
        #[arg(short, long, default_value = "600")]
        steps: u64,
        /// Time step in seconds
        #[arg(long, default_value = "0.016")]
        dt: f32,
        /// Starting bob position as x,y,z (defaults to the anchor)
        #[arg(long, value_delimiter = ',', num_args = 3, allow_negative_numbers = true)]
        start: Option<Vec<f32>>,
        /// Print a sample every N steps
        #[arg(short, long, default_value = "60")]
        every: u64,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Build the meshes and print their sizes
    Mesh {
        #[arg(long, default_value = "200")]
        rings: u32,
        #[arg(long, default_value = "200")]
        slices: u32,
        #[arg(long, default_value = "200")]
        sectors: u32,
    },
    /// Cast a picking ray through a window pixel
    Pick {
        x: f32,
        y: f32,
        #[arg(long, default_value = "640")]
        width: f32,
        #[arg(long, default_value = "640")]
        height: f32,
        #[arg(long, default_value = "60", allow_negative_numbers = true)]
        distance: f32,
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        angle: f32,
    },
    /// Run frames through the session and print the last one as text
    Render {
        /// Number of frames to advance
        #[arg(short, long, default_value = "1")]
        frames: u64,
        /// Time step in seconds
        #[arg(long, default_value = "0.016")]
        dt: f32,
        /// Orbit key held for every frame (repeatable)
        #[arg(long, value_enum)]
        hold: Vec<KeyArg>,
        /// Pick at window pixel x,y before the first frame
        #[arg(long, value_delimiter = ',', num_args = 2)]
        pick: Option<Vec<f32>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KeyArg {
    Up,
    Down,
    Left,
    Right,
}

impl From<KeyArg> for OrbitKey {
    fn from(key: KeyArg) -> Self {
        match key {
            KeyArg::Up => OrbitKey::Up,
            KeyArg::Down => OrbitKey::Down,
            KeyArg::Left => OrbitKey::Left,
            KeyArg::Right => OrbitKey::Right,
        }
    }
}

/// One trajectory sample.
#[derive(Debug, Clone, Serialize)]
struct Sample {
    tick: u64,
    time: f32,
    position: [f32; 3],
    velocity: [f32; 3],
    spring_length: f32,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    dt: f32,
    steps: u64,
    samples: Vec<Sample>,
    summary: SessionSummary,
    replay_hash: u64,
}

fn sample(session: &Session, dt: f32) -> Sample {
    let pendulum = session.pendulum();
    Sample {
        tick: pendulum.tick(),
        time: pendulum.tick() as f32 * dt,
        position: pendulum.position().to_array(),
        velocity: pendulum.velocity().to_array(),
        spring_length: (pendulum.position() - pendulum.anchor()).length(),
    }
}

fn simulate(
    steps: u64,
    dt: f32,
    start: Option<Vec3>,
    every: u64,
) -> anyhow::Result<SimulationReport> {
    ensure!(every > 0, "--every must be at least 1");
    let config = SceneConfig::default();
    let mut session = Session::recording(&config)?;
    if let Some(start) = start {
        session.pendulum_mut().set_position(start);
    }

    let mut samples = vec![sample(&session, dt)];
    for _ in 0..steps {
        session.advance(OrbitDelta::NONE, dt);
        if session.pendulum().tick() % every == 0 {
            samples.push(sample(&session, dt));
        }
    }

    let pendulum = session.pendulum();
    tracing::info!(steps, dt, events = pendulum.events().len(), "simulation finished");
    let replayed = Pendulum::replay(pendulum.anchor(), pendulum.events());
    ensure!(
        replayed.state_hash() == pendulum.state_hash(),
        "replay diverged: {:#x} != {:#x}",
        replayed.state_hash(),
        pendulum.state_hash()
    );

    Ok(SimulationReport {
        dt,
        steps,
        samples,
        summary: SessionInspector::summary(&session),
        replay_hash: replayed.state_hash(),
    })
}

fn run_frames(
    frames: u64,
    dt: f32,
    hold: &[KeyArg],
    pick: Option<(f32, f32)>,
) -> anyhow::Result<FrameState> {
    let config = SceneConfig::default();
    let mut session = Session::new(&config)?;
    let mut input = InputState::new();
    for key in hold {
        input.set_key((*key).into(), true);
    }
    if let Some((x, y)) = pick {
        input.press_at(x, y);
    }

    let mut frame = session.frame();
    for _ in 0..frames {
        let mut delta = OrbitDelta::NONE;
        for action in input.actions(&config.orbit_steps) {
            match action {
                Action::Pick { x, y } => {
                    session.pick(x, y);
                }
                Action::Orbit(d) => delta = d,
                Action::Noop => {}
            }
        }
        frame = session.advance(delta, dt);
    }
    Ok(frame)
}

fn triple(values: Vec<f32>) -> anyhow::Result<Vec3> {
    let [x, y, z] = values.as_slice() else {
        anyhow::bail!("expected three comma-separated values");
    };
    Ok(Vec3::new(*x, *y, *z))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    // Logs go to stderr so `--json` output stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("pendulum-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", pendulum_kernel::crate_info());
            println!("mesh: {}", pendulum_mesh::crate_info());
            println!("render: {}", pendulum_render::crate_info());
            println!("input: {}", pendulum_input::crate_info());
            println!("tools: {}", pendulum_tools::crate_info());
            let config = SceneConfig::default();
            println!(
                "equilibrium: {:?}",
                Pendulum::new(config.anchor).equilibrium()
            );
        }
        Commands::Simulate {
            steps,
            dt,
            start,
            every,
            json,
        } => {
            let start = start.map(triple).transpose()?;
            let report = simulate(steps, dt, start, every)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Simulate: dt={dt}, steps={steps}");
                println!(
                    "{:>8} {:>8} {:>28} {:>10}",
                    "tick", "time", "position", "spring"
                );
                for s in &report.samples {
                    println!(
                        "{:>8} {:>8.3} ({:>8.3}, {:>8.3}, {:>8.3}) {:>10.4}",
                        s.tick,
                        s.time,
                        s.position[0],
                        s.position[1],
                        s.position[2],
                        s.spring_length
                    );
                }
                println!("{}", report.summary);
                println!("Replay: OK (hash={:#x})", report.replay_hash);
            }
        }
        Commands::Mesh {
            rings,
            slices,
            sectors,
        } => {
            let sphere = pendulum_mesh::build_sphere(rings, slices).context("building sphere")?;
            let cylinder = pendulum_mesh::build_cylinder(sectors).context("building cylinder")?;
            println!(
                "Sphere {rings}x{slices}: vertices={} triangles={} well_formed={}",
                sphere.vertex_count(),
                sphere.triangle_count(),
                sphere.is_well_formed()
            );
            println!(
                "Cylinder {sectors}: vertices={} triangles={} well_formed={}",
                cylinder.vertex_count(),
                cylinder.triangle_count(),
                cylinder.is_well_formed()
            );
        }
        Commands::Pick {
            x,
            y,
            width,
            height,
            distance,
            angle,
        } => {
            let camera = OrbitCamera::new(distance, angle, width, height)?;
            let ray = camera.picking_ray(x, y);
            let target = ray.point_at(camera.distance());
            println!("Eye: {:?}", camera.eye());
            println!("Ray: origin={:?} direction={:?}", ray.origin, ray.direction);
            println!("Target: {target:?}");
        }
        Commands::Render {
            frames,
            dt,
            hold,
            pick,
        } => {
            let pick = pick.map(|p| (p[0], p[1]));
            let frame = run_frames(frames, dt, &hold, pick)?;
            print!("{}", DebugTextRenderer::new().render(&frame));
        }
    }

    Ok(())
}
