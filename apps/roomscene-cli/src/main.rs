use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use roomscene_assets::{FsSource, ResourceCache};
use roomscene_collision::Aabb;
use roomscene_input::Action;
use roomscene_navigation::{NavigationController, TickOutcome};
use roomscene_render::{DebugTextRenderer, Projection, Renderer};
use roomscene_room::objects::{Blanket, FlowerJar, Newspaper};
use roomscene_room::{Room, RoomConfig};
use roomscene_surface::{ControlPointGrid, SurfaceSpec};
use roomscene_tools::{SceneInspector, Tunables};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roomscene-cli", about = "Headless tools for the room scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Room configuration (YAML). Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Walk the camera through the room for a number of ticks
    Walk {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "60")]
        ticks: u32,
        /// Keys held for the whole walk, comma separated
        #[arg(short, long, value_delimiter = ',', default_value = "w")]
        keys: Vec<String>,
        /// Pointer motion applied every tick, as dx,dy pixels
        #[arg(short, long, value_delimiter = ',', num_args = 2, allow_negative_numbers = true)]
        look: Option<Vec<f32>>,
        /// Print the final frame as the debug renderer sees it
        #[arg(long)]
        frame: bool,
    },
    /// Tessellate one of the room's curved surfaces
    Surface {
        #[arg(short, long, value_enum, default_value = "blanket")]
        preset: Preset,
        /// Samples per axis
        #[arg(short, long)]
        samples: Option<usize>,
    },
    /// Print the light and spotlight knobs as JSON
    Tunables {
        /// Override a knob, e.g. spotlight.color=#ff8800
        #[arg(short, long = "set")]
        set: Vec<String>,
    },
    /// Outline the assembled scene graph and its obstacles
    Scene,
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Blanket,
    Newspaper,
    Jar,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => RoomConfig::load(path)
            .with_context(|| format!("loading room config {}", path.display()))?,
        None => RoomConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("roomscene-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("scene: {}", roomscene_scene::crate_info());
            println!("surface: {}", roomscene_surface::crate_info());
            println!("collision: {}", roomscene_collision::crate_info());
            println!("input: {}", roomscene_input::crate_info());
            println!("navigation: {}", roomscene_navigation::crate_info());
            println!("assets: {}", roomscene_assets::crate_info());
            println!("render: {}", roomscene_render::crate_info());
            println!("tools: {}", roomscene_tools::crate_info());
            println!("room: {}", roomscene_room::crate_info());
        }
        Commands::Walk {
            ticks,
            keys,
            look,
            frame,
        } => {
            let (mut room, _) = assemble(&config);
            let mut camera = NavigationController::new(config.navigation.clone());
            camera.apply(Action::PointerLock(true));
            for key in &keys {
                camera.key(key.trim(), true);
            }
            let look = look.unwrap_or_default();
            let (dx, dy) = (look.first().copied().unwrap_or(0.0), look.get(1).copied().unwrap_or(0.0));

            println!("Walk: ticks={ticks}, keys={}, look=({dx}, {dy})", keys.join(","));
            let (mut moved, mut idle, mut blocked) = (0u32, 0u32, 0u32);
            let mut last_blocker = None;
            for _ in 0..ticks {
                if dx != 0.0 || dy != 0.0 {
                    camera.apply(Action::Look { dx, dy });
                }
                match camera.tick(room.obstacles()) {
                    TickOutcome::Moved(_) => moved += 1,
                    TickOutcome::Idle => idle += 1,
                    TickOutcome::Blocked { obstacle } => {
                        blocked += 1;
                        last_blocker = Some(obstacle);
                    }
                }
                room.update(1.0 / 60.0);
            }

            let p = camera.position();
            println!("Ticks: moved={moved} idle={idle} blocked={blocked}");
            if let Some(name) = last_blocker {
                println!("Last blocked by: {name}");
            }
            println!(
                "Camera: pos=({:.2}, {:.2}, {:.2}) yaw={:.3} pitch={:.3}",
                p.x,
                p.y,
                p.z,
                camera.yaw(),
                camera.pitch()
            );

            if frame {
                let mut renderer = DebugTextRenderer::new();
                room.upload(&mut renderer)?;
                renderer.set_lights(&room.lights(&Tunables::room_defaults())?);
                print!("{}", renderer.render_frame(camera.view_matrix(), &Projection::default()));
            }
        }
        Commands::Surface { preset, samples } => {
            let (name, spec) = match preset {
                Preset::Blanket => (
                    "blanket",
                    SurfaceSpec::new(ControlPointGrid::from_points(&Blanket::control_points())?, 3, 2),
                ),
                Preset::Newspaper => (
                    "newspaper",
                    SurfaceSpec::new(ControlPointGrid::from_weighted(&Newspaper::control_points())?, 2, 1),
                ),
                Preset::Jar => (
                    "flower jar half",
                    SurfaceSpec::new(
                        ControlPointGrid::from_points(&FlowerJar::default().half_control_points(false))?,
                        3,
                        3,
                    ),
                ),
            };
            let spec = match samples {
                Some(n) => spec.samples(n, n),
                None => spec,
            };
            let mesh = spec.build()?;
            println!(
                "Surface {name}: verts={} tris={}",
                mesh.vertex_count(),
                mesh.triangle_count()
            );
            if let Some(bounds) = Aabb::from_points(mesh.positions.iter().copied()) {
                println!(
                    "Bounds: min=({:.3}, {:.3}, {:.3}) max=({:.3}, {:.3}, {:.3})",
                    bounds.min.x, bounds.min.y, bounds.min.z, bounds.max.x, bounds.max.y, bounds.max.z
                );
            }
        }
        Commands::Tunables { set } => {
            let mut tunables = Tunables::room_defaults();
            for assignment in &set {
                tunables
                    .assign(assignment)
                    .with_context(|| format!("applying {assignment}"))?;
            }
            println!("{}", tunables.to_json()?);
        }
        Commands::Scene => {
            let (room, cache) = assemble(&config);
            println!("{}", SceneInspector::summary(room.scene()));
            print!("{}", SceneInspector::outline(room.scene()));
            println!(
                "Parts: {}, Materials: {}, Textures: {}",
                room.parts().len(),
                cache.material_count(),
                cache.texture_count()
            );
            for obstacle in room.obstacles().iter() {
                match obstacle.volume.bounds() {
                    Some(b) => println!(
                        "Obstacle {}: min=({:.2}, {:.2}, {:.2}) max=({:.2}, {:.2}, {:.2})",
                        obstacle.name, b.min.x, b.min.y, b.min.z, b.max.x, b.max.y, b.max.z
                    ),
                    None => println!("Obstacle {}: degenerate", obstacle.name),
                }
            }
            for name in room.skipped() {
                println!("Skipped: {name}");
            }
        }
    }

    Ok(())
}

/// Build the room and give textures one chance to load from disk.
fn assemble(config: &RoomConfig) -> (Room, ResourceCache) {
    let mut cache = ResourceCache::new();
    let room = Room::assemble(config, &mut cache);
    let stats = cache.update(&mut FsSource::new(&config.asset_root));
    tracing::info!(
        loaded = stats.loaded,
        failed = stats.failed,
        root = %config.asset_root.display(),
        "textures polled"
    );
    (room, cache)
}
