use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;
use roomscene_assets::ResourceCache;
use roomscene_assets::material::unpack_rgb;
use roomscene_collision::ObstacleSet;
use roomscene_common::NodeId;
use roomscene_render::{DrawableHandle, Light, RenderError, Renderer};
use roomscene_scene::{SceneError, SceneGraph};
use roomscene_tools::{SceneInspector, TunableError, Tunables};

use crate::config::RoomConfig;
use crate::context::{BuildContext, Part};
use crate::flame::FlameParticles;
use crate::objects::{
    BeetleTubes, Bed, Blanket, Cake, Candle, CeilingLight, Flame, Floor, Flower, FlowerJar,
    HelicalSpring, JailWall, Mirror, Newspaper, Painting, Plate, RoomObject, Sink, Spotlight, Stool,
    Table, Toilet, Wall,
};

/// Where the spotlight hangs. Its aim comes from the tunables.
pub const SPOTLIGHT_POSITION: Vec3 = Vec3::new(5.65, 8.0, -6.54);

/// Intensity of each light fixture beyond the jail wall.
const OUTER_LIGHT_INTENSITY: f32 = 40.0;

/// Uniform scale of the beetle inside its frame.
const BEETLE_SCALE: f32 = 0.5;

#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Tunable(#[from] TunableError),
}

#[derive(Debug, Clone)]
struct FlameState {
    part: usize,
    particles: FlameParticles,
}

/// The assembled room: scene graph, drawable parts, obstacles and the one
/// animated effect.
#[derive(Debug)]
pub struct Room {
    scene: SceneGraph,
    parts: Vec<Part>,
    obstacles: ObstacleSet,
    flame: Option<FlameState>,
    /// Candle node and its wick tip in the node's frame.
    candle: Option<(NodeId, Vec3)>,
    ceiling_light: Vec3,
    outer_lights: Vec<Vec3>,
    drawables: Vec<DrawableHandle>,
    skipped: Vec<String>,
}

impl Room {
    /// Build every object and lay the room out. An object that fails to
    /// build is logged and left out; the rest of the room still assembles.
    pub fn assemble(config: &RoomConfig, resources: &mut ResourceCache) -> Self {
        let _span = tracing::info_span!("room_assemble").entered();
        let mut ctx = BuildContext::new(resources);
        let mut skipped = Vec::new();
        let (fw, fl, wh) = (config.floor_width, config.floor_length, config.wall_height);

        place(&mut ctx, &mut skipped, &Floor {
            width: fw,
            length: fl,
            ..Floor::default()
        });
        place(&mut ctx, &mut skipped, &Floor::ceiling(Vec3::new(0.0, wh, 0.0), fw, fl));
        let ceiling_light = CeilingLight {
            position: Vec3::new(0.0, wh, 0.0),
            ..CeilingLight::default()
        };
        place(&mut ctx, &mut skipped, &ceiling_light);

        let mut wall_nodes = Vec::new();
        let jail_wall = place(&mut ctx, &mut skipped, &JailWall {
            position: Vec3::new(0.0, wh / 2.0, -fw / 2.0),
            width: fw,
            height: wh,
            bar_radius: 0.05,
            bar_spacing: 0.3,
            ..JailWall::default()
        });
        wall_nodes.extend(jail_wall.map(|n| ("jail wall", n)));
        let walls = [
            ("wall2", Vec3::new(-fw / 2.0, wh / 2.0, 0.0), fl, FRAC_PI_2),
            ("wall3", Vec3::new(fw / 2.0, wh / 2.0, 0.0), fl, -FRAC_PI_2),
            ("wall4", Vec3::new(0.0, wh / 2.0, fl / 2.0), fw, PI),
        ];
        for (name, position, width, angle) in walls {
            let wall = Wall {
                name: name.into(),
                position,
                width,
                height: wh,
                angle,
                ..Wall::default()
            };
            if let Some(node) = place(&mut ctx, &mut skipped, &wall) {
                wall_nodes.push((name, node));
            }
        }

        let t = &config.table;
        let table_spec = Table {
            width: t.width,
            length: t.length,
            thickness: t.thickness,
            leg_height: t.leg_height,
            leg_radius: t.leg_radius,
            ..Table::default()
        };
        let top = table_spec.top_height();
        let table = place(&mut ctx, &mut skipped, &table_spec);

        let plate = place(&mut ctx, &mut skipped, &Plate {
            position: Vec3::new(0.0, top + config.plate_thickness / 2.0, 0.0),
            radius: config.plate_radius,
            thickness: config.plate_thickness,
            ..Plate::default()
        });
        let cake = place(&mut ctx, &mut skipped, &Cake {
            radius: config.cake_radius,
            height: config.cake_height,
            ..Cake::default()
        });
        let candle_spec = Candle {
            position: Vec3::new(0.0, config.candle_height / 2.0, 0.0),
            wax_height: config.candle_height,
            wax_radius: config.candle_radius,
            ..Candle::default()
        };
        let candle = place(&mut ctx, &mut skipped, &candle_spec);
        let flame = place(&mut ctx, &mut skipped, &Flame {
            position: candle_spec.position + candle_spec.wick_tip(),
            settings: config.flame.clone(),
            ..Flame::default()
        });
        let jar = place(&mut ctx, &mut skipped, &FlowerJar::default());
        let newspaper = place(&mut ctx, &mut skipped, &Newspaper {
            samples: config.surface_samples,
            ..Newspaper::default()
        });
        let spring = place(&mut ctx, &mut skipped, &HelicalSpring::default());
        let flower = place(&mut ctx, &mut skipped, &Flower::default());

        place(&mut ctx, &mut skipped, &Stool {
            name: "fallen stool".into(),
            position: Vec3::new(2.7, 0.0, 5.25),
            ..Stool::default()
        });
        place(&mut ctx, &mut skipped, &Toilet {
            position: Vec3::new(5.65, 0.0, -5.76),
            ..Toilet::default()
        });
        place(&mut ctx, &mut skipped, &Bed {
            position: Vec3::new(-4.35, 0.0, 6.3),
            ..Bed::default()
        });
        place(&mut ctx, &mut skipped, &Sink {
            position: Vec3::new(2.5, 1.75, -6.84),
            angle: FRAC_PI_2,
            ..Sink::default()
        });
        place(&mut ctx, &mut skipped, &Spotlight {
            position: SPOTLIGHT_POSITION - Spotlight::HEAD,
            ..Spotlight::default()
        });

        let scene = &mut ctx.scene;
        for child in [cake, plate, spring, jar, newspaper] {
            associate(scene, table, child);
        }
        associate(scene, cake, candle);
        associate(scene, candle, flame);
        associate(scene, jar, flower);

        // Order matters: each move carries whatever is associated by then.
        let ch = config.cake_height;
        let on_plate = ch / 2.0 + top + config.plate_thickness / 2.0;
        translate(scene, candle, Vec3::new(0.0, ch / 2.0, 0.0));
        translate(scene, cake, Vec3::new(0.0, on_plate, 0.0));
        translate(scene, spring, Vec3::new(1.0, on_plate + 0.058, -1.25));
        translate(scene, candle, Vec3::new(0.25, 0.0, -0.25));
        translate(scene, flower, Vec3::new(0.0, 0.8, 0.0));
        translate(scene, jar, Vec3::new(1.2, top, 1.2));
        translate(scene, newspaper, Vec3::new(-1.2, top, 0.0));
        translate(
            scene,
            table,
            Vec3::new(
                fw / 2.0 - t.width / 2.0 - t.corner_margin,
                0.0,
                fl / 2.0 - t.length / 2.0 - t.corner_margin,
            ),
        );
        rotate(scene, table, -FRAC_PI_2);

        place(&mut ctx, &mut skipped, &Blanket {
            position: Vec3::new(-4.0, 2.0, 7.15),
            tilt: FRAC_PI_2,
            samples: config.surface_samples,
            ..Blanket::default()
        });
        let paintings = [
            ("portrait", 0.0, 1.332, 2.0, "textures/portrait.jpg"),
            ("landscape", 6.0, 1.5, 1.5, "textures/landscape.jpg"),
        ];
        for (name, z, inner_width, inner_height, image) in paintings {
            place(&mut ctx, &mut skipped, &Painting {
                name: name.into(),
                position: Vec3::new(-fw / 2.0, wh / 2.0, z),
                angle: FRAC_PI_2,
                inner_width,
                inner_height,
                image: image.into(),
                ..Painting::default()
            });
        }

        // The beetle hangs in its own frame on the opposite wall.
        let beetle_spec = BeetleTubes::default();
        let beetle = place(&mut ctx, &mut skipped, &beetle_spec);
        if let Some(beetle) = beetle {
            if let Err(err) = ctx.scene.scale_uniform(beetle, BEETLE_SCALE) {
                tracing::warn!(error = %err, "beetle scale skipped");
            }
        }
        let beetle_frame = place(&mut ctx, &mut skipped, &Painting {
            name: "beetle frame".into(),
            inner_width: BeetleTubes::TOTAL_LENGTH * BEETLE_SCALE * 2.0,
            inner_height: BeetleTubes::TOTAL_HEIGHT * BEETLE_SCALE + 1.5,
            image: "textures/cars_track.jpg".into(),
            ..Painting::default()
        });
        let scene = &mut ctx.scene;
        associate(scene, beetle_frame, beetle);
        translate(scene, beetle_frame, Vec3::new(fw / 2.0, wh / 2.0, 0.0));
        rotate(scene, beetle_frame, -FRAC_PI_2);
        rotate(scene, beetle, PI);
        // Half a tube radius off the canvas, toward the room.
        translate(scene, beetle, Vec3::new(-beetle_spec.radius / 2.0, 0.0, 0.0));

        place(&mut ctx, &mut skipped, &Mirror {
            position: Vec3::new(2.5, 5.0, -fl / 2.0 + 0.05),
            inner_width: 1.5,
            inner_height: 2.5,
            ..Mirror::default()
        });

        // A corridor of three bays lies beyond the jail wall.
        let mut outer_lights = Vec::new();
        for (i, x) in [-fl, 0.0, fl].into_iter().enumerate() {
            let n = i + 1;
            place(&mut ctx, &mut skipped, &Floor {
                name: format!("outer floor {n}"),
                position: Vec3::new(x, 0.0, -fw),
                width: fw,
                length: fl,
                ..Floor::default()
            });
            place(&mut ctx, &mut skipped, &Floor {
                name: format!("outer ceiling {n}"),
                ..Floor::ceiling(Vec3::new(x, wh, -fw), fw, fl)
            });
            let light = CeilingLight {
                name: format!("outer ceiling light {n}"),
                position: Vec3::new(x, wh, -fw),
                ..CeilingLight::default()
            };
            if place(&mut ctx, &mut skipped, &light).is_some() {
                outer_lights.push(light.light_position());
            }
        }
        let outer_walls = [
            Vec3::new(0.0, wh / 2.0, -fw * 1.5),
            Vec3::new(-fw, wh / 2.0, -fw * 1.5),
            Vec3::new(fw, wh / 2.0, -fw * 1.5),
        ]
        .map(|p| (p, 0.0))
        .into_iter()
        .chain([
            (Vec3::new(-fw * 1.5, wh / 2.0, -fw), FRAC_PI_2),
            (Vec3::new(fw * 1.5, wh / 2.0, -fw), -FRAC_PI_2),
        ]);
        for (i, (position, angle)) in outer_walls.enumerate() {
            place(&mut ctx, &mut skipped, &Wall {
                name: format!("outer wall {}", i + 1),
                position,
                width: fl,
                height: wh,
                angle,
                ..Wall::default()
            });
        }

        // Obstacles freeze the final layout.
        let mut blockers = wall_nodes;
        blockers.extend(table.map(|n| ("table", n)));
        blockers.extend(jar.map(|n| ("flower jar", n)));
        for (name, node) in blockers {
            if let Err(err) = ctx.register_obstacle(name, node) {
                tracing::warn!(name, error = %err, "obstacle not registered");
            }
        }

        let flame = flame.and_then(|node| {
            let part = ctx.parts.iter().position(|p| p.node == node)?;
            Some(FlameState {
                part,
                particles: FlameParticles::new(config.flame.clone()),
            })
        });
        let (scene, parts, obstacles) = ctx.finish();
        tracing::info!(
            nodes = scene.len(),
            parts = parts.len(),
            obstacles = obstacles.len(),
            skipped = skipped.len(),
            "room assembled"
        );

        Self {
            scene,
            parts,
            obstacles,
            flame,
            candle: candle.map(|n| (n, candle_spec.wick_tip())),
            ceiling_light: ceiling_light.light_position(),
            outer_lights,
            drawables: Vec::new(),
            skipped,
        }
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    /// Names of objects that failed to build.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn flame(&self) -> Option<&FlameParticles> {
        self.flame.as_ref().map(|f| &f.particles)
    }

    pub fn drawables(&self) -> &[DrawableHandle] {
        &self.drawables
    }

    pub fn node(&self, name: &str) -> Option<NodeId> {
        SceneInspector::find(&self.scene, name)
    }

    /// Create one drawable per part, then push their world matrices.
    pub fn upload(&mut self, renderer: &mut impl Renderer) -> Result<(), RoomError> {
        self.drawables = self
            .parts
            .iter()
            .map(|part| renderer.create_mesh(&part.mesh, part.material))
            .collect();
        tracing::debug!(drawables = self.drawables.len(), "room uploaded");
        self.sync(renderer)
    }

    /// Push current world matrices and flame geometry to the renderer.
    pub fn sync(&self, renderer: &mut impl Renderer) -> Result<(), RoomError> {
        for (part, handle) in self.parts.iter().zip(&self.drawables) {
            renderer.set_world_transform(*handle, part.world_matrix(&self.scene)?)?;
        }
        if let Some(flame) = &self.flame {
            if let (Some(handle), Some(part)) = (self.drawables.get(flame.part), self.parts.get(flame.part)) {
                renderer.update_mesh(*handle, &part.mesh)?;
            }
        }
        Ok(())
    }

    /// Advance animated effects by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if let Some(flame) = &mut self.flame {
            flame.particles.update(dt);
            if let Some(part) = self.parts.get_mut(flame.part) {
                part.mesh = flame.particles.mesh();
            }
        }
    }

    /// The room's lights with the current tunable values.
    pub fn lights(&self, tunables: &Tunables) -> Result<Vec<Light>, RoomError> {
        let mut lights = vec![
            Light::Ambient {
                color: rgb(0x555555),
                intensity: 1.0,
            },
            Light::Directional {
                color: rgb(0xffffff),
                intensity: 1.0,
                direction: (Vec3::new(0.0, 2.0, 0.0) - Vec3::new(5.0, 10.0, 0.0)).normalize(),
            },
            Light::Point {
                color: rgb(0xffffff),
                intensity: tunables.number("ceiling_light.intensity")?,
                position: self.ceiling_light,
                range: 100.0,
            },
            Light::Spot {
                color: rgb(tunables.color("spotlight.color")?),
                intensity: tunables.number("spotlight.intensity")?,
                position: SPOTLIGHT_POSITION,
                target: Vec3::new(
                    tunables.number("spotlight.target_x")?,
                    0.0,
                    tunables.number("spotlight.target_z")?,
                ),
                range: tunables.number("spotlight.limit_distance")?,
                angle: tunables.number("spotlight.angle")?,
                penumbra: tunables.number("spotlight.penumbra")?,
                decay: tunables.number("spotlight.decay")?,
            },
        ];
        if let Some((node, tip)) = self.candle {
            lights.push(Light::Point {
                color: rgb(0xffa500),
                intensity: 1.0,
                position: self.scene.world_matrix(node)?.transform_point3(tip),
                range: 0.5,
            });
        }
        lights.extend(self.outer_lights.iter().map(|&position| Light::Point {
            color: rgb(0xffffff),
            intensity: OUTER_LIGHT_INTENSITY,
            position,
            range: 100.0,
        }));
        Ok(lights)
    }
}

fn place(ctx: &mut BuildContext<'_>, skipped: &mut Vec<String>, object: &dyn NamedObject) -> Option<NodeId> {
    match object.build(ctx) {
        Ok(node) => Some(node),
        Err(err) => {
            tracing::warn!(object = object.name(), error = %err, "object skipped");
            skipped.push(object.name().to_string());
            None
        }
    }
}

fn associate(scene: &mut SceneGraph, parent: Option<NodeId>, child: Option<NodeId>) {
    if let (Some(parent), Some(child)) = (parent, child) {
        if let Err(err) = scene.associate(parent, child) {
            tracing::warn!(error = %err, "association skipped");
        }
    }
}

fn translate(scene: &mut SceneGraph, node: Option<NodeId>, delta: Vec3) {
    if let Some(node) = node {
        if let Err(err) = scene.translate(node, delta) {
            tracing::warn!(error = %err, "translation skipped");
        }
    }
}

/// Turn `node` and its associated nodes about +Y.
fn rotate(scene: &mut SceneGraph, node: Option<NodeId>, angle: f32) {
    if let Some(node) = node {
        if let Err(err) = scene.rotate(node, Vec3::Y, angle) {
            tracing::warn!(error = %err, "rotation skipped");
        }
    }
}

fn rgb(packed: u32) -> [f32; 3] {
    let [r, g, b, _] = unpack_rgb(packed);
    [r, g, b]
}

/// A room object that can report its name when it fails.
trait NamedObject: RoomObject {
    fn name(&self) -> &str;
}

macro_rules! named {
    ($($ty:ty),*) => {
        $(impl NamedObject for $ty {
            fn name(&self) -> &str {
                &self.name
            }
        })*
    };
}

named!(
    Floor, Wall, JailWall, CeilingLight, Table, Plate, Cake, Candle, Flame, Blanket, Newspaper,
    FlowerJar, Flower, HelicalSpring, Stool, Toilet, Bed, Sink, Spotlight, Painting, BeetleTubes,
    Mirror
);
