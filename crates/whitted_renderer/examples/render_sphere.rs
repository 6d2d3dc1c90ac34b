//! Whitted ray tracer example.
//!
//! Renders a glass sphere, a mirror sphere and a checkered diffuse sphere over a
//! transformed mesh floor and saves the result as PNG.
//!
//! ```text
//! RUST_LOG=info cargo run --release --example render_sphere -- out.png
//! ```

use std::sync::Arc;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use whitted_core::{Background, Color, Light, Material, MeshData, PhongMaterial, TextureMap};
use whitted_math::{Mat4, Vec3};
use whitted_renderer::{render, Camera, RenderSettings, Scene, SceneNode, Sphere, TriangleMesh};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "whitted.png".to_string());

    let start = std::time::Instant::now();
    let scene = build_scene()?;
    log::info!("Scene built in {:?}", start.elapsed());

    let settings = RenderSettings::default()
        .with_resolution(800, 450)
        .with_samples_per_axis(3)
        .with_max_depth(8);

    let output = render(&scene, &settings)?;
    log::info!("Rendered in {:?}: {}", output.elapsed, output.stats);

    output
        .framebuffer
        .to_image()
        .save(&path)
        .with_context(|| format!("saving {path}"))?;
    log::info!("Saved to {path}");
    Ok(())
}

fn build_scene() -> anyhow::Result<Scene> {
    let camera = Camera::new(
        Vec3::new(0.0, 2.0, 7.0),
        Vec3::new(0.0, 0.5, 0.0),
        Vec3::Y,
        40.0,
    );

    let glass: Material = PhongMaterial::new(Color::ONE)
        .with_coefficients(0.1, 0.4, 0.0)
        .with_exponent(80.0)
        .with_refraction(0.9, 1.5)
        .into();
    let checker: Material = PhongMaterial::new(Color::ONE)
        .with_diffuse_map(Arc::new(TextureMap::checker()))
        .into();

    let mut scene = Scene::new(camera)
        .with_background(Background::basic_sky())
        .with_light(Light::directional(Vec3::new(-1.0, -2.0, -1.0), 0.9))
        .with_light(Light::point(Vec3::new(3.0, 5.0, 4.0), 1.5))
        .with_object(floor()?)
        .with_object(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0).with_material(Arc::new(glass)))
        .with_object(
            Sphere::new(Vec3::new(-2.2, 1.0, -0.5), 1.0)
                .with_material(Arc::new(Material::metal(Color::new(0.8, 0.8, 0.9), 0.9))),
        )
        .with_object(Sphere::new(Vec3::new(2.2, 1.0, -0.5), 1.0).with_material(Arc::new(checker)));

    // A handful of small diffuse spheres scattered on the floor
    let mut rng = StdRng::seed_from_u64(2024);
    let mut pebbles = SceneNode::new();
    for _ in 0..12 {
        let center = Vec3::new(rng.gen_range(-4.0..4.0), 0.25, rng.gen_range(-3.0..2.5));
        let albedo = Color::new(rng.gen(), rng.gen(), rng.gen()) * 0.8;
        pebbles.add(
            Sphere::new(center, 0.25).with_material(Arc::new(Material::lambertian(albedo))),
        );
    }
    scene = scene.with_object(pebbles);

    Ok(scene)
}

/// Unit quad in the y = 0 plane, scaled up into a floor.
fn floor() -> anyhow::Result<SceneNode> {
    let mut quad = MeshData::from_triangles(
        vec![
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, 1.0),
        ],
        vec![[0, 2, 1], [0, 3, 2]],
    )?;
    quad.compute_smooth_normals();

    Ok(SceneNode::new()
        .with_transform(Mat4::from_scale(Vec3::new(8.0, 1.0, 8.0)))
        .with_material(Arc::new(Material::lambertian(Color::splat(0.6))))
        .with_child(TriangleMesh::build(quad)?))
}
