use std::sync::Arc;

use whitted_core::{Background, Color, Light, Material, MeshData, PhongMaterial};
use whitted_math::{Mat4, Vec3};
use whitted_renderer::{
    color_to_rgba, render, render_with, Camera, NormalIntegrator, RenderSettings, Scene, SceneNode,
    Sphere, TriangleMesh,
};

const BACKGROUND: Color = Color::new(0.2, 0.3, 0.4);

fn unit_sphere_scene() -> Scene {
    Scene::new(Camera::new(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y, 60.0))
        .with_background(Background::solid(BACKGROUND))
        .with_object(Sphere::new(Vec3::ZERO, 1.0))
        .with_light(Light::directional(Vec3::NEG_Y, 1.0))
}

#[test]
fn sphere_is_visible_at_center_and_background_at_corners() {
    let _ = env_logger::builder().is_test(true).try_init();

    let scene = unit_sphere_scene();
    let settings = RenderSettings::default()
        .with_resolution(33, 33)
        .with_samples_per_axis(1);
    let output = render(&scene, &settings).unwrap();
    let fb = &output.framebuffer;

    let background = color_to_rgba(BACKGROUND);
    assert_ne!(fb.pixel(16, 16), background);
    for (x, y) in [(0, 0), (32, 0), (0, 32), (32, 32)] {
        assert_eq!(fb.pixel(x, y), background, "corner ({x}, {y})");
    }

    assert_eq!(output.stats.primary_rays, 33 * 33);
    assert!(output.stats.shadow_rays > 0);
}

#[test]
fn lit_top_is_brighter_than_unlit_front() {
    let scene = Scene::new(Camera::new(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y, 60.0))
        .with_background(Background::solid(Color::ZERO))
        .with_object(
            Sphere::new(Vec3::ZERO, 1.0)
                .with_material(Arc::new(Material::lambertian(Color::ONE))),
        )
        .with_light(Light::directional(Vec3::NEG_Y, 1.0));
    let settings = RenderSettings::default()
        .with_resolution(41, 41)
        .with_samples_per_axis(1);
    let fb = render(&scene, &settings).unwrap().framebuffer;

    // Near the top of the sphere silhouette vs. the center facing the camera
    let top = fb.pixel(20, 8);
    let center = fb.pixel(20, 20);
    assert!(top[0] > center[0], "top {top:?} center {center:?}");
}

#[test]
fn transformed_mesh_floor_receives_shadow() {
    // Floor quad at y = -1 under a small sphere, lit diagonally so the shadow falls
    // beside the sphere as seen from straight above
    let floor = MeshData::from_triangles(
        vec![
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, 1.0),
        ],
        vec![[0, 2, 1], [0, 3, 2]],
    )
    .unwrap();
    let floor_node = SceneNode::new()
        .with_transform(
            Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0)) * Mat4::from_scale(Vec3::splat(5.0)),
        )
        .with_material(Arc::new(Material::lambertian(Color::ONE)))
        .with_child(TriangleMesh::build(floor).unwrap());

    let scene = Scene::new(Camera::new(
        Vec3::new(0.0, 6.0, 0.01),
        Vec3::ZERO,
        Vec3::Y,
        60.0,
    ))
    .with_background(Background::solid(Color::ZERO))
    .with_object(floor_node)
    .with_object(Sphere::new(Vec3::ZERO, 0.5))
    .with_light(Light::directional(Vec3::new(1.0, -1.0, 0.0), 1.0));

    let settings = RenderSettings::default()
        .with_resolution(41, 41)
        .with_samples_per_axis(1);
    let fb = render(&scene, &settings).unwrap().framebuffer;

    // Floor at x ~ -3.5 is lit; floor at x ~ 1 lies in the sphere's shadow
    let lit = fb.pixel(2, 20);
    let shadowed = fb.pixel(25, 20);
    assert!(lit[0] > 150, "lit {lit:?}");
    assert!(shadowed[0] < 40, "shadowed {shadowed:?}");

    let no_shadows = RenderSettings {
        shadows: false,
        ..settings.clone()
    };
    let unshadowed = render(&scene, &no_shadows).unwrap();
    assert_eq!(unshadowed.stats.shadow_rays, 0);
    assert!(unshadowed.framebuffer.pixel(25, 20)[0] > 150);
}

#[test]
fn glass_sphere_shows_refracted_background() {
    let glass = PhongMaterial::new(Color::ONE)
        .with_coefficients(1.0, 0.0, 0.0)
        .with_refraction(1.0, 1.5);
    let scene = Scene::new(Camera::new(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y, 60.0))
        .with_background(Background::basic_sky())
        .with_object(Sphere::new(Vec3::ZERO, 1.0).with_material(Arc::new(glass.into())));
    let settings = RenderSettings::default()
        .with_resolution(21, 21)
        .with_samples_per_axis(1);

    let output = render(&scene, &settings).unwrap();
    assert!(output.stats.refraction_rays > 0);

    let refractionless = RenderSettings {
        refractions: false,
        ..settings
    };
    let opaque = render(&scene, &refractionless).unwrap();
    assert_eq!(opaque.stats.refraction_rays, 0);
    assert_ne!(output.framebuffer, opaque.framebuffer);
}

#[test]
fn normal_view_matches_facing_normal() {
    let scene = unit_sphere_scene();
    let settings = RenderSettings::default()
        .with_resolution(21, 21)
        .with_samples_per_axis(1);
    let output = render_with(&scene, &settings, &NormalIntegrator).unwrap();

    // Center pixel sees the +Z pole: (0.5, 0.5, 1.0)
    let [r, g, b, a] = output.framebuffer.pixel(10, 10);
    assert!((r as i32 - 127).abs() <= 12);
    assert!((g as i32 - 127).abs() <= 12);
    assert!(b >= 250);
    assert_eq!(a, 255);
}
