//! Whitted Renderer - recursive CPU ray tracing.
//!
//! Traces primary rays through a hierarchical scene of spheres and BVH-accelerated
//! triangle meshes, shading hits with direct Phong lighting, hard shadows, mirror
//! reflection and Fresnel-weighted refraction. Image rows are rendered in parallel on a
//! rayon pool.
//!
//! ```no_run
//! use std::sync::Arc;
//! use whitted_core::{Background, Color, Light, Material};
//! use whitted_math::Vec3;
//! use whitted_renderer::{render, Camera, RenderSettings, Scene, Sphere};
//!
//! let scene = Scene::new(Camera::new(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y, 60.0))
//!     .with_background(Background::basic_sky())
//!     .with_object(Sphere::new(Vec3::ZERO, 1.0).with_material(Arc::new(Material::phong(Color::ONE))))
//!     .with_light(Light::directional(Vec3::NEG_Y, 1.0));
//!
//! let output = render(&scene, &RenderSettings::default()).unwrap();
//! println!("{}", output.stats);
//! ```

mod bvh;
mod camera;
mod error;
mod framebuffer;
mod integrator;
mod intersection;
mod renderer;
mod scene;
mod scene_graph;
mod settings;
mod sphere;
mod stats;
mod triangle;
mod triangle_mesh;

pub use bvh::{Bvh, BvhNode, TriangleInfo};
pub use camera::{Camera, CameraSettings};
pub use error::{RenderError, RenderResult};
pub use framebuffer::{color_to_rgba, Framebuffer};
pub use integrator::{Integrator, NormalIntegrator, TraceContext, WhittedIntegrator};
pub use intersection::{Intersection, Surface};
pub use renderer::{render, render_pixel, render_with, RenderOutput};
pub use scene::{Scene, DEFAULT_SHADOW_BIAS};
pub use scene_graph::{SceneNode, SceneObject};
pub use settings::{RenderSettings, MAX_TRACE_DEPTH};
pub use sphere::Sphere;
pub use stats::{RenderStats, StatsSnapshot};
pub use triangle::{intersect_triangle, TriangleHit};
pub use triangle_mesh::TriangleMesh;
