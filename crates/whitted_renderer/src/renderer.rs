//! Row-parallel image rendering.
//!
//! Each image row is an independent unit of work on the rayon pool. A row owns its slice
//! of the framebuffer and its own jitter RNG, so the only shared mutable state is the
//! atomic [`RenderStats`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::framebuffer::color_to_rgba;
use crate::{
    Camera, Framebuffer, Integrator, RenderResult, RenderSettings, RenderStats, Scene,
    StatsSnapshot, TraceContext, WhittedIntegrator,
};
use whitted_core::Color;

/// Result of a finished render.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub framebuffer: Framebuffer,
    pub stats: StatsSnapshot,
    pub elapsed: Duration,
}

/// Render the scene with Whitted shading.
pub fn render(scene: &Scene, settings: &RenderSettings) -> RenderResult<RenderOutput> {
    render_with(scene, settings, &WhittedIntegrator)
}

/// Render the scene with a custom integrator.
pub fn render_with<I: Integrator + ?Sized>(
    scene: &Scene,
    settings: &RenderSettings,
    integrator: &I,
) -> RenderResult<RenderOutput> {
    settings.validate()?;
    scene.warn_degenerate_materials();

    let camera = scene.camera.with_aspect(settings.aspect());
    let stats = RenderStats::new();
    let mut framebuffer = Framebuffer::new(settings.width, settings.height);
    let ctx = TraceContext {
        scene,
        settings,
        stats: &stats,
    };

    let pool = match settings.threads {
        Some(threads) => Some(
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?,
        ),
        None => None,
    };
    let threads = pool
        .as_ref()
        .map_or_else(rayon::current_num_threads, |p| p.current_num_threads());

    log::info!(
        "Rendering {}x{} with {} samples per pixel, max depth {}, {} threads",
        settings.width,
        settings.height,
        settings.samples_per_pixel(),
        settings.max_depth,
        threads
    );

    let start = Instant::now();
    let pixels = framebuffer.pixels_mut();
    match &pool {
        Some(pool) => pool.install(|| render_rows(pixels, &camera, &ctx, integrator)),
        None => render_rows(pixels, &camera, &ctx, integrator),
    }
    let elapsed = start.elapsed();

    let stats = stats.snapshot();
    log::info!("Render complete in {:.2?}: {}", elapsed, stats);

    Ok(RenderOutput {
        framebuffer,
        stats,
        elapsed,
    })
}

fn render_rows<I: Integrator + ?Sized>(
    pixels: &mut [[u8; 4]],
    camera: &Camera,
    ctx: &TraceContext<'_>,
    integrator: &I,
) {
    let width = ctx.settings.width as usize;
    let height = ctx.settings.height as usize;
    let report_every = (height / 10).max(1);
    let rows_done = AtomicUsize::new(0);

    pixels
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            render_row(y, row, camera, ctx, integrator);

            let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
            if done % report_every == 0 || done == height {
                log::debug!("Rendered {}/{} rows ({}%)", done, height, done * 100 / height);
            }
        });
}

/// Render one image row (`y = 0` is the top).
fn render_row<I: Integrator + ?Sized>(
    y: usize,
    row: &mut [[u8; 4]],
    camera: &Camera,
    ctx: &TraceContext<'_>,
    integrator: &I,
) {
    let settings = ctx.settings;
    let mut rng = row_rng(settings.seed, y);
    for (x, pixel) in row.iter_mut().enumerate() {
        let color = render_pixel(x as u32, y as u32, camera, ctx, integrator, &mut rng);
        *pixel = color_to_rgba(color);
    }
}

/// Average of `samples_per_axis^2` stratified, jittered samples of pixel `(x, y)`.
pub fn render_pixel<I: Integrator + ?Sized, R: Rng>(
    x: u32,
    y: u32,
    camera: &Camera,
    ctx: &TraceContext<'_>,
    integrator: &I,
    rng: &mut R,
) -> Color {
    let settings = ctx.settings;
    let n = settings.samples_per_axis;
    let width = settings.width as f32;
    let height = settings.height as f32;
    // Image rows run top to bottom, viewport v runs bottom to top
    let row_from_bottom = (settings.height - 1 - y) as f32;

    let mut pixel_color = Color::ZERO;
    for j in 0..n {
        for i in 0..n {
            let du = (i as f32 + rng.gen::<f32>()) / n as f32;
            let dv = (j as f32 + rng.gen::<f32>()) / n as f32;
            let u = (x as f32 + du) / width;
            let v = (row_from_bottom + dv) / height;

            let ray = camera.get_ray(u, v);
            ctx.stats.record_primary();
            pixel_color += integrator.ray_color(&ray, ctx, settings.max_depth, 1.0);
        }
    }

    pixel_color / settings.samples_per_pixel() as f32
}

/// Deterministic per-row generator, independent of which thread renders the row.
fn row_rng(seed: u64, row: usize) -> StdRng {
    StdRng::seed_from_u64(seed ^ (row as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}
