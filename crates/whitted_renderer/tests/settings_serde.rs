use serde_json::json;
use whitted_core::{Attenuation, Background, Color, Light};
use whitted_math::Vec3;
use whitted_renderer::{CameraSettings, RenderError, RenderSettings};

#[test]
fn render_settings_round_trip() -> anyhow::Result<()> {
    let settings = RenderSettings::default()
        .with_resolution(320, 200)
        .with_samples_per_axis(3)
        .with_max_depth(6)
        .with_threads(2);

    let text = serde_json::to_string_pretty(&settings)?;
    let back: RenderSettings = serde_json::from_str(&text)?;
    assert_eq!(back, settings);
    Ok(())
}

#[test]
fn partial_settings_fill_in_defaults() -> anyhow::Result<()> {
    let settings: RenderSettings = serde_json::from_value(json!({
        "width": 64,
        "height": 48,
        "shadows": false
    }))?;

    let defaults = RenderSettings::default();
    assert_eq!(settings.width, 64);
    assert_eq!(settings.height, 48);
    assert!(!settings.shadows);
    assert_eq!(settings.samples_per_axis, defaults.samples_per_axis);
    assert_eq!(settings.max_depth, defaults.max_depth);
    assert_eq!(settings.min_weight, defaults.min_weight);
    assert_eq!(settings.threads, None);
    settings.validate()?;
    Ok(())
}

#[test]
fn deserialized_settings_are_still_validated() -> anyhow::Result<()> {
    let settings: RenderSettings = serde_json::from_value(json!({ "samples_per_axis": 0 }))?;
    assert!(matches!(settings.validate(), Err(RenderError::ZeroSamples)));

    let settings: RenderSettings = serde_json::from_value(json!({ "max_depth": 100000 }))?;
    assert!(matches!(
        settings.validate(),
        Err(RenderError::DepthTooLarge { .. })
    ));
    Ok(())
}

#[test]
fn lights_are_tagged_by_kind() -> anyhow::Result<()> {
    let light: Light = serde_json::from_value(json!({
        "type": "point",
        "position": [0.0, 5.0, 0.0],
        "color": [1.0, 0.5, 0.25],
        "intensity": 2.0
    }))?;
    assert_eq!(
        light,
        Light::Point {
            position: Vec3::new(0.0, 5.0, 0.0),
            color: Color::new(1.0, 0.5, 0.25),
            intensity: 2.0,
            attenuation: Attenuation::default(),
        }
    );

    let sun = Light::directional(Vec3::new(0.0, -1.0, -1.0), 0.8);
    let value = serde_json::to_value(&sun)?;
    assert_eq!(value["type"], "directional");
    assert_eq!(serde_json::from_value::<Light>(value)?, sun);
    Ok(())
}

#[test]
fn background_and_camera_round_trip() -> anyhow::Result<()> {
    let sky: Background = serde_json::from_value(json!({
        "type": "gradient",
        "sky": [0.1, 0.2, 0.9],
        "ground": [1.0, 1.0, 1.0]
    }))?;
    assert_eq!(
        sky,
        Background::Gradient {
            sky: Color::new(0.1, 0.2, 0.9),
            ground: Color::ONE,
        }
    );

    let camera = CameraSettings {
        look_from: Vec3::new(0.0, 1.0, 4.0),
        look_at: Vec3::ZERO,
        up: Vec3::Y,
        vfov: 45.0,
    };
    let back: CameraSettings = serde_json::from_str(&serde_json::to_string(&camera)?)?;
    assert_eq!(back, camera);
    Ok(())
}
