//! Radial layout of a day schedule.
//!
//! Midnight sits at the top of the dial and time runs clockwise at 15° per
//! hour. Angles follow the counter-clockwise-from-east convention, so
//! clockwise sweeps have negative spans. Canvas coordinates have their
//! origin in the top-left corner with y growing downwards.
//!
//! Everything here is a pure function of its inputs.

use serde::Serialize;

use crate::{
    constants::{CLOCK_FACE, OVERLAY_FRACTIONS, WEIGHT_SETTINGS},
    domain::{Activity, Schedule},
    preferences::{Preferences, Rgba},
};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RenderConfig {
    pub window_size: f64,
    pub show_labels: bool,
    pub rotate_labels: bool,
    pub show_overlay: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::from_preferences(&Preferences::default())
    }
}

impl RenderConfig {
    pub fn from_preferences(preferences: &Preferences) -> Self {
        Self {
            window_size: CLOCK_FACE.window_size,
            show_labels: preferences.show_labels,
            rotate_labels: preferences.rotate_labels,
            show_overlay: preferences.show_overlay,
        }
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.window_size / 2.0,
            y: self.window_size / 2.0,
        }
    }

    /// Side of the square bounding a full circle drawn at `weight`.
    pub fn extent_for_weight(&self, weight: f64) -> f64 {
        weight * CLOCK_FACE.weight_extent_fraction * self.window_size
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WedgeGeometry {
    pub center: Point,
    /// Degrees, counter-clockwise from east.
    pub start_angle: f64,
    /// Degrees; negative for a clockwise sweep.
    pub span_angle: f64,
    pub extent: f64,
    pub radius: f64,
    pub weight: f64,
    pub color: Rgba,
}

impl WedgeGeometry {
    pub fn mid_angle(&self) -> f64 {
        self.start_angle + self.span_angle / 2.0
    }

    /// Start angle in 1/16th of a degree.
    pub fn start_angle_units(&self) -> i32 {
        (self.start_angle * CLOCK_FACE.angle_units_per_degree).round() as i32
    }

    /// Span angle in 1/16th of a degree.
    pub fn span_angle_units(&self) -> i32 {
        (self.span_angle * CLOCK_FACE.angle_units_per_degree).round() as i32
    }

    pub fn point_at(&self, angle: f64, distance: f64) -> Point {
        polar_point(self.center, angle, distance)
    }

    /// Points along the outer arc, from start to end, at most `step` degrees
    /// apart. Both ends are always included.
    pub fn arc_points(&self, step: f64) -> Vec<Point> {
        let step = if step > 0.0 { step } else { 1.0 };
        let segments = (self.span_angle.abs() / step).ceil().max(1.0) as usize;
        (0..=segments)
            .map(|i| {
                let angle = self.start_angle + self.span_angle * i as f64 / segments as f64;
                self.point_at(angle, self.radius)
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabelGeometry {
    pub text: String,
    pub position: Point,
    /// Clockwise degrees in `[0, 360)`, present when rotation is enabled.
    pub rotation: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayoutItem {
    /// Row of the source activity in the schedule.
    pub activity_index: usize,
    pub wedge: WedgeGeometry,
    pub label: Option<LabelGeometry>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct OverlayRing {
    pub center: Point,
    pub radius: f64,
    pub fraction: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Layout {
    /// Drawn first, beneath every wedge.
    pub rings: Vec<OverlayRing>,
    /// In schedule order, which is also paint order.
    pub items: Vec<LayoutItem>,
}

pub fn compute_layout(
    schedule: &Schedule,
    preferences: &Preferences,
    config: &RenderConfig,
) -> Layout {
    let rings = if config.show_overlay {
        overlay_rings(config)
    } else {
        Vec::new()
    };

    let items = schedule
        .activities
        .iter()
        .enumerate()
        .filter_map(|(index, activity)| layout_activity(index, activity, preferences, config))
        .collect();

    Layout { rings, items }
}

pub fn overlay_rings(config: &RenderConfig) -> Vec<OverlayRing> {
    let center = config.center();
    OVERLAY_FRACTIONS
        .iter()
        .map(|&fraction| OverlayRing {
            center,
            radius: config.extent_for_weight(fraction * WEIGHT_SETTINGS.max) / 2.0,
            fraction,
        })
        .collect()
}

fn layout_activity(
    activity_index: usize,
    activity: &Activity,
    preferences: &Preferences,
    config: &RenderConfig,
) -> Option<LayoutItem> {
    let (start, end) = activity.bounds()?;
    let style = preferences.resolve_style(activity);
    let weight = style.weight.clamp(WEIGHT_SETTINGS.min, WEIGHT_SETTINGS.max);
    let extent = config.extent_for_weight(weight);

    let wedge = WedgeGeometry {
        center: config.center(),
        start_angle: hour_to_angle(start),
        span_angle: -CLOCK_FACE.degrees_per_hour * (end - start),
        extent,
        radius: extent / 2.0,
        weight,
        color: style.color,
    };

    let label = config
        .show_labels
        .then(|| label_for(activity, start, &wedge, config.rotate_labels));

    Some(LayoutItem {
        activity_index,
        wedge,
        label,
    })
}

fn label_for(
    activity: &Activity,
    start: f64,
    wedge: &WedgeGeometry,
    rotate: bool,
) -> LabelGeometry {
    let mid_angle = wedge.mid_angle();
    let rotation = rotate.then(|| {
        let flip = if start >= 12.0 { 180.0 } else { 0.0 };
        (flip - mid_angle).rem_euclid(360.0)
    });

    LabelGeometry {
        text: activity.name.clone(),
        position: wedge.point_at(mid_angle, wedge.radius / 2.0),
        rotation,
    }
}

pub fn hour_to_angle(hour: f64) -> f64 {
    CLOCK_FACE.midnight_angle - hour * CLOCK_FACE.degrees_per_hour
}

fn polar_point(center: Point, angle: f64, distance: f64) -> Point {
    let radians = angle.to_radians();
    Point {
        x: center.x + distance * radians.cos(),
        y: center.y - distance * radians.sin(),
    }
}
