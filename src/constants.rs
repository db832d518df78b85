pub const HOURS_PER_DAY: f64 = 24.0;

pub const CLOCK_FACE: ClockFaceSettings = ClockFaceSettings {
    window_size: 600.0,
    degrees_per_hour: 15.0,
    midnight_angle: 90.0,
    weight_extent_fraction: 1.0 / 12.0,
    angle_units_per_degree: 16.0,
};

pub const OVERLAY_FRACTIONS: [f64; 5] = [0.2, 0.4, 0.6, 0.8, 1.0];

pub const WEIGHT_SETTINGS: WeightSettings = WeightSettings {
    min: 0.0,
    max: 10.0,
    activity_default: 5.0,
    legacy_fallback: 10.0,
};

pub const DEFAULT_CATEGORY_COLOR: &str = "#00FFFFFF";

pub const FILE_NAMES: FileNames = FileNames {
    preferences: "preferences.json",
    tabular_extension: "csv",
    compact_extension: "txt",
    backups_dir: "backups",
};

pub const MAX_BACKUPS_PER_FILE: usize = 10;

pub const UI_SETTINGS: UiSettings = UiSettings {
    poll_ms: 50,
    fill_step_degrees: 0.75,
    canvas_percent: 60,
};

pub struct ClockFaceSettings {
    pub window_size: f64,
    pub degrees_per_hour: f64,
    pub midnight_angle: f64,
    pub weight_extent_fraction: f64,
    pub angle_units_per_degree: f64,
}

pub struct WeightSettings {
    pub min: f64,
    pub max: f64,
    pub activity_default: f64,
    pub legacy_fallback: f64,
}

pub struct FileNames {
    pub preferences: &'static str,
    pub tabular_extension: &'static str,
    pub compact_extension: &'static str,
    pub backups_dir: &'static str,
}

pub struct UiSettings {
    pub poll_ms: u64,
    pub fill_step_degrees: f64,
    pub canvas_percent: u16,
}
