/// Parameters for one tape build run.
#[derive(Debug, Clone, PartialEq)]
pub struct TapeSettings {
    /// Width of each marking strip.
    pub width: f64,
    /// Extrusion height of each strip.
    pub height: f64,
    /// Vertical offset applied to each panel before extrusion.
    pub elevation: f64,
    /// Canonical material name for tape faces.
    pub material: String,
}

impl Default for TapeSettings {
    fn default() -> Self {
        Self {
            width: 0.05,
            height: 0.10,
            elevation: 0.005,
            material: "zone tape".to_owned(),
        }
    }
}
