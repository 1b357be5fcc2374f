//! Stamps: rectangular height patches placed on the grid

use terrastamp_core::{StampId, Transform, Vec3};

use crate::array::Array2;
use crate::source::SourceHeightField;

/// World-space footprint of a stamp on the horizontal plane
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    /// Minimum corner, y is always 0
    pub min: Vec3,
    /// Maximum corner, y is always 0
    pub max: Vec3,
}

impl Footprint {
    /// Closed outline of the footprint at y = 0, first point repeated last
    pub fn outline(&self) -> [Vec3; 5] {
        [
            self.min,
            Vec3::new(self.min.x, 0.0, self.max.z),
            self.max,
            Vec3::new(self.max.x, 0.0, self.min.z),
            self.min,
        ]
    }

    pub fn contains(&self, x: f32, z: f32) -> bool {
        x >= self.min.x && x <= self.max.x && z >= self.min.z && z <= self.max.z
    }
}

/// Cache key of the resampled grid: it only changes with scale or grid geometry
#[derive(Clone, Copy, PartialEq)]
struct SampleKey {
    scale: Vec3,
    resolution_size_scale: f32,
}

/// A height patch placed in the world
pub struct Stamp {
    id: StampId,
    name: String,
    transform: Transform,
    source: Box<dyn SourceHeightField>,

    /// Footprint width in height-field index units
    pub width: f32,
    /// Vertical extent in world units
    pub height: f32,
    /// Footprint length in height-field index units
    pub length: f32,

    sample: Option<Array2<f32>>,
    sample_key: Option<SampleKey>,
    dirty: bool,
}

impl Stamp {
    /// New stamps start dirty so the next pass picks them up
    pub fn new(
        name: impl Into<String>,
        source: Box<dyn SourceHeightField>,
        transform: Transform,
    ) -> Self {
        Self {
            id: StampId::new(),
            name: name.into(),
            transform,
            source,
            width: 0.0,
            height: 0.0,
            length: 0.0,
            sample: None,
            sample_key: None,
            dirty: true,
        }
    }

    pub fn id(&self) -> StampId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Move or resize the stamp. Returns whether anything changed; a change
    /// marks the stamp dirty.
    pub fn set_transform(&mut self, position: Vec3, scale: Vec3) -> bool {
        let changed = position != self.transform.position || scale != self.transform.scale;
        if changed {
            self.transform.position = position;
            self.transform.scale = scale;
            self.dirty = true;
        }
        changed
    }

    /// Swap the height source; the cached sample is discarded
    pub fn set_source(&mut self, source: Box<dyn SourceHeightField>) {
        self.source = source;
        self.sample = None;
        self.sample_key = None;
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Clamp the scale to be non-negative, then derive width/height/length.
    pub fn update_data(&mut self, resolution_size_scale: f32) {
        self.transform.scale = self.transform.scale.max(Vec3::ZERO);
        let scale = self.transform.scale;
        self.width = scale.x / resolution_size_scale;
        self.height = scale.y;
        self.length = scale.z / resolution_size_scale;
    }

    /// Update derived dimensions and resample the source if the scale or
    /// the grid's resolution size scale changed since the last sample.
    pub fn refresh(&mut self, resolution_size_scale: f32) {
        self.update_data(resolution_size_scale);
        let key = SampleKey {
            scale: self.transform.scale,
            resolution_size_scale,
        };
        if self.sample_key != Some(key) {
            self.sample = Some(self.scaled_sample());
            self.sample_key = Some(key);
        }
    }

    /// Resample the source to `round(length) x round(width)` from scratch.
    pub fn scaled_sample(&self) -> Array2<f32> {
        let width = self.width.round().max(0.0) as usize;
        let length = self.length.round().max(0.0) as usize;
        if width == 0 || length == 0 {
            return Array2::filled(0, 0, 0.0);
        }
        Array2::from_fn(length, width, |j, i| {
            self.source
                .sample_bilinear(i as f32 / width as f32, j as f32 / length as f32)
        })
    }

    /// The cached sample converted to normalised grid heights
    /// (`sample * height / chunk_height`). `None` until `refresh` has run,
    /// and for stamps whose footprint rounds to zero area.
    pub fn height_data(&self, chunk_height: f32) -> Option<Array2<f32>> {
        let sample = self.sample.as_ref().filter(|s| !s.is_empty())?;
        let height_scale = self.height / chunk_height;
        Some(sample.map(|v| v * height_scale))
    }

    /// Axis-aligned footprint `[position - scale/2, position + scale/2]` on the XZ plane
    pub fn footprint(&self) -> Footprint {
        let mut radius = self.transform.scale * 0.5;
        radius.y = 0.0;
        let mut center = self.transform.position;
        center.y = 0.0;
        Footprint {
            min: center - radius,
            max: center + radius,
        }
    }
}

impl std::fmt::Debug for Stamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stamp")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("transform", &self.transform)
            .field("dirty", &self.dirty)
            .finish()
    }
}
