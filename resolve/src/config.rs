/// Minimum face-match similarity. Face recognition is the highest-precision
/// signal, so it runs first and at a lower bar.
pub const DEFAULT_FACE_THRESHOLD: f32 = 0.65;

/// Minimum body re-id similarity. Body appearance is a weaker, more
/// ambiguous signal, so the bar is higher.
pub const DEFAULT_REID_THRESHOLD: f32 = 0.86;

/// Default EMA weight on the new observation.
pub const DEFAULT_EMA_ALPHA: f32 = 0.30;

/// Default embedding dimension for both modalities.
pub const DEFAULT_DIM: usize = 512;

/// Controls resolver behavior. Read once at startup, never mutated.
#[derive(Debug, Clone, Copy)]
pub struct ResolverConfig {
    /// Minimum similarity for a face-index candidate to win.
    pub face_threshold: f32,

    /// Minimum similarity for a body-index candidate to win.
    pub reid_threshold: f32,

    /// Weight of the new observation in the EMA fusion blend.
    pub ema_alpha: f32,

    /// Required embedding dimension for both modalities.
    pub dim: usize,
}

impl ResolverConfig {
    /// Replaces zero fields with their defaults.
    pub fn with_defaults(mut self) -> Self {
        if self.face_threshold == 0.0 {
            self.face_threshold = DEFAULT_FACE_THRESHOLD;
        }
        if self.reid_threshold == 0.0 {
            self.reid_threshold = DEFAULT_REID_THRESHOLD;
        }
        if self.ema_alpha == 0.0 {
            self.ema_alpha = DEFAULT_EMA_ALPHA;
        }
        if self.dim == 0 {
            self.dim = DEFAULT_DIM;
        }
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            face_threshold: DEFAULT_FACE_THRESHOLD,
            reid_threshold: DEFAULT_REID_THRESHOLD,
            ema_alpha: DEFAULT_EMA_ALPHA,
            dim: DEFAULT_DIM,
        }
    }
}
