use glam::DVec2;

/// Previous smoothed position, the single-frame memory of the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SmootherState {
    pub prev: DVec2,
}

/// One exponential moving average step, applied per axis.
///
/// `smoothed = prev * factor + raw * (1 - factor)`. A factor of 0 passes the
/// raw input through. No clamping is done here.
pub fn update(state: SmootherState, raw: DVec2, factor: f64) -> (SmootherState, DVec2) {
    let smoothed = state.prev * factor + raw * (1.0 - factor);
    (SmootherState { prev: smoothed }, smoothed)
}

/// Maps a normalized `[0, 1]` landmark coordinate to `[-1, 1]`.
pub fn to_centered(coord: f64) -> f64 {
    (coord - 0.5) * 2.0
}

/// Wrist-position smoother owned by the frame loop.
#[derive(Debug, Clone, Copy)]
pub struct MotionSmoother {
    factor: f64,
    state: SmootherState,
}

impl Default for MotionSmoother {
    fn default() -> Self {
        Self {
            factor: 0.7,
            state: SmootherState::default(),
        }
    }
}

impl MotionSmoother {
    pub fn new(factor: f64) -> Self {
        Self {
            factor,
            ..Default::default()
        }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn state(&self) -> SmootherState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = SmootherState::default();
    }

    /// Smooths a raw centered position and stores the result for the next frame.
    pub fn filter(&mut self, raw: DVec2) -> DVec2 {
        let (state, smoothed) = update(self.state, raw, self.factor);
        self.state = state;
        smoothed
    }

    /// Smooths a normalized wrist landmark into screen-up control space.
    ///
    /// The vertical axis is inverted after smoothing so that a raised hand
    /// (smaller image y) gives a positive output y.
    pub fn track(&mut self, wrist_x: f64, wrist_y: f64) -> DVec2 {
        let raw = DVec2::new(to_centered(wrist_x), to_centered(wrist_y));
        let smoothed = self.filter(raw);
        // avoids -0.000
        DVec2::new(smoothed.x, 0.0 - smoothed.y)
    }
}
