use crate::MorphOperation;

/// Frame rate used when no animation document is loaded.
pub const DEFAULT_FRAME_RATE: f64 = 100.0;

/// Timing of the loaded animation, in frames.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnimationInfo {
    pub frame_rate: f64,
    pub in_point: f64,
    pub out_point: f64,
}

impl Default for AnimationInfo {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            in_point: 0.0,
            out_point: 0.0,
        }
    }
}

impl AnimationInfo {
    pub fn new(frame_rate: f64, in_point: f64, out_point: f64) -> Self {
        Self {
            frame_rate,
            in_point,
            out_point,
        }
    }

    pub fn total_frames(&self) -> f64 {
        self.out_point - self.in_point
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        if self.frame_rate > 0.0 {
            self.total_frames() / self.frame_rate
        } else {
            0.0
        }
    }

    pub fn time_to_frame(&self, time: f64) -> f64 {
        time * self.frame_rate
    }

    pub fn frame_to_time(&self, frame: f64) -> f64 {
        if self.frame_rate > 0.0 {
            frame / self.frame_rate
        } else {
            0.0
        }
    }
}

/// What the renderer should display: a time, optionally blended with other times.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationState {
    pub time: f64,
    pub morphs: Vec<MorphOperation>,
    pub info: AnimationInfo,
}

impl AnimationState {
    pub fn new(info: AnimationInfo) -> Self {
        Self {
            time: 0.0,
            morphs: Vec::new(),
            info,
        }
    }

    pub fn at(&self, time: f64) -> Self {
        Self {
            time,
            morphs: Vec::new(),
            info: self.info,
        }
    }
}

/// Produces the next displayed state from the current one.
pub trait AnimationDriver {
    fn advance(&mut self, state: &AnimationState, elapsed: f64) -> AnimationState;
}
