use crate::runtime::{AnimationDriver, AnimationInfo, AnimationState};
use crate::{Direction, LoopPolicy, Segment};

/// Loop events reported by a single advance of an endlessly looping clock.
pub const MAX_LOOP_EVENTS: f64 = 64.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PlaybackEventKind {
    Loop,
    Finish,
}

/// A segment boundary crossed during [`PlaybackClock::advance`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaybackEvent {
    pub kind: PlaybackEventKind,
    /// Seconds into the advanced interval at which the boundary was crossed.
    pub relative_time: f64,
}

/// Plays a segment of the animation with speed, direction and a loop budget.
#[derive(Clone, Debug)]
pub struct PlaybackClock {
    playing: bool,
    time: f64,
    speed: f64,
    direction: Direction,
    segment: Option<Segment>,
    loop_policy: LoopPolicy,
    /// `None` when looping forever.
    loops_remaining: Option<u32>,
    info: AnimationInfo,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackClock {
    /// A playing clock that loops forever over the whole animation.
    pub fn new() -> Self {
        Self {
            playing: true,
            time: 0.0,
            speed: 1.0,
            direction: Direction::Forward,
            segment: None,
            loop_policy: LoopPolicy::Infinite,
            loops_remaining: None,
            info: AnimationInfo::default(),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Pauses, rewinds to the start of the segment and restores the loop budget.
    pub fn stop(&mut self) {
        self.playing = false;
        self.time = self.effective_segment().start;
        self.set_loop_policy(self.loop_policy);
    }

    pub fn seek(&mut self, time: f64) {
        self.time = time;
    }

    pub fn seek_to_frame(&mut self, frame: f64) {
        self.time = self.info.frame_to_time(frame);
    }

    pub fn loop_between(&mut self, start: f64, end: f64) {
        self.segment = Some(Segment::new(start, end));
    }

    pub fn loop_between_frames(&mut self, start: f64, end: f64) {
        self.segment = Some(Segment::new(
            self.info.frame_to_time(start),
            self.info.frame_to_time(end),
        ));
    }

    pub fn segment(&self) -> Option<Segment> {
        self.segment
    }

    pub fn set_segment(&mut self, segment: Option<Segment>) {
        self.segment = segment;
    }

    /// The explicit segment, or the whole animation.
    pub fn effective_segment(&self) -> Segment {
        self.segment
            .unwrap_or_else(|| Segment::new(0.0, self.info.duration()))
    }

    pub fn segment_length(&self) -> f64 {
        self.effective_segment().length()
    }

    pub fn loop_policy(&self) -> LoopPolicy {
        self.loop_policy
    }

    /// Sets the policy and refills the loop budget.
    pub fn set_loop_policy(&mut self, policy: LoopPolicy) {
        self.loop_policy = policy;
        self.loops_remaining = match policy {
            LoopPolicy::Infinite => None,
            LoopPolicy::Count(n) => Some(n),
        };
    }

    pub fn loops_remaining(&self) -> Option<u32> {
        self.loops_remaining
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn current_frame(&self) -> f64 {
        self.info.time_to_frame(self.time)
    }

    /// Time relative to the segment start, clamped into the segment.
    pub fn time_in_segment(&self) -> f64 {
        self.to_segment_time(self.time)
    }

    pub fn set_time_in_segment(&mut self, time: f64) {
        self.time = self.effective_segment().start + time;
    }

    pub fn frame_in_segment(&self) -> f64 {
        self.info.time_to_frame(self.time_in_segment())
    }

    /// 0 at the segment start, 1 at its end, 0 for an empty segment.
    pub fn progress(&self) -> f64 {
        let length = self.segment_length();
        if length > 0.0 {
            self.time_in_segment() / length
        } else {
            0.0
        }
    }

    pub fn info(&self) -> &AnimationInfo {
        &self.info
    }

    pub fn frame_rate(&self) -> f64 {
        self.info.frame_rate
    }

    pub fn duration(&self) -> f64 {
        self.info.duration()
    }

    pub fn duration_frames(&self) -> f64 {
        self.info.time_to_frame(self.duration())
    }

    fn to_segment_time(&self, time: f64) -> f64 {
        let segment = self.effective_segment();
        (time - segment.start).max(0.0).min(segment.length())
    }

    /// Advances the playhead by `elapsed` seconds, appending crossed boundaries to `events`.
    ///
    /// Returns the new absolute time.
    pub fn advance(
        &mut self,
        info: &AnimationInfo,
        elapsed: f64,
        events: &mut Vec<PlaybackEvent>,
    ) -> f64 {
        self.info = *info;
        if !self.playing {
            return self.time;
        }

        let length = self.segment_length();
        let local = self.to_segment_time(self.time);
        let rate = self.speed * self.direction.sign();
        let mut new_local = local + elapsed * rate;

        if length > 0.0 {
            let mut crossings = (new_local / length).floor().abs();
            if self.loops_remaining.is_none() {
                crossings = crossings.min(MAX_LOOP_EVENTS);
            }
            let to_boundary = if rate < 0.0 { local } else { length - local };
            let step = rate.abs();

            let mut i = 0.0;
            while i < crossings {
                let relative_time = if step > 0.0 {
                    (to_boundary + i * length) / step
                } else {
                    0.0
                };
                if let Some(remaining) = self.loops_remaining.as_mut() {
                    *remaining = remaining.saturating_sub(1);
                }

                if self.loops_remaining != Some(0) {
                    events.push(PlaybackEvent {
                        kind: PlaybackEventKind::Loop,
                        relative_time,
                    });
                    if new_local >= length {
                        new_local -= length;
                    } else {
                        new_local += length;
                    }
                } else {
                    events.push(PlaybackEvent {
                        kind: PlaybackEventKind::Finish,
                        relative_time,
                    });
                    new_local = new_local.max(0.0).min(length);
                    self.playing = false;
                    break;
                }
                i += 1.0;
            }
            if self.loops_remaining.is_none() {
                new_local = new_local.rem_euclid(length);
            }
        } else {
            new_local = 0.0;
            events.push(PlaybackEvent {
                kind: PlaybackEventKind::Loop,
                relative_time: 0.0,
            });
        }

        self.time = self.effective_segment().start + new_local;
        self.time
    }
}

impl AnimationDriver for PlaybackClock {
    fn advance(&mut self, state: &AnimationState, elapsed: f64) -> AnimationState {
        let mut events = Vec::new();
        let time = PlaybackClock::advance(self, &state.info, elapsed, &mut events);
        state.at(time)
    }
}
