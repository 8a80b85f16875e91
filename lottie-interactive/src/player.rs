use crate::runtime::{
    AnimationInfo, AnimationState, PlaybackClock, PlaybackEvent, PlaybackEventKind,
};
use crate::{
    Direction, Error, EventEmitter, Interactivity, LoopPolicy, LottieDocument, MorphOperation,
};

/// Initial playback settings of a [`Player`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlayerConfig {
    pub autoplay: bool,
    pub loop_policy: LoopPolicy,
    pub speed: f64,
    pub direction: Direction,
    /// Scales every elapsed interval handed to [`Player::tick`].
    pub time_multiplier: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            autoplay: true,
            loop_policy: LoopPolicy::Infinite,
            speed: 1.0,
            direction: Direction::Forward,
            time_multiplier: 1.0,
        }
    }
}

/// Payload of the per-tick time notification.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeEvent {
    /// Displayed time after the tick.
    pub playhead: f64,
    /// Real seconds ticked since the player was created.
    pub clock: f64,
    /// Animation seconds advanced by this tick.
    pub elapsed: f64,
}

/// The renderer side of a player.
pub trait FrameSink {
    fn render_frame(&mut self, time: f64);
    fn set_morphs(&mut self, morphs: &[MorphOperation]);
}

enum Mode {
    Playback,
    Interactive(Box<Interactivity>),
}

/// Drives a renderer either by plain playback or by an interactivity definition.
pub struct Player {
    config: PlayerConfig,
    document: Option<LottieDocument>,
    playback: PlaybackClock,
    mode: Mode,
    interactive_playing: bool,
    state: AnimationState,
    rendered: Option<AnimationState>,
    clock: f64,
    time_event: EventEmitter<TimeEvent>,
    loop_event: EventEmitter<()>,
    finish_event: EventEmitter<()>,
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("interactive", &self.is_interactive())
            .field("state", &self.state)
            .field("clock", &self.clock)
            .finish()
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(PlayerConfig::default())
    }
}

impl Player {
    pub fn new(config: PlayerConfig) -> Self {
        let mut playback = PlaybackClock::new();
        playback.set_playing(config.autoplay);
        playback.set_loop_policy(config.loop_policy);
        playback.set_speed(config.speed);
        playback.set_direction(config.direction);

        Self {
            config,
            document: None,
            playback,
            mode: Mode::Playback,
            interactive_playing: config.autoplay,
            state: AnimationState::default(),
            rendered: None,
            clock: 0.0,
            time_event: EventEmitter::new(),
            loop_event: EventEmitter::new(),
            finish_event: EventEmitter::new(),
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Loads a document. An interactive document switches the player to interactive mode.
    pub fn load(&mut self, document: LottieDocument) -> Result<(), Error> {
        self.state.info = document.info;
        let interactive = document.interactivity.is_some();
        self.document = Some(document);
        self.rendered = None;

        if let Mode::Interactive(interactivity) = &mut self.mode {
            return interactivity.set_document(self.document.clone());
        }
        if interactive {
            self.to_interactive()
        } else {
            Ok(())
        }
    }

    pub fn document(&self) -> Option<&LottieDocument> {
        self.document.as_ref()
    }

    pub fn info(&self) -> &AnimationInfo {
        &self.state.info
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self.mode, Mode::Interactive(_))
    }

    /// Switches to interactive mode. Does nothing if already interactive.
    pub fn to_interactive(&mut self) -> Result<(), Error> {
        if self.is_interactive() {
            return Ok(());
        }
        let interactivity = Interactivity::new(self.document.clone())?;
        self.mode = Mode::Interactive(Box::new(interactivity));
        Ok(())
    }

    /// Switches back to plain playback, dropping the interactive state without ending any
    /// transition in flight.
    pub fn to_playback(&mut self) {
        self.mode = Mode::Playback;
    }

    pub fn interactivity(&self) -> Option<&Interactivity> {
        match &self.mode {
            Mode::Interactive(interactivity) => Some(interactivity),
            Mode::Playback => None,
        }
    }

    pub fn interactivity_mut(&mut self) -> Option<&mut Interactivity> {
        match &mut self.mode {
            Mode::Interactive(interactivity) => Some(interactivity),
            Mode::Playback => None,
        }
    }

    pub fn playback(&self) -> &PlaybackClock {
        &self.playback
    }

    pub fn play(&mut self) {
        self.playback.play();
        self.interactive_playing = true;
    }

    pub fn pause(&mut self) {
        self.playback.pause();
        self.interactive_playing = false;
    }

    pub fn stop(&mut self) {
        self.playback.stop();
        self.interactive_playing = false;
    }

    pub fn is_playing(&self) -> bool {
        match self.mode {
            Mode::Playback => self.playback.is_playing(),
            Mode::Interactive(_) => self.interactive_playing,
        }
    }

    /// Seeks the playback clock, clamped into the animation. The last frame is exclusive.
    pub fn seek(&mut self, time: f64) {
        let duration = self.duration();
        let time = if time < 0.0 {
            0.0
        } else if time >= duration {
            (duration - 1.0e-6).max(0.0)
        } else {
            time
        };
        self.playback.seek(time);
    }

    pub fn seek_to_frame(&mut self, frame: f64) {
        self.seek(self.state.info.frame_to_time(frame));
    }

    pub fn loop_between(&mut self, start: f64, end: f64) {
        self.playback.loop_between(start, end);
    }

    pub fn loop_between_frames(&mut self, start: f64, end: f64) {
        self.playback.loop_between(
            self.state.info.frame_to_time(start),
            self.state.info.frame_to_time(end),
        );
    }

    pub fn loop_policy(&self) -> LoopPolicy {
        self.playback.loop_policy()
    }

    pub fn set_loop_policy(&mut self, policy: LoopPolicy) {
        self.playback.set_loop_policy(policy);
    }

    pub fn speed(&self) -> f64 {
        self.playback.speed()
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.playback.set_speed(speed);
    }

    pub fn direction(&self) -> Direction {
        self.playback.direction()
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.playback.set_direction(direction);
    }

    pub fn time_multiplier(&self) -> f64 {
        self.config.time_multiplier
    }

    pub fn set_time_multiplier(&mut self, multiplier: f64) {
        self.config.time_multiplier = multiplier;
    }

    pub fn current_time(&self) -> f64 {
        match &self.mode {
            Mode::Playback => self.playback.time(),
            Mode::Interactive(interactivity) => interactivity.driver().current_time(),
        }
    }

    pub fn current_frame(&self) -> f64 {
        self.state.info.time_to_frame(self.current_time())
    }

    pub fn frame_rate(&self) -> f64 {
        self.state.info.frame_rate
    }

    pub fn duration(&self) -> f64 {
        self.state.info.duration()
    }

    pub fn duration_frames(&self) -> f64 {
        self.state.info.total_frames()
    }

    /// The last displayed state.
    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn time_event(&mut self) -> &mut EventEmitter<TimeEvent> {
        &mut self.time_event
    }

    pub fn loop_event(&mut self) -> &mut EventEmitter<()> {
        &mut self.loop_event
    }

    pub fn finish_event(&mut self) -> &mut EventEmitter<()> {
        &mut self.finish_event
    }

    /// Advances by `elapsed` real seconds and pushes the result to `sink`.
    ///
    /// Only a changed time is rendered, and the morph list is only pushed when it changed.
    pub fn tick<S: FrameSink + ?Sized>(&mut self, elapsed: f64, sink: &mut S) {
        if !(elapsed > 0.0) {
            return;
        }
        self.clock += elapsed;
        let scaled = elapsed * self.config.time_multiplier;

        let next = match &mut self.mode {
            Mode::Playback => {
                let mut events: Vec<PlaybackEvent> = Vec::new();
                let time = self.playback.advance(&self.state.info, scaled, &mut events);
                for event in &events {
                    match event.kind {
                        PlaybackEventKind::Loop => self.loop_event.emit(&()),
                        PlaybackEventKind::Finish => self.finish_event.emit(&()),
                    }
                }
                self.state.at(time)
            }
            Mode::Interactive(interactivity) => {
                if !self.interactive_playing {
                    return;
                }
                interactivity.advance(&self.state, scaled)
            }
        };

        self.present(next, sink);
        self.time_event.emit(&TimeEvent {
            playhead: self.current_time(),
            clock: self.clock,
            elapsed: scaled,
        });
    }

    /// Renders the current state unconditionally.
    pub fn refresh<S: FrameSink + ?Sized>(&mut self, sink: &mut S) {
        self.rendered = None;
        self.present(self.state.clone(), sink);
    }

    fn present<S: FrameSink + ?Sized>(&mut self, next: AnimationState, sink: &mut S) {
        let (time_changed, morphs_changed) = match &self.rendered {
            Some(previous) => (previous.time != next.time, previous.morphs != next.morphs),
            None => (true, true),
        };
        if time_changed {
            sink.render_frame(next.time);
        }
        if morphs_changed {
            sink.set_morphs(&next.morphs);
        }
        self.rendered = Some(next.clone());
        self.state = next;
    }
}
