//! Test doubles shared by unit tests

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use futures::channel::oneshot;

use crate::error::LevelLoadError;
use crate::hud::{Hud, Scene};
use crate::level::{Item, Level, LevelKey, LevelSource};
use crate::platform::{Clock, Scheduler, TickHandle};
use crate::settings::Settings;
use crate::sim::{Frontend, Game};

pub fn item(id: &str, x: f32, y: f32, width: f32, height: f32) -> Item {
    Item {
        id: id.to_string(),
        name: id.to_uppercase(),
        x,
        y,
        width,
        height,
        image: None,
        preview: None,
    }
}

pub fn level(background: &str, items: Vec<Item>) -> Level {
    Level {
        background: background.to_string(),
        items,
    }
}

/// Everything the game told its HUD and scene, in order
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    InitItems(Vec<String>),
    Score(u32),
    Timer(u64),
    Found(String),
    Message(String),
    Render(String),
    Feedback(String),
    Complete(u32),
}

pub type EventLog = Rc<RefCell<Vec<UiEvent>>>;

pub struct RecordingUi(pub EventLog);

impl Hud for RecordingUi {
    fn init_items(&mut self, items: &[Item]) {
        let ids = items.iter().map(|i| i.id.clone()).collect();
        self.0.borrow_mut().push(UiEvent::InitItems(ids));
    }

    fn update_score(&mut self, score: u32) {
        self.0.borrow_mut().push(UiEvent::Score(score));
    }

    fn update_timer(&mut self, elapsed_secs: u64) {
        self.0.borrow_mut().push(UiEvent::Timer(elapsed_secs));
    }

    fn mark_item_found(&mut self, item_id: &str) {
        self.0.borrow_mut().push(UiEvent::Found(item_id.to_string()));
    }

    fn show_message(&mut self, message: &str) {
        self.0.borrow_mut().push(UiEvent::Message(message.to_string()));
    }
}

impl Scene for RecordingUi {
    fn render_level(&mut self, level: &Level) {
        self.0.borrow_mut().push(UiEvent::Render(level.background.clone()));
    }

    fn show_found(&mut self, item: &Item) {
        self.0.borrow_mut().push(UiEvent::Feedback(item.id.clone()));
    }

    fn show_level_complete(&mut self, score: u32) {
        self.0.borrow_mut().push(UiEvent::Complete(score));
    }
}

/// Clock advanced by hand
#[derive(Clone, Default)]
pub struct ManualClock(pub Rc<Cell<f64>>);

impl ManualClock {
    pub fn advance(&self, ms: f64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.0.get()
    }
}

/// Counts how many tickers were started and cancelled
#[derive(Clone, Default)]
pub struct CountingScheduler {
    pub started: Rc<Cell<u32>>,
    pub cancelled: Rc<Cell<u32>>,
}

impl CountingScheduler {
    /// Tickers started and not yet cancelled
    pub fn active(&self) -> u32 {
        self.started.get() - self.cancelled.get()
    }
}

struct CountingTick(Rc<Cell<u32>>);

impl TickHandle for CountingTick {
    fn cancel(self: Box<Self>) {
        self.0.set(self.0.get() + 1);
    }
}

impl Scheduler for CountingScheduler {
    fn every(&mut self, _period_ms: u32) -> Box<dyn TickHandle> {
        self.started.set(self.started.get() + 1);
        Box::new(CountingTick(self.cancelled.clone()))
    }
}

/// A game wired to recording doubles
pub struct Harness {
    pub game: Game,
    pub events: EventLog,
    pub clock: ManualClock,
    pub scheduler: CountingScheduler,
}

impl Harness {
    pub fn new() -> Self {
        let events = EventLog::default();
        let clock = ManualClock::default();
        let scheduler = CountingScheduler::default();
        let frontend = Frontend {
            hud: Box::new(RecordingUi(events.clone())),
            scene: Box::new(RecordingUi(events.clone())),
            clock: Box::new(clock.clone()),
            scheduler: Box::new(scheduler.clone()),
        };
        Self {
            game: Game::new(frontend, Settings::default()),
            events,
            clock,
            scheduler,
        }
    }

    /// Start `level` synchronously under `key`
    pub fn start(&mut self, key: LevelKey, level: Level) {
        let ticket = self.game.begin_load(key);
        self.game
            .finish_load(ticket, Ok(level))
            .expect("level should start");
    }

    pub fn take_events(&self) -> Vec<UiEvent> {
        self.events.borrow_mut().drain(..).collect()
    }
}

/// Levels held in memory; anything else is not found
#[derive(Default)]
pub struct MemoryLevelSource {
    pub levels: HashMap<LevelKey, Level>,
}

impl LevelSource for MemoryLevelSource {
    async fn load_level(&self, key: &LevelKey) -> Result<Level, LevelLoadError> {
        self.levels
            .get(key)
            .cloned()
            .ok_or_else(|| LevelLoadError::NotFound(key.clone()))
    }
}

/// Source whose loads stay pending until the test releases them
#[derive(Default)]
pub struct GatedLevelSource {
    pending: RefCell<HashMap<LevelKey, oneshot::Receiver<Result<Level, LevelLoadError>>>>,
}

impl GatedLevelSource {
    /// Register a load for `key`; the returned sender resolves it
    pub fn gate(&self, key: LevelKey) -> oneshot::Sender<Result<Level, LevelLoadError>> {
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().insert(key, rx);
        tx
    }
}

impl LevelSource for GatedLevelSource {
    async fn load_level(&self, key: &LevelKey) -> Result<Level, LevelLoadError> {
        let rx = self.pending.borrow_mut().remove(key);
        match rx {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(LevelLoadError::Transport("gate dropped".into()))),
            None => Err(LevelLoadError::NotFound(key.clone())),
        }
    }
}
