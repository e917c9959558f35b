//! Session controller: sampler, tile builder and engine wired together.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::{ClickOutcome, MatchEngine, SettleOutcome};
use crate::error::{Result, SelectionError, SetupError};
use crate::provider::DataProvider;
use crate::render::Renderer;
use crate::sampler::sample;
use crate::scheduler::{SettleScheduler, SettleTicket};
use crate::tiles::TileSetBuilder;
use crate::types::{BoardSnapshot, Flashcard, TestParams};

/// Runs one test at a time on top of a [`MatchEngine`].
pub struct SessionController<R, S> {
    engine: MatchEngine<R, S>,
    builder: TileSetBuilder,
    rng: StdRng,
    deck: Vec<Flashcard>,
    params: TestParams,
}

impl<R: Renderer, S: SettleScheduler> SessionController<R, S> {
    pub fn new(engine: MatchEngine<R, S>) -> Self {
        Self::with_rng(engine, StdRng::from_os_rng())
    }

    /// Controller with a reproducible random source.
    pub fn with_seed(engine: MatchEngine<R, S>, seed: u64) -> Self {
        Self::with_rng(engine, StdRng::seed_from_u64(seed))
    }

    fn with_rng(engine: MatchEngine<R, S>, rng: StdRng) -> Self {
        Self {
            engine,
            builder: TileSetBuilder::default(),
            rng,
            deck: Vec::new(),
            params: TestParams::default(),
        }
    }

    pub fn with_builder(mut self, builder: TileSetBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Start a test on `deck`.
    ///
    /// On failure nothing changes: a board that was already running keeps
    /// running.
    pub fn start(&mut self, deck: Vec<Flashcard>, params: TestParams) -> Result<BoardSnapshot> {
        params.validate()?;
        let drawn = sample(&deck, params, &mut self.rng)?;
        let tiles = self.builder.build(&drawn, &mut self.rng);

        let generation = self.engine.load(tiles);
        tracing::debug!(
            generation,
            deck = deck.len(),
            matching_pairs = params.matching_pairs,
            distractors = params.distractor_count,
            "test started"
        );
        self.deck = deck;
        self.params = params;
        self.snapshot()
    }

    /// Fetch the subject's deck from `provider` and start a test on it.
    pub fn start_subject<P: DataProvider + ?Sized>(
        &mut self,
        provider: &P,
        subject: &str,
        params: TestParams,
    ) -> Result<BoardSnapshot> {
        let deck = provider.flashcards(subject)?;
        self.start(deck, params)
    }

    /// Throw the current board away and deal a fresh sample from the same deck.
    pub fn reset(&mut self) -> Result<BoardSnapshot> {
        if self.deck.is_empty() {
            return Err(SetupError::NotStarted);
        }
        let drawn = sample(&self.deck, self.params, &mut self.rng)?;
        let tiles = self.builder.build(&drawn, &mut self.rng);
        self.engine.reset_session();
        self.engine.load(tiles);
        self.snapshot()
    }

    pub fn click(&mut self, tile_id: &str) -> std::result::Result<ClickOutcome, SelectionError> {
        self.engine.on_tile_clicked(tile_id)
    }

    pub fn settle(&mut self, ticket: SettleTicket) -> SettleOutcome {
        self.engine.settle(ticket)
    }

    pub fn snapshot(&self) -> Result<BoardSnapshot> {
        self.engine.snapshot().ok_or(SetupError::NotStarted)
    }

    pub fn params(&self) -> TestParams {
        self.params
    }

    pub fn is_complete(&self) -> bool {
        self.engine.is_complete()
    }

    pub fn engine(&self) -> &MatchEngine<R, S> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut MatchEngine<R, S> {
        &mut self.engine
    }
}
