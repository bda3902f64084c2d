//! Flavor phrases and the memory that keeps them stable between passes.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::FlavorConfig;
use crate::event::EventId;
use crate::occurrence::Stage;

/// Phrase pools per progress stage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlavorText {
    pub beginning: Vec<String>,
    pub middle: Vec<String>,
    pub end: Vec<String>,
}

impl FlavorText {
    pub fn phrases(&self, stage: Stage) -> &[String] {
        match stage {
            Stage::Beginning => &self.beginning,
            Stage::Middle => &self.middle,
            Stage::End => &self.end,
        }
    }
}

impl From<&FlavorConfig> for FlavorText {
    fn from(cfg: &FlavorConfig) -> Self {
        Self {
            beginning: cfg.beginning.clone(),
            middle: cfg.middle.clone(),
            end: cfg.end.clone(),
        }
    }
}

/// Last phrase shown, keyed by the event and stage it was drawn for.
///
/// A new phrase is drawn only when that key changes, so a once-per-second
/// redraw does not flicker between phrases.
#[derive(Debug, Clone, Default)]
pub struct PhraseMemory {
    last: Option<(EventId, Stage, String)>,
}

impl PhraseMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phrase for `(event, stage)`, drawing a fresh one if the key changed.
    ///
    /// Returns `None` when the stage has no phrases.
    pub fn phrase<R: Rng + ?Sized>(
        &mut self,
        event: EventId,
        stage: Stage,
        flavor: &FlavorText,
        rng: &mut R,
    ) -> Option<&str> {
        let unchanged = matches!(&self.last, Some((e, s, _)) if *e == event && *s == stage);
        if !unchanged {
            self.last = flavor
                .phrases(stage)
                .choose(rng)
                .map(|p| (event, stage, p.clone()));
        }
        self.last.as_ref().map(|(_, _, p)| p.as_str())
    }

    /// Forget the last phrase (no event is current).
    pub fn clear(&mut self) {
        self.last = None;
    }

    pub fn last(&self) -> Option<&str> {
        self.last.as_ref().map(|(_, _, p)| p.as_str())
    }
}
