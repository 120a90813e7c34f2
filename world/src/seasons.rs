//! Reversible environmental effects applied by the active season.

use log::debug;
use robot_chase_core::{EntityId, EntityKind, Position, SeasonKind};

use crate::{
    entities::{Entity, Mire},
    field::Field,
};

/// Bookkeeping needed to undo exactly what a season did to the field.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Effect {
    /// Mires spawned by rain, removed again when the season ends.
    Rain { spawned: Vec<EntityId> },
    /// Mires frozen by frost, thawed again when the season ends.
    Frost { frozen: Vec<EntityId> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Season {
    kind: SeasonKind,
    effect: Effect,
}

impl Season {
    fn new(kind: SeasonKind) -> Self {
        let effect = match kind {
            SeasonKind::Summer => Effect::Rain {
                spawned: Vec::new(),
            },
            SeasonKind::Winter => Effect::Frost { frozen: Vec::new() },
        };
        Self { kind, effect }
    }

    fn influence(&mut self, field: &mut Field) {
        match &mut self.effect {
            Effect::Rain { spawned } => {
                let sources: Vec<_> = field
                    .objects_of(EntityKind::Mire)
                    .filter_map(|(_, object)| object.position().as_cell())
                    .collect();
                for source in sources {
                    let Some(cell) = field.free_cell_around(source, EntityKind::Mire) else {
                        continue;
                    };
                    if let Ok(id) = field.add_object(Position::Cell(cell), Entity::Mire(Mire::new())) {
                        spawned.push(id);
                    }
                }
                debug!("rain spread {} mires", spawned.len());
            }
            Effect::Frost { frozen } => {
                let ids: Vec<_> = field
                    .objects_of(EntityKind::Mire)
                    .map(|(id, _)| id)
                    .collect();
                for id in ids {
                    let Some(mire) = field.entity_mut(id).and_then(Entity::as_mire_mut) else {
                        continue;
                    };
                    if !mire.is_frozen() {
                        mire.freeze();
                        frozen.push(id);
                    }
                }
                debug!("frost froze {} mires", frozen.len());
            }
        }
    }

    fn clean_influence(&mut self, field: &mut Field) {
        match &mut self.effect {
            Effect::Rain { spawned } => {
                for id in spawned.drain(..) {
                    let _ = field.remove_object(id);
                }
            }
            Effect::Frost { frozen } => {
                for id in frozen.drain(..) {
                    if let Some(mire) = field.entity_mut(id).and_then(Entity::as_mire_mut) {
                        mire.unfreeze();
                    }
                }
            }
        }
    }

    fn forget(&mut self) {
        match &mut self.effect {
            Effect::Rain { spawned } => spawned.clear(),
            Effect::Frost { frozen } => frozen.clear(),
        }
    }
}

/// Ordered ring of seasons together with the index of the active one.
#[derive(Clone, Debug)]
pub(crate) struct SeasonCycle {
    seasons: Vec<Season>,
    active: usize,
}

impl SeasonCycle {
    /// Builds the cycle. An empty order falls back to summer then winter.
    pub(crate) fn new(order: &[SeasonKind]) -> Self {
        let order = if order.is_empty() {
            &[SeasonKind::Summer, SeasonKind::Winter][..]
        } else {
            order
        };
        Self {
            seasons: order.iter().copied().map(Season::new).collect(),
            active: 0,
        }
    }

    pub(crate) fn active(&self) -> SeasonKind {
        self.seasons
            .get(self.active)
            .map_or(SeasonKind::Summer, |season| season.kind)
    }

    /// Returns to the first season, discarding bookkeeping for a field that
    /// has been cleared.
    pub(crate) fn reset(&mut self) {
        self.active = 0;
        for season in &mut self.seasons {
            season.forget();
        }
    }

    /// Returns to the first season once the game is over. The field keeps the
    /// last influence until it is cleared or reloaded.
    pub(crate) fn rewind(&mut self) {
        self.active = 0;
    }

    pub(crate) fn clean_active(&mut self, field: &mut Field) {
        if let Some(season) = self.seasons.get_mut(self.active) {
            season.clean_influence(field);
        }
    }

    pub(crate) fn rotate(&mut self) -> SeasonKind {
        self.active = (self.active + 1) % self.seasons.len().max(1);
        self.active()
    }

    pub(crate) fn influence_active(&mut self, field: &mut Field) {
        if let Some(season) = self.seasons.get_mut(self.active) {
            season.influence(field);
        }
    }
}
