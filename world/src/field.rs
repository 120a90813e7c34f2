//! Grid container that owns every occupant and dispatches movement.

use std::collections::BTreeMap;

use log::{debug, warn};
use robot_chase_core::{
    CellPosition, Direction, EntityId, EntityKind, MiddlePosition, PlacementError, Position,
};

use crate::entities::{Entity, Mire, Occupant};

const DEFAULT_WIDTH: u32 = 10;
const DEFAULT_HEIGHT: u32 = 10;
const MIN_SIDE: u32 = 2;

/// Neighbour ring scanned by [`Field::free_cell_around`]: NW, N, NE, E, SE, S, SW, W.
const RING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

/// Errors raised when configuring the field geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// Both sides must be at least two cells long.
    #[error("field size {width}x{height} is invalid, both sides must be at least 2")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// Shrinking would leave an occupant outside the field.
    #[error("field size {width}x{height} would leave an occupant outside the field")]
    ObjectOutside {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

/// Occupant registered on the field together with its position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldObject {
    position: Position,
    entity: Entity,
}

impl FieldObject {
    /// Position held by the occupant.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Occupant data.
    #[must_use]
    pub const fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Kind tag of the occupant.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.entity.kind()
    }
}

/// Bounded grid holding every occupant keyed by a stable handle.
///
/// Handles grow monotonically, so iterating the registry yields occupants in
/// insertion order and "first of a kind" is the earliest one still present.
#[derive(Clone, Debug)]
pub struct Field {
    width: u32,
    height: u32,
    objects: BTreeMap<EntityId, FieldObject>,
    next_id: u32,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            objects: BTreeMap::new(),
            next_id: 0,
        }
    }
}

impl Field {
    /// Creates an empty field with the provided dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, FieldError> {
        let mut field = Self::default();
        field.set_size(width, height)?;
        Ok(field)
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Resizes the field, refusing sizes that would strand an occupant.
    pub fn set_size(&mut self, width: u32, height: u32) -> Result<(), FieldError> {
        if width < MIN_SIDE || height < MIN_SIDE {
            return Err(FieldError::InvalidDimensions { width, height });
        }

        let stranded = self
            .objects
            .values()
            .any(|object| !within(width, height, object.position.anchor()));
        if stranded {
            return Err(FieldError::ObjectOutside { width, height });
        }

        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Places `entity` at `position` if its placement rules allow it.
    pub fn add_object(
        &mut self,
        position: Position,
        entity: Entity,
    ) -> Result<EntityId, PlacementError> {
        if let Err(reason) = entity.check_placement(self, position) {
            warn!(
                "cannot place {} at {:?}: {reason}",
                entity.kind(),
                position
            );
            return Err(reason);
        }

        let id = EntityId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let _ = self.objects.insert(id, FieldObject { position, entity });
        Ok(id)
    }

    /// Removes an occupant, returning its data if it was present.
    pub fn remove_object(&mut self, id: EntityId) -> Option<Entity> {
        self.objects.remove(&id).map(|object| object.entity)
    }

    /// Removes every occupant. Dimensions are kept.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Looks up an occupant by handle.
    #[must_use]
    pub fn object(&self, id: EntityId) -> Option<&FieldObject> {
        self.objects.get(&id)
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.objects.get_mut(&id).map(|object| &mut object.entity)
    }

    /// Cell held by an occupant, if it lives in a cell.
    #[must_use]
    pub fn cell_of(&self, id: EntityId) -> Option<CellPosition> {
        self.object(id).and_then(|object| object.position.as_cell())
    }

    /// Every occupant in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = (EntityId, &FieldObject)> + '_ {
        self.objects.iter().map(|(id, object)| (*id, object))
    }

    /// Every occupant of the provided kind.
    pub fn objects_of(&self, kind: EntityKind) -> impl Iterator<Item = (EntityId, &FieldObject)> + '_ {
        self.objects().filter(move |(_, object)| object.kind() == kind)
    }

    /// Every occupant holding `position`. Edge positions match either spelling.
    pub fn objects_at(&self, position: Position) -> impl Iterator<Item = (EntityId, &FieldObject)> + '_ {
        self.objects()
            .filter(move |(_, object)| object.position == position)
    }

    /// Every occupant of `kind` holding `position`.
    pub fn objects_of_at(
        &self,
        kind: EntityKind,
        position: Position,
    ) -> impl Iterator<Item = (EntityId, &FieldObject)> + '_ {
        self.objects_at(position)
            .filter(move |(_, object)| object.kind() == kind)
    }

    /// First inserted occupant of a kind.
    #[must_use]
    pub fn first(&self, kind: EntityKind) -> Option<EntityId> {
        self.objects_of(kind).map(|(id, _)| id).next()
    }

    /// Wall occupying the edge, looked up under both spellings.
    #[must_use]
    pub fn wall_at(&self, edge: MiddlePosition) -> Option<EntityId> {
        self.objects_of_at(EntityKind::Wall, Position::Edge(edge))
            .map(|(id, _)| id)
            .next()
    }

    /// Mire covering the cell, if any.
    #[must_use]
    pub fn mire_at(&self, cell: CellPosition) -> Option<&Mire> {
        self.objects_at(Position::Cell(cell))
            .find_map(|(_, object)| object.entity.as_mire())
    }

    /// Reports whether the cell holds an unfrozen mire.
    #[must_use]
    pub fn is_mud(&self, cell: CellPosition) -> bool {
        self.mire_at(cell).is_some_and(|mire| !mire.is_frozen())
    }

    /// Reports whether no occupant of any kind holds exactly `position`.
    #[must_use]
    pub fn is_pos_free(&self, position: Position) -> bool {
        self.objects_at(position).next().is_none()
    }

    /// Bounds check on the 1-based inclusive range `[1, width] x [1, height]`.
    #[must_use]
    pub fn contains(&self, cell: CellPosition) -> bool {
        within(self.width, self.height, cell)
    }

    /// Robot movement rule: blocked by a wall on the edge or by the border.
    #[must_use]
    pub fn is_move_possible(&self, from: CellPosition, direction: Direction) -> bool {
        if self.wall_at(MiddlePosition::new(direction, from)).is_some() {
            return false;
        }
        self.contains(from.next(direction))
    }

    /// Moves a cell occupant one step, letting the destination's occupants
    /// redirect it.
    ///
    /// Bounds and walls are not checked here; callers validate the step
    /// first. Returns the cell the occupant ended up in.
    pub fn move_object(&mut self, id: EntityId, direction: Direction) -> Option<CellPosition> {
        let from = self.cell_of(id)?;
        let destination = from.next(direction);
        let landing = self
            .objects_at(Position::Cell(destination))
            .find_map(|(_, object)| object.entity.mediate_move(self, destination, direction))
            .unwrap_or(destination);

        if landing != destination {
            debug!("move toward {destination} redirected to {landing}");
        }

        let object = self.objects.get_mut(&id)?;
        object.position = Position::Cell(landing);
        Some(landing)
    }

    /// Puts a cell occupant directly into `cell`, bypassing placement rules.
    pub(crate) fn relocate(&mut self, id: EntityId, cell: CellPosition) -> bool {
        match self.objects.get_mut(&id) {
            Some(object) if object.position.as_cell().is_some() => {
                object.position = Position::Cell(cell);
                true
            }
            _ => false,
        }
    }

    /// First cell of the neighbour ring around `cell` that lies on the field
    /// and holds no occupant of `kind`.
    #[must_use]
    pub fn free_cell_around(&self, cell: CellPosition, kind: EntityKind) -> Option<CellPosition> {
        RING_OFFSETS
            .iter()
            .map(|(dx, dy)| cell.offset(*dx, *dy))
            .filter(|candidate| self.contains(*candidate))
            .find(|candidate| {
                self.objects_of_at(kind, Position::Cell(*candidate))
                    .next()
                    .is_none()
            })
    }
}

fn within(width: u32, height: u32, cell: CellPosition) -> bool {
    let (Ok(x), Ok(y)) = (u32::try_from(cell.x()), u32::try_from(cell.y())) else {
        return false;
    };
    (1..=width).contains(&x) && (1..=height).contains(&y)
}
