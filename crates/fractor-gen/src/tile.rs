//! Tile types and configured tile instances.
//!
//! A [`TileKind`] is a bare category ("wall", "door", "potion"). Portals,
//! doors and rubble carry per-instance parameters, expressed as a
//! [`TileInstance`]. The canvas accepts either through [`Tile`].

use std::fmt;

/// Vertical position of a tile in a map cell. Every cell has exactly one
/// architecture tile, any number of items and at most one creature.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Layer {
    Architecture,
    Item,
    Creature,
}

/// Whether a tile blocks movement.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Physics {
    Solid,
    Empty,
}

/// The catalog of tile categories the generators place.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileKind {
    // architecture
    CaveWall,
    Wall,
    Floor,
    CaveFloor,
    Dirt,
    Tree,
    Grass,
    CutGrass,
    Water,
    Bridge,
    Door,
    Gate,
    Rubble,
    Pillar,
    StairsUp,
    StairsDown,
    Ladder,
    // items
    Armor,
    Potion,
    Gem,
    Crate,
    Key,
    Crown,
    // creatures
    Salamango,
}

impl TileKind {
    pub fn layer(self) -> Layer {
        use TileKind::*;
        match self {
            Armor | Potion | Gem | Crate | Key | Crown => Layer::Item,
            Salamango => Layer::Creature,
            _ => Layer::Architecture,
        }
    }

    /// The solid/empty classification used to maintain walkable space.
    pub fn physics(self) -> Physics {
        use TileKind::*;
        match self {
            CaveWall | Wall | Tree | Water | Rubble | Pillar | Salamango => Physics::Solid,
            _ => Physics::Empty,
        }
    }

    #[inline]
    pub fn is_solid(self) -> bool {
        self.physics() == Physics::Solid
    }

    /// Architecture that moves whoever steps on it to another map.
    pub fn is_portal(self) -> bool {
        matches!(self, TileKind::StairsUp | TileKind::StairsDown | TileKind::Ladder)
    }

    pub fn name(self) -> &'static str {
        use TileKind::*;
        match self {
            CaveWall | Wall => "wall",
            Floor | Dirt => "dirt",
            CaveFloor => "cave floor",
            Tree => "tree",
            Grass => "grass",
            CutGrass => "freshly-cut grass",
            Water => "water",
            Bridge => "bridge",
            Door => "door",
            Gate => "gate",
            Rubble => "rubble",
            Pillar => "pillar",
            StairsUp | StairsDown => "stairs",
            Ladder => "ladder",
            Armor => "armor",
            Potion => "potion",
            Gem => "gem",
            Crate => "crate",
            Key => "key",
            Crown => "crown",
            Salamango => "salamango",
        }
    }

    /// Character used by [`TileMap::render`](crate::TileMap::render).
    pub fn glyph(self) -> char {
        use TileKind::*;
        match self {
            CaveWall => '#',
            Wall => '▒',
            Floor => '·',
            CaveFloor => '.',
            Dirt => '░',
            Tree => '↟',
            Grass => '"',
            CutGrass => ',',
            Water => '~',
            Bridge => '=',
            Door => '+',
            Gate => '|',
            Rubble => '%',
            Pillar => 'o',
            StairsUp => '<',
            StairsDown => '>',
            Ladder => 'H',
            Armor => '[',
            Potion => '!',
            Gem => '*',
            Crate => '&',
            Key => '-',
            Crown => '^',
            Salamango => ':',
        }
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-instance parameters of a configured tile.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileParams {
    None,
    Portal { destination: String },
    Lock { locked: bool },
    /// Remaining integrity of a breakable wall, in `[0, 1]`.
    Breakable { integrity: f32 },
}

/// A tile category bound to its instance parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileInstance {
    pub kind: TileKind,
    pub params: TileParams,
}

impl TileInstance {
    /// A portal of kind `kind` leading to `destination`.
    pub fn portal(kind: TileKind, destination: impl Into<String>) -> Self {
        debug_assert!(kind.is_portal(), "{kind:?} is not a portal");
        Self {
            kind,
            params: TileParams::Portal {
                destination: destination.into(),
            },
        }
    }

    pub fn door(locked: bool) -> Self {
        Self {
            kind: TileKind::Door,
            params: TileParams::Lock { locked },
        }
    }

    /// Rubble with the given integrity, clamped to `[0, 1]`.
    pub fn breakable(integrity: f32) -> Self {
        Self {
            kind: TileKind::Rubble,
            params: TileParams::Breakable {
                integrity: integrity.clamp(0.0, 1.0),
            },
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.params, TileParams::Lock { locked: true })
    }

    pub fn destination(&self) -> Option<&str> {
        match &self.params {
            TileParams::Portal { destination } => Some(destination),
            _ => None,
        }
    }
}

impl From<TileKind> for TileInstance {
    /// A fresh instance with the category's default parameters.
    fn from(kind: TileKind) -> Self {
        let params = match kind {
            TileKind::Door => TileParams::Lock { locked: false },
            TileKind::Rubble => TileParams::Breakable { integrity: 1.0 },
            _ => TileParams::None,
        };
        Self { kind, params }
    }
}

/// Anything the canvas can hold: a bare category or a configured instance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tile {
    Kind(TileKind),
    Instance(TileInstance),
}

impl Tile {
    pub fn kind(&self) -> TileKind {
        match self {
            Tile::Kind(k) => *k,
            Tile::Instance(i) => i.kind,
        }
    }

    /// Whether this tile is `kind`, configured or not.
    pub fn is(&self, kind: TileKind) -> bool {
        self.kind() == kind
    }

    /// Turn this tile into an instance. Instances pass through unchanged.
    pub fn instantiate(self) -> TileInstance {
        match self {
            Tile::Kind(k) => TileInstance::from(k),
            Tile::Instance(i) => i,
        }
    }
}

impl From<TileKind> for Tile {
    fn from(kind: TileKind) -> Self {
        Tile::Kind(kind)
    }
}

impl From<TileInstance> for Tile {
    fn from(instance: TileInstance) -> Self {
        Tile::Instance(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(TileKind::CaveWall.is_solid());
        assert!(TileKind::Tree.is_solid());
        assert!(!TileKind::Floor.is_solid());
        assert!(!TileKind::Bridge.is_solid());
        assert!(!TileKind::StairsDown.is_solid());
        assert_eq!(TileKind::Potion.layer(), Layer::Item);
        assert_eq!(TileKind::Salamango.layer(), Layer::Creature);
        assert_eq!(TileKind::Door.layer(), Layer::Architecture);
    }

    #[test]
    fn instantiate_is_idempotent() {
        let bare = Tile::Kind(TileKind::Door);
        let inst = bare.instantiate();
        assert_eq!(inst, TileInstance::door(false));
        assert_eq!(Tile::Instance(inst.clone()).instantiate(), inst);

        let locked = TileInstance::door(true);
        assert!(Tile::from(locked.clone()).instantiate().is_locked());
    }

    #[test]
    fn configured_constructors() {
        let stairs = TileInstance::portal(TileKind::StairsUp, "level-1");
        assert_eq!(stairs.destination(), Some("level-1"));
        assert_eq!(
            TileInstance::breakable(1.7).params,
            TileParams::Breakable { integrity: 1.0 }
        );
        assert!(Tile::from(stairs).is(TileKind::StairsUp));
    }
}
