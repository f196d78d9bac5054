use std::fmt::{Display, Formatter};
use std::ops::Range;
use std::str::FromStr;

use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::{EnumString, IntoStaticStr, VariantArray};

use crate::error::Error;

const SUSPECTS: usize = Suspect::VARIANTS.len();
const WEAPONS: usize = Weapon::VARIANTS.len();
const ROOMS: usize = Room::VARIANTS.len();

/// Number of distinct cards in the game, across all three categories.
pub const DECK_SIZE: usize = SUSPECTS + WEAPONS + ROOMS;

/// The murder suspects.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, VariantArray, EnumString, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Suspect {
    /// Miss Scarlet.
    MissScarlet,
    /// Professor Plum.
    ProfPlum,
    /// Mrs. Peacock.
    MrsPeacock,
    /// Mr. Green.
    MrGreen,
    /// Colonel Mustard.
    ColMustard,
    /// Mrs. White.
    MrsWhite,
}

/// The possible murder weapons.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, VariantArray, EnumString, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Weapon {
    /// The candlestick.
    Candlestick,
    /// The dagger.
    Dagger,
    /// The lead pipe.
    LeadPipe,
    /// The revolver.
    Revolver,
    /// The rope.
    Rope,
    /// The wrench.
    Wrench,
}

/// The locations where the murder may have taken place.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, VariantArray, EnumString, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Room {
    /// The kitchen.
    Kitchen,
    /// The ballroom.
    Ballroom,
    /// The conservatory.
    Conservatory,
    /// The dining room.
    DiningRoom,
    /// The billiard room.
    BilliardRoom,
    /// The library.
    Library,
    /// The lounge.
    Lounge,
    /// The hall.
    Hall,
    /// The study.
    Study,
}

/// One of the three card categories. The hidden solution holds exactly one card of each.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, VariantArray, IntoStaticStr)]
pub enum Category {
    /// Who did it.
    Suspect,
    /// What they did it with.
    Weapon,
    /// Where it happened.
    Room,
}

impl Category {
    /// The contiguous range of [`Card::index`] values belonging to this category.
    pub fn span(self) -> Range<usize> {
        match self {
            Self::Suspect => 0..SUSPECTS,
            Self::Weapon => SUSPECTS..SUSPECTS + WEAPONS,
            Self::Room => SUSPECTS + WEAPONS..DECK_SIZE,
        }
    }

    /// Every card of this category, in catalog order.
    pub fn cards(self) -> impl Iterator<Item = Card> {
        self.span().filter_map(Card::from_index)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name: &'static str = (*self).into();
        f.write_str(name)
    }
}

/// A single card identity.
///
/// Cards serialize as their catalog name, e.g. `"CANDLESTICK"`, and parse from it case-insensitively.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, SerializeDisplay, DeserializeFromStr)]
pub enum Card {
    /// A suspect card.
    Suspect(Suspect),
    /// A weapon card.
    Weapon(Weapon),
    /// A room card.
    Room(Room),
}

impl Card {
    /// Every card in the deck, ordered by [`Self::index`].
    pub fn all() -> impl Iterator<Item = Card> {
        (0..DECK_SIZE).filter_map(Self::from_index)
    }

    /// The category this card belongs to.
    pub fn category(self) -> Category {
        match self {
            Self::Suspect(_) => Category::Suspect,
            Self::Weapon(_) => Category::Weapon,
            Self::Room(_) => Category::Room,
        }
    }

    /// Dense position of this card in `0..DECK_SIZE`: suspects, then weapons, then rooms.
    pub fn index(self) -> usize {
        match self {
            Self::Suspect(s) => s as usize,
            Self::Weapon(w) => SUSPECTS + w as usize,
            Self::Room(r) => SUSPECTS + WEAPONS + r as usize,
        }
    }

    /// Inverse of [`Self::index`]; `None` past the end of the deck.
    pub fn from_index(index: usize) -> Option<Self> {
        if index < SUSPECTS {
            Suspect::VARIANTS.get(index).copied().map(Self::Suspect)
        } else if index < SUSPECTS + WEAPONS {
            Weapon::VARIANTS.get(index - SUSPECTS).copied().map(Self::Weapon)
        } else {
            Room::VARIANTS.get(index - SUSPECTS - WEAPONS).copied().map(Self::Room)
        }
    }

    /// Catalog name, e.g. `"LEAD_PIPE"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Suspect(s) => s.into(),
            Self::Weapon(w) => w.into(),
            Self::Room(r) => r.into(),
        }
    }
}

impl From<Suspect> for Card {
    fn from(value: Suspect) -> Self {
        Self::Suspect(value)
    }
}

impl From<Weapon> for Card {
    fn from(value: Weapon) -> Self {
        Self::Weapon(value)
    }
}

impl From<Room> for Card {
    fn from(value: Room) -> Self {
        Self::Room(value)
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Card {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // names are unique across the three categories
        Suspect::from_str(s).map(Self::Suspect)
            .or_else(|_| Weapon::from_str(s).map(Self::Weapon))
            .or_else(|_| Room::from_str(s).map(Self::Room))
            .map_err(|_| Error::UnknownCard(s.to_owned()))
    }
}
