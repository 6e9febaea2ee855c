use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::card::Suit;
use crate::error::ParseMoveError;

/// Kind of zone a move side refers to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Target {
    Tableau,
    Freecell,
    /// Written as `D` in move strings.
    Foundation,
}

impl Target {
    pub fn from_char(c: char) -> Option<Target> {
        match c.to_ascii_uppercase() {
            'T' => Some(Target::Tableau),
            'F' => Some(Target::Freecell),
            'D' => Some(Target::Foundation),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Target::Tableau => 'T',
            Target::Freecell => 'F',
            Target::Foundation => 'D',
        }
    }
}

/// One side of a move. Tableau and freecell numbers are 1-based.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Location {
    Tableau(usize),
    Freecell(usize),
    Foundation(Suit),
}

impl Location {
    pub fn target(&self) -> Target {
        match self {
            Location::Tableau(_) => Target::Tableau,
            Location::Freecell(_) => Target::Freecell,
            Location::Foundation(_) => Target::Foundation,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Tableau(n) => write!(f, "T{n}"),
            Location::Freecell(n) => write!(f, "F{n}"),
            Location::Foundation(suit) => write!(f, "D{}", suit.letter()),
        }
    }
}

/// A run of `size` cards taken from the top of a tableau column.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SuperMove {
    pub column: usize,
    pub size: usize,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Source {
    Single(Location),
    Super(SuperMove),
}

impl Source {
    pub fn location(&self) -> Location {
        match self {
            Source::Single(location) => *location,
            Source::Super(run) => Location::Tableau(run.column),
        }
    }

    /// Number of cards the move transfers.
    pub fn size(&self) -> usize {
        match self {
            Source::Single(_) => 1,
            Source::Super(run) => run.size,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Single(location) => write!(f, "{location}"),
            Source::Super(run) => write!(f, "T{},{}", run.column, run.size),
        }
    }
}

/// A decoded `"<source>;<destination>"` move.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MoveCommand {
    pub source: Source,
    pub destination: Location,
}

impl MoveCommand {
    pub fn new(source: Location, destination: Location) -> Self {
        Self {
            source: Source::Single(source),
            destination,
        }
    }

    pub fn run(column: usize, size: usize, destination: Location) -> Self {
        Self {
            source: Source::Super(SuperMove { column, size }),
            destination,
        }
    }

    pub fn is_super_move(&self) -> bool {
        matches!(self.source, Source::Super(_))
    }
}

impl fmt::Display for MoveCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.source, self.destination)
    }
}

impl FromStr for MoveCommand {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_move_string(s)
    }
}

/// Decodes the textual move protocol, e.g. `"T3;F1"`, `"T3,4;T5"` or `"F2;DH"`.
///
/// Matching is case-insensitive. A size suffix is only allowed on a tableau
/// source. Foundation sides name a suit (`H`, `hearts`, ...), all other sides
/// a 1-based number.
pub fn decode_move_string(text: &str) -> Result<MoveCommand, ParseMoveError> {
    let upper = text.trim().to_ascii_uppercase();
    let mut parts = upper.split(';');
    let (Some(source), Some(destination), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseMoveError::MissingSeparator);
    };
    if source.is_empty() || destination.is_empty() {
        return Err(ParseMoveError::EmptySide);
    }

    let (source_target, source_rest) = split_target(source)?;
    let (destination_target, destination_rest) = split_target(destination)?;
    if destination_rest.contains(',') {
        return Err(ParseMoveError::SizeOnDestination);
    }

    let (source_id, size) = match source_rest.split_once(',') {
        Some((id, size)) => (id, Some(size)),
        None => (source_rest, None),
    };
    check_identifier_kind(source_target, source_id)?;
    check_identifier_kind(destination_target, destination_rest)?;

    let destination = parse_location(destination_target, destination_rest)?;
    let source = match size {
        Some(size) => {
            if source_target != Target::Tableau {
                return Err(ParseMoveError::SizeOnNonTableau);
            }
            Source::Super(SuperMove {
                column: parse_index(source_id)?,
                size: parse_size(size)?,
            })
        }
        None => Source::Single(parse_location(source_target, source_id)?),
    };

    Ok(MoveCommand {
        source,
        destination,
    })
}

fn split_target(side: &str) -> Result<(Target, &str), ParseMoveError> {
    let mut chars = side.chars();
    // Both sides are non-empty at this point.
    let first = chars.next().ok_or(ParseMoveError::EmptySide)?;
    let target = Target::from_char(first).ok_or(ParseMoveError::UnknownTarget(first))?;
    Ok((target, chars.as_str()))
}

fn check_identifier_kind(target: Target, id: &str) -> Result<(), ParseMoveError> {
    let alphabetic = id.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    match target {
        Target::Foundation if !alphabetic => Err(ParseMoveError::ExpectedSuit(id.to_string())),
        Target::Tableau | Target::Freecell if alphabetic || id.is_empty() => {
            Err(ParseMoveError::ExpectedNumber(id.to_string()))
        }
        _ => Ok(()),
    }
}

fn parse_location(target: Target, id: &str) -> Result<Location, ParseMoveError> {
    match target {
        Target::Tableau => Ok(Location::Tableau(parse_index(id)?)),
        Target::Freecell => Ok(Location::Freecell(parse_index(id)?)),
        Target::Foundation => Suit::from_token(id)
            .map(Location::Foundation)
            .ok_or_else(|| ParseMoveError::UnknownSuit(id.to_string())),
    }
}

fn parse_index(id: &str) -> Result<usize, ParseMoveError> {
    if !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseMoveError::ExpectedNumber(id.to_string()));
    }
    match id.parse::<usize>() {
        Ok(0) => Err(ParseMoveError::ZeroIndex),
        Ok(index) => Ok(index),
        Err(_) => Err(ParseMoveError::ExpectedNumber(id.to_string())),
    }
}

fn parse_size(size: &str) -> Result<usize, ParseMoveError> {
    match size.parse::<usize>() {
        Ok(0) | Err(_) => Err(ParseMoveError::InvalidSize(size.to_string())),
        Ok(size) => Ok(size),
    }
}
