use std::{error::Error, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Gender values accepted on a [`Person`] record.
///
/// Deserialization is strict: any other upstream value is rejected so that a
/// shape mismatch surfaces at the fetch boundary instead of later.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Divers,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Divers => "divers",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The primary record a run starts from.
///
/// `homeworld` and `films` are references (URLs or API-relative paths), not
/// inline data. Every other field the upstream API returns is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Display name (e.g., "Luke Skywalker")
    pub name: String,
    /// Height in centimeters as returned upstream (e.g., "172")
    pub height: String,
    pub gender: Gender,
    /// Reference to the person's homeworld resource
    pub homeworld: String,
    /// Ordered references to film resources
    #[serde(default)]
    pub films: Vec<String>,
}

/// Projection of a planet resource; only the name is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planet {
    pub name: String,
}

/// Projection of a film resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    pub title: String,
    pub director: String,
    /// ISO date string as returned upstream (e.g., "1977-05-25")
    pub release_date: String,
}

/// The denormalized output record.
///
/// `films` is ordered exactly like the `films` references of the [`Person`]
/// it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonInfo {
    pub name: String,
    pub height: String,
    pub gender: String,
    /// Name of the resolved homeworld
    pub homeworld: String,
    pub films: Vec<Film>,
}

/// How a driver expresses suspension and sequencing.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Default)]
pub enum CompositionStyle {
    /// Explicit continuations registered on each completion.
    #[default]
    Chained,
    /// Straight-line `async`/`await`.
    Linear,
    /// Composed producers with cancellable subscriptions.
    Stream,
}

impl CompositionStyle {
    pub const ALL: [CompositionStyle; 3] = [Self::Chained, Self::Linear, Self::Stream];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chained => "chained",
            Self::Linear => "linear",
            Self::Stream => "stream",
        }
    }
}

impl fmt::Display for CompositionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompositionStyle {
    type Err = ParseCompositionStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chained" => Ok(Self::Chained),
            "linear" => Ok(Self::Linear),
            "stream" => Ok(Self::Stream),
            _ => Err(ParseCompositionStyleError),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseCompositionStyleError;

impl fmt::Display for ParseCompositionStyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid composition style; expected 'chained', 'linear' or 'stream'")
    }
}

impl Error for ParseCompositionStyleError {}
