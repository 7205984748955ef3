//! BIP-32 style derivation paths

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::derivation::HARDENED_OFFSET;
use crate::error::{Error, Result};

/// One path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildIndex {
    /// Index below the hardened offset
    pub index: u32,
    pub hardened: bool,
}

impl ChildIndex {
    pub fn normal(index: u32) -> Self {
        Self {
            index,
            hardened: false,
        }
    }

    pub fn hardened(index: u32) -> Self {
        Self {
            index,
            hardened: true,
        }
    }

    /// Raw BIP-32 index, with the hardened bit applied
    pub fn raw(self) -> u32 {
        if self.hardened {
            self.index | HARDENED_OFFSET
        } else {
            self.index
        }
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

/// An ordered list of derivation segments; `m` alone is the empty path
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    segments: Vec<ChildIndex>,
}

impl DerivationPath {
    pub fn new(segments: Vec<ChildIndex>) -> Self {
        Self { segments }
    }

    /// The empty path, which selects the master key
    pub fn master() -> Self {
        Self::default()
    }

    /// BIP-44 style `m/purpose'/coin'/account'/change/index`
    pub fn bip44(purpose: u32, coin_type: u32, account: u32, change: u32, index: u32) -> Self {
        Self::new(vec![
            ChildIndex::hardened(purpose),
            ChildIndex::hardened(coin_type),
            ChildIndex::hardened(account),
            ChildIndex::normal(change),
            ChildIndex::normal(index),
        ])
    }

    pub fn segments(&self) -> &[ChildIndex] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// First non-hardened segment, if any
    pub fn first_normal(&self) -> Option<ChildIndex> {
        self.segments.iter().copied().find(|segment| !segment.hardened)
    }

    pub fn is_fully_hardened(&self) -> bool {
        self.first_normal().is_none()
    }
}

fn parse_segment(component: &str) -> Result<ChildIndex> {
    let (digits, hardened) = match component
        .strip_suffix('\'')
        .or_else(|| component.strip_suffix('h'))
        .or_else(|| component.strip_suffix('H'))
    {
        Some(digits) => (digits, true),
        None => (component, false),
    };

    let index = digits
        .parse::<u32>()
        .map_err(|_| Error::InvalidPath(format!("invalid component: {}", component)))?;

    if index >= HARDENED_OFFSET {
        return Err(Error::InvalidPath(format!("index out of range: {}", component)));
    }

    Ok(ChildIndex { index, hardened })
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        let path = path.trim();
        let mut components = path.split('/');

        match components.next() {
            Some("m") | Some("M") => {}
            _ => return Err(Error::InvalidPath(format!("must start with m: {}", path))),
        }

        let segments = components.map(parse_segment).collect::<Result<Vec<_>>>()?;
        Ok(Self { segments })
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl Serialize for DerivationPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DerivationPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
