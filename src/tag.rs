// Copyright 2025 the Drawgeom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Durable identity for geometric entities.

use core::fmt;
use core::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use uuid::Uuid;

/// A 128-bit identifier assigned once to each curve and vertex.
///
/// Tags survive save and restore, so owners such as a cosmetic edge list can
/// refer to a curve by tag instead of holding it.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag(Uuid);

impl Tag {
    /// The all-zero tag, never produced by a [`TagGenerator`].
    pub const NIL: Tag = Tag(Uuid::nil());

    /// Wrap an existing UUID.
    #[inline]
    pub const fn from_uuid(uuid: Uuid) -> Tag {
        Tag(uuid)
    }

    /// The underlying UUID.
    #[inline]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Is this the nil tag?
    #[inline]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self.0.hyphenated())
    }
}

impl FromStr for Tag {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Tag, uuid::Error> {
        Uuid::parse_str(s.trim()).map(Tag)
    }
}

/// Source of fresh tags.
///
/// The generator is seeded once, either from the wall clock or from an
/// explicit seed, and then reused for every tag it hands out. It is owned by
/// whoever builds geometry (a document or a session) and passed to the
/// constructors, so there is no hidden process-wide state. A generator is
/// `Send` but not shared; give each worker its own.
#[derive(Debug)]
pub struct TagGenerator {
    rng: StdRng,
}

impl TagGenerator {
    /// A generator seeded from the current time.
    pub fn new() -> TagGenerator {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        TagGenerator::from_seed(seed)
    }

    /// A generator with a fixed seed, producing a reproducible sequence.
    pub fn from_seed(seed: u64) -> TagGenerator {
        TagGenerator {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Produce the next tag.
    pub fn next_tag(&mut self) -> Tag {
        let mut bytes = [0_u8; 16];
        self.rng.fill_bytes(&mut bytes);
        Tag(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }
}

impl Default for TagGenerator {
    fn default() -> Self {
        TagGenerator::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn tags_are_distinct() {
        let mut tags = TagGenerator::new();
        let seen: HashSet<Tag> = (0..1000).map(|_| tags.next_tag()).collect();
        assert_eq!(seen.len(), 1000);
        assert!(!seen.contains(&Tag::NIL));
    }

    #[test]
    fn seeded_generators_repeat() {
        let mut a = TagGenerator::from_seed(42);
        let mut b = TagGenerator::from_seed(42);
        for _ in 0..10 {
            assert_eq!(a.next_tag(), b.next_tag());
        }
    }

    #[test]
    fn string_round_trip() {
        let tag = TagGenerator::from_seed(3).next_tag();
        let text = tag.to_string();
        assert_eq!(text.len(), 36);
        assert_eq!(text.parse::<Tag>().unwrap(), tag);
        assert!("not-a-uuid".parse::<Tag>().is_err());
    }

    #[test]
    fn random_tags_are_version_four() {
        let tag = TagGenerator::from_seed(9).next_tag();
        assert_eq!(tag.as_uuid().get_version_num(), 4);
    }
}
