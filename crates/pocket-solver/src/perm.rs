//! Permutation states, named generator sets, and the group contract the
//! search consumes.
//!
//! A state is an [`Arrangement`]: a fixed-length sequence of sticker labels.
//! A move is a [`Perm`] of positions; applying it rearranges a state so that
//! `result[i] = state[perm[i]]`.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::PermError;

/// Largest supported permutation degree (values are stored as `u8`)
pub const MAX_DEGREE: usize = 256;

type Slots = SmallVec<[u8; 24]>;

/// The contract between the search and a permutation library.
///
/// Implementors supply an ordered generator set, a pure move application,
/// and move inversion with `apply(inverse(m), &apply(m, s)) == s`.
pub trait PermutationGroup {
    type State: Clone + Eq + Hash;
    type Move: Copy;

    /// Generators in the order the search expands them
    fn generators(&self) -> &[Self::Move];

    fn apply(&self, mv: Self::Move, state: &Self::State) -> Self::State;

    fn inverse(&self, mv: Self::Move) -> Self::Move;

    /// Apply `moves` left to right starting from `state`
    fn apply_all(&self, state: &Self::State, moves: &[Self::Move]) -> Self::State {
        moves
            .iter()
            .fold(state.clone(), |current, &mv| self.apply(mv, &current))
    }

    /// Check that `moves` transforms `start` into `end`
    fn verify_path(&self, start: &Self::State, end: &Self::State, moves: &[Self::Move]) -> bool {
        self.apply_all(start, moves) == *end
    }
}

/// Split a textual permutation such as `(2, 0, 1)` or `2 0 1` into values
fn parse_values(s: &str) -> Result<Vec<u8>, PermError> {
    let trimmed = s
        .trim()
        .trim_start_matches(&['(', '['][..])
        .trim_end_matches(&[')', ']'][..]);

    trimmed
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<u8>()
                .map_err(|e| PermError::Parse(format!("{token:?}: {e}")))
        })
        .collect()
}

fn write_values(f: &mut fmt::Formatter<'_>, values: &[u8]) -> fmt::Result {
    write!(f, "(")?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{value}")?;
    }
    write!(f, ")")
}

/// A configuration: one label per position
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<u8>", into = "Vec<u8>")]
pub struct Arrangement(Slots);

impl Arrangement {
    /// The arrangement `(0, 1, ..., n - 1)`
    pub fn sorted(len: usize) -> Self {
        Self((0..len).map(|i| i as u8).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Arrangement {
    fn from(values: Vec<u8>) -> Self {
        Self(Slots::from_vec(values))
    }
}

impl From<Arrangement> for Vec<u8> {
    fn from(arrangement: Arrangement) -> Self {
        arrangement.0.into_vec()
    }
}

impl From<&Perm> for Arrangement {
    fn from(perm: &Perm) -> Self {
        Self(perm.0.clone())
    }
}

impl FromStr for Arrangement {
    type Err = PermError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_values(s).map(Arrangement::from)
    }
}

impl fmt::Display for Arrangement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_values(f, &self.0)
    }
}

/// A bijection on `0..n`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Perm(Slots);

impl Perm {
    pub fn identity(len: usize) -> Self {
        Self((0..len).map(|i| i as u8).collect())
    }

    /// Validate that `values` is a permutation of `0..values.len()`
    pub fn from_vec(values: Vec<u8>) -> Result<Self, PermError> {
        let len = values.len();
        if len > MAX_DEGREE {
            return Err(PermError::TooLong(len));
        }

        let mut seen = vec![false; len];
        for &value in &values {
            let slot = seen
                .get_mut(value as usize)
                .ok_or(PermError::OutOfRange { value, len })?;
            if *slot {
                return Err(PermError::Duplicate { value });
            }
            *slot = true;
        }

        Ok(Self(Slots::from_vec(values)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Rearrange `state` so that `result[i] = state[self[i]]`.
    ///
    /// Panics if the lengths differ; callers validate states up front with
    /// [`GeneratorSet::check_state`].
    pub fn apply(&self, state: &Arrangement) -> Arrangement {
        assert_eq!(
            self.len(),
            state.len(),
            "permutation and state lengths differ"
        );
        Arrangement(self.0.iter().map(|&i| state.0[i as usize]).collect())
    }

    /// Checked variant of [`Perm::apply`]
    pub fn try_apply(&self, state: &Arrangement) -> Result<Arrangement, PermError> {
        if self.len() != state.len() {
            return Err(PermError::LengthMismatch {
                expected: self.len(),
                actual: state.len(),
            });
        }
        Ok(self.apply(state))
    }

    /// The permutation equivalent to applying `self` and then `next`
    pub fn then(&self, next: &Perm) -> Perm {
        assert_eq!(self.len(), next.len(), "permutation lengths differ");
        Perm(next.0.iter().map(|&i| self.0[i as usize]).collect())
    }

    pub fn inverse(&self) -> Perm {
        let mut inverse: Slots = smallvec::smallvec![0; self.len()];
        for (i, &value) in self.0.iter().enumerate() {
            inverse[value as usize] = i as u8;
        }
        Perm(inverse)
    }

    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &value)| i == value as usize)
    }
}

impl TryFrom<Vec<u8>> for Perm {
    type Error = PermError;

    fn try_from(values: Vec<u8>) -> Result<Self, Self::Error> {
        Perm::from_vec(values)
    }
}

impl From<Perm> for Vec<u8> {
    fn from(perm: Perm) -> Self {
        perm.0.into_vec()
    }
}

impl FromStr for Perm {
    type Err = PermError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Perm::from_vec(parse_values(s)?)
    }
}

impl fmt::Display for Perm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_values(f, &self.0)
    }
}

/// Handle to one generator of a [`GeneratorSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Twist(usize);

impl Twist {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named generator, as read from input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedPerm {
    pub name: String,
    pub perm: Perm,
}

/// An ordered, inverse-closed set of named generators
#[derive(Debug, Clone)]
pub struct GeneratorSet {
    names: Vec<String>,
    perms: Vec<Perm>,
    twists: Vec<Twist>,
    inverses: Vec<Twist>,
}

impl GeneratorSet {
    /// Build a generator set, resolving each generator's inverse.
    ///
    /// When several generators share a permutation the first one in order is
    /// used as the inverse.
    pub fn new(generators: Vec<NamedPerm>) -> Result<Self, PermError> {
        let degree = generators
            .first()
            .map(|g| g.perm.len())
            .ok_or(PermError::EmptyGenerators)?;

        let mut seen_names = HashSet::new();
        for generator in &generators {
            if generator.perm.len() != degree {
                return Err(PermError::LengthMismatch {
                    expected: degree,
                    actual: generator.perm.len(),
                });
            }
            if !seen_names.insert(generator.name.as_str()) {
                return Err(PermError::DuplicateName(generator.name.clone()));
            }
        }

        let mut inverses = Vec::with_capacity(generators.len());
        for generator in &generators {
            let inverse = generator.perm.inverse();
            let index = generators
                .iter()
                .position(|candidate| candidate.perm == inverse)
                .ok_or_else(|| PermError::NotInverseClosed(generator.name.clone()))?;
            inverses.push(Twist(index));
        }

        let (names, perms): (Vec<String>, Vec<Perm>) = generators
            .into_iter()
            .map(|g| (g.name, g.perm))
            .unzip();

        Ok(Self {
            names,
            perms,
            twists: (0..inverses.len()).map(Twist).collect(),
            inverses,
        })
    }

    /// Length of every generator (and of every state it acts on)
    pub fn degree(&self) -> usize {
        self.perms[0].len()
    }

    pub fn len(&self) -> usize {
        self.perms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perms.is_empty()
    }

    pub fn name(&self, twist: Twist) -> &str {
        &self.names[twist.0]
    }

    pub fn perm(&self, twist: Twist) -> &Perm {
        &self.perms[twist.0]
    }

    pub fn find(&self, name: &str) -> Option<Twist> {
        self.names.iter().position(|n| n == name).map(Twist)
    }

    /// Ensure a state can be acted on by this set
    pub fn check_state(&self, state: &Arrangement) -> Result<(), PermError> {
        if state.len() != self.degree() {
            return Err(PermError::LengthMismatch {
                expected: self.degree(),
                actual: state.len(),
            });
        }
        Ok(())
    }

    /// Parse a whitespace or comma separated list of move names
    pub fn parse_sequence(&self, s: &str) -> Result<Vec<Twist>, PermError> {
        s.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| {
                self.find(token)
                    .ok_or_else(|| PermError::UnknownMove(token.to_string()))
            })
            .collect()
    }

    pub fn format_sequence(&self, moves: &[Twist]) -> String {
        moves
            .iter()
            .map(|&twist| self.name(twist))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn names_of(&self, moves: &[Twist]) -> Vec<String> {
        moves.iter().map(|&twist| self.name(twist).to_string()).collect()
    }
}

impl PermutationGroup for GeneratorSet {
    type State = Arrangement;
    type Move = Twist;

    fn generators(&self) -> &[Twist] {
        &self.twists
    }

    fn apply(&self, mv: Twist, state: &Arrangement) -> Arrangement {
        self.perms[mv.0].apply(state)
    }

    fn inverse(&self, mv: Twist) -> Twist {
        self.inverses[mv.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, values: Vec<u8>) -> NamedPerm {
        NamedPerm {
            name: name.to_string(),
            perm: Perm::from_vec(values).unwrap(),
        }
    }

    #[test]
    fn test_from_vec_validation() {
        assert!(Perm::from_vec(vec![2, 0, 1]).is_ok());
        assert_eq!(
            Perm::from_vec(vec![0, 0, 1]),
            Err(PermError::Duplicate { value: 0 })
        );
        assert_eq!(
            Perm::from_vec(vec![0, 3, 1]),
            Err(PermError::OutOfRange { value: 3, len: 3 })
        );
    }

    #[test]
    fn test_apply_and_inverse() {
        let perm = Perm::from_vec(vec![1, 2, 0]).unwrap();
        let state: Arrangement = "(7, 8, 9)".parse().unwrap();

        let moved = perm.apply(&state);
        assert_eq!(moved.as_slice(), &[8, 9, 7]);
        assert_eq!(perm.inverse().apply(&moved), state);
        assert!(perm.then(&perm.inverse()).is_identity());
    }

    #[test]
    fn test_then_matches_sequential_apply() {
        let a = Perm::from_vec(vec![1, 0, 2, 3]).unwrap();
        let b = Perm::from_vec(vec![0, 2, 3, 1]).unwrap();
        let state = Arrangement::sorted(4);

        assert_eq!(a.then(&b).apply(&state), b.apply(&a.apply(&state)));
    }

    #[test]
    fn test_try_apply_length_mismatch() {
        let perm = Perm::identity(3);
        let state = Arrangement::sorted(4);
        assert_eq!(
            perm.try_apply(&state),
            Err(PermError::LengthMismatch {
                expected: 3,
                actual: 4
            })
        );
    }

    #[test]
    fn test_parse_and_display() {
        let perm: Perm = "[2 0 1]".parse().unwrap();
        assert_eq!(perm.to_string(), "(2, 0, 1)");
        assert!("(1, x)".parse::<Perm>().is_err());
    }

    #[test]
    fn test_serde_rejects_invalid_perm() {
        let perm: Perm = serde_json::from_str("[1, 0]").unwrap();
        assert_eq!(perm.as_slice(), &[1, 0]);
        assert!(serde_json::from_str::<Perm>("[1, 1]").is_err());
    }

    #[test]
    fn test_generator_set_resolves_inverses() {
        let set = GeneratorSet::new(vec![
            named("R", vec![1, 2, 0]),
            named("Ri", vec![2, 0, 1]),
            named("S", vec![1, 0, 2]),
        ])
        .unwrap();

        let r = set.find("R").unwrap();
        let ri = set.find("Ri").unwrap();
        let s = set.find("S").unwrap();
        assert_eq!(set.inverse(r), ri);
        assert_eq!(set.inverse(ri), r);
        assert_eq!(set.inverse(s), s);
    }

    #[test]
    fn test_generator_set_requires_inverse_closure() {
        let result = GeneratorSet::new(vec![named("R", vec![1, 2, 0])]);
        assert_eq!(result.unwrap_err(), PermError::NotInverseClosed("R".to_string()));
    }

    #[test]
    fn test_generator_set_rejects_bad_input() {
        assert_eq!(
            GeneratorSet::new(Vec::new()).unwrap_err(),
            PermError::EmptyGenerators
        );
        assert_eq!(
            GeneratorSet::new(vec![named("A", vec![1, 0]), named("A", vec![1, 0])]).unwrap_err(),
            PermError::DuplicateName("A".to_string())
        );
        assert!(matches!(
            GeneratorSet::new(vec![named("A", vec![1, 0]), named("B", vec![0, 2, 1])]),
            Err(PermError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_parse_sequence() {
        let set = GeneratorSet::new(vec![named("A", vec![1, 0, 2]), named("B", vec![0, 2, 1])])
            .unwrap();

        let moves = set.parse_sequence("A B, A").unwrap();
        assert_eq!(set.format_sequence(&moves), "A B A");
        assert_eq!(
            set.parse_sequence("A C"),
            Err(PermError::UnknownMove("C".to_string()))
        );
    }

    #[test]
    fn test_verify_path() {
        let set = GeneratorSet::new(vec![named("A", vec![1, 0, 2]), named("B", vec![0, 2, 1])])
            .unwrap();
        let start = Arrangement::sorted(3);
        let moves = set.parse_sequence("A B").unwrap();
        let end = set.apply_all(&start, &moves);

        assert_eq!(end.as_slice(), &[1, 2, 0]);
        assert!(set.verify_path(&start, &end, &moves));
        assert!(!set.verify_path(&start, &start, &moves));
    }
}
