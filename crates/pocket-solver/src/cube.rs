//! The 2x2x2 pocket cube as a sticker permutation puzzle.
//!
//! Each of the 24 stickers is identified by the corner cubie it sits on and
//! the outward normal of its face. Face turns are derived by rotating both
//! vectors a quarter turn, so no hand-written cycle tables are needed.
//!
//! Only the front, left and up faces are turned. The down-back-right corner
//! therefore never moves, which fixes the cube's orientation and leaves
//! 3,674,160 reachable states, all within 14 quarter twists of each other.

use rand::Rng;

use crate::perm::{Arrangement, GeneratorSet, NamedPerm, Perm, PermutationGroup, Twist};

/// Number of stickers on a 2x2x2 cube
pub const STICKERS: usize = 24;

/// Quarter-twist diameter of the pocket cube
pub const GOD_NUMBER: usize = 14;

type Vec3 = [i8; 3];

/// Outward face normals in sticker order: U, R, F, D, L, B
const FACES: [Vec3; 6] = [
    [0, 1, 0],
    [1, 0, 0],
    [0, 0, 1],
    [0, -1, 0],
    [-1, 0, 0],
    [0, 0, -1],
];

const UP: Vec3 = FACES[0];
const FRONT: Vec3 = FACES[2];
const LEFT: Vec3 = FACES[4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sticker {
    corner: Vec3,
    normal: Vec3,
}

fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: Vec3, b: Vec3) -> i8 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Rotate `v` a quarter turn clockwise as seen from outside the face with
/// outward normal `face`.
fn quarter_turn(v: Vec3, face: Vec3) -> Vec3 {
    let c = cross(v, face);
    let d = dot(v, face);
    [c[0] + d * face[0], c[1] + d * face[1], c[2] + d * face[2]]
}

/// All stickers, grouped by face in `FACES` order
fn stickers() -> Vec<Sticker> {
    let mut stickers = Vec::with_capacity(STICKERS);
    for normal in FACES {
        for x in [-1, 1] {
            for y in [-1, 1] {
                for z in [-1, 1] {
                    let corner = [x, y, z];
                    if dot(corner, normal) == 1 {
                        stickers.push(Sticker { corner, normal });
                    }
                }
            }
        }
    }
    stickers
}

/// Clockwise quarter turn of the face with outward normal `face`
fn face_turn(stickers: &[Sticker], face: Vec3) -> Perm {
    let mut values: Vec<u8> = (0..stickers.len() as u8).collect();

    for (from, sticker) in stickers.iter().enumerate() {
        if dot(sticker.corner, face) != 1 {
            continue;
        }
        let moved = Sticker {
            corner: quarter_turn(sticker.corner, face),
            normal: quarter_turn(sticker.normal, face),
        };
        if let Some(to) = stickers.iter().position(|s| *s == moved) {
            values[to] = from as u8;
        }
    }

    Perm::from_vec(values).unwrap_or_else(|e| unreachable!("face turn is not a permutation: {e}"))
}

/// The solved cube
pub fn solved() -> Arrangement {
    Arrangement::sorted(STICKERS)
}

/// `F, Fi, L, Li, U, Ui`: clockwise and counter-clockwise quarter twists of
/// the front, left and up faces
pub fn quarter_twists() -> GeneratorSet {
    let stickers = stickers();
    let mut generators = Vec::with_capacity(6);

    for (name, face) in [("F", FRONT), ("L", LEFT), ("U", UP)] {
        let turn = face_turn(&stickers, face);
        let counter = turn.inverse();
        generators.push(NamedPerm {
            name: name.to_string(),
            perm: turn,
        });
        generators.push(NamedPerm {
            name: format!("{name}i"),
            perm: counter,
        });
    }

    GeneratorSet::new(generators)
        .unwrap_or_else(|e| unreachable!("quarter twists are inverse-closed: {e}"))
}

/// Apply `length` random twists to the solved cube.
///
/// A twist is never immediately followed by its own inverse.
pub fn scramble<R: Rng + ?Sized>(
    twists: &GeneratorSet,
    rng: &mut R,
    length: usize,
) -> (Arrangement, Vec<Twist>) {
    let generators = twists.generators();
    let mut moves: Vec<Twist> = Vec::with_capacity(length);

    while moves.len() < length {
        let candidate = generators[rng.gen_range(0..generators.len())];
        if let Some(&last) = moves.last() {
            if twists.inverse(last) == candidate {
                continue;
            }
        }
        moves.push(candidate);
    }

    (twists.apply_all(&solved(), &moves), moves)
}
