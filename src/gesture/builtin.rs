//! Bundled gestures for the Mixamo rigs
//!
//! Angles are radians relative to the bind (T) pose. Right-hand dominant.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_6, PI};

use super::dictionary::{GestureDictionary, GestureLibrary};
use super::procedure::{Gesture, Goal, RestPose};
use crate::animation::Axis;
use crate::avatar::assets::bone;

const FINGERS: [&str; 5] = ["Thumb", "Index", "Middle", "Ring", "Pinky"];

/// Hand shape as per-finger curl (0 = straight, 1 = fully bent),
/// thumb first
type HandShape = [f32; 5];

/// Finger-spelling table: letter, hand shape, optional wrist turn
const LETTERS: [(char, HandShape, Option<(Axis, f32)>); 26] = [
    ('A', [0.0, 1.0, 1.0, 1.0, 1.0], None),
    ('B', [1.0, 0.0, 0.0, 0.0, 0.0], None),
    ('C', [0.3, 0.5, 0.5, 0.5, 0.5], Some((Axis::Y, FRAC_PI_6))),
    ('D', [0.6, 0.0, 1.0, 1.0, 1.0], None),
    ('E', [1.0, 0.8, 0.8, 0.8, 0.8], None),
    ('F', [0.6, 0.7, 0.0, 0.0, 0.0], None),
    ('G', [0.0, 0.0, 1.0, 1.0, 1.0], Some((Axis::X, FRAC_PI_2))),
    ('H', [0.8, 0.0, 0.0, 1.0, 1.0], Some((Axis::X, FRAC_PI_2))),
    ('I', [0.8, 1.0, 1.0, 1.0, 0.0], None),
    ('J', [0.8, 1.0, 1.0, 1.0, 0.0], Some((Axis::Z, -FRAC_PI_3))),
    ('K', [0.0, 0.0, 0.2, 1.0, 1.0], None),
    ('L', [0.0, 0.0, 1.0, 1.0, 1.0], None),
    ('M', [1.0, 0.9, 0.9, 0.9, 1.0], Some((Axis::X, -FRAC_PI_3))),
    ('N', [1.0, 0.9, 0.9, 1.0, 1.0], Some((Axis::X, -FRAC_PI_3))),
    ('O', [0.5, 0.6, 0.6, 0.6, 0.6], None),
    ('P', [0.0, 0.0, 0.2, 1.0, 1.0], Some((Axis::X, -FRAC_PI_2))),
    ('Q', [0.0, 0.0, 1.0, 1.0, 1.0], Some((Axis::X, -FRAC_PI_2))),
    ('R', [0.8, 0.1, 0.0, 1.0, 1.0], Some((Axis::Y, -FRAC_PI_6))),
    ('S', [0.7, 1.0, 1.0, 1.0, 1.0], None),
    ('T', [0.5, 0.8, 1.0, 1.0, 1.0], None),
    ('U', [0.8, 0.0, 0.0, 1.0, 1.0], None),
    ('V', [0.8, 0.0, 0.0, 1.0, 1.0], Some((Axis::Y, FRAC_PI_6))),
    ('W', [0.8, 0.0, 0.0, 0.0, 1.0], None),
    ('X', [0.8, 0.5, 1.0, 1.0, 1.0], None),
    ('Y', [0.0, 1.0, 1.0, 1.0, 0.0], None),
    ('Z', [0.8, 0.0, 1.0, 1.0, 1.0], Some((Axis::Z, FRAC_PI_3))),
];

/// Counting hand shapes for the number words
const NUMBERS: [(&str, HandShape, Option<(Axis, f32)>); 11] = [
    ("ZERO", [0.5, 0.6, 0.6, 0.6, 0.6], None),
    ("ONE", [0.8, 0.0, 1.0, 1.0, 1.0], None),
    ("TWO", [0.8, 0.0, 0.0, 1.0, 1.0], None),
    ("THREE", [0.0, 0.0, 0.0, 1.0, 1.0], None),
    ("FOUR", [1.0, 0.0, 0.0, 0.0, 0.0], None),
    ("FIVE", [0.0, 0.0, 0.0, 0.0, 0.0], None),
    ("SIX", [0.0, 1.0, 1.0, 1.0, 0.0], None),
    ("SEVEN", [0.6, 0.0, 0.0, 1.0, 0.0], None),
    ("EIGHT", [0.6, 0.0, 1.0, 0.0, 0.0], None),
    ("NINE", [0.6, 1.0, 0.0, 0.0, 0.0], None),
    ("TEN", [0.0, 1.0, 1.0, 1.0, 1.0], Some((Axis::Y, FRAC_PI_6))),
];

fn rot(joint: &str, axis: Axis, target: f32) -> Goal {
    Goal::rotation(bone(joint), axis, target)
}

/// Arms lowered to the sides, head slightly bowed
pub fn rest_pose() -> RestPose {
    RestPose::new([
        rot("Neck", Axis::X, PI / 12.0),
        rot("LeftArm", Axis::Z, -FRAC_PI_3),
        rot("LeftForeArm", Axis::Y, -PI / 1.5),
        rot("RightArm", Axis::Z, FRAC_PI_3),
        rot("RightForeArm", Axis::Y, PI / 1.5),
    ])
}

/// Right hand raised in front of the chest, palm out
fn present_right() -> Vec<Goal> {
    vec![
        rot("RightArm", Axis::Z, FRAC_PI_6),
        rot("RightArm", Axis::X, FRAC_PI_6),
        rot("RightForeArm", Axis::Y, FRAC_PI_3),
        rot("RightForeArm", Axis::Z, -FRAC_PI_3),
    ]
}

/// Curl goals for every finger of one hand
fn hand_shape(side: &str, shape: HandShape) -> Vec<Goal> {
    let sign = if side == "Right" { 1.0 } else { -1.0 };
    let mut goals = Vec::new();

    for (finger, curl) in FINGERS.iter().zip(shape) {
        // Thumb folds across the palm; fingers bend toward it
        let axis = if *finger == "Thumb" { Axis::Y } else { Axis::Z };
        for segment in 1..=3 {
            let joint = format!("{}Hand{}{}", side, finger, segment);
            goals.push(rot(&joint, axis, sign * curl * FRAC_PI_2));
        }
    }

    goals
}

/// Right hand presented, then shaped
fn hand_sign(name: &str, shape: HandShape, wrist: Option<(Axis, f32)>, rest: &RestPose) -> Gesture {
    let mut shaped = hand_shape("Right", shape);
    if let Some((axis, angle)) = wrist {
        shaped.push(rot("RightHand", axis, angle));
    }

    Gesture::builder(name, rest)
        .frame(present_right())
        .frame(shaped)
        .build()
}

/// Finger-spelling dictionary keyed by uppercase letter
pub fn alphabet(rest: &RestPose) -> GestureDictionary {
    let mut dict = GestureDictionary::new();
    for (ch, shape, wrist) in LETTERS {
        let name = ch.to_string();
        let gesture = hand_sign(&name, shape, wrist, rest);
        dict.insert(name, gesture);
    }
    dict
}

/// Word dictionary keyed by uppercase token
pub fn words(rest: &RestPose) -> GestureDictionary {
    let fist = [0.6, 1.0, 1.0, 1.0, 1.0];
    let point = [0.8, 0.0, 1.0, 1.0, 1.0];
    let flat = [0.0; 5];

    let gestures = [
        // Index finger to own chest
        Gesture::builder("I", rest)
            .frame(hand_shape("Right", point))
            .frame([
                rot("RightArm", Axis::Z, FRAC_PI_6),
                rot("RightForeArm", Axis::Z, -2.0),
                rot("RightHand", Axis::Y, FRAC_PI_2),
            ])
            .build(),
        // Index finger toward the viewer
        Gesture::builder("YOU", rest)
            .frame(hand_shape("Right", point))
            .frame([
                rot("RightArm", Axis::Z, FRAC_PI_6),
                rot("RightArm", Axis::X, FRAC_PI_3),
                rot("RightForeArm", Axis::Y, FRAC_PI_6),
            ])
            .build(),
        // Index sweeps from own shoulder across the chest
        Gesture::builder("WE", rest)
            .frame(hand_shape("Right", point))
            .frame([
                rot("RightArm", Axis::Z, FRAC_PI_6),
                rot("RightForeArm", Axis::Z, -2.2),
            ])
            .frame([rot("RightForeArm", Axis::Z, -1.2)])
            .build(),
        // Both flat hands meet as a roof
        Gesture::builder("HOME", rest)
            .frame([
                rot("RightArm", Axis::Z, 0.2),
                rot("LeftArm", Axis::Z, -0.2),
                rot("RightForeArm", Axis::Z, -1.2),
                rot("LeftForeArm", Axis::Z, 1.2),
            ])
            .frame([
                rot("RightHand", Axis::Z, -0.6),
                rot("LeftHand", Axis::Z, 0.6),
            ])
            .build(),
        // Fist nods at the wrist twice
        Gesture::builder("YES", rest)
            .frame(present_right())
            .frame(hand_shape("Right", fist))
            .frame([rot("RightHand", Axis::X, 0.6)])
            .frame([rot("RightHand", Axis::X, -0.2)])
            .frame([rot("RightHand", Axis::X, 0.6)])
            .build(),
        // Flat hand shakes side to side
        Gesture::builder("NO", rest)
            .frame(present_right())
            .frame([rot("RightHand", Axis::Y, 0.5)])
            .frame([rot("RightHand", Axis::Y, -0.5)])
            .frame([rot("RightHand", Axis::Y, 0.5)])
            .build(),
        // Flat hand from chin outward
        Gesture::builder("THANK", rest)
            .frame(hand_shape("Right", flat))
            .frame([
                rot("RightArm", Axis::Z, 0.3),
                rot("RightForeArm", Axis::Z, -2.4),
            ])
            .frame([
                rot("RightArm", Axis::X, FRAC_PI_6),
                rot("RightForeArm", Axis::Z, -1.4),
            ])
            .build(),
        // Flat hand circles on the chest
        Gesture::builder("PLEASE", rest)
            .frame([
                rot("RightArm", Axis::Z, FRAC_PI_6),
                rot("RightForeArm", Axis::Z, -2.0),
            ])
            .frame([rot("RightHand", Axis::Z, 0.4)])
            .frame([rot("RightHand", Axis::Z, -0.4)])
            .build(),
        // Fist circles on the chest
        Gesture::builder("SORRY", rest)
            .frame(hand_shape("Right", fist))
            .frame([
                rot("RightArm", Axis::Z, FRAC_PI_6),
                rot("RightForeArm", Axis::Z, -2.0),
            ])
            .frame([rot("RightHand", Axis::Z, 0.4)])
            .frame([rot("RightHand", Axis::Z, -0.4)])
            .build(),
        // Left palm lifts the right fist
        Gesture::builder("HELP", rest)
            .frame(hand_shape("Right", fist))
            .frame([
                rot("RightArm", Axis::Z, 0.4),
                rot("LeftArm", Axis::Z, -0.4),
                rot("RightForeArm", Axis::Z, -1.0),
                rot("LeftForeArm", Axis::Z, 1.0),
            ])
            .frame([rot("RightArm", Axis::Z, 0.1), rot("LeftArm", Axis::Z, -0.1)])
            .build(),
        // Right edge chops onto the left palm
        Gesture::builder("STOP", rest)
            .frame([
                rot("LeftArm", Axis::Z, -0.3),
                rot("LeftForeArm", Axis::Z, 1.3),
                rot("RightArm", Axis::Z, 0.1),
                rot("RightForeArm", Axis::Z, -1.0),
            ])
            .frame([rot("RightArm", Axis::Z, 0.4)])
            .build(),
        // Thumb up
        Gesture::builder("GOOD", rest)
            .frame(present_right())
            .frame(hand_shape("Right", [0.0, 1.0, 1.0, 1.0, 1.0]))
            .frame([rot("RightHand", Axis::X, -0.3)])
            .build(),
        // Index beckons inward
        Gesture::builder("COME", rest)
            .frame(present_right())
            .frame(hand_shape("Right", point))
            .frame([rot("RightForeArm", Axis::Z, -1.8)])
            .build(),
        // Index points away
        Gesture::builder("GO", rest)
            .frame(hand_shape("Right", point))
            .frame([
                rot("RightArm", Axis::Z, 0.2),
                rot("RightArm", Axis::X, FRAC_PI_3),
                rot("RightForeArm", Axis::Y, 0.0),
            ])
            .build(),
    ];

    let numbers = NUMBERS
        .iter()
        .map(|(name, shape, wrist)| hand_sign(name, *shape, *wrist, rest));

    let mut dict = GestureDictionary::new();
    for gesture in gestures.into_iter().chain(numbers) {
        dict.insert(gesture.name().to_string(), gesture);
    }
    dict
}

impl GestureLibrary {
    /// Bundled vocabulary, alphabet and rest pose
    pub fn builtin() -> Self {
        let rest = rest_pose();
        Self::new(words(&rest), alphabet(&rest), rest)
    }
}
