//! Small reference networks shared by the test modules.
//!
//! # Rotation network (3 variables)
//!
//! ```text
//! x1' = x2
//! x2' = x3
//! x3' = x1
//! ```
//!
//! Synchronous dynamics rotate the state to the left:
//!
//! - `100 -> 001 -> 010 -> 100` is a 3-cycle attractor,
//! - `110 -> 101 -> 011 -> 110` is a second 3-cycle attractor,
//! - `000` and `111` are fixed points.
//!
//! Asynchronous dynamics have exactly two attractors, the fixed points `000` and `111`.
//!
//! # Toggle network (2 variables)
//!
//! ```text
//! x1' = ~x2
//! x2' = ~x1
//! ```
//!
//! Asynchronous fixed points are `01` and `10`; `00` and `11` are transient. Under
//! synchronous update, `00 <-> 11` is a 2-cycle attractor.
//!
//! # Chain network (4 variables)
//!
//! ```text
//! x1' = x1
//! x2' = x1
//! x3' = x2 & ~x4
//! x4' = x3 | x4
//! ```

use crate::network::BooleanNetwork;

pub fn rotation_network() -> BooleanNetwork {
    BooleanNetwork::from_expressions([("x1", "x2"), ("x2", "x3"), ("x3", "x1")]).unwrap()
}

pub fn toggle_network() -> BooleanNetwork {
    BooleanNetwork::from_expressions([("x1", "~x2"), ("x2", "~x1")]).unwrap()
}

pub fn chain_network() -> BooleanNetwork {
    BooleanNetwork::from_expressions([
        ("x1", "x1"),
        ("x2", "x1"),
        ("x3", "x2 & ~x4"),
        ("x4", "x3 | x4"),
    ])
    .unwrap()
}
