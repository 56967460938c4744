pub mod inspect;
pub mod new;
pub mod replay;

pub use inspect::{inspect, InspectArgs};
pub use new::{new, NewArgs};
pub use replay::{replay, ReplayArgs};
