//! Balloon simulation module
//!
//! All scene logic lives here. Single-threaded and deterministic for a given seed:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by item ID, spots in radial order)
//! - No rendering or platform dependencies

pub mod animator;
pub mod escape;
pub mod field;
pub mod gesture;
pub mod manager;
pub mod schedule;
pub mod spot;
pub mod state;
pub mod tick;

pub use animator::{Animator, BehaviorId, Item, ItemId};
pub use escape::{EscapeConfig, EscapeContext, EscapeFields};
pub use field::{
    BehaviorKind, Collision, Gravity, ItemDamping, RadialGravityField, SpringField, VortexField,
};
pub use gesture::{PanEvent, PanGesture, PanPhase};
pub use manager::{ShufflePlan, SpotManager, shuffle_targets};
pub use schedule::{Scheduler, TaskHandle};
pub use spot::{Interaction, Spot, SpotId, SpotParams};
pub use state::{Scene, SceneEvent, ScenePhase, SceneTask};
pub use tick::{TickInput, open_black_hole, tap, tick};
