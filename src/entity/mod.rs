//! Entity model: soldiers and arrows
//!
//! Plain simulation data decoupled from presentation. The rendering
//! collaborator reads position/rotation/visual state and keeps its own
//! sprite attachments.

pub mod arrow;
pub mod soldier;

pub use arrow::{Arrow, ArrowState};
pub use soldier::{Soldier, VisualState, WeaponMode};
