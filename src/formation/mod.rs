//! Formation templates and grid placement

pub mod builder;
pub mod template;

pub use builder::place_formation;
pub use template::FormationTemplate;
