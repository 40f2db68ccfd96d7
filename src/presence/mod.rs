pub mod classify;
pub mod duration;
pub mod reconcile;
pub mod schedule;

pub use reconcile::reconcile;
