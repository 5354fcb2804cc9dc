pub mod checklist;
pub mod liveness;
pub mod proxy;
