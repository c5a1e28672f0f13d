// Interview sessions: persistence, the per-session runner state machine,
// scoring orchestration, and the post-interview review summary.

pub mod handlers;
pub mod review;
pub mod runner;
pub mod store;
