//! Operator-facing admin surface support: list-view plumbing, preview
//! markup and the row shapes returned by the `/admin` handlers.

pub mod list;
pub mod preview;
pub mod rows;
