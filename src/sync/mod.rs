// Record synchronization
// Keeps the local charging point list in step with the server

mod editor;
mod synchronizer;

pub use editor::{Editor, Intent, Selection};
pub use synchronizer::RecordSynchronizer;
