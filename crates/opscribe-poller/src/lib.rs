pub mod poller;

pub use poller::{OperationPoller, PollProgress, PollSettings};
