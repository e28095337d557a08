pub mod follow;

pub use follow::{FollowError, FollowOutcome, FollowService};
