pub mod idea;
pub mod vote;

pub use idea::{Entity as Idea, IdeaView, Model as IdeaModel};
pub use vote::{Entity as Vote, Model as VoteModel};
