//! Database entities.

pub mod block;
pub mod comment;
pub mod follow_request;
pub mod follower;
pub mod like;
pub mod post;
pub mod story;
pub mod user;

pub use block::Entity as Block;
pub use comment::Entity as Comment;
pub use follow_request::Entity as FollowRequest;
pub use follower::Entity as Follower;
pub use like::Entity as Like;
pub use post::Entity as Post;
pub use story::Entity as Story;
pub use user::Entity as User;
