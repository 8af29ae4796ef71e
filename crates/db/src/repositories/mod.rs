//! Database repositories.

pub mod block;
pub mod comment;
pub mod follow_request;
pub mod follower;
pub mod like;
pub mod post;
pub mod story;
pub mod user;

pub use block::BlockRepository;
pub use comment::CommentRepository;
pub use follow_request::FollowRequestRepository;
pub use follower::FollowerRepository;
pub use like::LikeRepository;
pub use post::PostRepository;
pub use story::StoryRepository;
pub use user::UserRepository;
