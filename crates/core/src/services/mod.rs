//! Business logic services.
//!
//! Every mutation resolves the acting identity from the identity provider's
//! external reference before touching any other table; no service trusts a
//! client-supplied internal id as the acting identity.

#![allow(missing_docs)]

pub mod block;
pub mod comment;
pub mod follow;
pub mod like;
pub mod post;
pub mod provisioning;
pub mod story;
pub mod user;

pub use block::{BlockService, BlockSwitch};
pub use comment::{CommentService, CommentWithAuthor, CreateCommentInput};
pub use follow::{FollowService, FollowSwitch};
pub use like::{LikeService, LikeSwitch};
pub use post::{CreatePostInput, PostService, PostWithAuthor};
pub use provisioning::{
    IdentityEvent, IdentityEventData, ProvisioningOutcome, ProvisioningService,
};
pub use story::{CreateStoryInput, StoryService, StoryWithOwner};
pub use user::{ProfileView, RelationFlags, UpdateProfileInput, UserService};
