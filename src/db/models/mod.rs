pub mod post;
pub mod profile;
pub mod user;

pub use post::{Comment, Post};
pub use profile::{EducationEntry, ExperienceEntry, Profile, ProfileFields, SocialLinks};
pub use user::User;
