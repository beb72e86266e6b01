pub mod image;
pub mod post;
pub mod shared;
