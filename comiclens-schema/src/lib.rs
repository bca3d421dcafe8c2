pub mod vision;
pub mod xkcd;

pub use vision::{VisionRequest, VisionResponse};
pub use xkcd::XkcdComic;
