mod comiclens;

pub use comiclens::{ApiErrorBody, ComicLensError};
