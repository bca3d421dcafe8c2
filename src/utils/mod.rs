pub(crate) mod logging;
pub(crate) mod serde_bool;
