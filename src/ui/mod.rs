pub mod icons;
pub mod output;
pub mod theme;

pub use icons::Icons;
pub use output::{header, info, status, success, warn};
pub use theme::{theme, Theme};
