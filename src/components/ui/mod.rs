pub mod alert;
pub mod button;
pub mod input;
pub mod label;
pub mod spinner;

// Re-export component symbols so callers can `use crate::components::ui::Button` etc.
pub use alert::*;
pub use button::*;
pub use input::*;
#[allow(unused_imports)]
pub use label::*;
pub use spinner::*;
