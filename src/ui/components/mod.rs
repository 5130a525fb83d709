pub mod gauge;
pub mod input;

pub use gauge::IndexGauge;
pub use input::InputWidget;
