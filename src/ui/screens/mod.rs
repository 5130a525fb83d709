pub mod form;
pub mod recommendations;

pub use form::FormScreen;
pub use recommendations::RecommendationsScreen;
