pub mod model;
pub mod timer;
pub mod view;

pub use model::{Carousel, CarouselOptions, NavCause, Navigation, VisibleWindow};
pub use timer::AutoAdvance;
pub use view::render;

pub const ACTIVE_DOT: char = '●';
pub const INACTIVE_DOT: char = '○';
