pub mod app;
pub mod carousel;
pub mod lightbox;
pub mod media;
pub mod viewport;
