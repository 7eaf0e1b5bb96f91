pub mod model;

pub use model::DrawStore;
