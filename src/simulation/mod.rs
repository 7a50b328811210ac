pub mod field;
pub mod source;

pub use field::WaveField;
pub use source::WaveSource;
