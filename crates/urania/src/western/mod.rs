pub mod dignities;
pub mod rulers;
pub mod signs;

pub use dignities::{dignities_in, exaltation_degree, Dignity, DignityEvaluator};
pub use rulers::{ruled_signs, sign_ruler};
pub use signs::{is_retrograde, sign_index, ZodiacPosition, ZodiacSign};
