/*!
 * Dataset generation: enumerating section splits and serializing them.
 *
 * - `combinations`: Every non-trivial input/output split of a title list
 * - `serializer`: Tagged input/output strings for one split
 */

pub mod combinations;
pub mod serializer;

pub use combinations::{Combination, CombinationGenerator};
pub use serializer::SampleSerializer;
